//! 惰性流水线：一个数据源，一串惰性的中间操作，以及一个触发求值的终端操作。
//!
//! ```
//! use rstream::Stream;
//!
//! let upper = Stream::of(["Java", "JavaScript", "python"])
//!     .filter(|s| s.starts_with('J'))
//!     .map(str::to_uppercase)
//!     .collect::<Vec<_>>();
//! assert_eq!(upper, vec!["JAVA", "JAVASCRIPT"]);
//! ```

pub mod collect;
mod config;
mod err;
mod op;
mod par;
mod shared;
mod source;
mod stream;
mod text;

pub use crate::collect::Collector;
pub use crate::config::Config;
pub use crate::err::StreamErr;
pub use crate::par::ParStream;
pub use crate::shared::SharedStream;
pub use crate::stream::Stream;

/// 整数类型
pub type Integer = i64;

/// 浮点类型
pub type Float = f64;

pub type StreamRes<T> = Result<T, StreamErr>;
