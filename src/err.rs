use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum StreamErr {
    #[error("[Consumed] Stream has already been consumed, unable to apply `{op}`")]
    AlreadyConsumed { op: &'static str },

    #[error("[Bad Arg] Invalid regex `{reg}`, error: {err}")]
    InvalidRegex { reg: String, err: String },

    #[error("[Parallel] Build thread pool error: {0}")]
    ThreadPool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            "[Consumed] Stream has already been consumed, unable to apply `count`",
            StreamErr::AlreadyConsumed { op: "count" }.to_string()
        );
        assert_eq!(
            "[Bad Arg] Invalid regex `(`, error: oops",
            StreamErr::InvalidRegex { reg: "(".to_owned(), err: "oops".to_owned() }.to_string()
        );
    }
}
