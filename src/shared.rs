use crate::StreamRes;
use crate::err::StreamErr;
use crate::stream::Stream;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use tracing::warn;

/// 可复制的流句柄，所有副本指向同一个流，在运行时保证流最多被消耗一次。
///
/// 第一次终端（或中间）操作取走流，之后在任何副本上的操作都返回[`StreamErr::AlreadyConsumed`]。
/// 句柄不可重入，也不能跨线程使用。
pub struct SharedStream<'a, T> {
    inner: Rc<RefCell<Option<Stream<'a, T>>>>,
}

impl<T> Clone for SharedStream<'_, T> {
    fn clone(&self) -> Self {
        SharedStream { inner: Rc::clone(&self.inner) }
    }
}

impl<T> Debug for SharedStream<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStream").field("consumed", &self.inner.borrow().is_none()).finish()
    }
}

impl<'a, T: 'a> SharedStream<'a, T> {
    pub(crate) fn new(stream: Stream<'a, T>) -> Self {
        SharedStream { inner: Rc::new(RefCell::new(Some(stream))) }
    }

    pub fn is_consumed(&self) -> bool {
        self.inner.borrow().is_none()
    }

    /// 取走流，`op`为取走流的操作名，用于错误信息。
    pub fn take(&self, op: &'static str) -> StreamRes<Stream<'a, T>> {
        let stream = self.inner.borrow_mut().take();
        stream.ok_or_else(|| {
            warn!(op, "stream reused after being consumed");
            StreamErr::AlreadyConsumed { op }
        })
    }

    /// 以终端操作`f`消耗流。
    pub fn consume<R>(&self, op: &'static str, f: impl FnOnce(Stream<'a, T>) -> R) -> StreamRes<R> {
        self.take(op).map(f)
    }

    /// 在流上追加中间操作，原句柄随之失效。
    pub fn then<U: 'a>(
        &self,
        op: &'static str,
        f: impl FnOnce(Stream<'a, T>) -> Stream<'a, U>,
    ) -> StreamRes<SharedStream<'a, U>> {
        self.take(op).map(|stream| f(stream).share())
    }

    pub fn count(&self) -> StreamRes<usize> {
        self.consume("count", Stream::count)
    }

    pub fn find_first(&self) -> StreamRes<Option<T>> {
        self.consume("find_first", Stream::find_first)
    }

    pub fn for_each(&self, action: impl FnMut(T)) -> StreamRes<()> {
        self.consume("for_each", |stream| stream.for_each(action))
    }

    pub fn collect_vec(&self) -> StreamRes<Vec<T>> {
        self.consume("collect", Stream::collect)
    }
}
