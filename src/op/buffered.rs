use itertools::Itertools;
use std::vec::IntoIter;
use tracing::debug;

/// 需要全局视图的阶段，例如排序和乱序。
///
/// 构造时不拉取任何元素，首次`next`时缓存全部上游，调用`arrange`整理后再逐个产出。
pub(crate) struct Buffered<I: Iterator, F> {
    pending: Option<(I, F)>,
    buffer: IntoIter<I::Item>,
}

impl<I, F> Buffered<I, F>
where
    I: Iterator,
    F: FnOnce(&mut Vec<I::Item>),
{
    pub(crate) fn new(upstream: I, arrange: F) -> Self {
        Buffered { pending: Some((upstream, arrange)), buffer: Vec::new().into_iter() }
    }
}

impl<I, F> Iterator for Buffered<I, F>
where
    I: Iterator,
    F: FnOnce(&mut Vec<I::Item>),
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((upstream, arrange)) = self.pending.take() {
            let mut items = upstream.collect_vec();
            debug!(len = items.len(), "buffered stage materialized upstream");
            arrange(&mut items);
            self.buffer = items.into_iter();
        }
        self.buffer.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.pending {
            Some((upstream, _)) => upstream.size_hint(),
            None => self.buffer.size_hint(),
        }
    }
}
