use std::iter::Fuse;

/// 按固定大小分组，最后一组可能不足。
pub(crate) struct Chunks<I: Iterator> {
    source: Fuse<I>,
    size: usize,
}

impl<I: Iterator> Chunks<I> {
    pub(crate) fn new(source: I, size: usize) -> Self {
        Chunks { source: source.fuse(), size }
    }
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk: Vec<_> = self.source.by_ref().take(self.size).collect();
        if chunk.is_empty() { None } else { Some(chunk) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (low, high) = self.source.size_hint();
        (low.div_ceil(self.size), high.map(|high| high.div_ceil(self.size)))
    }
}
