use crate::StreamRes;
use crate::config;
use crate::err::StreamErr;
use crate::stream::Stream;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use tracing::debug;

/// 从源元素到当前阶段元素的逐元素变换，由各个中间操作组合而成。
type Stage<'a, S, T> = Arc<dyn Fn(S) -> Vec<T> + Send + Sync + 'a>;

/// 并行流。
///
/// 中间操作只组合逐元素的变换，终端操作开始时才在调用线程上物化有限数据源，
/// 再按最小分块切分后交给rayon并行处理。
/// 只支持不依赖相邻元素的操作，去重、排序、跳过和截取需要先转回顺序流。
pub struct ParStream<'a, S, T> {
    source: Stream<'a, S>,
    stage: Stage<'a, S, T>,
    pool: Option<ThreadPool>,
    min_chunk: usize,
}

impl<'a, T: Send + 'a> Stream<'a, T> {
    /// 转为并行流，数据源必须有限。
    ///
    /// 指定[`crate::Config::Threads`]时使用独立线程池，否则使用rayon全局线程池。
    pub fn parallel(self) -> StreamRes<ParStream<'a, T, T>> {
        let pool = match config::threads(&self.configs) {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| StreamErr::ThreadPool(err.to_string()))?,
            ),
            None => None,
        };
        let min_chunk = config::min_chunk(&self.configs);
        Ok(ParStream { source: self, stage: Arc::new(|item: T| vec![item]), pool, min_chunk })
    }
}

fn par_items<'a, S, T>(items: Vec<S>, stage: Stage<'a, S, T>, min_chunk: usize) -> impl ParallelIterator<Item = T> + 'a
where
    S: Send + 'a,
    T: Send + 'a,
{
    items.into_par_iter().with_min_len(min_chunk).flat_map_iter(move |item| stage(item))
}

impl<'a, S: Send + 'a, T: Send + 'a> ParStream<'a, S, T> {
    fn then<U: Send + 'a>(self, f: impl Fn(Vec<T>) -> Vec<U> + Send + Sync + 'a) -> ParStream<'a, S, U> {
        let ParStream { source, stage, pool, min_chunk } = self;
        ParStream { source, stage: Arc::new(move |item: S| f(stage(item))), pool, min_chunk }
    }

    /// 物化数据源，在线程池内执行终端操作。
    fn evaluate<R: Send>(
        self,
        op: &'static str,
        terminal: impl FnOnce(Vec<S>, Stage<'a, S, T>, usize) -> R + Send,
    ) -> R {
        let ParStream { source, stage, pool, min_chunk } = self;
        let items: Vec<S> = source.collect();
        debug!(
            op,
            len = items.len(),
            min_chunk,
            threads = pool.as_ref().map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads()),
            "parallel terminal partitions source"
        );
        match pool {
            Some(pool) => pool.install(move || terminal(items, stage, min_chunk)),
            None => terminal(items, stage, min_chunk),
        }
    }

    /* **************************************** 中间操作 **************************************** */

    pub fn filter(self, predicate: impl Fn(&T) -> bool + Send + Sync + 'a) -> ParStream<'a, S, T> {
        self.then(move |items| items.into_iter().filter(|item| predicate(item)).collect())
    }

    pub fn map<U: Send + 'a>(self, transform: impl Fn(T) -> U + Send + Sync + 'a) -> ParStream<'a, S, U> {
        self.then(move |items| items.into_iter().map(&transform).collect())
    }

    pub fn flat_map<U, I>(self, transform: impl Fn(T) -> I + Send + Sync + 'a) -> ParStream<'a, S, U>
    where
        U: Send + 'a,
        I: IntoIterator<Item = U>,
    {
        self.then(move |items| items.into_iter().flat_map(&transform).collect())
    }

    /* **************************************** 终端操作 **************************************** */

    /// 并行调用`action`，调用顺序不确定。
    pub fn for_each(self, action: impl Fn(T) + Send + Sync) {
        self.evaluate("for_each", move |items, stage, min_chunk| par_items(items, stage, min_chunk).for_each(action))
    }

    pub fn count(self) -> usize {
        self.evaluate("count", |items, stage, min_chunk| par_items(items, stage, min_chunk).count())
    }

    pub fn any_match(self, predicate: impl Fn(&T) -> bool + Send + Sync) -> bool {
        self.evaluate("any_match", move |items, stage, min_chunk| {
            par_items(items, stage, min_chunk).any(|item| predicate(&item))
        })
    }

    pub fn all_match(self, predicate: impl Fn(&T) -> bool + Send + Sync) -> bool {
        self.evaluate("all_match", move |items, stage, min_chunk| {
            par_items(items, stage, min_chunk).all(|item| predicate(&item))
        })
    }

    pub fn none_match(self, predicate: impl Fn(&T) -> bool + Send + Sync) -> bool {
        !self.any_match(predicate)
    }

    /// 按相遇顺序的第一个元素。
    pub fn find_first(self) -> Option<T> {
        self.evaluate("find_first", |items, stage, min_chunk| par_items(items, stage, min_chunk).find_first(|_| true))
    }

    /// 任意一个元素，不保证是第一个。
    pub fn find_any(self) -> Option<T> {
        self.evaluate("find_any", |items, stage, min_chunk| par_items(items, stage, min_chunk).find_any(|_| true))
    }

    /// `combiner`必须满足结合律，`identity`必须是`combiner`的单位元，
    /// 每个分块都会以`identity`开始折叠。
    pub fn reduce(self, identity: T, combiner: impl Fn(T, T) -> T + Send + Sync) -> T
    where
        T: Clone + Sync,
    {
        self.evaluate("reduce", move |items, stage, min_chunk| {
            par_items(items, stage, min_chunk).reduce(|| identity.clone(), combiner)
        })
    }

    /// `combiner`必须满足结合律，空流返回`None`。
    pub fn reduce_opt(self, combiner: impl Fn(T, T) -> T + Send + Sync) -> Option<T> {
        self.evaluate("reduce_opt", move |items, stage, min_chunk| {
            par_items(items, stage, min_chunk).reduce_with(combiner)
        })
    }

    /// 按相遇顺序收集。
    pub fn collect_vec(self) -> Vec<T> {
        self.evaluate("collect_vec", |items, stage, min_chunk| par_items(items, stage, min_chunk).collect())
    }

    /// 转回惰性的顺序流，首次拉取时并行求值当前阶段。
    pub fn sequential(self) -> Stream<'a, T> {
        let configs = self.source.configs.clone();
        Stream { iter: Box::new(std::iter::once(self).flat_map(ParStream::collect_vec)), configs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LANGS: [&str; 7] = ["Java", "JavaScript", "python", "PHP", "C#", "Golang", "Swift"];

    fn numbers() -> Stream<'static, i64> {
        Stream::range(1, 1000, 1).configs(&[Config::Threads(4), Config::MinChunk(16)])
    }

    #[test]
    fn test_collect_keeps_encounter_order() {
        let res = numbers().parallel().unwrap().filter(|i| i % 3 == 0).map(|i| i * 2).collect_vec();
        let expected: Vec<i64> = numbers().filter(|i| i % 3 == 0).map(|i| i * 2).collect();
        assert_eq!(res, expected);
    }

    #[test]
    fn test_flat_map() {
        let res = Stream::of(LANGS).parallel().unwrap().flat_map(|s| s.chars()).collect_vec();
        let expected: Vec<char> = Stream::of(LANGS).flat_map(|s| s.chars()).collect();
        assert_eq!(res, expected);
    }

    #[test]
    fn test_count_and_matches() {
        assert_eq!(333, numbers().parallel().unwrap().filter(|i| i % 3 == 0).count());
        assert!(numbers().parallel().unwrap().any_match(|i| *i == 999));
        assert!(numbers().parallel().unwrap().all_match(|i| *i > 0));
        assert!(numbers().parallel().unwrap().none_match(|i| *i > 1000));
        assert!(Stream::of(Vec::<i32>::new()).parallel().unwrap().all_match(|_| false));
    }

    #[test]
    fn test_find() {
        assert_eq!(Some("JavaScript"), Stream::of(LANGS).parallel().unwrap().filter(|s| s.len() > 5).find_first());
        let any = Stream::of(LANGS).parallel().unwrap().filter(|s| s.starts_with('J')).find_any();
        assert!(matches!(any, Some("Java") | Some("JavaScript")));
        assert_eq!(None, Stream::of(LANGS).parallel().unwrap().filter(|s| s.is_empty()).find_any());
    }

    #[test]
    fn test_reduce() {
        assert_eq!(500500, numbers().parallel().unwrap().reduce(0, |a, b| a + b));
        assert_eq!(Some(1000), numbers().parallel().unwrap().reduce_opt(i64::max));
        assert_eq!(Some(16), Stream::of([1, 2, 1, 3, 3, 2, 4]).parallel().unwrap().reduce_opt(|a, b| a + b));
        assert_eq!(None, Stream::of(Vec::<i32>::new()).parallel().unwrap().reduce_opt(i32::min));
    }

    #[test]
    fn test_for_each() {
        let sum = AtomicUsize::new(0);
        numbers().parallel().unwrap().map(|i| i as usize).for_each(|i| {
            sum.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(500500, sum.into_inner());
    }

    #[test]
    fn test_sequential_is_lazy() {
        let pulled = Cell::new(0);
        let stream = Stream::of([3, 1, 2])
            .peek(|_| pulled.set(pulled.get() + 1))
            .parallel()
            .unwrap()
            .map(|i| i * 10)
            .sequential()
            .sorted();
        assert_eq!(0, pulled.get());
        assert_eq!(stream.collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(3, pulled.get());
    }

    #[test]
    fn test_global_pool() {
        let res = Stream::of(LANGS).parallel().unwrap().map(str::len).collect_vec();
        assert_eq!(res, vec![4, 10, 6, 3, 2, 6, 5]);
    }
}
