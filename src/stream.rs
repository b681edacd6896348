use crate::collect::Collector;
use crate::config::Config;
use crate::op::{Buffered, Chunks};
use crate::shared::SharedStream;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::iter::Sum;
use std::rc::Rc;
use tracing::trace;

/// 惰性流。
///
/// 每个中间操作包装上游迭代器并返回新的流，元素只在终端操作拉取时才流经各个阶段。
/// 终端操作按值消耗流，因此同一个流最多被消耗一次；需要在运行时检查重复消耗时使用[`SharedStream`]。
pub struct Stream<'a, T> {
    pub(crate) iter: Box<dyn Iterator<Item = T> + 'a>,
    pub(crate) configs: Rc<[Config]>,
}

impl<T> Debug for Stream<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").field("configs", &self.configs).finish_non_exhaustive()
    }
}

impl<'a, T: 'a> IntoIterator for Stream<'a, T> {
    type Item = T;
    type IntoIter = Box<dyn Iterator<Item = T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter
    }
}

#[inline]
pub(crate) fn pull(op: &'static str) {
    trace!(op, "terminal operation starts pulling");
}

impl<'a, T: 'a> Stream<'a, T> {
    /// 包装任意数据源，数据源本身不会被修改。
    pub fn of<I>(source: I) -> Stream<'a, T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Stream { iter: Box::new(source.into_iter()), configs: Rc::from(Vec::new()) }
    }

    /// 附加选项，后续所有阶段继承这些选项。
    pub fn configs(self, configs: &[Config]) -> Stream<'a, T> {
        Stream { iter: self.iter, configs: Rc::from(configs) }
    }

    pub(crate) fn then<U, I>(self, f: impl FnOnce(Box<dyn Iterator<Item = T> + 'a>) -> I) -> Stream<'a, U>
    where
        U: 'a,
        I: Iterator<Item = U> + 'a,
    {
        Stream { iter: Box::new(f(self.iter)), configs: self.configs }
    }

    /// 转为运行时检查消耗次数的共享句柄。
    pub fn share(self) -> SharedStream<'a, T> {
        SharedStream::new(self)
    }

    /* **************************************** 中间操作 **************************************** */

    pub fn filter(self, predicate: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        self.then(|iter| iter.filter(predicate))
    }

    pub fn map<U: 'a>(self, transform: impl FnMut(T) -> U + 'a) -> Stream<'a, U> {
        self.then(|iter| iter.map(transform))
    }

    /// 将每个元素映射为一个序列，并按上游顺序拼接这些序列。
    ///
    /// 与`map`不同，`map`返回序列时得到的是序列的流，而不是展开后的元素流。
    pub fn flat_map<U, I>(self, transform: impl FnMut(T) -> I + 'a) -> Stream<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
    {
        self.then(|iter| iter.flat_map(transform))
    }

    /// 去重，保留首次出现的顺序。
    pub fn distinct(self) -> Stream<'a, T>
    where
        T: Eq + Hash + Clone,
    {
        let mut seen = FxHashSet::default();
        self.filter(move |item| !seen.contains(item) && seen.insert(item.clone()))
    }

    /// 按照投影的键去重，保留每个键首次出现的元素。
    pub fn distinct_by_key<K>(self, mut key: impl FnMut(&T) -> K + 'a) -> Stream<'a, T>
    where
        K: Eq + Hash + 'a,
    {
        let mut seen = FxHashSet::default();
        self.filter(move |item| seen.insert(key(item)))
    }

    /// 丢弃前N个元素，上游不足N个时为空流。
    pub fn skip(self, n: usize) -> Stream<'a, T> {
        self.then(|iter| iter.skip(n))
    }

    /// 最多保留N个元素，取满后不再拉取上游，因此可用于无限流。
    pub fn limit(self, n: usize) -> Stream<'a, T> {
        self.then(|iter| iter.take(n))
    }

    pub fn take_while(self, predicate: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        self.then(|iter| iter.take_while(predicate))
    }

    pub fn drop_while(self, predicate: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        self.then(|iter| iter.skip_while(predicate))
    }

    /// 每个元素流经时调用`action`。
    pub fn peek(self, action: impl FnMut(&T) + 'a) -> Stream<'a, T> {
        self.then(|iter| iter.inspect(action))
    }

    /// 按自然顺序稳定排序。首次拉取时才缓存全部上游。
    pub fn sorted(self) -> Stream<'a, T>
    where
        T: Ord,
    {
        self.then(|iter| Buffered::new(iter, |items: &mut Vec<T>| items.sort()))
    }

    pub fn sorted_by(self, comparator: impl FnMut(&T, &T) -> Ordering + 'a) -> Stream<'a, T> {
        self.then(|iter| Buffered::new(iter, move |items: &mut Vec<T>| items.sort_by(comparator)))
    }

    pub fn sorted_by_key<K: Ord + 'a>(self, key: impl FnMut(&T) -> K + 'a) -> Stream<'a, T> {
        self.then(|iter| Buffered::new(iter, move |items: &mut Vec<T>| items.sort_by_key(key)))
    }

    /// 随机顺序，与排序一样在首次拉取时缓存全部上游。
    pub fn shuffled(self) -> Stream<'a, T> {
        self.then(|iter| Buffered::new(iter, |items: &mut Vec<T>| items.shuffle(&mut rand::rng())))
    }

    /// 按`size`个元素分组，最后一组可能不足`size`个。
    ///
    /// # Panics
    ///
    /// `size`为0时panic。
    pub fn chunks(self, size: usize) -> Stream<'a, Vec<T>> {
        assert!(size > 0, "chunk size must be greater than zero");
        self.then(|iter| Chunks::new(iter, size))
    }

    /* **************************************** 终端操作 **************************************** */

    /// 存在满足条件的元素，首次满足时短路。
    pub fn any_match(mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        pull("any_match");
        self.iter.any(|item| predicate(&item))
    }

    /// 所有元素满足条件，空流为`true`，首次不满足时短路。
    pub fn all_match(mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        pull("all_match");
        self.iter.all(|item| predicate(&item))
    }

    /// 没有元素满足条件，首次满足时短路。
    pub fn none_match(mut self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        pull("none_match");
        !self.iter.any(|item| predicate(&item))
    }

    pub fn find_first(mut self) -> Option<T> {
        pull("find_first");
        self.iter.next()
    }

    /// 顺序求值时等同于[`Stream::find_first`]，并行求值时可能返回任意元素，见[`crate::ParStream::find_any`]。
    pub fn find_any(mut self) -> Option<T> {
        pull("find_any");
        self.iter.next()
    }

    pub fn for_each(self, action: impl FnMut(T)) {
        pull("for_each");
        self.iter.for_each(action)
    }

    /// 统计到达终端的元素数量，总是遍历整个流。
    pub fn count(self) -> usize {
        pull("count");
        self.iter.count()
    }

    /// 从`identity`开始从左到右折叠。
    pub fn reduce(self, identity: T, combiner: impl FnMut(T, T) -> T) -> T {
        pull("reduce");
        self.iter.fold(identity, combiner)
    }

    /// 两两折叠，空流返回`None`。
    pub fn reduce_opt(self, combiner: impl FnMut(T, T) -> T) -> Option<T> {
        pull("reduce_opt");
        self.iter.reduce(combiner)
    }

    pub fn collect<C: FromIterator<T>>(self) -> C {
        pull("collect");
        self.iter.collect()
    }

    pub fn collect_with<C: Collector<T>>(self, collector: C) -> C::Output {
        pull("collect_with");
        collector.collect(self.iter)
    }

    pub fn sum<S: Sum<T>>(self) -> S {
        pull("sum");
        self.iter.sum()
    }

    pub fn min(self) -> Option<T>
    where
        T: Ord,
    {
        pull("min");
        self.iter.min()
    }

    pub fn max(self) -> Option<T>
    where
        T: Ord,
    {
        pull("max");
        self.iter.max()
    }

    pub fn min_by(self, comparator: impl FnMut(&T, &T) -> Ordering) -> Option<T> {
        pull("min_by");
        self.iter.min_by(comparator)
    }

    pub fn max_by(self, comparator: impl FnMut(&T, &T) -> Ordering) -> Option<T> {
        pull("max_by");
        self.iter.max_by(comparator)
    }
}
