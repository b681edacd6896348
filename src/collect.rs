//! 终端收集器，把流中的元素物化为目标容器。
//!
//! 直接收集为实现了[`FromIterator`]的容器时使用[`crate::Stream::collect`]，
//! 需要按键建映射、分组或拼接文本时使用这里的收集器配合[`crate::Stream::collect_with`]。

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::hash::Hash;
use std::marker::PhantomData;

pub trait Collector<T> {
    type Output;

    fn collect<I: Iterator<Item = T>>(self, items: I) -> Self::Output;
}

/// 按相遇顺序收集为`Vec`。
pub fn to_vec() -> ToVec {
    ToVec
}

/// 收集为`FxHashSet`，不保留顺序。
pub fn to_set() -> ToSet {
    ToSet
}

/// 收集为有序的`BTreeSet`。
pub fn to_sorted_set() -> ToSortedSet {
    ToSortedSet
}

/// 按`key`和`value`建映射，重复的键以后出现的值为准。
pub fn to_map<K, V, KF, VF>(key: KF, value: VF) -> ToMap<K, V, KF, VF> {
    ToMap { key, value, _kv: PhantomData }
}

/// 按`key`和`value`建映射，重复的键使用`merge(旧值, 新值)`合并。
pub fn to_map_merge<K, V, KF, VF, MF>(key: KF, value: VF, merge: MF) -> ToMapMerge<K, V, KF, VF, MF> {
    ToMapMerge { key, value, merge, _kv: PhantomData }
}

/// 按`key`分组，组内保留相遇顺序。
pub fn grouping_by<K, KF>(key: KF) -> GroupingBy<K, KF> {
    GroupingBy { key, _k: PhantomData }
}

/// 以`delimiter`连接，并添加前缀和后缀。
pub fn joining(delimiter: &str, prefix: &str, postfix: &str) -> Joining {
    Joining { delimiter: delimiter.to_owned(), prefix: prefix.to_owned(), postfix: postfix.to_owned() }
}

pub fn counting() -> Counting {
    Counting
}

#[derive(Debug, Clone, Copy)]
pub struct ToVec;

impl<T> Collector<T> for ToVec {
    type Output = Vec<T>;

    fn collect<I: Iterator<Item = T>>(self, items: I) -> Vec<T> {
        items.collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToSet;

impl<T: Eq + Hash> Collector<T> for ToSet {
    type Output = FxHashSet<T>;

    fn collect<I: Iterator<Item = T>>(self, items: I) -> FxHashSet<T> {
        items.collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToSortedSet;

impl<T: Ord> Collector<T> for ToSortedSet {
    type Output = BTreeSet<T>;

    fn collect<I: Iterator<Item = T>>(self, items: I) -> BTreeSet<T> {
        items.collect()
    }
}

pub struct ToMap<K, V, KF, VF> {
    key: KF,
    value: VF,
    _kv: PhantomData<fn() -> (K, V)>,
}

impl<T, K, V, KF, VF> Collector<T> for ToMap<K, V, KF, VF>
where
    K: Eq + Hash,
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
{
    type Output = FxHashMap<K, V>;

    fn collect<I: Iterator<Item = T>>(mut self, items: I) -> FxHashMap<K, V> {
        items.map(|item| ((self.key)(&item), (self.value)(item))).collect()
    }
}

pub struct ToMapMerge<K, V, KF, VF, MF> {
    key: KF,
    value: VF,
    merge: MF,
    _kv: PhantomData<fn() -> (K, V)>,
}

impl<T, K, V, KF, VF, MF> Collector<T> for ToMapMerge<K, V, KF, VF, MF>
where
    K: Eq + Hash,
    KF: FnMut(&T) -> K,
    VF: FnMut(T) -> V,
    MF: FnMut(V, V) -> V,
{
    type Output = FxHashMap<K, V>;

    fn collect<I: Iterator<Item = T>>(mut self, items: I) -> FxHashMap<K, V> {
        let mut map = FxHashMap::default();
        for item in items {
            let key = (self.key)(&item);
            let value = (self.value)(item);
            let merged = match map.remove(&key) {
                Some(old) => (self.merge)(old, value),
                None => value,
            };
            map.insert(key, merged);
        }
        map
    }
}

pub struct GroupingBy<K, KF> {
    key: KF,
    _k: PhantomData<fn() -> K>,
}

impl<T, K, KF> Collector<T> for GroupingBy<K, KF>
where
    K: Eq + Hash,
    KF: FnMut(&T) -> K,
{
    type Output = FxHashMap<K, Vec<T>>;

    fn collect<I: Iterator<Item = T>>(mut self, items: I) -> FxHashMap<K, Vec<T>> {
        let mut groups: FxHashMap<K, Vec<T>> = FxHashMap::default();
        for item in items {
            groups.entry((self.key)(&item)).or_default().push(item);
        }
        groups
    }
}

#[derive(Debug, Clone)]
pub struct Joining {
    delimiter: String,
    prefix: String,
    postfix: String,
}

impl<T: Display> Collector<T> for Joining {
    type Output = String;

    fn collect<I: Iterator<Item = T>>(self, mut items: I) -> String {
        format!("{}{}{}", self.prefix, items.join(&self.delimiter), self.postfix)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Counting;

impl<T> Collector<T> for Counting {
    type Output = usize;

    fn collect<I: Iterator<Item = T>>(self, items: I) -> usize {
        items.count()
    }
}
