use crate::Integer;
use crate::stream::Stream;
use std::iter::{repeat, repeat_n, repeat_with, successors};

impl<'a, T: 'a> Stream<'a, T> {
    pub fn empty() -> Stream<'a, T> {
        Stream::of(std::iter::empty())
    }

    /// 无限流：`seed`, `f(seed)`, `f(f(seed))`, ...
    pub fn iterate(seed: T, mut f: impl FnMut(&T) -> T + 'a) -> Stream<'a, T> {
        Stream::of(successors(Some(seed), move |prev| Some(f(prev))))
    }

    /// 无限流，每个元素由`f`生成。
    pub fn generate(f: impl FnMut() -> T + 'a) -> Stream<'a, T> {
        Stream::of(repeat_with(f))
    }

    /// 重复`value`，未指定`count`时无限重复。
    pub fn repeat(value: T, count: Option<usize>) -> Stream<'a, T>
    where
        T: Clone,
    {
        match count {
            Some(count) => Stream::of(repeat_n(value, count)),
            None => Stream::of(repeat(value)),
        }
    }
}

impl Stream<'static, Integer> {
    /// 生成`[start, end]`范围内的整数。
    ///
    /// 步长为正时从`start`正序生成；为负时从`end`逆序生成；为0时无限重复`start`。
    /// 起始值大于结束值时为空流。
    pub fn range(start: Integer, end: Integer, step: Integer) -> Stream<'static, Integer> {
        let iter = RangeIter { start, end, step: step.unsigned_abs(), next: Some(start), next_back: Some(end) };
        if step < 0 { Stream::of(iter.rev()) } else { Stream::of(iter) }
    }
}

/// 双向整数范围，越过整数边界时结束。
#[derive(Debug, Eq, PartialEq)]
struct RangeIter {
    start: Integer,
    end: Integer,
    step: u64,
    next: Option<Integer>,
    next_back: Option<Integer>,
}

impl Iterator for RangeIter {
    type Item = Integer;

    fn next(&mut self) -> Option<Self::Item> {
        let (next, next_back) = (self.next?, self.next_back?);
        if next >= self.start && next <= self.end && next <= next_back {
            self.next = next.checked_add_unsigned(self.step);
            Some(next)
        } else {
            None
        }
    }
}

impl DoubleEndedIterator for RangeIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (next, next_back) = (self.next?, self.next_back?);
        if next_back >= self.start && next_back <= self.end && next_back >= next {
            self.next_back = next_back.checked_sub_unsigned(self.step);
            Some(next_back)
        } else {
            None
        }
    }
}
