use crate::config::is_nocase;
use crate::err::StreamErr;
use crate::stream::{Stream, pull};
use crate::{Float, StreamRes};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::fmt::Display;
use unicase::UniCase;

impl<'a> Stream<'a, String> {
    /// 转为ASCII大写。
    pub fn upper(self) -> Stream<'a, String> {
        self.map(|mut item| {
            if item.bytes().any(|b| b.is_ascii_lowercase()) {
                item.make_ascii_uppercase();
            }
            item
        })
    }

    /// 转为ASCII小写。
    pub fn lower(self) -> Stream<'a, String> {
        self.map(|mut item| {
            if item.bytes().any(|b| b.is_ascii_uppercase()) {
                item.make_ascii_lowercase();
            }
            item
        })
    }

    /// 去重，`nocase`或全局[`crate::Config::Nocase`]时忽略ASCII大小写，保留首次出现的原始文本。
    pub fn uniq(self, nocase: bool) -> Stream<'a, String> {
        if !is_nocase(nocase, &self.configs) {
            return self.distinct();
        }
        let mut seen = FxHashSet::default();
        self.filter(move |item| seen.insert(item.to_ascii_uppercase()))
    }

    /// 按字典序稳定排序。
    pub fn sorted_text(self, nocase: bool, desc: bool) -> Stream<'a, String> {
        if is_nocase(nocase, &self.configs) {
            if desc {
                self.sorted_by(|a, b| UniCase::new(b.as_str()).cmp(&UniCase::new(a.as_str())))
            } else {
                self.sorted_by(|a, b| UniCase::new(a.as_str()).cmp(&UniCase::new(b.as_str())))
            }
        } else if desc {
            self.sorted_by(|a, b| b.cmp(a))
        } else {
            self.sorted()
        }
    }

    /// 按数值稳定排序，无法解析为数值的文本按`default`排序。
    pub fn sorted_num(self, default: Float, desc: bool) -> Stream<'a, String> {
        let key_fn = move |item: &String| OrderedFloat(item.trim().parse().unwrap_or(default));
        if desc { self.sorted_by_key(move |item| Reverse(key_fn(item))) } else { self.sorted_by_key(key_fn) }
    }

    /// 保留整体匹配正则的文本，全局[`crate::Config::Nocase`]时忽略大小写。
    pub fn matches(self, regex: &str) -> StreamRes<Stream<'a, String>> {
        // 先单独校验，避免不成对的分组越过外层锚点
        Regex::new(regex).map_err(|err| StreamErr::InvalidRegex { reg: regex.to_owned(), err: err.to_string() })?;
        let reg = format!(r"\A(?:{})\z", regex);
        let regex = RegexBuilder::new(&reg)
            .case_insensitive(is_nocase(false, &self.configs))
            .build()
            .map_err(|err| StreamErr::InvalidRegex { reg, err: err.to_string() })?;
        Ok(self.filter(move |item| regex.is_match(item)))
    }

    /// 拆分为单个字符的文本并展开。
    pub fn chars(self) -> Stream<'a, String> {
        self.flat_map(|item| item.chars().map(String::from).collect_vec())
    }
}

impl<'a, T: Display + 'a> Stream<'a, T> {
    /// 以`delimiter`连接所有元素。
    pub fn join(mut self, delimiter: &str) -> String {
        pull("join");
        self.iter.join(delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn texts(values: &[&str]) -> Stream<'static, String> {
        Stream::of(values.iter().map(|s| s.to_string()).collect_vec())
    }

    #[test]
    fn test_case() {
        assert_eq!(texts(&["Java", "c#", "ÄbC"]).upper().collect::<Vec<_>>(), vec!["JAVA", "C#", "ÄBC"]);
        assert_eq!(texts(&["Java", "C#", "ÄbC"]).lower().collect::<Vec<_>>(), vec!["java", "c#", "Äbc"]);
    }

    #[test]
    fn test_uniq() {
        let values = ["abc", "ABC", "abc", "Abc", "xyz"];
        assert_eq!(texts(&values).uniq(false).collect::<Vec<_>>(), vec!["abc", "ABC", "Abc", "xyz"]);
        assert_eq!(texts(&values).uniq(true).collect::<Vec<_>>(), vec!["abc", "xyz"]);
        assert_eq!(texts(&values).configs(&[Config::Nocase]).uniq(false).collect::<Vec<_>>(), vec!["abc", "xyz"]);
    }

    #[test]
    fn test_sorted_text() {
        let values = ["b", "B", "a", "C", "A"];
        assert_eq!(texts(&values).sorted_text(false, false).collect::<Vec<_>>(), vec!["A", "B", "C", "a", "b"]);
        assert_eq!(texts(&values).sorted_text(false, true).collect::<Vec<_>>(), vec!["b", "a", "C", "B", "A"]);
        assert_eq!(texts(&values).sorted_text(true, false).collect::<Vec<_>>(), vec!["a", "A", "b", "B", "C"]);
        assert_eq!(texts(&values).sorted_text(true, true).collect::<Vec<_>>(), vec!["C", "b", "B", "a", "A"]);
    }

    #[test]
    fn test_sorted_num() {
        let values = ["10", "x", "2", "-1.5", "2.0"];
        assert_eq!(texts(&values).sorted_num(Float::MAX, false).collect::<Vec<_>>(), vec!["-1.5", "2", "2.0", "10", "x"]);
        assert_eq!(texts(&values).sorted_num(0.0, false).collect::<Vec<_>>(), vec!["-1.5", "x", "2", "2.0", "10"]);
        assert_eq!(texts(&values).sorted_num(Float::MAX, true).collect::<Vec<_>>(), vec!["x", "10", "2", "2.0", "-1.5"]);
    }

    #[test]
    fn test_matches() {
        let values = ["Java", "JavaScript", "python", "PHP"];
        assert_eq!(texts(&values).matches("J.*").unwrap().collect::<Vec<_>>(), vec!["Java", "JavaScript"]);
        assert_eq!(texts(&values).matches("Java").unwrap().collect::<Vec<_>>(), vec!["Java"]);
        assert_eq!(
            texts(&values).configs(&[Config::Nocase]).matches("p.*").unwrap().collect::<Vec<_>>(),
            vec!["python", "PHP"]
        );
        assert!(matches!(texts(&values).matches("(").unwrap_err(), StreamErr::InvalidRegex { .. }));
        assert_eq!(
            texts(&["abc", "xyzb", "q"]).matches("a)|(b").unwrap_err(),
            StreamErr::InvalidRegex {
                reg: "a)|(b".to_owned(),
                err: Regex::new("a)|(b").unwrap_err().to_string()
            }
        );
        assert_eq!(texts(&["abc", "a", "b", "ab"]).matches("a|b").unwrap().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_chars() {
        let res = texts(&["Java", "C#"]).chars().uniq(false).collect::<Vec<_>>();
        assert_eq!(res, vec!["J", "a", "v", "C", "#"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(texts(&["a", "b", "c"]).join(", "), "a, b, c");
        assert_eq!(Stream::of([1, 2, 3]).join("-"), "1-2-3");
        assert_eq!(Stream::of(Vec::<i32>::new()).join("-"), "");
    }
}
