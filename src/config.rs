/// 流水线选项，附加到流上后由每个阶段继承。
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Config {
    /// 并行模式使用独立线程池，指定工作线程数。
    /// 未指定时使用rayon全局线程池。
    Threads(usize),
    /// 并行模式下每个分块的最小元素数，未指定时为1。
    MinChunk(usize),
    /// 文本操作全局忽略大小写。
    Nocase,
}

#[inline]
pub(crate) fn is_nocase(nocase: bool, configs: &[Config]) -> bool {
    nocase || configs.contains(&Config::Nocase)
}

/// 最后指定的值生效。
pub(crate) fn threads(configs: &[Config]) -> Option<usize> {
    configs.iter().rev().find_map(|c| if let Config::Threads(n) = c { Some(*n) } else { None })
}

pub(crate) fn min_chunk(configs: &[Config]) -> usize {
    configs
        .iter()
        .rev()
        .find_map(|c| if let Config::MinChunk(n) = c { Some(*n) } else { None })
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nocase() {
        assert!(is_nocase(true, &[]));
        assert!(!is_nocase(false, &[]));
        assert!(is_nocase(false, &[Config::Threads(2), Config::Nocase]));
    }

    #[test]
    fn test_threads() {
        assert_eq!(None, threads(&[]));
        assert_eq!(Some(4), threads(&[Config::Threads(4)]));
        assert_eq!(Some(8), threads(&[Config::Threads(4), Config::Nocase, Config::Threads(8)]));
    }

    #[test]
    fn test_min_chunk() {
        assert_eq!(1, min_chunk(&[]));
        assert_eq!(1, min_chunk(&[Config::MinChunk(0)]));
        assert_eq!(64, min_chunk(&[Config::MinChunk(64)]));
    }
}
