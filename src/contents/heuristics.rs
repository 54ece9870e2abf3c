use std::collections::HashSet;
use std::sync::Arc;

use super::model::ModelDraft;

/// 默认流式阈值（500 MB），达到该大小的文件不再内联
pub const DEFAULT_SIZE_THRESHOLD: u64 = 500_000_000;

/// 基于模型草稿的纯判断：文件是否应当流式返回
pub trait Heuristic: Send + Sync {
    fn name(&self) -> &str;

    fn is_streamable(&self, draft: &ModelDraft) -> bool;
}

/// 扩展名命中固定集合（默认 `mp4`）时流式返回
pub struct ExtensionHeuristic {
    extensions: HashSet<String>,
}

impl ExtensionHeuristic {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }
}

impl Heuristic for ExtensionHeuristic {
    fn name(&self) -> &str {
        "extension"
    }

    fn is_streamable(&self, draft: &ModelDraft) -> bool {
        draft
            .extension()
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }
}

pub struct SizeHeuristic {
    threshold: u64,
}

impl SizeHeuristic {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }
}

impl Heuristic for SizeHeuristic {
    fn name(&self) -> &str {
        "size"
    }

    fn is_streamable(&self, draft: &ModelDraft) -> bool {
        draft.size >= self.threshold
    }
}

/// 有序只读的启发式列表，任意一项命中即视为可流式
#[derive(Clone, Default)]
pub struct HeuristicSet {
    heuristics: Vec<Arc<dyn Heuristic>>,
}

impl HeuristicSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.heuristics.push(Arc::new(heuristic));
        self
    }

    /// 先判断扩展名，再判断大小
    pub fn standard<I, S>(extensions: I, size_threshold: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new()
            .with(ExtensionHeuristic::new(extensions))
            .with(SizeHeuristic::new(size_threshold))
    }

    /// 按注册顺序返回第一个命中的启发式名称
    pub fn matches(&self, draft: &ModelDraft) -> Option<&str> {
        self.heuristics
            .iter()
            .find(|heuristic| heuristic.is_streamable(draft))
            .map(|heuristic| heuristic.name())
    }

    pub fn names(&self) -> Vec<&str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.heuristics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(path: &str, size: u64) -> ModelDraft {
        ModelDraft {
            path: path.to_string(),
            size,
            mimetype: None,
            url: format!("/files/{}", path),
        }
    }

    #[test]
    fn extension_heuristic_ignores_case_and_dots() {
        let heuristic = ExtensionHeuristic::new([".MP4", "mkv"]);
        assert!(heuristic.is_streamable(&draft("clips/a.mp4", 1)));
        assert!(heuristic.is_streamable(&draft("clips/b.MKV", 1)));
        assert!(!heuristic.is_streamable(&draft("clips/mp4", 1)));
        assert!(!heuristic.is_streamable(&draft("notes.txt", 1)));
    }

    #[test]
    fn size_heuristic_is_inclusive() {
        let heuristic = SizeHeuristic::new(DEFAULT_SIZE_THRESHOLD);
        assert!(heuristic.is_streamable(&draft("a.bin", 500_000_000)));
        assert!(!heuristic.is_streamable(&draft("a.bin", 499_999_999)));
    }

    #[test]
    fn standard_set_reports_first_match() {
        let set = HeuristicSet::standard(["mp4"], DEFAULT_SIZE_THRESHOLD);
        assert_eq!(set.names(), vec!["extension", "size"]);
        assert_eq!(set.matches(&draft("huge.mp4", 600_000_000)), Some("extension"));
        assert_eq!(set.matches(&draft("huge.bin", 600_000_000)), Some("size"));
        assert_eq!(set.matches(&draft("small.bin", 10)), None);
    }

    #[test]
    fn empty_set_never_matches() {
        let set = HeuristicSet::new();
        assert!(set.is_empty());
        assert_eq!(set.matches(&draft("huge.mp4", u64::MAX)), None);
    }
}
