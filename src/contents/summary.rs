use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::BoxError;

/// 未编译摘要后端时写入描述符的占位文本
pub const PLACEHOLDER_SUMMARY: &str =
    "Structural summary unavailable: this server was built without the `hdf5-summary` feature.";

/// 生成数据集文件的可读结构概览
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// 占位实现返回 `false`，描述符会将其写入 metadata
    fn is_available(&self) -> bool;

    fn summarize(&self, os_path: &Path) -> Result<String, BoxError>;
}

/// 可选依赖缺失时的替代实现，不会失败
pub struct PlaceholderSummarizer;

impl Summarizer for PlaceholderSummarizer {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn summarize(&self, _os_path: &Path) -> Result<String, BoxError> {
        Ok(PLACEHOLDER_SUMMARY.to_string())
    }
}

#[cfg(feature = "hdf5-summary")]
pub use hdf5_backend::Hdf5Summarizer;

#[cfg(feature = "hdf5-summary")]
mod hdf5_backend {
    use std::path::Path;

    use super::Summarizer;
    use crate::error::BoxError;

    /// 通过 libhdf5 遍历 group 与 dataset，输出缩进树
    pub struct Hdf5Summarizer;

    fn walk(group: &hdf5::Group, depth: usize, out: &mut Vec<String>) -> hdf5::Result<()> {
        let indent = "  ".repeat(depth);
        for name in group.member_names()? {
            if let Ok(child) = group.group(&name) {
                out.push(format!("{}{}/", indent, name));
                walk(&child, depth + 1, out)?;
            } else if let Ok(dataset) = group.dataset(&name) {
                let shape = dataset.shape();
                let item = dataset.dtype().map(|dtype| dtype.size()).unwrap_or(0);
                out.push(format!(
                    "{}{}\tdataset {:?} ({}-byte items)",
                    indent, name, shape, item
                ));
            } else {
                out.push(format!("{}{}\t(link)", indent, name));
            }
        }
        Ok(())
    }

    impl Summarizer for Hdf5Summarizer {
        fn name(&self) -> &str {
            "hdf5"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn summarize(&self, os_path: &Path) -> Result<String, BoxError> {
            let file = hdf5::File::open(os_path)?;
            let mut lines = vec!["/".to_string()];
            walk(&file, 1, &mut lines)?;
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(feature = "hdf5-summary")]
fn backend() -> Arc<dyn Summarizer> {
    tracing::info!("[Summary] HDF5 summaries enabled");
    Arc::new(Hdf5Summarizer)
}

#[cfg(not(feature = "hdf5-summary"))]
fn backend() -> Arc<dyn Summarizer> {
    tracing::warn!("[Summary] hdf5 support not compiled in, descriptors will carry a placeholder");
    Arc::new(PlaceholderSummarizer)
}

static DETECTED: OnceLock<Arc<dyn Summarizer>> = OnceLock::new();

/// 每个进程只选择一次摘要后端，并记录结果
pub fn detect() -> Arc<dyn Summarizer> {
    DETECTED.get_or_init(backend).clone()
}
