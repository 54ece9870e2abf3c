use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::model::{ContentFormat, EntryKind};
use crate::error::HostError;

/// 宿主对单个路径的 stat 结果
#[derive(Debug, Clone, PartialEq)]
pub struct BaseModel {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    /// 宿主无法确定大小时为 `None`
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub writable: bool,
}

/// 内容读取的原始结果，`format` 为宿主自己的标签，由策略层校验
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub content: String,
    pub format: String,
}

/// 流式策略所依赖的 stat/read 原语
///
/// 存在性与权限检查由实现方负责，策略层原样透传其错误。
pub trait ContentsHost: Send + Sync {
    fn base_model(&self, path: &str) -> Result<BaseModel, HostError>;

    fn os_path(&self, path: &str) -> Result<PathBuf, HostError>;

    /// 读取整个文件。`format` 为 `None` 时，能按 UTF-8 解码则返回 text，否则返回 base64
    fn read_file(
        &self,
        os_path: &Path,
        format: Option<ContentFormat>,
    ) -> Result<FileContent, HostError>;

    /// 目录下直接子项的名称
    fn list_dir(&self, path: &str) -> Result<Vec<String>, HostError>;
}
