use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ContentsError;

/// 保留媒体类型，表示 `content` 中是描述符
pub const DATASET_MIMETYPE: &str = "application/vnd.jupyter.dataset+json";

/// 每个文件模型声明的带外访问协议
pub const RANGE_REQUEST_API: &str = "Range-Request";

/// 描述符 payload 的结构版本
pub const DESCRIPTOR_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// 内联内容的编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Text,
    Base64,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Text => "text",
            ContentFormat::Base64 => "base64",
        }
    }

    /// 扩展名无法推断时使用的 mimetype
    pub fn default_mimetype(&self) -> &'static str {
        match self {
            ContentFormat::Text => "text/plain",
            ContentFormat::Base64 => "application/octet-stream",
        }
    }
}

impl FromStr for ContentFormat {
    type Err = ContentsError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "text" => Ok(ContentFormat::Text),
            "base64" => Ok(ContentFormat::Base64),
            other => Err(ContentsError::UnrecognizedFormat(other.to_string())),
        }
    }
}

/// 文件模型中 `content`/`format` 字段的内容
///
/// 同一时刻只能是其中一种，模型不会同时携带内联内容与描述符。
#[derive(Debug, Clone, PartialEq)]
pub enum ModelBody {
    Empty,
    Inline {
        content: String,
        format: ContentFormat,
    },
    Descriptor {
        /// JSON 编码后的 [`DescriptorPayload`]
        content: String,
        media_type: String,
    },
}

impl Serialize for ModelBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            ModelBody::Empty => {
                map.serialize_entry("content", &Value::Null)?;
                map.serialize_entry("format", &Value::Null)?;
            }
            ModelBody::Inline { content, format } => {
                map.serialize_entry("content", content)?;
                map.serialize_entry("format", format.as_str())?;
            }
            ModelBody::Descriptor {
                content,
                media_type,
            } => {
                map.serialize_entry("content", content)?;
                map.serialize_entry("format", media_type)?;
            }
        }
        map.end()
    }
}

/// 客户端获取数据的位置
///
/// 普通 URL，或由格式专用构建器给出的访问提示（摘要文本、按语言区分的示例代码）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Url(String),
    Hints(BTreeMap<String, String>),
}

/// 可流式文件在 `content` 中存放的（已编码）JSON 对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorPayload {
    pub version: u32,
    pub url: Locator,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// 交给启发式与描述符构建器的只读快照
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDraft {
    pub path: String,
    pub size: u64,
    pub mimetype: Option<String>,
    pub url: String,
}

impl ModelDraft {
    /// 小写且不含点的扩展名
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileModel {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub writable: bool,
    pub size: u64,
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_mimetype: Option<String>,
    pub streamable: bool,
    pub api_type: String,
    pub url: String,
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub body: ModelBody,
}

impl FileModel {
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            ModelBody::Empty => None,
            ModelBody::Inline { content, .. } | ModelBody::Descriptor { content, .. } => {
                Some(content)
            }
        }
    }

    pub fn format(&self) -> Option<&str> {
        match &self.body {
            ModelBody::Empty => None,
            ModelBody::Inline { format, .. } => Some(format.as_str()),
            ModelBody::Descriptor { media_type, .. } => Some(media_type),
        }
    }

    /// 解析可流式模型中的描述符 payload
    pub fn descriptor(&self) -> Option<DescriptorPayload> {
        match &self.body {
            ModelBody::Descriptor { content, .. } => serde_json::from_str(content).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryModel {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub writable: bool,
    pub mimetype: Option<String>,
    pub format: Option<String>,
    pub content: Option<Vec<ContentsModel>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentsModel {
    File(FileModel),
    Directory(DirectoryModel),
}

impl ContentsModel {
    pub fn path(&self) -> &str {
        match self {
            ContentsModel::File(model) => &model.path,
            ContentsModel::Directory(model) => &model.path,
        }
    }
}
