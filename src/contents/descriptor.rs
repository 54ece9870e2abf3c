use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::model::{Locator, ModelDraft};
use super::summary::Summarizer;
use crate::error::ContentsError;

/// 描述符构建结果：写入 payload 的定位信息，以及合并到模型 `metadata` 的附加提示
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub locator: Locator,
    pub metadata: Map<String, Value>,
}

pub trait DescriptorBuilder: Send + Sync {
    fn name(&self) -> &str;

    fn build(&self, draft: &ModelDraft, os_path: &Path) -> Result<Descriptor, ContentsError>;
}

/// 让客户端通过 Range 请求访问文件 URL
pub struct RangeRequestDescriptor;

impl DescriptorBuilder for RangeRequestDescriptor {
    fn name(&self) -> &str {
        "range-request"
    }

    fn build(&self, draft: &ModelDraft, _os_path: &Path) -> Result<Descriptor, ContentsError> {
        Ok(Descriptor {
            locator: Locator::Url(draft.url.clone()),
            metadata: Map::new(),
        })
    }
}

/// HDF5 描述符
///
/// 提供文件结构摘要，以及 Python、Julia、Rust 打开该文件的示例代码。
pub struct Hdf5DescriptorBuilder {
    summarizer: Arc<dyn Summarizer>,
}

impl Hdf5DescriptorBuilder {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    fn snippets(path: &str) -> BTreeMap<String, String> {
        let mut snippets = BTreeMap::new();
        snippets.insert(
            "python".to_string(),
            format!(
                "import h5py\n\nf = h5py.File({}, \"r\")\nprint(list(f.keys()))",
                python_literal(path)
            ),
        );
        snippets.insert(
            "julia".to_string(),
            format!(
                "using HDF5\n\nh5open({}, \"r\") do f\n    println(keys(f))\nend",
                julia_literal(path)
            ),
        );
        snippets.insert(
            "rust".to_string(),
            format!(
                "let file = hdf5::File::open({:?})?;\nprintln!(\"{{:?}}\", file.member_names()?);",
                path
            ),
        );
        snippets
    }
}

/// JSON 字符串转义同时也是合法的 Python 字面量
fn python_literal(path: &str) -> String {
    Value::String(path.to_string()).to_string()
}

/// Julia 字符串中的 `$` 会触发插值，需要额外转义
fn julia_literal(path: &str) -> String {
    python_literal(path).replace('$', "\\$")
}

impl DescriptorBuilder for Hdf5DescriptorBuilder {
    fn name(&self) -> &str {
        "hdf5"
    }

    fn build(&self, draft: &ModelDraft, os_path: &Path) -> Result<Descriptor, ContentsError> {
        let summary =
            self.summarizer
                .summarize(os_path)
                .map_err(|source| ContentsError::Summary {
                    path: draft.path.clone(),
                    source,
                })?;

        let mut hints = Self::snippets(&draft.path);
        hints.insert("summary".to_string(), summary);

        let mut metadata = Map::new();
        metadata.insert("format".into(), Value::from("hdf5"));
        metadata.insert(
            "summary_available".into(),
            Value::from(self.summarizer.is_available()),
        );
        metadata.insert("summarizer".into(), Value::from(self.summarizer.name()));

        Ok(Descriptor {
            locator: Locator::Hints(hints),
            metadata,
        })
    }
}

/// 按扩展名注册的格式构建器，外加通用兜底构建器
///
/// 启动时构建一次，请求之间只读共享。
#[derive(Clone)]
pub struct DescriptorRegistry {
    overrides: HashMap<String, Arc<dyn DescriptorBuilder>>,
    generic: Arc<dyn DescriptorBuilder>,
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            generic: Arc::new(RangeRequestDescriptor),
        }
    }
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<I, S>(mut self, extensions: I, builder: Arc<dyn DescriptorBuilder>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let key = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
            self.overrides.insert(key, builder.clone());
        }
        self
    }

    pub fn with_hdf5(self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.register(["hdf5", "h5"], Arc::new(Hdf5DescriptorBuilder::new(summarizer)))
    }

    /// 查找与扩展名匹配的格式专用构建器
    pub fn override_for(&self, draft: &ModelDraft) -> Option<&dyn DescriptorBuilder> {
        let ext = draft.extension()?;
        self.overrides.get(&ext).map(|builder| builder.as_ref())
    }

    pub fn generic(&self) -> &dyn DescriptorBuilder {
        self.generic.as_ref()
    }

    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}
