use std::path::Path;
use std::sync::Arc;

use serde_json::Map;
use tracing::{debug, warn};

use super::descriptor::{DescriptorBuilder, DescriptorRegistry};
use super::heuristics::HeuristicSet;
use super::host::{BaseModel, ContentsHost};
use super::locator::LocatorBuilder;
use super::mime::guess_mimetype;
use super::model::{
    ContentFormat, ContentsModel, DescriptorPayload, DirectoryModel, EntryKind, FileModel,
    ModelBody, ModelDraft, DATASET_MIMETYPE, DESCRIPTOR_VERSION, RANGE_REQUEST_API,
};
use super::summary;
use crate::config::ContentsSettings;
use crate::error::{ContentsError, HostError};

#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// 标记描述符内容的保留媒体类型
    pub descriptor_mimetype: String,
    pub api_type: String,
    /// 目录模型中是否列出以 `.` 开头的文件
    pub allow_hidden: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            descriptor_mimetype: DATASET_MIMETYPE.to_string(),
            api_type: RANGE_REQUEST_API.to_string(),
            allow_hidden: false,
        }
    }
}

/// 内容管理器
///
/// 职责：基于 [`ContentsHost`] 的 stat/read 原语，逐个文件决定内联内容还是返回流式描述符。
/// 构造完成后除宿主外全部只读，所有请求共享同一个实例。
pub struct RemoteContentsManager {
    host: Arc<dyn ContentsHost>,
    heuristics: HeuristicSet,
    descriptors: DescriptorRegistry,
    locator: LocatorBuilder,
    options: ManagerOptions,
}

impl RemoteContentsManager {
    pub fn new(
        host: Arc<dyn ContentsHost>,
        heuristics: HeuristicSet,
        descriptors: DescriptorRegistry,
        locator: LocatorBuilder,
        options: ManagerOptions,
    ) -> Self {
        Self {
            host,
            heuristics,
            descriptors,
            locator,
            options,
        }
    }

    pub fn from_settings(
        host: Arc<dyn ContentsHost>,
        settings: &ContentsSettings,
    ) -> anyhow::Result<Self> {
        let heuristics =
            HeuristicSet::standard(&settings.stream_extensions, settings.size_threshold);
        let descriptors = if settings.hdf5_summary {
            DescriptorRegistry::new().with_hdf5(summary::detect())
        } else {
            DescriptorRegistry::new()
        };
        let locator =
            LocatorBuilder::new(settings.base_url.as_deref(), &settings.files_prefix)?;
        let options = ManagerOptions {
            descriptor_mimetype: settings.descriptor_mimetype.clone(),
            api_type: settings.api_type.clone(),
            allow_hidden: settings.allow_hidden,
        };

        debug!(
            "[Contents] Heuristics {:?}, format overrides {:?}",
            heuristics.names(),
            descriptors.extensions()
        );
        Ok(Self::new(host, heuristics, descriptors, locator, options))
    }

    /// 构建单个文件的模型
    ///
    /// 目录返回 [`HostError::NotAFile`]。宿主无法给出大小时，在任何启发式执行前
    /// 返回 [`ContentsError::SizeUnknown`]。宿主错误原样返回。
    pub fn build_model(
        &self,
        path: &str,
        want_content: bool,
        format: Option<ContentFormat>,
    ) -> Result<FileModel, ContentsError> {
        let base = self.host.base_model(path)?;
        if base.kind == EntryKind::Directory {
            return Err(HostError::NotAFile(base.path).into());
        }
        self.file_model(base, want_content, format)
    }

    /// 文件走 [`Self::build_model`] 的流程，目录列出其子项
    pub fn get(
        &self,
        path: &str,
        want_content: bool,
        format: Option<ContentFormat>,
    ) -> Result<ContentsModel, ContentsError> {
        let base = self.host.base_model(path)?;
        match base.kind {
            EntryKind::File => self
                .file_model(base, want_content, format)
                .map(ContentsModel::File),
            EntryKind::Directory => self
                .directory_model(base, want_content)
                .map(ContentsModel::Directory),
        }
    }

    fn file_model(
        &self,
        base: BaseModel,
        want_content: bool,
        format: Option<ContentFormat>,
    ) -> Result<FileModel, ContentsError> {
        let size = base.size.ok_or_else(|| ContentsError::SizeUnknown {
            path: base.path.clone(),
        })?;

        let os_path = self.host.os_path(&base.path)?;
        let draft = ModelDraft {
            path: base.path.clone(),
            size,
            mimetype: guess_mimetype(&os_path),
            url: self.locator.locate(&base.path),
        };

        // 格式专用构建器优先于通用启发式列表
        let streaming = match self.descriptors.override_for(&draft) {
            Some(builder) => Some((builder, builder.name())),
            None => self
                .heuristics
                .matches(&draft)
                .map(|reason| (self.descriptors.generic(), reason)),
        };

        if let Some((builder, reason)) = streaming {
            debug!(
                "[Contents] Streaming {} ({} bytes), matched {}",
                draft.path, size, reason
            );
            return self.streamable_model(base, draft, builder, &os_path);
        }

        let (mimetype, body) = if want_content {
            let read = self.host.read_file(&os_path, format)?;
            let format: ContentFormat = read.format.parse()?;
            let mimetype = draft
                .mimetype
                .clone()
                .or_else(|| Some(format.default_mimetype().to_string()));
            (
                mimetype,
                ModelBody::Inline {
                    content: read.content,
                    format,
                },
            )
        } else {
            (draft.mimetype.clone(), ModelBody::Empty)
        };

        Ok(FileModel {
            name: base.name,
            path: draft.path,
            kind: EntryKind::File,
            created: base.created,
            last_modified: base.last_modified,
            writable: base.writable,
            size,
            mimetype,
            inner_mimetype: None,
            streamable: false,
            api_type: self.options.api_type.clone(),
            url: draft.url,
            metadata: Map::new(),
            body,
        })
    }

    fn streamable_model(
        &self,
        base: BaseModel,
        draft: ModelDraft,
        builder: &dyn DescriptorBuilder,
        os_path: &Path,
    ) -> Result<FileModel, ContentsError> {
        let descriptor = builder.build(&draft, os_path)?;
        let payload = DescriptorPayload {
            version: DESCRIPTOR_VERSION,
            url: descriptor.locator,
            mime_type: draft.mimetype.clone(),
        };
        let content = serde_json::to_string(&payload)?;

        Ok(FileModel {
            name: base.name,
            path: draft.path,
            kind: EntryKind::File,
            created: base.created,
            last_modified: base.last_modified,
            writable: base.writable,
            size: draft.size,
            mimetype: Some(self.options.descriptor_mimetype.clone()),
            inner_mimetype: draft.mimetype,
            streamable: true,
            api_type: self.options.api_type.clone(),
            url: draft.url,
            metadata: descriptor.metadata,
            body: ModelBody::Descriptor {
                content,
                media_type: self.options.descriptor_mimetype.clone(),
            },
        })
    }

    fn directory_model(
        &self,
        base: BaseModel,
        want_content: bool,
    ) -> Result<DirectoryModel, ContentsError> {
        let content = if want_content {
            let mut children = Vec::new();
            for name in self.host.list_dir(&base.path)? {
                if !self.options.allow_hidden && name.starts_with('.') {
                    continue;
                }
                let child_path = if base.path.is_empty() {
                    name
                } else {
                    format!("{}/{}", base.path, name)
                };
                // 单个条目失败只跳过该条目
                match self.child_model(&child_path) {
                    Ok(model) => children.push(model),
                    Err(err) => warn!("[Contents] Skipping {} in listing: {}", child_path, err),
                }
            }
            Some(children)
        } else {
            None
        };

        Ok(DirectoryModel {
            name: base.name,
            path: base.path,
            kind: EntryKind::Directory,
            created: base.created,
            last_modified: base.last_modified,
            writable: base.writable,
            mimetype: None,
            format: content.as_ref().map(|_| "json".to_string()),
            content,
        })
    }

    fn child_model(&self, path: &str) -> Result<ContentsModel, ContentsError> {
        let base = self.host.base_model(path)?;
        match base.kind {
            EntryKind::File => self.file_model(base, false, None).map(ContentsModel::File),
            EntryKind::Directory => self
                .directory_model(base, false)
                .map(ContentsModel::Directory),
        }
    }
}
