use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::path::PathBuf;

use crate::contents::heuristics::DEFAULT_SIZE_THRESHOLD;
use crate::contents::model::{DATASET_MIMETYPE, RANGE_REQUEST_API};

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub contents: ContentsSettings,
}

/// 服务监听地址
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// 内容根目录及流式策略配置
#[derive(Debug, Deserialize, Clone)]
pub struct ContentsSettings {
    /// 本地宿主的根目录，API 路径均相对于该目录
    pub root_dir: PathBuf,
    #[serde(default)]
    pub allow_hidden: bool,
    /// 大小达到该字节数的文件走流式返回
    pub size_threshold: u64,
    /// 始终流式返回的扩展名
    pub stream_extensions: Vec<String>,
    /// 是否注册 HDF5 描述符构建器
    pub hdf5_summary: bool,
    pub descriptor_mimetype: String,
    pub api_type: String,
    /// 传输层提供原始文件的路径前缀
    pub files_prefix: String,
    /// 若设置，定位 URL 将基于该地址生成完整 URL
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Settings {
    /// 加载配置：默认值、可选的 `config.*` 文件、`RCM__*` 环境变量依次覆盖
    pub fn new() -> anyhow::Result<Self> {
        Self::load(Some("config"), None)
    }

    /// `env` 为 `None` 时读取进程环境变量，否则只使用给定的键值
    fn load(file: Option<&str>, env: Option<Map<String, String>>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            // 默认值
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8888)?
            .set_default("contents.root_dir", ".")?
            .set_default("contents.allow_hidden", false)?
            .set_default("contents.size_threshold", DEFAULT_SIZE_THRESHOLD as i64)?
            .set_default("contents.stream_extensions", vec!["mp4"])?
            .set_default("contents.hdf5_summary", true)?
            .set_default("contents.descriptor_mimetype", DATASET_MIMETYPE)?
            .set_default("contents.api_type", RANGE_REQUEST_API)?
            .set_default("contents.files_prefix", "files")?
            .set_default::<&str, Option<String>>("contents.base_url", None)?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        // 列表项以逗号分隔，例如 RCM__CONTENTS__STREAM_EXTENSIONS=mp4,mkv
        builder = builder.add_source(
            Environment::with_prefix("RCM")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("contents.stream_extensions")
                .try_parsing(true)
                .source(env),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
