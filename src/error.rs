use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// [`crate::contents::ContentsHost`] 抛出的错误
///
/// 策略层不改写这些错误，原样交给传输层。
#[derive(Debug, Error)]
pub enum HostError {
    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0} is outside root contents directory")]
    OutsideRoot(String),

    #[error("{0} is not UTF-8 encoded")]
    NotUtf8(String),

    #[error("`{0}` is a directory, not a file")]
    NotAFile(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HostError {
    /// 将 `io::Error` 归类到宿主错误，消息中保留请求路径
    pub fn from_io(path: &str, os_path: PathBuf, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => HostError::NotFound(path.to_string()),
            std::io::ErrorKind::PermissionDenied => HostError::PermissionDenied(path.to_string()),
            _ => HostError::Io {
                path: os_path,
                source: err,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentsError {
    /// stat 未返回大小，此类文件既不内联也不流式返回
    #[error("could not stat `{path}`, not risking to send a large amount of data to the frontend")]
    SizeUnknown { path: String },

    #[error(transparent)]
    Host(#[from] HostError),

    /// 宿主读取结果携带了无法识别的格式标签
    #[error("host returned unrecognized content format `{0}`")]
    UnrecognizedFormat(String),

    #[error("failed to encode descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("failed to summarize `{path}`: {source}")]
    Summary {
        path: String,
        #[source]
        source: BoxError,
    },
}
