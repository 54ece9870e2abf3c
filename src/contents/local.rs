use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use tracing::warn;

use super::host::{BaseModel, ContentsHost, FileContent};
use super::model::{ContentFormat, EntryKind};
use crate::error::HostError;

/// 基于本地目录的宿主实现
///
/// API 路径以 `/` 分隔并相对于 `root`，解析到根目录之外的路径一律拒绝。
pub struct LocalFileHost {
    root: PathBuf,
}

impl LocalFileHost {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, HostError> {
        let raw = root.as_ref();
        let display = raw.to_string_lossy().to_string();
        let root = std::fs::canonicalize(raw)
            .map_err(|e| HostError::from_io(&display, raw.to_path_buf(), e))?;
        if !root.is_dir() {
            return Err(HostError::NotFound(display));
        }
        Ok(Self { root })
    }
}

/// 去掉 `.` 与空段并折叠 `..`，越过根目录时返回 None
pub(crate) fn normalize_api_path(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            parts.pop()?;
            continue;
        }
        parts.push(part);
    }
    Some(parts.join("/"))
}

fn to_utc(time: std::io::Result<std::time::SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

impl ContentsHost for LocalFileHost {
    fn base_model(&self, path: &str) -> Result<BaseModel, HostError> {
        let os_path = self.os_path(path)?;
        let api_path = normalize_api_path(path).unwrap_or_default();
        let meta =
            std::fs::metadata(&os_path).map_err(|e| HostError::from_io(path, os_path.clone(), e))?;

        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let name = api_path.rsplit('/').next().unwrap_or_default().to_string();

        Ok(BaseModel {
            name,
            path: api_path,
            kind,
            size: meta.is_file().then(|| meta.len()),
            created: to_utc(meta.created()),
            last_modified: to_utc(meta.modified()),
            writable: !meta.permissions().readonly(),
        })
    }

    fn os_path(&self, path: &str) -> Result<PathBuf, HostError> {
        let relative =
            normalize_api_path(path).ok_or_else(|| HostError::OutsideRoot(path.to_string()))?;
        let joined = relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part));

        // 符号链接可能指向根目录之外
        if let Ok(resolved) = std::fs::canonicalize(&joined) {
            if !resolved.starts_with(&self.root) {
                return Err(HostError::OutsideRoot(path.to_string()));
            }
        }
        Ok(joined)
    }

    fn read_file(
        &self,
        os_path: &Path,
        format: Option<ContentFormat>,
    ) -> Result<FileContent, HostError> {
        let display = os_path.to_string_lossy().to_string();
        let bytes =
            std::fs::read(os_path).map_err(|e| HostError::from_io(&display, os_path.to_path_buf(), e))?;

        let (content, format) = match format {
            Some(ContentFormat::Base64) => (STANDARD.encode(&bytes), ContentFormat::Base64),
            Some(ContentFormat::Text) => match String::from_utf8(bytes) {
                Ok(text) => (text, ContentFormat::Text),
                Err(_) => return Err(HostError::NotUtf8(display)),
            },
            None => match String::from_utf8(bytes) {
                Ok(text) => (text, ContentFormat::Text),
                Err(err) => (STANDARD.encode(err.into_bytes()), ContentFormat::Base64),
            },
        };

        Ok(FileContent {
            content,
            format: format.as_str().to_string(),
        })
    }

    fn list_dir(&self, path: &str) -> Result<Vec<String>, HostError> {
        let os_path = self.os_path(path)?;
        let entries =
            std::fs::read_dir(&os_path).map_err(|e| HostError::from_io(path, os_path.clone(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("[Contents] Skipping unreadable entry in {:?}: {}", path, err);
                    continue;
                }
            };
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("[Contents] Skipping non UTF-8 name {:?} in {:?}", raw, path),
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalize_api_path_strips_dot_segments() {
        assert_eq!(normalize_api_path("/a/./b//c/").as_deref(), Some("a/b/c"));
        assert_eq!(normalize_api_path("a/b/../c").as_deref(), Some("a/c"));
        assert_eq!(normalize_api_path("").as_deref(), Some(""));
        assert_eq!(normalize_api_path("../etc/passwd"), None);
    }

    #[test]
    fn base_model_reports_size_and_kind() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("docs")).expect("mkdir");
        std::fs::write(dir.path().join("docs/notes.txt"), "hello").expect("write");
        let host = LocalFileHost::new(dir.path()).expect("host");

        let model = host.base_model("/docs/notes.txt").expect("base model");
        assert_eq!(model.name, "notes.txt");
        assert_eq!(model.path, "docs/notes.txt");
        assert_eq!(model.kind, EntryKind::File);
        assert_eq!(model.size, Some(5));
        assert!(model.last_modified.is_some());

        let model = host.base_model("docs").expect("dir model");
        assert_eq!(model.kind, EntryKind::Directory);
        assert_eq!(model.size, None);
    }

    #[test]
    fn missing_files_are_not_found() {
        let dir = tempdir().expect("tempdir");
        let host = LocalFileHost::new(dir.path()).expect("host");
        let err = host.base_model("nope.txt").unwrap_err();
        assert!(matches!(err, HostError::NotFound(p) if p == "nope.txt"));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let host = LocalFileHost::new(dir.path()).expect("host");
        let err = host.os_path("../outside.txt").unwrap_err();
        assert!(matches!(err, HostError::OutsideRoot(_)));
    }

    #[test]
    fn read_file_falls_back_to_base64() {
        let dir = tempdir().expect("tempdir");
        let text = dir.path().join("a.txt");
        let binary = dir.path().join("b.bin");
        std::fs::write(&text, "plain").expect("write");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).expect("write");
        let host = LocalFileHost::new(dir.path()).expect("host");

        let read = host.read_file(&text, None).expect("read");
        assert_eq!(read.content, "plain");
        assert_eq!(read.format, "text");

        let read = host.read_file(&binary, None).expect("read");
        assert_eq!(read.content, "//4A");
        assert_eq!(read.format, "base64");

        let read = host
            .read_file(&text, Some(ContentFormat::Base64))
            .expect("read");
        assert_eq!(read.content, "cGxhaW4=");
    }

    #[test]
    fn forced_text_on_binary_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let binary = dir.path().join("b.bin");
        std::fs::write(&binary, [0xff, 0xfe]).expect("write");
        let host = LocalFileHost::new(dir.path()).expect("host");

        let err = host
            .read_file(&binary, Some(ContentFormat::Text))
            .unwrap_err();
        assert!(matches!(err, HostError::NotUtf8(_)));
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("b.txt"), "b").expect("write");
        std::fs::write(dir.path().join("a.txt"), "a").expect("write");
        let host = LocalFileHost::new(dir.path()).expect("host");

        assert_eq!(host.list_dir("").expect("list"), vec!["a.txt", "b.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn list_dir_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("ok.txt"), "a").expect("write");
        std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), "b").expect("write");
        let host = LocalFileHost::new(dir.path()).expect("host");

        assert_eq!(host.list_dir("").expect("list"), vec!["ok.txt"]);
    }
}
