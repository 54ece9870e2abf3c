use anyhow::Context;
use url::Url;

/// 生成每个文件模型携带的唯一访问定位 URL
///
/// 配置了 base URL 时为完整 URL（`http://host/base/files/a%20b.csv`），
/// 否则为绝对路径（`/files/a%20b.csv`），由客户端基于服务端 origin 解析。
#[derive(Debug, Clone)]
pub struct LocatorBuilder {
    base: Url,
    qualified: bool,
    prefix: Vec<String>,
}

impl LocatorBuilder {
    pub fn new(base_url: Option<&str>, files_prefix: &str) -> anyhow::Result<Self> {
        let (base, qualified) = match base_url {
            Some(raw) => (Url::parse(raw).context("Invalid base URL")?, true),
            None => (Url::parse("http://localhost/")?, false),
        };
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("Base URL cannot carry a path: {}", base));
        }
        let prefix = files_prefix
            .split('/')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            base,
            qualified,
            prefix,
        })
    }

    pub fn locate(&self, path: &str) -> String {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.prefix.iter())
                .extend(path.split('/').filter(|part| !part.is_empty()));
        }
        if self.qualified {
            url.to_string()
        } else {
            url.path().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LocatorBuilder;

    #[test]
    fn relative_locator_encodes_segments() {
        let builder = LocatorBuilder::new(None, "files").unwrap();
        assert_eq!(builder.locate("data/movie.mp4"), "/files/data/movie.mp4");
        assert_eq!(builder.locate("/my data/a#1.csv"), "/files/my%20data/a%231.csv");
    }

    #[test]
    fn qualified_locator_keeps_base_path() {
        let builder = LocatorBuilder::new(Some("http://example.org:8888/user/ada/"), "/files/").unwrap();
        assert_eq!(
            builder.locate("big.bin"),
            "http://example.org:8888/user/ada/files/big.bin"
        );
    }

    #[test]
    fn rejects_opaque_base() {
        assert!(LocatorBuilder::new(Some("mailto:someone@example.org"), "files").is_err());
        assert!(LocatorBuilder::new(Some("not a url"), "files").is_err());
    }
}
