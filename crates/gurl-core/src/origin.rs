use crate::error::{CoreError, Result};
use crate::key::ShortKey;

const DEFAULT_SCHEME: &str = "https://";

/// The host and transport a request was observed on.
///
/// Short URLs are built from this at creation time, so a link created over
/// TLS on `gurl.example` reads `https://gurl.example/b/<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Whether the request arrived over TLS.
    pub secure: bool,
    /// Host (and optional port) as seen by the request layer.
    pub host: String,
}

impl Origin {
    pub fn new(secure: bool, host: impl Into<String>) -> Self {
        Self {
            secure,
            host: host.into(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Builds the canonical short URL for `key` under `path_prefix`.
    pub fn short_url(&self, path_prefix: &str, key: &ShortKey) -> String {
        let prefix = path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}://{}/{}", self.scheme(), self.host, key)
        } else {
            format!("{}://{}/{}/{}", self.scheme(), self.host, prefix, key)
        }
    }
}

/// Normalizes a caller-supplied target into an absolute URL.
///
/// Bare hosts and paths get `https://`. Explicit `http://` and `https://`
/// are kept, with the scheme lowercased. Any other scheme is rejected.
pub fn normalize_target(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return Ok(format!("{DEFAULT_SCHEME}{trimmed}"));
    };

    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(CoreError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    if rest.is_empty() {
        return Err(CoreError::InvalidUrl(format!(
            "URL must have a host: {}",
            trimmed
        )));
    }

    Ok(format!("{scheme}://{rest}"))
}
