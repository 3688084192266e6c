use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine;

use crate::foundation::error::{PosterError, PosterResult};

/// Opaque reference to an external resource (image or font).
///
/// Serialized externally tagged: `{"path": "bg.jpg"}`, `{"url": "data:image/png;base64,..."}` or
/// `{"bytes": "<base64>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSource {
    /// Filesystem path. Relative paths resolve against the loader's asset root.
    Path(PathBuf),
    /// `file://` or `data:` URL; other schemes need a custom [`ResourceFetcher`].
    Url(String),
    /// Raw encoded bytes (base64 in JSON).
    Bytes(#[serde(with = "base64_bytes")] Arc<[u8]>),
}

impl ResourceSource {
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Short human-readable label used in logs; never includes payload bytes.
    pub fn label(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Url(u) if u.starts_with("data:") => {
                let head = u.split(',').next().unwrap_or("data:");
                format!("{head},<{} chars>", u.len())
            }
            Self::Url(u) => u.clone(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

/// Capability that turns a [`ResourceSource`] into encoded bytes.
///
/// Implementations must be thread-safe; the loader calls `fetch` from its own fetch threads
/// and a call may block for as long as it needs.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, source: &ResourceSource) -> PosterResult<Vec<u8>>;
}

/// Default fetcher: local files, `file://` and `data:` URLs, raw bytes.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_path(&self, path: &Path) -> PosterResult<Vec<u8>> {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        std::fs::read(&abs)
            .with_context(|| format!("read resource bytes from '{}'", abs.display()))
            .map_err(|e| PosterError::resource(format!("{e:#}")))
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch(&self, source: &ResourceSource) -> PosterResult<Vec<u8>> {
        match source {
            ResourceSource::Path(p) => self.read_path(p),
            ResourceSource::Bytes(b) => Ok(b.to_vec()),
            ResourceSource::Url(url) => {
                if let Some(rest) = url.strip_prefix("file://") {
                    self.read_path(Path::new(rest))
                } else if url.starts_with("data:") {
                    decode_data_url(url)
                } else {
                    Err(PosterError::resource(format!(
                        "no fetcher for url scheme in '{}'",
                        source.label()
                    )))
                }
            }
        }
    }
}

/// Decode an RFC 2397 `data:` URL into its payload bytes.
pub fn decode_data_url(url: &str) -> PosterResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PosterError::resource("data url must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PosterError::resource("data url is missing ','"))?;

    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| PosterError::resource(format!("invalid base64 in data url: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(s: &str) -> PosterResult<Vec<u8>> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| PosterError::resource("invalid percent escape in data url"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

mod base64_bytes {
    use std::sync::Arc;

    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Arc<[u8]>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Arc<[u8]>, D::Error> {
        let s = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map(Arc::from)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
