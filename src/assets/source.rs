use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{BadgeError, BadgeResult};

/// Where an image's encoded bytes come from.
///
/// Cloning is cheap: in-memory bytes are shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded image bytes already in memory.
    Bytes(Arc<[u8]>),
    /// A file on disk, read when the image is loaded.
    File(PathBuf),
    /// A `data:<mime>;base64,<payload>` URL, as produced by browser file readers.
    DataUrl(String),
}

impl ImageSource {
    /// Wrap in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Reference a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Read the encoded bytes.
    ///
    /// Every failure maps to [`BadgeError::AssetLoad`].
    pub fn load_bytes(&self) -> BadgeResult<Arc<[u8]>> {
        match self {
            Self::Bytes(b) => Ok(b.clone()),
            Self::File(path) => std::fs::read(path)
                .with_context(|| format!("read image bytes from '{}'", path.display()))
                .map(Arc::<[u8]>::from)
                .map_err(BadgeError::asset_load_from),
            Self::DataUrl(url) => Ok(Arc::<[u8]>::from(parse_data_url(url)?.payload)),
        }
    }

    /// Short human-readable description used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(b) => format!("<{} in-memory bytes>", b.len()),
            Self::File(path) => path.display().to_string(),
            Self::DataUrl(url) => {
                let head: String = url.chars().take(32).collect();
                format!("{head}...")
            }
        }
    }
}

/// Decoded `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type, e.g. `image/png`. Empty when the URL omits it.
    pub mime: String,
    /// Decoded payload bytes.
    pub payload: Vec<u8>,
}

/// Parse a base64 `data:` URL.
pub fn parse_data_url(url: &str) -> BadgeResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| BadgeError::asset_load("not a data: URL"))?;
    let (meta, body) = rest
        .split_once(',')
        .ok_or_else(|| BadgeError::asset_load("data: URL has no ',' separator"))?;

    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(BadgeError::asset_load(
            "data: URL payload must be base64-encoded",
        ));
    }

    let payload = base64::engine::general_purpose::STANDARD
        .decode(body.trim())
        .map_err(|e| BadgeError::asset_load(format!("invalid base64 in data: URL: {e}")))?;

    Ok(DataUrl { mime, payload })
}

/// Encode bytes as a base64 `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let body = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{body}")
}

/// Normalize and validate template-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> BadgeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BadgeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(BadgeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BadgeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BadgeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
