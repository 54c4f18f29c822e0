use std::time::Duration;

use crate::assets::source::{ImageSource, to_data_url};
use crate::encode::png::decode_png_rgba8;
use crate::foundation::error::BadgeResult;
use crate::share::download_file_name;

/// Environment variable overriding [`CompositorOpts::timeout`], in milliseconds.
pub const RENDER_TIMEOUT_ENV: &str = "BADGEFORGE_RENDER_TIMEOUT_MS";

const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// What the member typed and picked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BadgeRequest {
    /// Full name. Empty means "no name layer".
    pub name: String,
    /// Role or title. Empty means "no role layer".
    pub role: String,
    /// Portrait drawn into the circular slot.
    pub photo: Option<ImageSource>,
}

impl BadgeRequest {
    /// Request with name and role and no photo.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            photo: None,
        }
    }

    /// Attach a photo.
    pub fn with_photo(mut self, photo: ImageSource) -> Self {
        self.photo = Some(photo);
        self
    }
}

/// A finished badge. Always PNG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBadge {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl RenderedBadge {
    /// `data:image/png;base64,...` URL for display.
    pub fn data_url(&self) -> String {
        to_data_url("image/png", &self.png)
    }

    /// Decode the PNG back into straight-alpha pixels.
    pub fn to_rgba8(&self) -> BadgeResult<image::RgbaImage> {
        decode_png_rgba8(&self.png)
    }

    /// Download file name for a badge made for `name`.
    pub fn file_name_for(name: &str) -> String {
        download_file_name(name)
    }
}

/// What happens when the photo cannot be loaded or decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFailurePolicy {
    /// Log a warning and render without the photo.
    #[default]
    Degrade,
    /// Fail the render with the photo's asset error.
    Abort,
}

/// Compositor options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Photo failure handling.
    pub photo_failure: PhotoFailurePolicy,
    /// Deadline for [`crate::Compositor::render_with_timeout`].
    pub timeout: Duration,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self::from_env()
    }
}

impl CompositorOpts {
    /// Defaults, with the timeout taken from `BADGEFORGE_RENDER_TIMEOUT_MS` when it holds a
    /// positive integer.
    pub fn from_env() -> Self {
        let raw = std::env::var(RENDER_TIMEOUT_ENV).ok();
        Self {
            photo_failure: PhotoFailurePolicy::default(),
            timeout: parse_timeout_ms(raw.as_deref()),
        }
    }

    /// Same options with [`PhotoFailurePolicy::Abort`].
    pub fn strict(self) -> Self {
        Self {
            photo_failure: PhotoFailurePolicy::Abort,
            ..self
        }
    }
}

fn parse_timeout_ms(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_RENDER_TIMEOUT;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            tracing::warn!(
                value = raw,
                "ignoring invalid {RENDER_TIMEOUT_ENV}; using the default"
            );
            DEFAULT_RENDER_TIMEOUT
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/request.rs"]
mod tests;
