use std::path::PathBuf;

use crate::compose::request::RenderedBadge;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::share::download::{DownloadSink, download_file_name};

/// Text attached to shares and social posts.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Share sheet title.
    pub title: String,
    /// Share sheet / post body.
    pub text: String,
    /// Link appended to social posts.
    pub link: Option<String>,
    /// Base URL of the social "compose post" intent.
    pub intent_base: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "My H.E.R DAO Event ID".to_string(),
            text: "Check out my H.E.R DAO event badge!".to_string(),
            link: None,
            intent_base: "https://twitter.com/intent/tweet".to_string(),
        }
    }
}

/// A badge file offered to a share target.
#[derive(Clone, Copy, Debug)]
pub struct SharePayload<'a> {
    /// Share title.
    pub title: &'a str,
    /// Share text.
    pub text: &'a str,
    /// Attachment file name.
    pub file_name: &'a str,
    /// Attachment MIME type (always `image/png`).
    pub mime: &'static str,
    /// Attachment bytes.
    pub bytes: &'a [u8],
}

/// A platform share action.
pub trait ShareTarget {
    /// Whether this target accepts `payload` at all.
    fn can_share(&self, payload: &SharePayload<'_>) -> bool;

    /// Hand `payload` over. Refusals are [`BadgeError::ShareUnsupported`].
    fn share(&mut self, payload: &SharePayload<'_>) -> BadgeResult<()>;
}

/// Target for hosts without a share action.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShareTarget;

impl ShareTarget for NoShareTarget {
    fn can_share(&self, _payload: &SharePayload<'_>) -> bool {
        false
    }

    fn share(&mut self, _payload: &SharePayload<'_>) -> BadgeResult<()> {
        Err(BadgeError::share_unsupported("no share target on this host"))
    }
}

/// How a badge left the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share target took it.
    Shared,
    /// Fell back to a download at this path.
    Downloaded(PathBuf),
}

/// Share `badge` made for `name`, falling back to `downloads` when the target is unsupported or
/// fails.
///
/// Only a failing download is an error.
pub fn share_or_download(
    badge: &RenderedBadge,
    name: &str,
    cfg: &ShareConfig,
    target: &mut dyn ShareTarget,
    downloads: &mut dyn DownloadSink,
) -> BadgeResult<ShareOutcome> {
    let file_name = download_file_name(name);
    let payload = SharePayload {
        title: &cfg.title,
        text: &cfg.text,
        file_name: &file_name,
        mime: "image/png",
        bytes: &badge.png,
    };

    if target.can_share(&payload) {
        match target.share(&payload) {
            Ok(()) => return Ok(ShareOutcome::Shared),
            Err(err) => {
                tracing::warn!(error = %err, "share failed; downloading instead");
            }
        }
    } else {
        tracing::warn!("share unsupported; downloading instead");
    }

    let path = downloads.save(&file_name, &badge.png)?;
    Ok(ShareOutcome::Downloaded(path))
}

/// Prefilled social post: text plus optional link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocialPost {
    /// Post body.
    pub text: String,
    /// Link attached to the post.
    pub link: Option<String>,
    /// Intent endpoint.
    pub intent_base: String,
}

impl SocialPost {
    /// Post built from share text and link.
    pub fn from_config(cfg: &ShareConfig) -> Self {
        Self {
            text: cfg.text.clone(),
            link: cfg.link.clone(),
            intent_base: cfg.intent_base.clone(),
        }
    }

    /// URL-encoded intent link that opens a compose window with the post filled in.
    pub fn intent_url(&self) -> BadgeResult<url::Url> {
        let mut params = vec![("text", self.text.as_str())];
        if let Some(link) = &self.link {
            params.push(("url", link.as_str()));
        }
        url::Url::parse_with_params(&self.intent_base, &params).map_err(|e| {
            BadgeError::validation(format!("invalid intent base '{}': {e}", self.intent_base))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/target.rs"]
mod tests;
