use std::path::PathBuf;

use crate::assets::source::ImageSource;
use crate::compose::compositor::Compositor;
use crate::compose::request::{BadgeRequest, RenderedBadge};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::share::download::{DownloadSink, download_file_name};
use crate::share::target::{ShareConfig, ShareOutcome, ShareTarget, share_or_download};
use crate::template::model::Template;

/// A form field the session needs before it can generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionField {
    /// Full name.
    Name,
    /// Role or title.
    Role,
    /// Portrait photo.
    Photo,
}

impl std::fmt::Display for SessionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Role => "role",
            Self::Photo => "photo",
        })
    }
}

/// Caller-owned badge form state.
///
/// Holds the inputs and at most one generated badge. Any input change discards the badge, so a
/// badge on hand always matches the current inputs.
#[derive(Clone, Debug)]
pub struct BadgeSession {
    template: Template,
    share: ShareConfig,
    name: String,
    role: String,
    photo: Option<ImageSource>,
    badge: Option<RenderedBadge>,
}

impl BadgeSession {
    /// Empty session drawing onto `template`.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            share: ShareConfig::default(),
            name: String::new(),
            role: String::new(),
            photo: None,
            badge: None,
        }
    }

    /// Replace the share text.
    pub fn with_share_config(mut self, share: ShareConfig) -> Self {
        self.share = share;
        self
    }

    /// Current name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Current photo, if any.
    pub fn photo(&self) -> Option<&ImageSource> {
        self.photo.as_ref()
    }

    /// Share text in use.
    pub fn share_config(&self) -> &ShareConfig {
        &self.share
    }

    /// Set the name and discard the current badge.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.badge = None;
    }

    /// Set the role and discard the current badge.
    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
        self.badge = None;
    }

    /// Pick a photo. Only `image/*` types are accepted; a rejected pick leaves the session as
    /// it was.
    pub fn select_photo(&mut self, source: ImageSource, mime: &str) -> BadgeResult<()> {
        let is_image = mime.split_once('/').is_some_and(|(top, sub)| {
            top.trim().eq_ignore_ascii_case("image") && !sub.trim().is_empty()
        });
        if !is_image {
            return Err(BadgeError::validation(format!(
                "selected file is '{mime}', expected an image"
            )));
        }
        self.photo = Some(source);
        self.badge = None;
        Ok(())
    }

    /// Drop the photo and discard the current badge.
    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.badge = None;
    }

    /// Fields still empty, in form order. Whitespace counts as filled in.
    pub fn missing_fields(&self) -> Vec<SessionField> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(SessionField::Name);
        }
        if self.role.is_empty() {
            missing.push(SessionField::Role);
        }
        if self.photo.is_none() {
            missing.push(SessionField::Photo);
        }
        missing
    }

    /// Whether generate is allowed.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Compositor input built from the current fields.
    pub fn request(&self) -> BadgeRequest {
        BadgeRequest {
            name: self.name.clone(),
            role: self.role.clone(),
            photo: self.photo.clone(),
        }
    }

    /// Render the badge.
    ///
    /// Incomplete forms are a [`BadgeError::Validation`]. On any failure the session keeps no
    /// badge and can be retried.
    pub fn generate(&mut self, compositor: &Compositor) -> BadgeResult<&RenderedBadge> {
        self.badge = None;
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            return Err(BadgeError::validation(format!(
                "missing {}",
                names.join(", ")
            )));
        }
        let badge = compositor.render(&self.template, &self.request())?;
        Ok(self.badge.insert(badge))
    }

    /// Discard the current badge and generate again.
    pub fn regenerate(&mut self, compositor: &Compositor) -> BadgeResult<&RenderedBadge> {
        self.badge = None;
        self.generate(compositor)
    }

    /// The generated badge, if it is still current.
    pub fn badge(&self) -> Option<&RenderedBadge> {
        self.badge.as_ref()
    }

    /// File name a download of this badge gets.
    pub fn download_file_name(&self) -> String {
        download_file_name(&self.name)
    }

    /// Save the badge through `sink`.
    pub fn download(&self, sink: &mut dyn DownloadSink) -> BadgeResult<PathBuf> {
        let badge = self.current_badge()?;
        sink.save(&self.download_file_name(), &badge.png)
    }

    /// Share the badge, falling back to `sink`.
    pub fn share(
        &self,
        target: &mut dyn ShareTarget,
        sink: &mut dyn DownloadSink,
    ) -> BadgeResult<ShareOutcome> {
        let badge = self.current_badge()?;
        share_or_download(badge, &self.name, &self.share, target, sink)
    }

    fn current_badge(&self) -> BadgeResult<&RenderedBadge> {
        self.badge
            .as_ref()
            .ok_or_else(|| BadgeError::validation("no badge has been generated"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/badge_session.rs"]
mod tests;
