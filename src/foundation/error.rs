use std::time::Duration;

/// Convenience result type used across badgeforge.
pub type BadgeResult<T> = Result<T, BadgeError>;

/// Top-level error taxonomy used by compositor, session and share APIs.
#[derive(thiserror::Error, Debug)]
pub enum BadgeError {
    /// Template, photo or font bytes are missing or cannot be decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// The host cannot provide a drawing surface or a usable font.
    #[error("environment error: {0}")]
    Environment(String),

    /// The platform share target is absent or refuses the payload.
    #[error("share unsupported: {0}")]
    ShareUnsupported(String),

    /// Invalid user-provided data (template layout, incomplete form, wrong file type).
    #[error("validation error: {0}")]
    Validation(String),

    /// An asynchronous render did not finish before its deadline.
    #[error("render timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BadgeError {
    /// Build a [`BadgeError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`BadgeError::Environment`] value.
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Build a [`BadgeError::ShareUnsupported`] value.
    pub fn share_unsupported(msg: impl Into<String>) -> Self {
        Self::ShareUnsupported(msg.into())
    }

    /// Build a [`BadgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap an [`anyhow::Error`] chain as an asset load failure, keeping the context text.
    pub(crate) fn asset_load_from(err: anyhow::Error) -> Self {
        Self::AssetLoad(format!("{err:#}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
