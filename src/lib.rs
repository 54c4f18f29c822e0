//! Badgeforge composes personalised member badges.
//!
//! A badge is a fixed template image with a circular, cover-fit portrait and two centred text
//! lines (name and role) drawn over it, exported as PNG. The public API is small:
//!
//! - Describe a [`Template`] (asset plus [`TemplateLayout`]), from a preset or a JSON file
//! - Fill a [`BadgeRequest`] and call [`Compositor::render`], or drive a [`BadgeSession`]
//! - Hand the [`RenderedBadge`] to a [`DownloadSink`] or [`share_or_download`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod encode;
mod foundation;
mod render;
mod session;
mod share;
mod template;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Circle, PhotoSlot, Point, Rect, TextAnchor, Vec2,
};
pub use crate::foundation::error::{BadgeError, BadgeResult};
pub use crate::foundation::math::{
    cover_fit_rect, cover_fit_scale, cover_fit_transform, stretch_transform,
};

pub use crate::assets::decode::{
    MAX_IMAGE_DIM, PreparedImage, decode_image, decode_image_for_canvas, decode_photo,
};
pub use crate::assets::fonts::{FontBook, FontSpec, ResolvedFont};
pub use crate::assets::source::{
    DataUrl, ImageSource, normalize_rel_path, parse_data_url, to_data_url,
};

pub use crate::render::cpu::{CpuBackend, FrameRGBA};
pub use crate::render::plan::{BadgePlan, Layer, ShadowStyle};
pub use crate::render::text::{PreparedText, TextBrushRgba8, TextLayoutEngine, TextParams};

pub use crate::encode::png::{decode_png_rgba8, encode_png};

pub use crate::template::load::TemplateFile;
pub use crate::template::model::{PRESET_NAMES, Template, TemplateLayout, TextLayerStyle};

pub use crate::compose::compositor::{Compositor, render};
pub use crate::compose::request::{
    BadgeRequest, CompositorOpts, PhotoFailurePolicy, RENDER_TIMEOUT_ENV, RenderedBadge,
};

pub use crate::session::badge_session::{BadgeSession, SessionField};

pub use crate::share::download::{
    DOWNLOAD_SUFFIX, DirectoryDownloads, DownloadSink, download_file_name,
};
pub use crate::share::target::{
    NoShareTarget, ShareConfig, ShareOutcome, SharePayload, ShareTarget, SocialPost,
    share_or_download,
};
