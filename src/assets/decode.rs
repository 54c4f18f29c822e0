use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Canvas, PhotoSlot};
use crate::foundation::error::{BadgeError, BadgeResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Largest side a prepared image may have. Render surfaces address pixels with `u16`.
pub const MAX_IMAGE_DIM: u32 = u16::MAX as u32;

const MAX_SVG_DIM: u32 = 16_384;

/// Photos keep at least this many source pixels per slot pixel across their short side.
const PHOTO_OVERSAMPLE: f64 = 2.0;

/// Target size for a decoded raster.
#[derive(Clone, Copy, Debug)]
enum RasterFit {
    /// Native size.
    Native,
    /// Stretched to the canvas later, so never larger than it on either axis.
    Canvas(Canvas),
    /// Cover-fit later, so the short side never needs more than this many pixels.
    ShortSide(u32),
}

impl RasterFit {
    fn target(self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = match self {
            Self::Native => (width, height),
            Self::Canvas(c) => (width.min(c.width), height.min(c.height)),
            Self::ShortSide(side) => {
                let s = f64::from(side.max(1)) / f64::from(width.min(height));
                scaled_dims(width, height, s.min(1.0))
            }
        };
        let long = w.max(h);
        if long > MAX_IMAGE_DIM {
            let (w, h) = scaled_dims(w, h, f64::from(MAX_IMAGE_DIM) / f64::from(long));
            (w.min(MAX_IMAGE_DIM), h.min(MAX_IMAGE_DIM))
        } else {
            (w, h)
        }
    }
}

fn scaled_dims(width: u32, height: u32, s: f64) -> (u32, u32) {
    let w = (f64::from(width) * s).round().max(1.0) as u32;
    let h = (f64::from(height) * s).round().max(1.0) as u32;
    (w, h)
}

/// Decode raster bytes (PNG, JPEG, GIF, WebP, ...) or an SVG document at its intrinsic size.
///
/// Rasters with a side above [`MAX_IMAGE_DIM`] are downscaled, keeping their aspect ratio.
pub fn decode_image(bytes: &[u8]) -> BadgeResult<PreparedImage> {
    decode_with_fit(bytes, RasterFit::Native)
}

/// Decode an image destined to fill `canvas`.
///
/// Raster images larger than the canvas are shrunk per axis and stretched later. SVG documents
/// are rasterized directly at the canvas size so they stay sharp.
pub fn decode_image_for_canvas(bytes: &[u8], canvas: Canvas) -> BadgeResult<PreparedImage> {
    decode_with_fit(bytes, RasterFit::Canvas(canvas))
}

/// Decode a photo destined for `slot`.
///
/// Rasters whose short side exceeds twice the slot diameter are downscaled to it.
pub fn decode_photo(bytes: &[u8], slot: PhotoSlot) -> BadgeResult<PreparedImage> {
    let side = (slot.diameter() * PHOTO_OVERSAMPLE).ceil();
    let side = if side.is_finite() && side >= 1.0 {
        side.min(f64::from(MAX_IMAGE_DIM)) as u32
    } else {
        MAX_IMAGE_DIM
    };
    decode_with_fit(bytes, RasterFit::ShortSide(side))
}

fn decode_with_fit(bytes: &[u8], fit: RasterFit) -> BadgeResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(BadgeError::asset_load("image bytes are empty"));
    }
    if image::guess_format(bytes).is_err() && looks_like_svg(bytes) {
        let svg_size = match fit {
            RasterFit::Canvas(c) => Some(c),
            RasterFit::Native | RasterFit::ShortSide(_) => None,
        };
        return rasterize_svg(bytes, svg_size);
    }
    decode_raster(bytes, fit)
}

fn decode_raster(bytes: &[u8], fit: RasterFit) -> BadgeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(BadgeError::asset_load_from)?;
    let mut rgba = dyn_img.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(BadgeError::asset_load("decoded image has zero size"));
    }

    let (width, height) = fit.target(src_w, src_h);
    if (width, height) != (src_w, src_h) {
        tracing::debug!(src_w, src_h, width, height, "downscaling raster image");
        rgba = image::imageops::resize(
            &rgba,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    tracing::debug!(width, height, "decoded raster image");
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        // Truncation may split a multibyte char; fall back to a lossy view.
        return String::from_utf8_lossy(head).contains("<svg");
    };
    let t = text.trim_start_matches('\u{feff}').trim_start();
    t.starts_with("<svg") || (t.starts_with('<') && t.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8], size: Option<Canvas>) -> BadgeResult<PreparedImage> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(BadgeError::asset_load_from)?;

    let (width, height) = match size {
        Some(c) => (c.width, c.height),
        None => (
            svg_dim_to_px(tree.size().width())?,
            svg_dim_to_px(tree.size().height())?,
        ),
    };
    if width == 0 || height == 0 || width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(BadgeError::asset_load(format!(
            "svg raster size {width}x{height} is out of range"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BadgeError::environment("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    tracing::debug!(width, height, "rasterized svg image");
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

fn svg_dim_to_px(v: f32) -> BadgeResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(BadgeError::asset_load("svg has invalid width/height"));
    }
    Ok((v.ceil() as u32).max(1))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
