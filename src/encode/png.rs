use anyhow::Context;
use image::ImageEncoder as _;

use crate::foundation::error::{BadgeError, BadgeResult};
use crate::render::cpu::FrameRGBA;

/// Encode a frame as a lossless PNG.
///
/// Premultiplied frames are converted to straight alpha first. Output is deterministic for a
/// given frame.
pub fn encode_png(frame: &FrameRGBA) -> BadgeResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(BadgeError::validation(format!(
            "frame buffer is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let straight = frame.to_straight_rgba8();
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            &straight,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgba8,
        )
        .context("encode png")?;
    Ok(out)
}

/// Decode PNG bytes back into straight-alpha RGBA8.
pub fn decode_png_rgba8(bytes: &[u8]) -> BadgeResult<image::RgbaImage> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("decode png")
        .map_err(BadgeError::asset_load_from)?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
