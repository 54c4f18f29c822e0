use crate::foundation::core::{Affine, PhotoSlot, Rect};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Uniform scale that makes a `width x height` image cover the slot's bounding square.
///
/// `scale * min(width, height) >= 2r` always holds for the returned value.
pub fn cover_fit_scale(width: u32, height: u32, slot: PhotoSlot) -> f64 {
    let d = slot.diameter();
    let sx = d / f64::from(width.max(1));
    let sy = d / f64::from(height.max(1));
    sx.max(sy)
}

/// Destination rectangle of a cover-fitted image centered on the slot.
pub fn cover_fit_rect(width: u32, height: u32, slot: PhotoSlot) -> Rect {
    let scale = cover_fit_scale(width, height, slot);
    let w = f64::from(width) * scale;
    let h = f64::from(height) * scale;
    let x0 = slot.cx - w / 2.0;
    let y0 = slot.cy - h / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

/// Transform mapping image pixel space onto its cover-fitted destination.
pub fn cover_fit_transform(width: u32, height: u32, slot: PhotoSlot) -> Affine {
    let scale = cover_fit_scale(width, height, slot);
    let dst = cover_fit_rect(width, height, slot);
    Affine::translate((dst.x0, dst.y0)) * Affine::scale(scale)
}

/// Transform stretching a `width x height` image over a `dst_w x dst_h` surface.
pub fn stretch_transform(width: u32, height: u32, dst_w: u32, dst_h: u32) -> Affine {
    Affine::scale_non_uniform(
        f64::from(dst_w) / f64::from(width.max(1)),
        f64::from(dst_h) / f64::from(height.max(1)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
