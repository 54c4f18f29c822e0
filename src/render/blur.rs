use crate::foundation::error::{BadgeError, BadgeResult};

/// Separable Gaussian blur over a premultiplied RGBA8 buffer, edges clamped.
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> BadgeResult<Vec<u8>> {
    let expected_len = checked_len(width, height)?;
    if src.len() != expected_len {
        return Err(BadgeError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve(src, &mut tmp, width, height, &kernel, Axis::Rows);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Columns);
    Ok(out)
}

/// Same result as [`blur_rgba8_premul`], but only touches the padded bounding box of the
/// non-transparent pixels. Text shadows cover a small part of the badge, so this is the path the
/// CPU backend takes.
pub fn blur_rgba8_premul_tight(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> BadgeResult<Vec<u8>> {
    let expected_len = checked_len(width, height)?;
    if src.len() != expected_len {
        return Err(BadgeError::validation(
            "blur_rgba8_premul_tight expects src matching width*height*4",
        ));
    }
    let Some((x0, y0, x1, y1)) = alpha_bounds(src, width, height) else {
        return Ok(src.to_vec());
    };

    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = (x1 + radius + 1).min(width);
    let y1 = (y1 + radius + 1).min(height);
    let (cw, ch) = (x1 - x0, y1 - y0);

    let mut crop = Vec::with_capacity(cw as usize * ch as usize * 4);
    for y in y0..y1 {
        let start = ((y * width + x0) as usize) * 4;
        crop.extend_from_slice(&src[start..start + cw as usize * 4]);
    }

    let blurred = blur_rgba8_premul(&crop, cw, ch, radius, sigma)?;

    let mut out = src.to_vec();
    for (row, y) in (y0..y1).enumerate() {
        let dst = ((y * width + x0) as usize) * 4;
        let srow = row * cw as usize * 4;
        out[dst..dst + cw as usize * 4].copy_from_slice(&blurred[srow..srow + cw as usize * 4]);
    }
    Ok(out)
}

fn checked_len(width: u32, height: u32) -> BadgeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BadgeError::environment("blur buffer size overflow"))
}

/// Inclusive bounding box `(x0, y0, x1, y1)` of pixels with non-zero alpha.
fn alpha_bounds(src: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        for x in 0..width {
            let a = src[((y * width + x) as usize) * 4 + 3];
            if a == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((bx0, by0, bx1, by1)) => (bx0.min(x), by0.min(y), bx1.max(x), by1.max(y)),
            });
        }
    }
    bounds
}

const Q16_ONE: u32 = 1 << 16;

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BadgeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![Q16_ONE]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BadgeError::validation("blur sigma must be > 0"));
    }

    let r = i64::from(radius);
    let two_var = 2.0 * f64::from(sigma) * f64::from(sigma);
    let taps: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_var).exp())
        .collect();
    let total: f64 = taps.iter().sum();

    let one = f64::from(Q16_ONE);
    let mut weights: Vec<u32> = taps
        .iter()
        .map(|t| ((t / total) * one).round().clamp(0.0, one) as u32)
        .collect();
    // Center tap absorbs rounding so the weights sum to exactly Q16_ONE.
    let drift = i64::from(Q16_ONE) - weights.iter().map(|&w| i64::from(w)).sum::<i64>();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + drift).clamp(0, i64::from(Q16_ONE)) as u32;
    Ok(weights)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Rows,
    Columns,
}

/// One 1-D convolution along `axis`, clamping samples at the buffer edge.
fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let (w, h) = (width as usize, height as usize);
    let radius = k.len() / 2;
    // Byte distance between neighbouring samples, and samples per line.
    let (step, len) = match axis {
        Axis::Rows => (4, w),
        Axis::Columns => (w * 4, h),
    };

    for y in 0..h {
        for x in 0..w {
            let base = (y * w + x) * 4;
            let pos = if axis == Axis::Rows { x } else { y };
            let line_start = base - pos * step;

            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let s = (pos + ki).saturating_sub(radius).min(len - 1);
                let idx = line_start + s * step;
                for (a, &v) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(kw) * u64::from(v);
                }
            }
            for (d, a) in dst[base..base + 4].iter_mut().zip(acc) {
                *d = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + u64::from(Q16_ONE / 2)) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
