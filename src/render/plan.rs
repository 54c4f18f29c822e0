use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Circle, Point};
use crate::render::text::PreparedText;

/// Soft drop shadow drawn beneath a text layer (canvas `shadow*` semantics).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowStyle {
    /// Straight-alpha shadow color.
    pub color_rgba8: [u8; 4],
    /// Blur amount in pixels. The Gaussian sigma is half of this.
    pub blur_px: f32,
    /// Horizontal offset in pixels.
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset in pixels.
    #[serde(default)]
    pub offset_y: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color_rgba8: [0, 0, 0, 204],
            blur_px: 4.0,
            offset_x: 0.0,
            offset_y: 2.0,
        }
    }
}

impl ShadowStyle {
    /// `(radius, sigma)` of the Gaussian kernel approximating this blur, or `None` for a hard
    /// shadow.
    pub fn kernel(&self) -> Option<(u32, f32)> {
        if !self.blur_px.is_finite() || self.blur_px <= 0.0 {
            return None;
        }
        let sigma = self.blur_px / 2.0;
        Some(((sigma * 3.0).ceil() as u32, sigma))
    }
}

/// One drawing step, applied in order over a transparent surface.
#[derive(Clone, Debug)]
pub enum Layer {
    /// Raster image mapped through `transform`, optionally clipped to a circle.
    Image {
        /// Decoded image.
        image: PreparedImage,
        /// Image pixel space to canvas space.
        transform: Affine,
        /// Circular clip in canvas space.
        clip: Option<Circle>,
    },
    /// Shaped text with its layout origin in canvas space.
    Text {
        /// Shaped line.
        text: PreparedText,
        /// Canvas position of the layout's top-left corner.
        origin: Point,
        /// Optional drop shadow.
        shadow: Option<ShadowStyle>,
    },
}

/// Backend-agnostic description of a badge render.
#[derive(Clone, Debug)]
pub struct BadgePlan {
    /// Output surface size.
    pub canvas: Canvas,
    /// Layers in paint order.
    pub layers: Vec<Layer>,
}

impl BadgePlan {
    /// Empty plan for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            layers: Vec::new(),
        }
    }

    /// Number of clipped (photo) image layers.
    pub fn clipped_image_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l, Layer::Image { clip: Some(_), .. }))
            .count()
    }

    /// Number of text layers.
    pub fn text_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l, Layer::Text { .. }))
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
