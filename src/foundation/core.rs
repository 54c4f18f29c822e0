use crate::foundation::error::{BadgeError, BadgeResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect, Vec2};

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed badge size every built-in template renders at.
    pub const BADGE: Canvas = Canvas {
        width: 800,
        height: 800,
    };

    /// Dimensions as the `u16` pair the raster backend allocates with.
    ///
    /// Fails with [`BadgeError::Environment`] when no surface of this size can exist.
    pub fn surface_dims(self) -> BadgeResult<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return Err(BadgeError::environment(format!(
                "cannot allocate a {}x{} drawing surface",
                self.width, self.height
            )));
        }
        let w: u16 = self.width.try_into().map_err(|_| {
            BadgeError::environment(format!("surface width {} exceeds u16", self.width))
        })?;
        let h: u16 = self.height.try_into().map_err(|_| {
            BadgeError::environment(format!("surface height {} exceeds u16", self.height))
        })?;
        Ok((w, h))
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Circular photo slot: center and radius in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoSlot {
    /// Center X.
    pub cx: f64,
    /// Center Y.
    pub cy: f64,
    /// Radius.
    pub r: f64,
}

impl PhotoSlot {
    /// The slot as a `kurbo` circle.
    pub fn circle(self) -> Circle {
        Circle::new((self.cx, self.cy), self.r)
    }

    /// Diameter of the slot (`2r`).
    pub fn diameter(self) -> f64 {
        self.r * 2.0
    }

    /// Whether `p` lies inside the slot, shrunk by `inset` pixels.
    pub fn contains_inset(self, p: Point, inset: f64) -> bool {
        let d = p - Point::new(self.cx, self.cy);
        d.hypot() <= (self.r - inset).max(0.0)
    }
}

/// Text anchor: horizontal center and alphabetic baseline in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextAnchor {
    /// Horizontal center of the text line.
    pub x: f64,
    /// Baseline Y.
    pub y: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
