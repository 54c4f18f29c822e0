use crate::assets::fonts::FontSpec;
use crate::assets::source::ImageSource;
use crate::foundation::core::{Canvas, PhotoSlot, TextAnchor};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::render::plan::ShadowStyle;

/// Names accepted by [`TemplateLayout::preset`].
pub const PRESET_NAMES: &[&str] = &["her-dao", "her-dao-compact"];

/// How one text line (name or role) is drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextLayerStyle {
    /// Horizontal center and baseline.
    pub anchor: TextAnchor,
    /// Font size in pixels.
    pub size_px: f32,
    /// Face selection.
    #[serde(default)]
    pub font: FontSpec,
    /// Straight-alpha fill color.
    #[serde(default = "white")]
    pub color_rgba8: [u8; 4],
    /// Drop shadow; `null` disables it.
    #[serde(default = "default_shadow")]
    pub shadow: Option<ShadowStyle>,
}

fn white() -> [u8; 4] {
    [255, 255, 255, 255]
}

fn default_shadow() -> Option<ShadowStyle> {
    Some(ShadowStyle::default())
}

impl TextLayerStyle {
    fn name_at(x: f64, y: f64) -> Self {
        Self {
            anchor: TextAnchor { x, y },
            size_px: 48.0,
            font: FontSpec::bold("Arial"),
            color_rgba8: white(),
            shadow: default_shadow(),
        }
    }

    fn role_at(x: f64, y: f64) -> Self {
        Self {
            anchor: TextAnchor { x, y },
            size_px: 32.0,
            font: FontSpec::italic("Arial"),
            color_rgba8: white(),
            shadow: default_shadow(),
        }
    }
}

/// Geometry and typography of a badge template.
///
/// Missing fields in JSON fall back to the `her-dao` preset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// Output size; the template asset is stretched to fill it.
    pub canvas: Canvas,
    /// Circular photo slot.
    pub photo_slot: PhotoSlot,
    /// Name line (bold).
    pub name: TextLayerStyle,
    /// Role line (italic, smaller).
    pub role: TextLayerStyle,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self::her_dao()
    }
}

impl TemplateLayout {
    /// Photo slot on the right side, name and role stacked beneath the emblem.
    pub fn her_dao() -> Self {
        Self {
            canvas: Canvas::BADGE,
            photo_slot: PhotoSlot {
                cx: 600.0,
                cy: 330.0,
                r: 120.0,
            },
            name: TextLayerStyle::name_at(600.0, 580.0),
            role: TextLayerStyle::role_at(600.0, 630.0),
        }
    }

    /// Smaller slot variant of [`TemplateLayout::her_dao`].
    pub fn her_dao_compact() -> Self {
        Self {
            canvas: Canvas::BADGE,
            photo_slot: PhotoSlot {
                cx: 560.0,
                cy: 317.0,
                r: 105.0,
            },
            name: TextLayerStyle::name_at(560.0, 560.0),
            role: TextLayerStyle::role_at(560.0, 605.0),
        }
    }

    /// Look up a built-in layout by name (see [`PRESET_NAMES`]).
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "her-dao" => Some(Self::her_dao()),
            "her-dao-compact" => Some(Self::her_dao_compact()),
            _ => None,
        }
    }

    /// Check the layout can be rendered.
    pub fn validate(&self) -> BadgeResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BadgeError::validation("template canvas must be non-empty"));
        }
        let s = self.photo_slot;
        if !(s.cx.is_finite() && s.cy.is_finite() && s.r.is_finite()) || s.r <= 0.0 {
            return Err(BadgeError::validation(
                "photo slot must have finite coordinates and a radius > 0",
            ));
        }
        let (w, h) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        if s.cx < 0.0 || s.cy < 0.0 || s.cx > w || s.cy > h {
            return Err(BadgeError::validation(format!(
                "photo slot center ({}, {}) lies outside the {}x{} canvas",
                s.cx, s.cy, self.canvas.width, self.canvas.height
            )));
        }
        for (label, style) in [("name", &self.name), ("role", &self.role)] {
            if !style.size_px.is_finite() || style.size_px <= 0.0 {
                return Err(BadgeError::validation(format!(
                    "{label} size_px must be finite and > 0"
                )));
            }
            if !(style.anchor.x.is_finite() && style.anchor.y.is_finite()) {
                return Err(BadgeError::validation(format!(
                    "{label} anchor must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// A template: background asset plus the layout that goes with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    /// Background image; must decode or the render fails.
    pub asset: ImageSource,
    /// Slot and text geometry.
    pub layout: TemplateLayout,
}

impl Template {
    /// Pair an asset with a layout.
    pub fn new(asset: ImageSource, layout: TemplateLayout) -> Self {
        Self { asset, layout }
    }

    /// Pair an asset with a built-in layout.
    pub fn preset(name: &str, asset: ImageSource) -> BadgeResult<Self> {
        let layout = TemplateLayout::preset(name).ok_or_else(|| {
            BadgeError::validation(format!(
                "unknown template preset '{name}' (expected one of: {})",
                PRESET_NAMES.join(", ")
            ))
        })?;
        Ok(Self::new(asset, layout))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
