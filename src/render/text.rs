use std::sync::Arc;

use crate::assets::fonts::ResolvedFont;
use crate::foundation::core::{Point, TextAnchor};
use crate::foundation::error::{BadgeError, BadgeResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A shaped single line of text plus the font it was shaped with.
#[derive(Clone)]
pub struct PreparedText {
    /// Shaped layout. Glyph positions are relative to the layout's top-left corner.
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    /// Font bytes used to build glyph outlines.
    pub font: ResolvedFont,
    /// Family name the layout resolved to.
    pub font_family: String,
    /// Advance width of the line in pixels, trailing whitespace included.
    pub width: f32,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
}

impl std::fmt::Debug for PreparedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("font", &self.font)
            .field("font_family", &self.font_family)
            .field("width", &self.width)
            .field("baseline", &self.baseline)
            .finish()
    }
}

impl PreparedText {
    /// Top-left layout origin that centers the line horizontally on `anchor.x` and puts its
    /// baseline on `anchor.y`.
    pub fn origin_for_anchor(&self, anchor: TextAnchor) -> Point {
        Point::new(
            anchor.x - f64::from(self.width) / 2.0,
            anchor.y - f64::from(self.baseline),
        )
    }
}

/// Text shaping parameters for one line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextParams {
    /// Font size in pixels.
    pub size_px: f32,
    /// CSS-style weight.
    pub weight: u16,
    /// Italic style.
    pub italic: bool,
    /// Fill color.
    pub brush: TextBrushRgba8,
}

/// Stateful helper for building Parley layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` as a single unwrapped line.
    ///
    /// Tabs, line feeds, form feeds and carriage returns are drawn as spaces.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        params: TextParams,
    ) -> BadgeResult<PreparedText> {
        if !params.size_px.is_finite() || params.size_px <= 0.0 {
            return Err(BadgeError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| BadgeError::asset_load("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BadgeError::asset_load("registered font family has no name"))?
            .to_string();

        let style = if params.italic {
            parley::style::FontStyle::Italic
        } else {
            parley::style::FontStyle::Normal
        };

        let text = single_line(text);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(params.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(params.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(style));
        builder.push_default(parley::style::StyleProperty::Brush(params.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(params.size_px);
        let width = layout.full_width();

        Ok(PreparedText {
            layout: Arc::new(layout),
            font: font.clone(),
            font_family: family_name,
            width,
            baseline,
        })
    }
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\x0C' | '\r' => ' ',
            c => c,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
