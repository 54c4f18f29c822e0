use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::decode::{PreparedImage, unpremultiply_rgba8_in_place};
use crate::foundation::core::{Affine, BezPath, Circle, Point, Vec2};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::render::blur::blur_rgba8_premul_tight;
use crate::render::composite::over_in_place;
use crate::render::plan::{BadgePlan, Layer, ShadowStyle};
use crate::render::text::{PreparedText, TextBrushRgba8};

/// A rendered surface as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// CPU raster backend powered by `vello_cpu`.
///
/// Consecutive image layers share one render context. Each text layer is rasterized on its own
/// surface so its shadow can be blurred before compositing.
#[derive(Debug, Default)]
pub struct CpuBackend {
    _priv: (),
}

impl CpuBackend {
    /// Create a backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `plan` into a premultiplied frame.
    pub fn render_plan(&mut self, plan: &BadgePlan) -> BadgeResult<FrameRGBA> {
        let (w, h) = plan.canvas.surface_dims()?;
        let mut acc = vec![0u8; plan.canvas.rgba8_len()];
        let mut batch: Option<vello_cpu::RenderContext> = None;

        for layer in &plan.layers {
            match layer {
                Layer::Image {
                    image,
                    transform,
                    clip,
                } => {
                    let ctx = batch.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
                    draw_image(ctx, image, *transform, *clip)?;
                }
                Layer::Text {
                    text,
                    origin,
                    shadow,
                } => {
                    if let Some(ctx) = batch.take() {
                        composite_context(&mut acc, ctx, w, h)?;
                    }
                    draw_text_layer(&mut acc, w, h, text, *origin, shadow.as_ref())?;
                }
            }
        }
        if let Some(ctx) = batch.take() {
            composite_context(&mut acc, ctx, w, h)?;
        }

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: acc,
            premultiplied: true,
        })
    }
}

fn composite_context(
    acc: &mut [u8],
    mut ctx: vello_cpu::RenderContext,
    w: u16,
    h: u16,
) -> BadgeResult<()> {
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    over_in_place(acc, pixmap.data_as_u8_slice())
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &PreparedImage,
    transform: Affine,
    clip: Option<Circle>,
) -> BadgeResult<()> {
    let pixmap =
        image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    if let Some(circle) = clip {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&bezpath_to_cpu(&circle.to_path(0.1)));
    }

    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ));

    if clip.is_some() {
        ctx.pop_layer();
    }
    Ok(())
}

fn draw_text_layer(
    acc: &mut [u8],
    w: u16,
    h: u16,
    text: &PreparedText,
    origin: Point,
    shadow: Option<&ShadowStyle>,
) -> BadgeResult<()> {
    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(text.font.bytes.as_ref().clone()),
        text.font.index,
    );

    if let Some(shadow) = shadow {
        let at = origin + Vec2::new(shadow.offset_x, shadow.offset_y);
        let brush = TextBrushRgba8::from(shadow.color_rgba8);
        let pixels = rasterize_glyphs(w, h, text, &font, at, Some(brush));
        let pixels = match shadow.kernel() {
            Some((radius, sigma)) => {
                blur_rgba8_premul_tight(&pixels, u32::from(w), u32::from(h), radius, sigma)?
            }
            None => pixels,
        };
        over_in_place(acc, &pixels)?;
    }

    let pixels = rasterize_glyphs(w, h, text, &font, origin, None);
    over_in_place(acc, &pixels)
}

/// Fill every glyph of `text` at `origin`, using the layout brushes unless `brush` overrides them.
fn rasterize_glyphs(
    w: u16,
    h: u16,
    text: &PreparedText,
    font: &vello_cpu::peniko::FontData,
    origin: Point,
    brush: Option<TextBrushRgba8>,
) -> Vec<u8> {
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));

    for line in text.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let b = brush.unwrap_or(run.style().brush);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().to_vec()
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> BadgeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BadgeError::asset_load(format!("image width {width} exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BadgeError::asset_load(format!("image height {height} exceeds u16")))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BadgeError::asset_load(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
