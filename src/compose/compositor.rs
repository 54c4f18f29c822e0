use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image_for_canvas, decode_photo};
use crate::assets::fonts::FontBook;
use crate::assets::source::ImageSource;
use crate::compose::request::{BadgeRequest, CompositorOpts, PhotoFailurePolicy, RenderedBadge};
use crate::encode::png::encode_png;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::foundation::math::{cover_fit_scale, cover_fit_transform, stretch_transform};
use crate::render::cpu::CpuBackend;
use crate::render::plan::{BadgePlan, Layer};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine, TextParams};
use crate::foundation::core::PhotoSlot;
use crate::template::model::{Template, TextLayerStyle};

/// Draws badges.
///
/// Holds options and a lazily loaded font database; every render allocates its own surfaces, so
/// one compositor can be shared across threads.
#[derive(Default)]
pub struct Compositor {
    opts: CompositorOpts,
    fonts: FontBook,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor with default options and system fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compositor with explicit options.
    pub fn with_opts(opts: CompositorOpts) -> Self {
        Self {
            opts,
            fonts: FontBook::new(),
        }
    }

    /// Replace the font book.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    /// Active options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Font book used for text layers.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Decode assets and shape text into a paint-ordered plan.
    ///
    /// Order: template, photo, name, role. Empty text produces no layer.
    pub fn build_plan(&self, template: &Template, request: &BadgeRequest) -> BadgeResult<BadgePlan> {
        let layout = &template.layout;
        layout.validate()?;
        let canvas = layout.canvas;
        let mut plan = BadgePlan::new(canvas);

        let bytes = template.asset.load_bytes()?;
        let bg = decode_image_for_canvas(&bytes, canvas)?;
        plan.layers.push(Layer::Image {
            transform: stretch_transform(bg.width, bg.height, canvas.width, canvas.height),
            image: bg,
            clip: None,
        });

        let slot = layout.photo_slot;
        if let Some(photo) = &request.photo
            && let Some(img) = self.load_photo(photo, slot)?
        {
            tracing::debug!(
                width = img.width,
                height = img.height,
                scale = cover_fit_scale(img.width, img.height, slot),
                "cover-fit photo"
            );
            plan.layers.push(Layer::Image {
                transform: cover_fit_transform(img.width, img.height, slot),
                image: img,
                clip: Some(slot.circle()),
            });
        }

        let mut engine = TextLayoutEngine::new();
        for (text, style) in [(&request.name, &layout.name), (&request.role, &layout.role)] {
            if let Some(layer) = self.text_layer(&mut engine, text, style)? {
                plan.layers.push(layer);
            }
        }

        Ok(plan)
    }

    /// Render `request` onto `template` and encode the result as PNG.
    #[tracing::instrument(
        skip_all,
        fields(template = %template.asset.describe(), has_photo = request.photo.is_some())
    )]
    pub fn render(&self, template: &Template, request: &BadgeRequest) -> BadgeResult<RenderedBadge> {
        let plan = self.build_plan(template, request)?;
        let frame = CpuBackend::new().render_plan(&plan)?;
        let png = encode_png(&frame)?;
        tracing::debug!(bytes = png.len(), layers = plan.layers.len(), "rendered badge");
        Ok(RenderedBadge {
            width: frame.width,
            height: frame.height,
            png,
        })
    }

    /// Run [`Compositor::render`] on tokio's blocking pool, failing with
    /// [`BadgeError::Timeout`] after [`CompositorOpts::timeout`].
    ///
    /// A timed-out render keeps running in the background; its result is dropped.
    pub async fn render_with_timeout(
        self: Arc<Self>,
        template: Template,
        request: BadgeRequest,
    ) -> BadgeResult<RenderedBadge> {
        let deadline = self.opts.timeout;
        let job = tokio::task::spawn_blocking(move || self.render(&template, &request));
        match tokio::time::timeout(deadline, job).await {
            Ok(Ok(res)) => res,
            Ok(Err(join)) => Err(BadgeError::Other(anyhow::anyhow!(
                "render task failed: {join}"
            ))),
            Err(_) => {
                tracing::warn!(timeout_ms = deadline.as_millis() as u64, "render timed out");
                Err(BadgeError::Timeout(deadline))
            }
        }
    }

    fn load_photo(
        &self,
        photo: &ImageSource,
        slot: PhotoSlot,
    ) -> BadgeResult<Option<PreparedImage>> {
        let decoded = photo
            .load_bytes()
            .and_then(|bytes| decode_photo(&bytes, slot));
        match (decoded, self.opts.photo_failure) {
            (Ok(img), _) => Ok(Some(img)),
            (Err(err), PhotoFailurePolicy::Abort) => Err(err),
            (Err(err), PhotoFailurePolicy::Degrade) => {
                tracing::warn!(
                    photo = %photo.describe(),
                    error = %err,
                    "photo could not be loaded; rendering without it"
                );
                Ok(None)
            }
        }
    }

    fn text_layer(
        &self,
        engine: &mut TextLayoutEngine,
        text: &str,
        style: &TextLayerStyle,
    ) -> BadgeResult<Option<Layer>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let font = self.fonts.resolve(&style.font)?;
        let prepared = engine.layout_line(
            text,
            &font,
            TextParams {
                size_px: style.size_px,
                weight: style.font.weight,
                italic: style.font.italic,
                brush: TextBrushRgba8::from(style.color_rgba8),
            },
        )?;
        Ok(Some(Layer::Text {
            origin: prepared.origin_for_anchor(style.anchor),
            text: prepared,
            shadow: style.shadow,
        }))
    }
}

/// One-shot render with a fresh [`Compositor`].
pub fn render(template: &Template, request: &BadgeRequest) -> BadgeResult<RenderedBadge> {
    Compositor::new().render(template, request)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
