//! Text writer
//!
//! The overlay instance: owns the glyph atlas, the parameter ring and a
//! backend, and turns text calls into recorded draws.

use super::backend::OverlayBackend;
use super::draw_batch::assemble;
use super::glyph_atlas::{GlyphAtlas, GlyphSource};
use super::layout::{layout_text, ScaleFactor, TextLayout, Viewport, GLYPH_CELL_HEIGHT};
use super::uniform_stream::{write_parameters, UniformRing, MAX_GLYPHS_PER_CALL};
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::foundation::math::Vec4;

/// Debug text overlay over a rendering backend
///
/// Every frame operation takes `&mut self`; the writer is meant to live on the
/// thread that records the host's command buffers.
pub struct TextWriter<B: OverlayBackend> {
    backend: B,
    atlas: GlyphAtlas,
    ring: UniformRing,
    scale: ScaleFactor,
    default_color: Vec4,
}

impl<B: OverlayBackend> TextWriter<B> {
    /// Create the overlay and upload the glyph geometry of `source`
    pub fn new<S: GlyphSource + ?Sized>(mut backend: B, source: &S, config: &OverlayConfig) -> OverlayResult<Self> {
        config.validate().map_err(OverlayError::InvalidConfig)?;

        let atlas = GlyphAtlas::from_source(source)?;
        atlas.ensure_fits(backend.glyph_store_capacity())?;
        backend.upload_glyph_points(atlas.points())?;

        let ring = UniformRing::new(backend.parameter_store().capacity())?;
        let scale = ScaleFactor::new(config.initial_scale)
            .ok_or_else(|| OverlayError::InvalidConfig(format!("Invalid initial scale {}", config.initial_scale)))?;

        log::info!(
            "[OVERLAY] Text writer ready: {} glyph points, {} parameter blocks",
            atlas.points().len(),
            ring.capacity()
        );

        Ok(Self {
            backend,
            atlas,
            ring,
            scale,
            default_color: Vec4::from(config.default_color),
        })
    }

    /// Record `text` with its top-left corner at raster position `(x, y)`
    ///
    /// Returns the number of glyph draws recorded. Text without drawable
    /// characters records nothing and leaves the parameter ring untouched.
    /// Text with more drawable characters than a parameter block can address
    /// is rejected with [`OverlayError::TooManyGlyphs`] before anything is
    /// written.
    pub fn print_text(
        &mut self,
        recorder: &mut B::Recorder,
        target: &B::Target,
        x: i32,
        y: i32,
        target_w: u32,
        target_h: u32,
        text: impl AsRef<[u8]>,
        color: Vec4,
    ) -> OverlayResult<usize> {
        let viewport = Viewport::new(target_w, target_h)?;
        let layout = layout_text(text.as_ref(), x, y, viewport, self.scale, &self.atlas);

        check_glyph_count(&layout)?;
        self.record_layout(recorder, target, viewport, &layout, color)
    }

    /// [`Self::print_text`] with the configured default color
    pub fn print_text_default(
        &mut self,
        recorder: &mut B::Recorder,
        target: &B::Target,
        x: i32,
        y: i32,
        target_w: u32,
        target_h: u32,
        text: impl AsRef<[u8]>,
    ) -> OverlayResult<usize> {
        let color = self.default_color;
        self.print_text(recorder, target, x, y, target_w, target_h, text, color)
    }

    /// Record each `'\n'`-separated line one [`Self::line_height`] below the previous
    ///
    /// Each non-blank line uses its own parameter block. Every line is laid
    /// out and checked before the first one is recorded, so a line with too
    /// many glyphs fails the whole call without recording anything. Returns
    /// the total number of glyph draws.
    pub fn print_lines(
        &mut self,
        recorder: &mut B::Recorder,
        target: &B::Target,
        x: i32,
        y: i32,
        target_w: u32,
        target_h: u32,
        text: impl AsRef<[u8]>,
        color: Vec4,
    ) -> OverlayResult<usize> {
        let viewport = Viewport::new(target_w, target_h)?;
        let line_height = self.line_height();

        let mut line_y = y;
        let mut layouts = Vec::new();
        for line in text.as_ref().split(|&b| b == b'\n') {
            let layout = layout_text(line, x, line_y, viewport, self.scale, &self.atlas);
            check_glyph_count(&layout)?;
            layouts.push(layout);
            line_y = line_y.saturating_add(line_height);
        }

        let mut draws = 0;
        for layout in &layouts {
            draws += self.record_layout(recorder, target, viewport, layout, color)?;
        }

        Ok(draws)
    }

    /// Set the global text scale for subsequent calls
    ///
    /// Values above [`ScaleFactor::MAX`] are clamped. Zero, negative and
    /// non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        match ScaleFactor::new(scale) {
            Some(scale) => self.scale = scale,
            None => log::warn!("[OVERLAY] Ignoring invalid text scale {}, keeping {}", scale, self.scale.get()),
        }
    }

    /// Current text scale
    pub fn scale(&self) -> f32 {
        self.scale.get()
    }

    /// Height of one text line in pixels at the current scale
    pub fn line_height(&self) -> i32 {
        (GLYPH_CELL_HEIGHT as f32 * self.scale.get()).round() as i32
    }

    /// Number of parameter blocks, the bound on calls in flight
    pub fn ring_capacity(&self) -> u32 {
        self.ring.capacity()
    }

    /// Glyph atlas
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Rendering backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable rendering backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn record_layout(
        &mut self,
        recorder: &mut B::Recorder,
        target: &B::Target,
        viewport: Viewport,
        layout: &TextLayout,
        color: Vec4,
    ) -> OverlayResult<usize> {
        if layout.is_empty() {
            return Ok(0);
        }

        let window = self.ring.acquire_window();
        write_parameters(self.backend.parameter_store(), window, &layout.offsets, layout.scale, &color)?;

        let batch = assemble(window, &layout.glyphs, viewport);
        self.backend.record(recorder, target, &batch)?;

        Ok(batch.draw_count())
    }
}

fn check_glyph_count(layout: &TextLayout) -> OverlayResult<()> {
    if layout.len() > MAX_GLYPHS_PER_CALL {
        return Err(OverlayError::TooManyGlyphs { count: layout.len(), max: MAX_GLYPHS_PER_CALL });
    }
    Ok(())
}
