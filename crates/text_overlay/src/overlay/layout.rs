//! Text layout engine
//!
//! Converts a byte string into per-glyph NDC offsets for the point pipeline.
//! Layout is monospaced: every byte advances the pen by the same amount,
//! whether or not it produces geometry.

use serde::{Deserialize, Serialize};
use super::glyph_atlas::{GlyphAtlas, GlyphRange};
use crate::error::{OverlayError, OverlayResult};
use crate::foundation::math::Vec2;

/// Height of one glyph cell in raster units
pub const GLYPH_CELL_HEIGHT: i32 = 16;

/// Horizontal pen advance per byte in raster units
pub const GLYPH_ADVANCE: f32 = 9.0;

/// Global text scale, always in `(0, MAX]`
///
/// Deserialization goes through [`ScaleFactor::new`], so serialized values
/// are clamped and rejected the same way as values set at runtime.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct ScaleFactor(f32);

impl ScaleFactor {
    /// Largest scale; beyond it the glyph dots spread too far apart to read
    pub const MAX: f32 = 2.0;

    /// Create a scale factor, clamping values above [`Self::MAX`]
    ///
    /// Returns `None` for zero, negative and non-finite values.
    pub fn new(value: f32) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self(value.min(Self::MAX)))
        } else {
            None
        }
    }

    /// Scale as a plain float
    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for ScaleFactor {
    type Error = OverlayError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| OverlayError::InvalidConfig(format!("Scale {} must be positive and finite", value)))
    }
}

impl From<ScaleFactor> for f32 {
    fn from(scale: ScaleFactor) -> Self {
        scale.0
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Render target dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> OverlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Result of laying out one string
///
/// `offsets` and `glyphs` are parallel: entry `i` of each describes the `i`-th
/// drawable character, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// NDC offset of each drawable glyph
    pub offsets: Vec<Vec2>,
    /// Point range of each drawable glyph
    pub glyphs: Vec<GlyphRange>,
    /// Raster → NDC scale applied to glyph points
    pub scale: Vec2,
}

impl TextLayout {
    /// Number of drawable glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the text produced no geometry
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Lay out `text` with its top-left corner at raster position `(x, y)`
///
/// Walking stops at the first NUL byte. Bytes without drawable geometry still
/// advance the pen.
pub fn layout_text(
    text: &[u8],
    x: i32,
    y: i32,
    viewport: Viewport,
    scale: ScaleFactor,
    atlas: &GlyphAtlas,
) -> TextLayout {
    let scale = scale.get();

    // Y is in raster coordinates: convert to bottom-left origin. Kept in f64 so
    // tiny scales and far off-screen positions cannot overflow.
    let baseline = f64::from((viewport.height as f32 / scale).trunc()) - f64::from(y) - f64::from(GLYPH_CELL_HEIGHT);

    // Compress [0, w] and [0, h] into [-1, 1], flipping Y
    let scale_x = scale * 2.0 / viewport.width as f32;
    let scale_y = -scale * 2.0 / viewport.height as f32;
    let offset_y = scale_y * baseline as f32 + 1.0;

    let mut layout = TextLayout {
        offsets: Vec::with_capacity(text.len()),
        glyphs: Vec::with_capacity(text.len()),
        scale: Vec2::new(scale_x, scale_y),
    };

    let mut pen = 0.0f32;
    for &byte in text.iter().take_while(|&&b| b != 0) {
        match atlas.lookup(byte) {
            Some(range) => {
                layout.offsets.push(Vec2::new(scale_x * (x as f32 + pen) - 1.0, offset_y));
                layout.glyphs.push(range);
            }
            None => log::trace!("[OVERLAY] Skipping undrawable byte {:#04x}", byte),
        }
        pen += GLYPH_ADVANCE;
    }

    layout
}
