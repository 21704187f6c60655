//! Bitmap glyph source
//!
//! Turns 8x16 one-bit glyph bitmaps into point geometry, one point per lit
//! pixel. Useful for hosts that ship a classic VGA-style debug font.

use std::collections::{BTreeMap, HashMap};
use super::glyph_atlas::{GlyphPoint, GlyphRange, GlyphSource};

/// Width of a bitmap glyph in pixels
pub const BITMAP_GLYPH_WIDTH: u32 = 8;

/// Height of a bitmap glyph in pixels, matching the layout cell height
pub const BITMAP_GLYPH_HEIGHT: usize = 16;

/// One glyph bitmap: a byte per scanline, top row first, MSB is the leftmost pixel
pub type GlyphBitmap = [u8; BITMAP_GLYPH_HEIGHT];

/// Glyph source backed by per-character bitmaps
#[derive(Debug, Clone, Default)]
pub struct BitmapGlyphSource {
    glyphs: BTreeMap<u8, GlyphBitmap>,
}

impl BitmapGlyphSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the bitmap for a character
    pub fn with_glyph(mut self, byte: u8, bitmap: GlyphBitmap) -> Self {
        self.glyphs.insert(byte, bitmap);
        self
    }

    /// Number of characters with a bitmap, blank ones included
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no characters were added
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn bitmap_points(bitmap: &GlyphBitmap) -> impl Iterator<Item = GlyphPoint> + '_ {
        bitmap.iter().enumerate().flat_map(|(row, &bits)| {
            // Row 0 is the top scanline; points measure y up from the cell bottom
            let y = (BITMAP_GLYPH_HEIGHT - 1 - row) as f32;
            (0..BITMAP_GLYPH_WIDTH)
                .filter(move |column| bits & (0x80u8 >> column) != 0)
                .map(move |column| GlyphPoint::new(column as f32, y))
        })
    }
}

impl GlyphSource for BitmapGlyphSource {
    fn generate_point_map(&self) -> Vec<GlyphPoint> {
        self.glyphs.values().flat_map(Self::bitmap_points).collect()
    }

    fn glyph_offsets(&self) -> HashMap<u8, GlyphRange> {
        let mut offsets = HashMap::with_capacity(self.glyphs.len());
        let mut first_point = 0u32;

        for (&byte, bitmap) in &self.glyphs {
            let point_count: u32 = bitmap.iter().map(|row| row.count_ones()).sum();
            offsets.insert(byte, GlyphRange::new(first_point, point_count));
            first_point += point_count;
        }

        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::glyph_atlas::GlyphAtlas;

    const BAR: GlyphBitmap = [0x18; BITMAP_GLYPH_HEIGHT];
    const BLANK: GlyphBitmap = [0; BITMAP_GLYPH_HEIGHT];

    fn corner() -> GlyphBitmap {
        let mut bitmap = BLANK;
        bitmap[0] = 0x80;
        bitmap[15] = 0x01;
        bitmap
    }

    #[test]
    fn test_one_point_per_lit_pixel() {
        let source = BitmapGlyphSource::new().with_glyph(b'|', BAR);
        assert_eq!(source.generate_point_map().len(), 32);
        assert_eq!(source.glyph_offsets()[&b'|'], GlyphRange::new(0, 32));
    }

    #[test]
    fn test_rows_map_bottom_up() {
        let source = BitmapGlyphSource::new().with_glyph(b'.', corner());
        let points = source.generate_point_map();

        assert_eq!(points, vec![GlyphPoint::new(0.0, 15.0), GlyphPoint::new(7.0, 0.0)]);
    }

    #[test]
    fn test_ranges_follow_byte_order() {
        let source = BitmapGlyphSource::new()
            .with_glyph(b'b', corner())
            .with_glyph(b' ', BLANK)
            .with_glyph(b'a', BAR);
        let offsets = source.glyph_offsets();

        assert_eq!(offsets[&b' '], GlyphRange::new(0, 0));
        assert_eq!(offsets[&b'a'], GlyphRange::new(0, 32));
        assert_eq!(offsets[&b'b'], GlyphRange::new(32, 2));

        let atlas = GlyphAtlas::from_source(&source).unwrap();
        assert_eq!(atlas.points().len(), 34);
        assert_eq!(atlas.lookup(b' '), None);
        assert_eq!(atlas.lookup(b'b'), Some(GlyphRange::new(32, 2)));
    }
}
