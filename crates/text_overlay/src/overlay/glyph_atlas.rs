//! Glyph atlas binding
//!
//! Holds the immutable point geometry of every glyph and the byte → range
//! table used by the layout engine. Built once from a [`GlyphSource`].

use std::collections::HashMap;
use bytemuck::{Pod, Zeroable};
use crate::error::{OverlayError, OverlayResult};

/// Size of the glyph vertex store allocated by the stock configuration
pub const DEFAULT_GLYPH_STORE_SIZE: u64 = 524_288;

/// Bytes per [`GlyphPoint`], also the vertex stride of the overlay pipeline
pub const GLYPH_POINT_SIZE: u64 = std::mem::size_of::<GlyphPoint>() as u64;

/// One lit point of a glyph, in per-glyph raster units
///
/// `y` grows upward from the bottom of the glyph cell; the vertex stage flips
/// it together with the rest of the raster transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphPoint {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl GlyphPoint {
    /// Create a new glyph point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Contiguous span of points making up one character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlyphRange {
    /// Index of the first point in the atlas point buffer
    pub first_point: u32,
    /// Number of points; zero marks a non-drawable character
    pub point_count: u32,
}

impl GlyphRange {
    /// Create a new glyph range
    pub const fn new(first_point: u32, point_count: u32) -> Self {
        Self { first_point, point_count }
    }

    /// Whether this range produces any geometry
    pub const fn is_drawable(&self) -> bool {
        self.point_count > 0
    }

    fn end(&self) -> u64 {
        u64::from(self.first_point) + u64::from(self.point_count)
    }
}

/// Producer of glyph geometry for a fixed character set
///
/// Implementations must be deterministic: the overlay calls both methods once
/// during initialization and never again.
pub trait GlyphSource {
    /// Generate the full point buffer for every glyph
    fn generate_point_map(&self) -> Vec<GlyphPoint>;

    /// Map each supported byte to its span in the point buffer
    fn glyph_offsets(&self) -> HashMap<u8, GlyphRange>;
}

/// Immutable glyph geometry plus the byte lookup table
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    points: Vec<GlyphPoint>,
    ranges: [Option<GlyphRange>; 256],
}

impl GlyphAtlas {
    /// Build the atlas from a glyph source
    ///
    /// Ranges reaching past the end of the point buffer are rejected, since the
    /// draw stage would otherwise read outside the vertex store.
    pub fn from_source<S: GlyphSource + ?Sized>(source: &S) -> OverlayResult<Self> {
        let points = source.generate_point_map();
        let mut ranges = [None; 256];

        for (byte, range) in source.glyph_offsets() {
            if range.end() > points.len() as u64 {
                return Err(OverlayError::InvalidGlyphRange {
                    byte,
                    first: range.first_point,
                    count: range.point_count,
                    points: points.len(),
                });
            }
            ranges[usize::from(byte)] = Some(range);
        }

        let mapped = ranges.iter().filter(|r| r.is_some()).count();
        log::debug!("[OVERLAY] Glyph atlas built: {} points, {} mapped characters", points.len(), mapped);

        Ok(Self { points, ranges })
    }

    /// Drawable range for a character code
    ///
    /// Unmapped characters and zero-length glyphs both return `None`.
    pub fn lookup(&self, byte: u8) -> Option<GlyphRange> {
        self.ranges[usize::from(byte)].filter(GlyphRange::is_drawable)
    }

    /// Raw table entry, including zero-length ranges
    pub fn range(&self, byte: u8) -> Option<GlyphRange> {
        self.ranges[usize::from(byte)]
    }

    /// Glyph point buffer
    pub fn points(&self) -> &[GlyphPoint] {
        &self.points
    }

    /// Size of the point buffer in bytes
    pub fn byte_size(&self) -> u64 {
        self.points.len() as u64 * GLYPH_POINT_SIZE
    }

    /// Check that the point buffer fits in a vertex store of `capacity` bytes
    pub fn ensure_fits(&self, capacity: u64) -> OverlayResult<()> {
        let required = self.byte_size();
        if required > capacity {
            return Err(OverlayError::GlyphStoreOverflow { required, capacity });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::testing::TestGlyphSource;

    struct BrokenSource;

    impl GlyphSource for BrokenSource {
        fn generate_point_map(&self) -> Vec<GlyphPoint> {
            vec![GlyphPoint::new(0.0, 0.0); 4]
        }

        fn glyph_offsets(&self) -> HashMap<u8, GlyphRange> {
            HashMap::from([(b'X', GlyphRange::new(2, 3))])
        }
    }

    #[test]
    fn test_glyph_point_layout() {
        assert_eq!(GLYPH_POINT_SIZE, 8);
    }

    #[test]
    fn test_lookup_skips_blank_and_unmapped() {
        let atlas = GlyphAtlas::from_source(&TestGlyphSource).unwrap();

        assert_eq!(atlas.lookup(b'A'), Some(GlyphRange::new(0, 6)));
        assert_eq!(atlas.lookup(b'B'), Some(GlyphRange::new(6, 8)));
        assert_eq!(atlas.lookup(b' '), None);
        assert_eq!(atlas.range(b' '), Some(GlyphRange::new(14, 0)));
        assert_eq!(atlas.lookup(b'?'), None);
        assert_eq!(atlas.range(b'?'), None);
    }

    #[test]
    fn test_out_of_range_glyph_rejected() {
        let result = GlyphAtlas::from_source(&BrokenSource);
        assert!(matches!(
            result,
            Err(OverlayError::InvalidGlyphRange { byte: b'X', first: 2, count: 3, points: 4 })
        ));
    }

    #[test]
    fn test_store_capacity_check() {
        let atlas = GlyphAtlas::from_source(&TestGlyphSource).unwrap();
        assert_eq!(atlas.byte_size(), 14 * 8);
        assert!(atlas.ensure_fits(DEFAULT_GLYPH_STORE_SIZE).is_ok());
        assert!(matches!(
            atlas.ensure_fits(64),
            Err(OverlayError::GlyphStoreOverflow { required: 112, capacity: 64 })
        ));
    }
}
