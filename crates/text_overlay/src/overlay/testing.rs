//! Test doubles for the overlay core

use std::collections::HashMap;
use super::backend::OverlayBackend;
use super::draw_batch::{DrawBatch, DrawCommand};
use super::glyph_atlas::{GlyphPoint, GlyphRange, GlyphSource};
use super::uniform_stream::{check_bounds, ParameterStore};
use crate::error::OverlayResult;

/// Three-glyph source: 'A' (6 points), 'B' (8 points) and a blank ' '
pub struct TestGlyphSource;

impl GlyphSource for TestGlyphSource {
    fn generate_point_map(&self) -> Vec<GlyphPoint> {
        (0..14).map(|i| GlyphPoint::new((i % 8) as f32, (i / 8) as f32)).collect()
    }

    fn glyph_offsets(&self) -> HashMap<u8, GlyphRange> {
        HashMap::from([
            (b'A', GlyphRange::new(0, 6)),
            (b'B', GlyphRange::new(6, 8)),
            (b' ', GlyphRange::new(14, 0)),
        ])
    }
}

/// Render target handed to [`RecordingBackend::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTarget(pub u32);

/// Backend that keeps everything in host memory and records batches as data
pub struct RecordingBackend {
    pub glyph_capacity: u64,
    pub glyph_store: Vec<GlyphPoint>,
    pub parameters: Vec<u8>,
    pub targets: Vec<MockTarget>,
}

impl RecordingBackend {
    pub fn new(glyph_capacity: u64, parameter_capacity: u64) -> Self {
        Self {
            glyph_capacity,
            glyph_store: Vec::new(),
            parameters: vec![0; parameter_capacity as usize],
            targets: Vec::new(),
        }
    }
}

impl OverlayBackend for RecordingBackend {
    type Recorder = Vec<DrawCommand>;
    type Target = MockTarget;

    fn glyph_store_capacity(&self) -> u64 {
        self.glyph_capacity
    }

    fn upload_glyph_points(&mut self, points: &[GlyphPoint]) -> OverlayResult<()> {
        check_bounds(0, std::mem::size_of_val(points), self.glyph_capacity)?;
        self.glyph_store = points.to_vec();
        Ok(())
    }

    fn parameter_store(&mut self) -> &mut dyn ParameterStore {
        &mut self.parameters
    }

    fn record(&mut self, recorder: &mut Vec<DrawCommand>, target: &MockTarget, batch: &DrawBatch) -> OverlayResult<()> {
        self.targets.push(*target);
        recorder.extend_from_slice(batch.commands());
        Ok(())
    }
}
