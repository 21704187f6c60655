//! Rendering backend abstraction for the overlay

use super::draw_batch::DrawBatch;
use super::glyph_atlas::GlyphPoint;
use super::uniform_stream::ParameterStore;
use crate::error::OverlayResult;

/// Device-side half of the overlay
///
/// A backend owns the glyph vertex store, the parameter store and whatever
/// pipeline state is needed to replay a [`DrawBatch`]. Device resources are
/// released when the backend is dropped.
pub trait OverlayBackend {
    /// Command stream the batch is recorded into
    type Recorder;

    /// Render target the batch draws onto
    type Target;

    /// Size of the glyph vertex store in bytes
    fn glyph_store_capacity(&self) -> u64;

    /// Upload the atlas point buffer to the start of the glyph vertex store
    fn upload_glyph_points(&mut self, points: &[GlyphPoint]) -> OverlayResult<()>;

    /// Storage behind the parameter ring
    fn parameter_store(&mut self) -> &mut dyn ParameterStore;

    /// Record `batch` into `recorder`, drawing onto `target`
    fn record(&mut self, recorder: &mut Self::Recorder, target: &Self::Target, batch: &DrawBatch) -> OverlayResult<()>;
}
