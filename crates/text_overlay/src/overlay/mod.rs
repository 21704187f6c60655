//! Text overlay core
//!
//! Backend-neutral pieces of the overlay: glyph geometry, layout, parameter
//! streaming and draw batch assembly, tied together by [`TextWriter`].

pub mod backend;
pub mod bitmap_source;
pub mod draw_batch;
pub mod glyph_atlas;
pub mod layout;
pub mod text_writer;
pub mod uniform_stream;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::OverlayBackend;
pub use bitmap_source::BitmapGlyphSource;
pub use draw_batch::{assemble, DrawBatch, DrawCommand};
pub use glyph_atlas::{GlyphAtlas, GlyphPoint, GlyphRange, GlyphSource};
pub use layout::{layout_text, ScaleFactor, TextLayout, Viewport};
pub use text_writer::TextWriter;
pub use uniform_stream::{write_parameters, ParameterStore, RingWindow, UniformRing};
