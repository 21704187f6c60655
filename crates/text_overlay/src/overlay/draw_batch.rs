//! Draw batch assembly
//!
//! A [`DrawBatch`] is the backend-neutral command list for one text call.
//! Backends translate it one command at a time into their own recording API.

use super::glyph_atlas::GlyphRange;
use super::layout::Viewport;
use super::uniform_stream::RingWindow;

/// One recorded command of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Set the dynamic viewport to the full target
    SetViewport {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Set the dynamic scissor to the full target
    SetScissor {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
    /// Bind the pipeline, the glyph vertices and the parameter block of `window`
    BindParameterBlock(RingWindow),
    /// Begin the overlay render pass on the target
    BeginPass,
    /// Draw one glyph
    Draw {
        /// Points in the glyph
        vertex_count: u32,
        /// Always 1
        instance_count: u32,
        /// First point of the glyph in the vertex store
        first_vertex: u32,
        /// Glyph index, selects the offset slot in the parameter block
        first_instance: u32,
    },
    /// End the overlay render pass
    EndPass,
}

/// Ordered commands for one text call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    commands: Vec<DrawCommand>,
    draw_count: usize,
}

impl DrawBatch {
    /// Commands in recording order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of `Draw` commands
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }
}

/// Build the command list for `glyphs` using the parameters in `window`
///
/// Draw `i` uses instance index `i`, which the vertex stage uses to pick the
/// `i`-th offset slot of the block.
pub fn assemble(window: RingWindow, glyphs: &[GlyphRange], viewport: Viewport) -> DrawBatch {
    let mut commands = Vec::with_capacity(glyphs.len() + 5);

    commands.push(DrawCommand::SetViewport { width: viewport.width, height: viewport.height });
    commands.push(DrawCommand::SetScissor { width: viewport.width, height: viewport.height });
    commands.push(DrawCommand::BindParameterBlock(window));
    commands.push(DrawCommand::BeginPass);
    commands.extend(glyphs.iter().zip(0u32..).map(|(glyph, index)| DrawCommand::Draw {
        vertex_count: glyph.point_count,
        instance_count: 1,
        first_vertex: glyph.first_point,
        first_instance: index,
    }));
    commands.push(DrawCommand::EndPass);

    DrawBatch { commands, draw_count: glyphs.len() }
}
