//! Overlay error types

use thiserror::Error;
use crate::backends::vulkan::VulkanError;
use crate::config::ConfigError;

/// Errors raised while creating or driving the text overlay
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Failure reported by the Vulkan backend
    #[error(transparent)]
    Vulkan(#[from] VulkanError),

    /// Failure while loading or saving configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The overlay was initialized without a render pass
    #[error("Render pass handle is null")]
    MissingRenderPass,

    /// Glyph geometry does not fit in the glyph vertex store
    #[error("Glyph geometry needs {required} bytes but the vertex store holds {capacity}")]
    GlyphStoreOverflow {
        /// Bytes needed by the point buffer
        required: u64,
        /// Bytes available in the vertex store
        capacity: u64,
    },

    /// A glyph source produced a range outside its own point buffer
    #[error("Glyph range for byte {byte:#04x} ({first}+{count}) exceeds {points} points")]
    InvalidGlyphRange {
        /// Character code of the offending entry
        byte: u8,
        /// First point index of the range
        first: u32,
        /// Point count of the range
        count: u32,
        /// Number of points produced by the source
        points: usize,
    },

    /// More drawable glyphs than a parameter block can address
    #[error("{count} drawable glyphs exceed the limit of {max} per call")]
    TooManyGlyphs {
        /// Drawable glyphs in the rejected text
        count: usize,
        /// Offset slots in one parameter block
        max: usize,
    },

    /// Render target with a zero dimension
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Target width in pixels
        width: u32,
        /// Target height in pixels
        height: u32,
    },

    /// Write outside the bounds of a parameter store
    #[error("Write of {len} bytes at offset {offset} exceeds store size {capacity}")]
    StoreOutOfBounds {
        /// Byte offset of the write
        offset: u64,
        /// Length of the write
        len: usize,
        /// Size of the store
        capacity: u64,
    },

    /// Configuration values that cannot drive the overlay
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for overlay operations
pub type OverlayResult<T> = Result<T, OverlayError>;
