//! # Text Overlay
//!
//! Debug text overlay for Vulkan renderers. Text is drawn as point sprites
//! from a precomputed glyph point buffer, with per-call transforms streamed
//! through a ring of uniform parameter blocks.
//!
//! ## Features
//!
//! - **Point glyphs**: one vertex per lit pixel, no textures or samplers
//! - **Streaming parameters**: fixed ring of 8 KiB uniform blocks, no per-frame allocation
//! - **Backend-neutral core**: layout, encoding and batching are plain data
//! - **Configurable**: TOML or RON configuration files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text_overlay::prelude::*;
//! # fn demo(
//! #     context: &DeviceContext,
//! #     render_pass: ash::vk::RenderPass,
//! #     mut command_buffer: ash::vk::CommandBuffer,
//! #     target: OverlayTarget,
//! # ) -> OverlayResult<()> {
//! let config = OverlayConfig::default();
//! let font = BitmapGlyphSource::new().with_glyph(b'!', [0x18; 16]);
//!
//! let backend = VulkanOverlayBackend::new(context, render_pass, &config)?;
//! let mut writer = TextWriter::new(backend, &font, &config)?;
//!
//! writer.set_scale(1.5);
//! writer.print_text_default(&mut command_buffer, &target, 8, 8, 1280, 720, "!!!")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backends;
pub mod config;
pub mod error;
pub mod foundation;
pub mod overlay;

pub use error::{OverlayError, OverlayResult};

/// Common imports for overlay users
pub mod prelude {
    pub use crate::{
        backends::vulkan::{DeviceContext, OverlayTarget, VulkanError, VulkanOverlayBackend},
        config::{Config, OverlayConfig, ShaderConfig},
        error::{OverlayError, OverlayResult},
        foundation::math::{Vec2, Vec4},
        overlay::{
            BitmapGlyphSource, GlyphAtlas, GlyphPoint, GlyphRange, GlyphSource,
            OverlayBackend, TextWriter,
        },
    };
}
