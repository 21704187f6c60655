//! Vulkan backend
//!
//! Concrete [`OverlayBackend`](crate::overlay::OverlayBackend) on top of `ash`.
//! The host renderer owns the instance, device, render pass and command
//! buffers; this module only creates the overlay's own resources.

pub mod buffer;
pub mod context;
pub mod descriptor_set;
pub mod overlay_backend;
pub mod shader;

pub use buffer::Buffer;
pub use context::{DeviceContext, VulkanError, VulkanResult};
pub use descriptor_set::{DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder};
pub use overlay_backend::{OverlayTarget, VulkanOverlayBackend};
pub use shader::{OverlayPipeline, ShaderModule};
