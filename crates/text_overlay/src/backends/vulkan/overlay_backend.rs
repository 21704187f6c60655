//! Vulkan implementation of the overlay backend

use ash::vk;
use crate::config::OverlayConfig;
use crate::error::{OverlayError, OverlayResult};
use crate::overlay::backend::OverlayBackend;
use crate::overlay::draw_batch::{DrawBatch, DrawCommand};
use crate::overlay::glyph_atlas::GlyphPoint;
use crate::overlay::uniform_stream::{ParameterStore, RingWindow, PARAMETER_BLOCK_SIZE};
use super::buffer::Buffer;
use super::context::{DeviceContext, VulkanError};
use super::descriptor_set::{bind_ring_blocks, DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder};
use super::shader::{OverlayPipeline, ShaderModule};

/// Framebuffer the overlay draws onto
#[derive(Debug, Clone, Copy)]
pub struct OverlayTarget {
    /// Framebuffer compatible with the render pass given at creation
    pub framebuffer: vk::Framebuffer,
    /// Render area of the pass
    pub extent: vk::Extent2D,
}

/// Overlay resources on a Vulkan device
///
/// Records into command buffers owned by the host. The host must keep the
/// device alive and idle with respect to these resources when the backend is
/// dropped.
pub struct VulkanOverlayBackend {
    context: DeviceContext,
    render_pass: vk::RenderPass,
    pipeline: OverlayPipeline,
    descriptor_sets: Vec<vk::DescriptorSet>,
    _descriptor_pool: DescriptorPool,
    _set_layout: DescriptorSetLayout,
    glyph_buffer: Buffer,
    parameter_buffer: Buffer,
}

impl VulkanOverlayBackend {
    /// Create the overlay's buffers, descriptor sets and pipeline
    ///
    /// `render_pass` must be compatible with every framebuffer later passed
    /// as an [`OverlayTarget`] and should load, not clear, its color
    /// attachment.
    pub fn new(context: &DeviceContext, render_pass: vk::RenderPass, config: &OverlayConfig) -> OverlayResult<Self> {
        if render_pass == vk::RenderPass::null() {
            return Err(OverlayError::MissingRenderPass);
        }
        config.validate().map_err(OverlayError::InvalidConfig)?;
        config.shaders.validate().map_err(VulkanError::InitializationFailed)?;

        let device = context.device();
        let ring_slots = u32::try_from(config.ring_slots())
            .map_err(|_| OverlayError::InvalidConfig(format!("{} ring slots exceed u32", config.ring_slots())))?;

        let glyph_buffer = Buffer::new(context, config.glyph_store_size, vk::BufferUsageFlags::VERTEX_BUFFER)?;
        let parameter_buffer = Buffer::new(context, config.parameter_store_size, vk::BufferUsageFlags::UNIFORM_BUFFER)?;

        let set_layout = DescriptorSetLayoutBuilder::new()
            .add_uniform_buffer(0, vk::ShaderStageFlags::VERTEX)
            .build(device)?;

        let descriptor_pool = DescriptorPool::new(device, ring_slots)?;
        let descriptor_sets = descriptor_pool.allocate(&set_layout, ring_slots)?;
        bind_ring_blocks(device, &descriptor_sets, parameter_buffer.handle(), PARAMETER_BLOCK_SIZE);

        let vertex_shader = ShaderModule::from_file(device, &config.shaders.vertex_shader_path)?;
        let fragment_shader = ShaderModule::from_file(device, &config.shaders.fragment_shader_path)?;
        let pipeline = OverlayPipeline::new(device, render_pass, set_layout.handle(), &vertex_shader, &fragment_shader)?;

        log::info!(
            "[OVERLAY] Vulkan backend ready: {} byte glyph store, {} parameter blocks",
            config.glyph_store_size,
            ring_slots
        );

        Ok(Self {
            context: context.clone(),
            render_pass,
            pipeline,
            descriptor_sets,
            _descriptor_pool: descriptor_pool,
            _set_layout: set_layout,
            glyph_buffer,
            parameter_buffer,
        })
    }

    /// Render pass the pipeline was built against
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    fn descriptor_set(&self, window: RingWindow) -> OverlayResult<vk::DescriptorSet> {
        self.descriptor_sets
            .get(window.slot as usize)
            .copied()
            .ok_or_else(|| {
                VulkanError::InvalidOperation {
                    reason: format!("No descriptor set for parameter block {}", window.slot),
                }
                .into()
            })
    }
}

/// Viewport covering the whole target
fn full_viewport(width: u32, height: u32) -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: width as f32,
        height: height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

/// Scissor covering the whole target
fn full_scissor(width: u32, height: u32) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: 0, y: 0 },
        extent: vk::Extent2D { width, height },
    }
}

impl OverlayBackend for VulkanOverlayBackend {
    type Recorder = vk::CommandBuffer;
    type Target = OverlayTarget;

    fn glyph_store_capacity(&self) -> u64 {
        self.glyph_buffer.size()
    }

    fn upload_glyph_points(&mut self, points: &[GlyphPoint]) -> OverlayResult<()> {
        self.glyph_buffer.write_at(0, bytemuck::cast_slice(points))?;
        log::debug!("[OVERLAY] Uploaded {} glyph points", points.len());
        Ok(())
    }

    fn parameter_store(&mut self) -> &mut dyn ParameterStore {
        &mut self.parameter_buffer
    }

    fn record(&mut self, recorder: &mut vk::CommandBuffer, target: &OverlayTarget, batch: &DrawBatch) -> OverlayResult<()> {
        let command_buffer = *recorder;
        let device = self.context.device();

        for command in batch.commands() {
            match *command {
                DrawCommand::SetViewport { width, height } => unsafe {
                    device.cmd_set_viewport(command_buffer, 0, &[full_viewport(width, height)]);
                },
                DrawCommand::SetScissor { width, height } => unsafe {
                    device.cmd_set_scissor(command_buffer, 0, &[full_scissor(width, height)]);
                },
                DrawCommand::BindParameterBlock(window) => {
                    let descriptor_set = self.descriptor_set(window)?;
                    unsafe {
                        device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, self.pipeline.handle());
                        device.cmd_bind_descriptor_sets(
                            command_buffer,
                            vk::PipelineBindPoint::GRAPHICS,
                            self.pipeline.layout(),
                            0,
                            &[descriptor_set],
                            &[],
                        );
                        device.cmd_bind_vertex_buffers(command_buffer, 0, &[self.glyph_buffer.handle()], &[0]);
                    }
                }
                DrawCommand::BeginPass => {
                    let render_pass_info = vk::RenderPassBeginInfo::builder()
                        .render_pass(self.render_pass)
                        .framebuffer(target.framebuffer)
                        .render_area(vk::Rect2D {
                            offset: vk::Offset2D { x: 0, y: 0 },
                            extent: target.extent,
                        });
                    unsafe {
                        device.cmd_begin_render_pass(command_buffer, &render_pass_info, vk::SubpassContents::INLINE);
                    }
                }
                DrawCommand::Draw { vertex_count, instance_count, first_vertex, first_instance } => unsafe {
                    device.cmd_draw(command_buffer, vertex_count, instance_count, first_vertex, first_instance);
                },
                DrawCommand::EndPass => unsafe {
                    device.cmd_end_render_pass(command_buffer);
                },
            }
        }

        Ok(())
    }
}
