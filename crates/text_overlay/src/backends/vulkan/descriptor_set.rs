//! Descriptor set layout and pool management
//!
//! The overlay binds one uniform buffer range per draw call. Every ring slot
//! gets its own descriptor set, allocated once at startup and pointed at that
//! slot's block, so no descriptor work happens per frame.

use ash::{vk, Device};
use super::context::{VulkanError, VulkanResult};

/// Descriptor set layout builder for creating reusable layouts
pub struct DescriptorSetLayoutBuilder {
    bindings: Vec<vk::DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayoutBuilder {
    /// Create a new descriptor set layout builder
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Add a uniform buffer binding
    pub fn add_uniform_buffer(mut self, binding: u32, stage_flags: vk::ShaderStageFlags) -> Self {
        self.bindings.push(
            vk::DescriptorSetLayoutBinding::builder()
                .binding(binding)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(1)
                .stage_flags(stage_flags)
                .build()
        );
        self
    }

    /// Build the descriptor set layout
    pub fn build(self, device: &Device) -> VulkanResult<DescriptorSetLayout> {
        let layout_info = vk::DescriptorSetLayoutCreateInfo::builder()
            .bindings(&self.bindings);

        let layout = unsafe { device.create_descriptor_set_layout(&layout_info, None) }
            .map_err(VulkanError::Api)?;

        Ok(DescriptorSetLayout { layout, device: device.clone() })
    }
}

impl Default for DescriptorSetLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor set layout wrapper with automatic cleanup
pub struct DescriptorSetLayout {
    layout: vk::DescriptorSetLayout,
    device: Device,
}

impl DescriptorSetLayout {
    /// Get the Vulkan descriptor set layout handle
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.layout
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_set_layout(self.layout, None);
        }
    }
}

/// Descriptor pool holding a fixed number of uniform buffer sets
///
/// Sets are freed together with the pool.
pub struct DescriptorPool {
    pool: vk::DescriptorPool,
    device: Device,
    max_sets: u32,
}

impl DescriptorPool {
    /// Create a pool for exactly `max_sets` sets of one uniform buffer each
    pub fn new(device: &Device, max_sets: u32) -> VulkanResult<Self> {
        let pool_sizes = [vk::DescriptorPoolSize::builder()
            .ty(vk::DescriptorType::UNIFORM_BUFFER)
            .descriptor_count(max_sets)
            .build()];

        let pool_info = vk::DescriptorPoolCreateInfo::builder()
            .max_sets(max_sets)
            .pool_sizes(&pool_sizes);

        let pool = unsafe { device.create_descriptor_pool(&pool_info, None) }
            .map_err(VulkanError::Api)?;

        Ok(Self { pool, device: device.clone(), max_sets })
    }

    /// Allocate `count` sets sharing `layout`
    ///
    /// Fails when `count` exceeds the size the pool was created with.
    pub fn allocate(&self, layout: &DescriptorSetLayout, count: u32) -> VulkanResult<Vec<vk::DescriptorSet>> {
        if count > self.max_sets {
            return Err(VulkanError::InvalidOperation {
                reason: format!("Descriptor pool holds {} sets, {} requested", self.max_sets, count),
            });
        }

        let layouts = vec![layout.handle(); count as usize];
        let alloc_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(self.pool)
            .set_layouts(&layouts);

        unsafe { self.device.allocate_descriptor_sets(&alloc_info) }
            .map_err(VulkanError::Api)
    }

    /// Get the pool handle
    pub fn handle(&self) -> vk::DescriptorPool {
        self.pool
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_descriptor_pool(self.pool, None);
        }
    }
}

/// Point set `i` at the `i`-th `block_size` range of `buffer`, binding 0
pub fn bind_ring_blocks(device: &Device, sets: &[vk::DescriptorSet], buffer: vk::Buffer, block_size: vk::DeviceSize) {
    // Infos must outlive the writes that point into them
    let buffer_infos: Vec<vk::DescriptorBufferInfo> = (0..sets.len() as u64)
        .map(|slot| vk::DescriptorBufferInfo {
            buffer,
            offset: slot * block_size,
            range: block_size,
        })
        .collect();

    let writes: Vec<vk::WriteDescriptorSet> = sets
        .iter()
        .zip(&buffer_infos)
        .map(|(&set, info)| {
            vk::WriteDescriptorSet::builder()
                .dst_set(set)
                .dst_binding(0)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(std::slice::from_ref(info))
                .build()
        })
        .collect();

    unsafe {
        device.update_descriptor_sets(&writes, &[]);
    }
}
