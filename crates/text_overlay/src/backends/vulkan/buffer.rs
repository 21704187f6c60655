//! Host-visible buffers
//!
//! Both overlay stores are written by the CPU and read by the GPU, so buffers
//! are allocated host-visible and host-coherent and stay mapped for their
//! whole lifetime.

use ash::{vk, Device};
use crate::error::OverlayResult;
use crate::overlay::uniform_stream::{check_bounds, ParameterStore};
use super::context::{DeviceContext, VulkanError, VulkanResult};

/// Persistently mapped buffer with RAII cleanup
pub struct Buffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
    mapped: *mut u8,
}

impl Buffer {
    /// Create a host-visible buffer of `size` bytes and map it
    pub fn new(context: &DeviceContext, size: vk::DeviceSize, usage: vk::BufferUsageFlags) -> VulkanResult<Self> {
        let device = context.device().clone();

        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe {
            device.create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?
        };

        let mem_requirements = unsafe { device.get_buffer_memory_requirements(buffer) };

        let memory_type_index = match context.find_memory_type(
            mem_requirements.memory_type_bits,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ) {
            Ok(index) => index,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(mem_requirements.size)
            .memory_type_index(memory_type_index);

        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(VulkanError::Api(e));
            }
        };

        let mapped = unsafe {
            device.bind_buffer_memory(buffer, memory, 0)
                .and_then(|_| device.map_memory(memory, 0, size, vk::MemoryMapFlags::empty()))
        };

        match mapped {
            Ok(ptr) => {
                log::debug!("[OVERLAY] Created {} byte buffer ({:?})", size, usage);
                Ok(Self { device, buffer, memory, size, mapped: ptr.cast::<u8>() })
            }
            Err(e) => {
                unsafe {
                    device.destroy_buffer(buffer, None);
                    device.free_memory(memory, None);
                }
                Err(VulkanError::Api(e))
            }
        }
    }

    /// Copy `bytes` into the buffer at `offset`
    pub fn write_at(&mut self, offset: vk::DeviceSize, bytes: &[u8]) -> OverlayResult<()> {
        check_bounds(offset, bytes.len(), self.size)?;
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), self.mapped.add(offset as usize), bytes.len());
        }
        Ok(())
    }

    /// Get buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Get size
    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl ParameterStore for Buffer {
    fn capacity(&self) -> u64 {
        self.size
    }

    fn write_bytes(&mut self, offset: u64, bytes: &[u8]) -> OverlayResult<()> {
        self.write_at(offset, bytes)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.device.unmap_memory(self.memory);
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}
