//! Device context shared by the overlay's Vulkan resources

use ash::{vk, Device, Instance};
use thiserror::Error;

/// Vulkan-specific errors
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },

    /// Resource creation failed during initialization
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

/// Logical device plus the memory properties of its physical device
///
/// Cloning is cheap: `ash::Device` is a handle plus a function table.
#[derive(Clone)]
pub struct DeviceContext {
    device: Device,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
}

impl DeviceContext {
    /// Wrap a device created by the host renderer
    pub fn new(instance: &Instance, physical_device: vk::PhysicalDevice, device: Device) -> Self {
        let memory_properties = unsafe { instance.get_physical_device_memory_properties(physical_device) };
        Self { device, memory_properties }
    }

    /// Build a context from already queried memory properties
    pub fn from_parts(device: Device, memory_properties: vk::PhysicalDeviceMemoryProperties) -> Self {
        Self { device, memory_properties }
    }

    /// Logical device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Find a memory type allowed by `type_filter` with all of `properties`
    pub fn find_memory_type(&self, type_filter: u32, properties: vk::MemoryPropertyFlags) -> VulkanResult<u32> {
        find_memory_type(&self.memory_properties, type_filter, properties)
    }
}

pub(crate) fn find_memory_type(
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    type_filter: u32,
    properties: vk::MemoryPropertyFlags,
) -> VulkanResult<u32> {
    (0..memory_properties.memory_type_count)
        .find(|&i| {
            type_filter & (1 << i) != 0
                && memory_properties.memory_types[i as usize].property_flags.contains(properties)
        })
        .ok_or(VulkanError::NoSuitableMemoryType)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(types: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut props = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: types.len() as u32,
            ..Default::default()
        };
        for (slot, flags) in props.memory_types.iter_mut().zip(types) {
            slot.property_flags = *flags;
        }
        props
    }

    #[test]
    fn test_memory_type_selection() {
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let props = properties(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::HOST_VISIBLE,
            host | vk::MemoryPropertyFlags::HOST_CACHED,
        ]);

        assert_eq!(find_memory_type(&props, 0b111, host).unwrap(), 2);
        assert_eq!(find_memory_type(&props, 0b111, vk::MemoryPropertyFlags::DEVICE_LOCAL).unwrap(), 0);
        assert!(matches!(
            find_memory_type(&props, 0b011, host),
            Err(VulkanError::NoSuitableMemoryType)
        ));
    }
}
