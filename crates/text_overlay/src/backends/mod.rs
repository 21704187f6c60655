//! Rendering backends for the overlay

pub mod vulkan;
