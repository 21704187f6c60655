//! Math utilities and types
//!
//! The overlay only needs 2D offsets and RGBA colors, both backed by nalgebra.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type, used for RGBA colors
pub type Vec4 = Vector4<f32>;

/// Convert an RGBA color vector into the array form written to GPU memory
pub fn color_to_array(color: &Vec4) -> [f32; 4] {
    [color.x, color.y, color.z, color.w]
}
