//! Configuration system
//!
//! Overlay configuration loadable from TOML or RON files, with shader path
//! resolution for development layouts.

pub use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::overlay::uniform_stream::{DEFAULT_PARAMETER_STORE_SIZE, PARAMETER_BLOCK_SIZE};
use crate::overlay::glyph_atlas::{DEFAULT_GLYPH_STORE_SIZE, GLYPH_POINT_SIZE};
use crate::overlay::layout::ScaleFactor;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Shader Configuration
///
/// SPIR-V paths for the overlay's vertex and fragment stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: String,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// Tries the common output locations of the build script so the overlay
    /// works when run from the workspace root or a crate directory.
    pub fn with_path_resolution(base_vertex: &str, base_fragment: &str) -> Self {
        let shader_dirs = [
            "target/shaders/",
            "../../target/shaders/",
            "shaders/",
            "resources/shaders/",
            "./",
        ];

        let find = |file: &str| {
            shader_dirs
                .iter()
                .map(|dir| format!("{}{}", dir, file))
                .find(|candidate| Path::new(candidate).exists())
        };

        Self {
            vertex_shader_path: find(base_vertex).unwrap_or_else(|| format!("target/shaders/{}", base_vertex)),
            fragment_shader_path: find(base_fragment).unwrap_or_else(|| format!("target/shaders/{}", base_fragment)),
        }
    }

    /// Validate that shader files exist
    pub fn validate(&self) -> Result<(), String> {
        if !Path::new(&self.vertex_shader_path).exists() {
            return Err(format!("Vertex shader not found: {}", self.vertex_shader_path));
        }
        if !Path::new(&self.fragment_shader_path).exists() {
            return Err(format!("Fragment shader not found: {}", self.fragment_shader_path));
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("text_overlay_vert.spv", "text_overlay_frag.spv")
    }
}

/// # Overlay Configuration
///
/// Sizes of the device stores, initial text scale, default color and shader
/// locations for one overlay instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Bytes reserved for glyph point geometry
    pub glyph_store_size: u64,
    /// Bytes reserved for the parameter ring, a whole number of blocks
    pub parameter_store_size: u64,
    /// Scale applied until the first `set_scale` call
    pub initial_scale: f32,
    /// Color used by `print_text_default`
    pub default_color: [f32; 4],
    /// Fallback log filter for `foundation::logging::init_from_config`
    pub log_level: String,
    /// Shader locations
    pub shaders: ShaderConfig,
}

impl OverlayConfig {
    /// Create a configuration with the stock store sizes
    pub fn new() -> Self {
        Self {
            glyph_store_size: DEFAULT_GLYPH_STORE_SIZE,
            parameter_store_size: DEFAULT_PARAMETER_STORE_SIZE,
            initial_scale: 1.0,
            default_color: [0.3, 1.0, 0.3, 1.0],
            log_level: "info".to_string(),
            shaders: ShaderConfig::default(),
        }
    }

    /// Set the parameter ring size in blocks
    pub fn with_ring_slots(mut self, slots: u64) -> Self {
        self.parameter_store_size = slots * PARAMETER_BLOCK_SIZE;
        self
    }

    /// Set the glyph vertex store size in bytes
    pub fn with_glyph_store_size(mut self, bytes: u64) -> Self {
        self.glyph_store_size = bytes;
        self
    }

    /// Set the initial scale
    pub fn with_initial_scale(mut self, scale: f32) -> Self {
        self.initial_scale = scale;
        self
    }

    /// Set the default text color
    pub fn with_default_color(mut self, color: [f32; 4]) -> Self {
        self.default_color = color;
        self
    }

    /// Set custom shader configuration
    pub fn with_shaders(mut self, shaders: ShaderConfig) -> Self {
        self.shaders = shaders;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Number of parameter blocks in the ring
    pub fn ring_slots(&self) -> u64 {
        self.parameter_store_size / PARAMETER_BLOCK_SIZE
    }

    /// Validate the configuration
    ///
    /// Shader files are checked separately by the Vulkan backend, so a
    /// configuration can be validated on machines without compiled shaders.
    pub fn validate(&self) -> Result<(), String> {
        if self.parameter_store_size < PARAMETER_BLOCK_SIZE {
            return Err(format!(
                "Parameter store must hold at least one {}-byte block",
                PARAMETER_BLOCK_SIZE
            ));
        }

        if self.parameter_store_size % PARAMETER_BLOCK_SIZE != 0 {
            return Err(format!(
                "Parameter store size {} is not a multiple of {}",
                self.parameter_store_size, PARAMETER_BLOCK_SIZE
            ));
        }

        if self.ring_slots() > u64::from(u32::MAX) {
            return Err("Parameter ring has too many slots".to_string());
        }

        if self.glyph_store_size == 0 || self.glyph_store_size % GLYPH_POINT_SIZE != 0 {
            return Err(format!(
                "Glyph store size {} must be a non-zero multiple of {}",
                self.glyph_store_size, GLYPH_POINT_SIZE
            ));
        }

        if ScaleFactor::new(self.initial_scale).is_none() {
            return Err(format!("Initial scale {} must be positive", self.initial_scale));
        }

        if self.default_color.iter().any(|c| !c.is_finite()) {
            return Err("Default color must be finite".to_string());
        }

        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for OverlayConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("text_overlay_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_matches_stock_sizes() {
        let config = OverlayConfig::default();
        assert_eq!(config.glyph_store_size, 524_288);
        assert_eq!(config.parameter_store_size, 983_040);
        assert_eq!(config.ring_slots(), 120);
        assert_eq!(config.default_color, [0.3, 1.0, 0.3, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ring_size_validation() {
        let partial = OverlayConfig {
            parameter_store_size: PARAMETER_BLOCK_SIZE * 3 + 16,
            ..OverlayConfig::default()
        };
        assert!(partial.validate().is_err());

        let empty = OverlayConfig::default().with_ring_slots(0);
        assert!(empty.validate().is_err());

        let small = OverlayConfig::default().with_ring_slots(4);
        assert!(small.validate().is_ok());
        assert_eq!(small.ring_slots(), 4);
    }

    #[test]
    fn test_scale_and_glyph_store_validation() {
        assert!(OverlayConfig::default().with_initial_scale(0.0).validate().is_err());
        assert!(OverlayConfig::default().with_initial_scale(f32::NAN).validate().is_err());
        // Oversized scales are clamped at use, not rejected
        assert!(OverlayConfig::default().with_initial_scale(4.0).validate().is_ok());
        assert!(OverlayConfig::default().with_glyph_store_size(12).validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("config.toml");
        let config = OverlayConfig::default()
            .with_ring_slots(8)
            .with_default_color([1.0, 0.0, 0.0, 1.0])
            .with_shaders(ShaderConfig::new("a.spv", "b.spv"));

        config.save_to_file(&path).unwrap();
        let loaded = OverlayConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("config.ron");
        let config = OverlayConfig::default()
            .with_initial_scale(1.5)
            .with_log_level("debug")
            .with_shaders(ShaderConfig::new("v.spv", "f.spv"));

        config.save_to_file(&path).unwrap();
        let loaded = OverlayConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: OverlayConfig = toml::from_str("initial_scale = 2.0\n").unwrap();
        assert_eq!(parsed.initial_scale, 2.0);
        assert_eq!(parsed.parameter_store_size, DEFAULT_PARAMETER_STORE_SIZE);
    }

    #[test]
    fn test_unsupported_format() {
        let config = OverlayConfig::default();
        let result = config.save_to_file("overlay.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
