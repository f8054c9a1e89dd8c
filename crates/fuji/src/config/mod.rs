//! Configuration system
//!
//! Settings are plain serde structs that can be read from and written to TOML
//! or RON files. The format is picked from the file extension.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration from an in-memory string
    fn from_str_with_format(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Serialize configuration to a string
    fn to_string_with_format(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string())),
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_with_format(ConfigFormat::from_path(path)?)?;
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

/// Frame loop timing and clear settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// How long to wait for the previous frame's fence before giving up
    pub fence_timeout_ns: u64,
    /// Timeout handed to swapchain image acquisition, `None` waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquire_timeout_ns: Option<u64>,
    /// Clear colour for the single colour attachment
    pub clear_color: [f32; 4],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fence_timeout_ns: 5_000_000_000,
            acquire_timeout_ns: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl FrameConfig {
    /// Acquisition timeout as handed to the swapchain
    pub fn acquire_timeout(&self) -> u64 {
        self.acquire_timeout_ns.unwrap_or(u64::MAX)
    }
}

impl Config for FrameConfig {}

/// Locations of the compiled SPIR-V blobs for a vertex + fragment flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: PathBuf,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: PathBuf,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::new("shaders/vert.spv", "shaders/frag.spv")
    }
}

impl Config for ShaderConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("frame.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("frame.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("frame.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_frame_config_partial_toml_uses_defaults() {
        let config = FrameConfig::from_str_with_format("fence_timeout_ns = 1000\n", ConfigFormat::Toml).unwrap();
        assert_eq!(config.fence_timeout_ns, 1000);
        assert_eq!(config.acquire_timeout_ns, None);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shader_config_ron() {
        let source = r#"(vertex_shader_path: "a.vert.spv", fragment_shader_path: "a.frag.spv")"#;
        let config = ShaderConfig::from_str_with_format(source, ConfigFormat::Ron).unwrap();
        assert_eq!(config, ShaderConfig::new("a.vert.spv", "a.frag.spv"));
    }

    #[test]
    fn test_parse_error() {
        let result = FrameConfig::from_str_with_format("fence_timeout_ns = \"soon\"", ConfigFormat::Toml);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("fuji-frame-{}.toml", std::process::id()));
        let config = FrameConfig { clear_color: [0.1, 0.2, 0.3, 1.0], ..FrameConfig::default() };

        config.save_to_file(&path).unwrap();
        let loaded = FrameConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
