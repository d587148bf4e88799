//! Configuration handling for virtual views
//!
//! Supports loading configuration from TOML files; every field falls back to
//! its default when omitted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default display name of the virtual sequence
pub const DEFAULT_VIRTUAL_NAME: &str = "virt";

/// Default cap on windows produced by one materialization
pub const DEFAULT_MAX_WINDOWS: usize = 5000;

/// Settings applied to every [`crate::view::VirtualView`] built from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtConfig {
    /// Name under which virtual positions are displayed
    #[serde(default = "default_virtual_name")]
    pub virtual_name: String,

    /// Bases added on each side of every region before indexing
    #[serde(default)]
    pub pad_amount: u64,

    /// Maximum number of windows a single materialization may produce
    #[serde(default = "default_max_windows")]
    pub max_windows: usize,

    /// Present virtual positions as plain sequence positions when unambiguous
    #[serde(default = "default_true")]
    pub disguise: bool,

    /// Fall back to the nearest region when a real query overlaps nothing
    #[serde(default = "default_true")]
    pub nearest_fallback: bool,

    /// Pixel origin of the first window (width of the label gutter)
    #[serde(default)]
    pub label_width: u32,
}

fn default_virtual_name() -> String {
    DEFAULT_VIRTUAL_NAME.to_string()
}

fn default_max_windows() -> usize {
    DEFAULT_MAX_WINDOWS
}

fn default_true() -> bool {
    true
}

impl Default for VirtConfig {
    fn default() -> Self {
        Self {
            virtual_name: default_virtual_name(),
            pad_amount: 0,
            max_windows: default_max_windows(),
            disguise: true,
            nearest_fallback: true,
            label_width: 0,
        }
    }
}

impl VirtConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: VirtConfig =
            toml::from_str(content).context("Failed to parse virtual view configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        log::info!("Loading virtual view configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let name = self.virtual_name.as_str();
        if name.is_empty() || name.contains(':') || name.chars().any(char::is_whitespace) {
            anyhow::bail!("virtual_name must be a non-empty name without ':' or whitespace");
        }
        if self.max_windows == 0 {
            anyhow::bail!("max_windows must be at least 1");
        }
        Ok(())
    }
}
