use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dedup::PairOrder;
use crate::error::{Result, SweepError};
use crate::pipeline::PipelineOptions;

/// Root application configuration, loaded from `~/.config/vaultsweep/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Inserted before `.json` in the default output file name.
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "cleaned".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/vaultsweep/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("VAULTSWEEP_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("vaultsweep")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let suffix = self.output.suffix.as_str();
        if suffix.is_empty() || suffix.trim() != suffix || suffix.contains(['/', '\\']) {
            return Err(SweepError::Config(format!(
                "output.suffix must be a non-empty file name fragment, got {:?}",
                self.output.suffix
            )));
        }
        Ok(())
    }

    /// Flattened `key = value` view for `vaultsweep config list`.
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let pair_order = match self.pipeline.pair_order {
            PairOrder::Unordered => "unordered",
            PairOrder::Ordered => "ordered",
        };
        vec![
            ("pipeline.pair_order", pair_order.to_string()),
            (
                "pipeline.remove_merged",
                self.pipeline.remove_merged.to_string(),
            ),
            ("output.suffix", self.output.suffix.clone()),
        ]
    }
}
