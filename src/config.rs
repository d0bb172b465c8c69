//! Configuration management for the pattern engine
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (contract-patterns.toml)
//! - Environment variables (CONTRACT_PATTERNS__*)
//!
//! ## Example config file (contract-patterns.toml):
//! ```toml
//! [matching]
//! mock_mode = false
//!
//! [generation]
//! use_default_examples = true
//! string_min_length = 5
//! max_list_items = 3
//!
//! [negative]
//! with_data_type_negatives = true
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::negative::NegativePatternConfiguration;
use crate::resolver::{
    DoNotUseDefaultExample, Resolver, UseDefaultExample, DEFAULT_MAX_LIST_ITEMS, DEFAULT_STRING_MIN_LENGTH,
};

/// Main configuration for the pattern engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Matching settings
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Value generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Negative generation settings
    #[serde(default)]
    pub negative: NegativeConfig,
}

/// Matching configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Relax required-key checks (stub loading)
    #[serde(default)]
    pub mock_mode: bool,
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generate declared schema examples instead of random values
    #[serde(default = "default_true")]
    pub use_default_examples: bool,

    /// Length of generated strings when the pattern sets no minimum
    #[serde(default = "default_string_min_length")]
    pub string_min_length: usize,

    /// Upper bound on generated list length
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,
}

/// Negative generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeConfig {
    /// Substitute values of other data types
    #[serde(default = "default_true")]
    pub with_data_type_negatives: bool,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_string_min_length() -> usize {
    DEFAULT_STRING_MIN_LENGTH
}

fn default_max_list_items() -> usize {
    DEFAULT_MAX_LIST_ITEMS
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            use_default_examples: true,
            string_min_length: default_string_min_length(),
            max_list_items: default_max_list_items(),
        }
    }
}

impl Default for NegativeConfig {
    fn default() -> Self {
        Self {
            with_data_type_negatives: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "contract-patterns.toml",
            ".contract-patterns.toml",
            "config/contract-patterns.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "contract", "contract-patterns") {
            let xdg_config = config_dir.config_dir().join("contract-patterns.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            debug!(path = %path.display(), "Loading engine configuration");
            builder = builder.add_source(File::from(path).required(true));
        }

        // Load from environment variables (CONTRACT_PATTERNS__*)
        builder = builder.add_source(
            Environment::with_prefix("CONTRACT_PATTERNS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// A resolver honouring these settings
    pub fn resolver(&self) -> Resolver {
        let resolver = Resolver::new()
            .with_mock_mode(self.matching.mock_mode)
            .with_generation_limits(self.generation.string_min_length, self.generation.max_list_items);
        if self.generation.use_default_examples {
            resolver.with_default_examples(Arc::new(UseDefaultExample))
        } else {
            resolver.with_default_examples(Arc::new(DoNotUseDefaultExample))
        }
    }

    pub fn negative_configuration(&self) -> NegativePatternConfiguration {
        NegativePatternConfiguration {
            with_data_type_negatives: self.negative.with_data_type_negatives,
        }
    }
}
