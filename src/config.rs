// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! Configuration file support for ferro-varmap.
//!
//! # Example Configuration
//!
//! ```toml
//! build = "auto"
//!
//! [build-detection]
//! min-sample = 10
//! max-sample = 100
//! threshold = 75.0
//! seed = 42
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-varmap.toml` in current directory
//! 2. `~/.config/ferro/varmap.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::VarmapError;
use crate::resolve::build::BuildOption;

/// Build detection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildDetectionConfig {
    /// Fewer valid genomic inputs than this skips detection.
    pub min_sample: usize,
    /// Upper bound on the number of inputs sampled.
    pub max_sample: usize,
    /// Match percentage a build must exceed to be selected.
    pub threshold: f64,
    /// Seed for the sampling RNG; random when absent.
    pub seed: Option<u64>,
}

impl Default for BuildDetectionConfig {
    fn default() -> Self {
        Self {
            min_sample: 10,
            max_sample: 100,
            threshold: 75.0,
            seed: None,
        }
    }
}

impl BuildDetectionConfig {
    fn validate(&self) -> Result<(), VarmapError> {
        if self.max_sample == 0 {
            return Err(VarmapError::InvalidConfig {
                msg: "max-sample must be greater than zero".to_string(),
            });
        }
        if self.min_sample > self.max_sample {
            return Err(VarmapError::InvalidConfig {
                msg: format!(
                    "min-sample ({}) must not exceed max-sample ({})",
                    self.min_sample, self.max_sample
                ),
            });
        }
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(VarmapError::InvalidConfig {
                msg: format!("threshold must be between 0 and 100, got {}", self.threshold),
            });
        }
        Ok(())
    }
}

/// Processor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProcessorConfig {
    /// How the batch's genome build is chosen.
    pub build: BuildOption,
    /// Build detection tuning.
    pub build_detection: BuildDetectionConfig,
}

impl ProcessorConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the build option.
    pub fn with_build(mut self, build: BuildOption) -> Self {
        self.build = build;
        self
    }

    /// Set the minimum number of inputs for build detection.
    pub fn with_min_sample(mut self, min_sample: usize) -> Self {
        self.build_detection.min_sample = min_sample;
        self
    }

    /// Set the maximum number of inputs sampled for build detection.
    pub fn with_max_sample(mut self, max_sample: usize) -> Self {
        self.build_detection.max_sample = max_sample;
        self
    }

    /// Set the build detection threshold (percent).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.build_detection.threshold = threshold;
        self
    }

    /// Seed the build detection sampler.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.build_detection.seed = Some(seed);
        self
    }

    /// Load configuration from the default locations.
    ///
    /// Returns `Ok(None)` when no configuration file exists. A file that
    /// exists but does not parse is an error.
    pub fn load() -> Result<Option<Self>, VarmapError> {
        let cwd_config = PathBuf::from(".ferro-varmap.toml");
        if cwd_config.exists() {
            return Self::load_from_path(&cwd_config).map(Some);
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("varmap.toml");
            if home_config.exists() {
                return Self::load_from_path(&home_config).map(Some);
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, VarmapError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("loaded configuration from {}", path.display());
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, VarmapError> {
        let config: ProcessorConfig = toml::from_str(content)?;
        config.build_detection.validate()?;
        Ok(config)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
