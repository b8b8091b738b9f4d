//! # World Configuration
//!
//! ```toml
//! seed = "glacier"      # or an integer
//! preset = "default"    # or "flat"
//! drops_path = "drops.toml"
//! pregen_radius = 4
//! workers = 4
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use veldt_procedural::WorldSeed;

use crate::error::{read_file, WorldError, WorldResult};

/// Largest accepted pre-generation radius, in chunks.
pub const MAX_PREGEN_RADIUS: u32 = 64;

/// Largest accepted worker count.
pub const MAX_WORKERS: usize = 256;

/// Which generator drives the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldPreset {
    /// Noise terrain with biomes, caves, villages and vegetation.
    #[default]
    Default,
    /// Bedrock, two dirt layers and grass.
    Flat,
}

/// A seed as written in a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedSpec {
    /// Used as-is.
    Number(i64),
    /// Parsed as an integer if possible, otherwise hashed.
    Text(String),
}

impl Default for SeedSpec {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl SeedSpec {
    /// Resolves to a world seed.
    #[must_use]
    pub fn to_seed(&self) -> WorldSeed {
        match self {
            Self::Number(value) => WorldSeed::new(*value),
            Self::Text(text) => WorldSeed::from_text(text),
        }
    }
}

/// Settings for opening a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: SeedSpec,
    /// Generator preset.
    pub preset: WorldPreset,
    /// Optional drop-table override file.
    pub drops_path: Option<PathBuf>,
    /// Chunks around spawn generated up front.
    pub pregen_radius: u32,
    /// Worker threads used for pre-generation.
    pub workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: SeedSpec::default(),
            preset: WorldPreset::Default,
            drops_path: None,
            pregen_radius: 2,
            workers: 4,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or out of range.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. A relative `drops_path` is resolved against the
    /// directory holding the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> WorldResult<Self> {
        let mut config = Self::from_toml_str(&read_file(path)?)?;
        if let (Some(drops), Some(dir)) = (config.drops_path.as_mut(), path.parent()) {
            if drops.is_relative() {
                *drops = dir.join(&*drops);
            }
        }
        tracing::info!(
            path = %path.display(),
            preset = ?config.preset,
            seed = config.world_seed().value(),
            "loaded world config"
        );
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> WorldResult<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(WorldError::InvalidConfig(format!(
                "workers must be between 1 and {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        if self.pregen_radius > MAX_PREGEN_RADIUS {
            return Err(WorldError::InvalidConfig(format!(
                "pregen_radius must be at most {MAX_PREGEN_RADIUS}, got {}",
                self.pregen_radius
            )));
        }
        Ok(())
    }

    /// The resolved world seed.
    #[must_use]
    pub fn world_seed(&self) -> WorldSeed {
        self.seed.to_seed()
    }
}
