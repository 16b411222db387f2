//! World configuration loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::streaming::lod::{DEPTH_ALTITUDE_THRESHOLDS, MAX_DEPTH};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full configuration for a terrain session. Every section falls back to its
/// defaults when missing from the file, so `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk cache sizing.
    pub cache: CacheConfig,
    /// Depth selection and transition behaviour.
    pub lod: LodConfig,
    /// Chunk generation policy.
    pub generation: GenerationConfig,
    /// Camera zoom commands.
    pub zoom: ZoomConfig,
}

impl WorldConfig {
    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_chunks == 0 {
            return Err(Error::InvalidCacheCapacity);
        }
        self.lod.validate()?;
        self.zoom.validate()
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync) and validate
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Chunk cache sizing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of chunks held before LRU eviction kicks in
    pub max_chunks: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_chunks: 1000 }
    }
}

/// Depth selection and transition behaviour for the LOD manager
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Altitude above which depth `i` is chosen. Must be strictly decreasing;
    /// anything at or below the last threshold maps to the deepest level.
    pub altitude_thresholds: [f32; MAX_DEPTH as usize],
    /// Transition progress gained per second while current != target depth
    pub transition_rate: f32,
    /// Tracked chunks farther than `radius * eviction_factor` are dropped
    pub eviction_factor: f32,
    /// Visible radius per unit of altitude
    pub radius_scale: f32,
    /// Lower bound for the visible radius
    pub min_radius: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            altitude_thresholds: DEPTH_ALTITUDE_THRESHOLDS,
            transition_rate: 2.0,
            eviction_factor: 1.5,
            radius_scale: 0.5,
            min_radius: 1.0,
        }
    }
}

impl LodConfig {
    fn validate(&self) -> Result<()> {
        if self
            .altitude_thresholds
            .windows(2)
            .any(|pair| !(pair[0] > pair[1]))
        {
            return Err(Error::Config(format!(
                "lod.altitude_thresholds must be strictly decreasing, got {:?}",
                self.altitude_thresholds
            )));
        }
        if !(self.transition_rate > 0.0) {
            return Err(Error::Config("lod.transition_rate must be positive".into()));
        }
        if !(self.eviction_factor > 0.0) || !(self.min_radius > 0.0) || self.radius_scale < 0.0 {
            return Err(Error::Config(
                "lod radius parameters must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// How chunks below the root pick their biome when no parent biome is supplied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeInheritance {
    /// Every non-root chunk uses one fixed biome
    #[default]
    Fixed,
    /// Walk up to the parent chunk and reuse its resolved biome
    Parent,
}

/// Chunk generation policy
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub biome_inheritance: BiomeInheritance,
}

/// Altitude targets for the discrete zoom commands
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Altitude to fly to for each depth 0-6
    pub depth_altitudes: [f32; MAX_DEPTH as usize + 1],
    /// Multiplier applied to the target altitude by `zoom_in`
    pub zoom_in_factor: f32,
    /// Multiplier applied to the target altitude by `zoom_out`
    pub zoom_out_factor: f32,
    pub min_altitude: f32,
    pub max_altitude: f32,
    /// Fraction of the remaining altitude gap closed per second
    pub altitude_lerp_rate: f32,
    /// Altitude the camera starts at
    pub initial_altitude: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            depth_altitudes: [300.0, 180.0, 120.0, 75.0, 50.0, 32.0, 15.0],
            zoom_in_factor: 0.7,
            zoom_out_factor: 1.4,
            min_altitude: 10.0,
            max_altitude: 400.0,
            altitude_lerp_rate: 2.0,
            initial_altitude: 300.0,
        }
    }
}

impl ZoomConfig {
    fn validate(&self) -> Result<()> {
        if !(self.min_altitude >= 0.0) || !(self.max_altitude >= self.min_altitude) {
            return Err(Error::Config(format!(
                "zoom altitude bounds invalid: [{}, {}]",
                self.min_altitude, self.max_altitude
            )));
        }
        if !(self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0) {
            return Err(Error::Config("zoom.zoom_in_factor must be in (0, 1)".into()));
        }
        if !(self.zoom_out_factor > 1.0) {
            return Err(Error::Config("zoom.zoom_out_factor must be > 1".into()));
        }
        if !(self.altitude_lerp_rate > 0.0) {
            return Err(Error::Config("zoom.altitude_lerp_rate must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.max_chunks, 1000);
        assert_eq!(config.lod.transition_rate, 2.0);
        assert_eq!(config.generation.biome_inheritance, BiomeInheritance::Fixed);
        assert_eq!(config.zoom.depth_altitudes[6], 15.0);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: WorldConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config: WorldConfig = serde_json::from_str(
            r#"{ "cache": { "max_chunks": 16 }, "generation": { "biome_inheritance": "parent" } }"#,
        )
        .unwrap();
        assert_eq!(config.cache.max_chunks, 16);
        assert_eq!(config.generation.biome_inheritance, BiomeInheritance::Parent);
        assert_eq!(config.lod, LodConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = WorldConfig::default();
        config.cache.max_chunks = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidCacheCapacity)));
    }

    #[test]
    fn test_non_monotonic_thresholds_rejected() {
        let mut config = WorldConfig::default();
        config.lod.altitude_thresholds = [250.0, 150.0, 160.0, 60.0, 40.0, 25.0];
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_zoom_factor_rejected() {
        let mut config = WorldConfig::default();
        config.zoom.zoom_in_factor = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("world.json");

        let mut config = WorldConfig::default();
        config.cache.max_chunks = 64;
        config.lod.transition_rate = 4.0;
        config.save_sync(&path).unwrap();

        let loaded = WorldConfig::load_sync(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "cache": { "max_chunks": 0 } }"#).unwrap();
        assert!(matches!(
            WorldConfig::load_sync(&path),
            Err(Error::InvalidCacheCapacity)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WorldConfig::load_sync(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
