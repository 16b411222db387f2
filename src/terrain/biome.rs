//! Biome rule table
//!
//! Each of the 13 biomes carries fixed constraints: which feature tags may be
//! placed, and the numeric ranges its elevation, moisture and temperature
//! grids are mapped into. The table is closed; an unknown biome name can only
//! come from parsing and is rejected there.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Feature tags that mark reserved spots rather than placeable features
pub const PLACEHOLDER_FEATURES: [&str; 2] = ["agent_home", "clearing"];

/// Biome types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiomeType {
    TropicalRainforest,
    TemperateForest,
    BorealTaiga,
    Tundra,
    DesertHot,
    DesertCold,
    Savanna,
    Grassland,
    Mediterranean,
    Mountain,
    IceSheet,
    Wetland,
    Ocean,
}

impl BiomeType {
    /// Every biome, in table order
    pub const ALL: [BiomeType; 13] = [
        BiomeType::TropicalRainforest,
        BiomeType::TemperateForest,
        BiomeType::BorealTaiga,
        BiomeType::Tundra,
        BiomeType::DesertHot,
        BiomeType::DesertCold,
        BiomeType::Savanna,
        BiomeType::Grassland,
        BiomeType::Mediterranean,
        BiomeType::Mountain,
        BiomeType::IceSheet,
        BiomeType::Wetland,
        BiomeType::Ocean,
    ];

    /// Biomes a depth-0 chunk may start as, indexed by `triangle_id % 10`.
    /// Ocean, ice sheet and cold desert never appear at the root.
    pub const ROOT_CANDIDATES: [BiomeType; 10] = [
        BiomeType::TropicalRainforest,
        BiomeType::TemperateForest,
        BiomeType::BorealTaiga,
        BiomeType::Tundra,
        BiomeType::DesertHot,
        BiomeType::Savanna,
        BiomeType::Grassland,
        BiomeType::Mediterranean,
        BiomeType::Mountain,
        BiomeType::Wetland,
    ];

    /// Biome used below the root when nothing better is known
    pub const DEFAULT_CHILD: BiomeType = BiomeType::TemperateForest;

    /// Root biome for a base face
    pub fn for_root_triangle(triangle_id: u32) -> Self {
        Self::ROOT_CANDIDATES[triangle_id as usize % Self::ROOT_CANDIDATES.len()]
    }

    /// Canonical upper-snake name
    pub fn name(self) -> &'static str {
        match self {
            BiomeType::TropicalRainforest => "TROPICAL_RAINFOREST",
            BiomeType::TemperateForest => "TEMPERATE_FOREST",
            BiomeType::BorealTaiga => "BOREAL_TAIGA",
            BiomeType::Tundra => "TUNDRA",
            BiomeType::DesertHot => "DESERT_HOT",
            BiomeType::DesertCold => "DESERT_COLD",
            BiomeType::Savanna => "SAVANNA",
            BiomeType::Grassland => "GRASSLAND",
            BiomeType::Mediterranean => "MEDITERRANEAN",
            BiomeType::Mountain => "MOUNTAIN",
            BiomeType::IceSheet => "ICE_SHEET",
            BiomeType::Wetland => "WETLAND",
            BiomeType::Ocean => "OCEAN",
        }
    }

    /// Constraints from the static rule table
    pub fn constraints(self) -> &'static BiomeConstraints {
        &BIOME_RULES[self as usize]
    }

    /// Base surface color (linear RGB) before elevation/moisture shading
    pub fn base_color(self) -> [f32; 3] {
        match self {
            BiomeType::TropicalRainforest => [0.1, 0.35, 0.1],
            BiomeType::TemperateForest => [0.18, 0.35, 0.15],
            BiomeType::BorealTaiga => [0.1, 0.3, 0.1],
            BiomeType::Tundra => [0.55, 0.67, 0.56],
            BiomeType::DesertHot => [0.76, 0.7, 0.5],
            BiomeType::DesertCold => [0.63, 0.63, 0.5],
            BiomeType::Savanna => [0.74, 0.72, 0.42],
            BiomeType::Grassland => [0.6, 0.8, 0.2],
            BiomeType::Mediterranean => [0.42, 0.56, 0.14],
            BiomeType::Mountain => [0.41, 0.41, 0.41],
            BiomeType::IceSheet => [0.94, 0.97, 1.0],
            BiomeType::Wetland => [0.18, 0.31, 0.31],
            BiomeType::Ocean => [0.0, 0.27, 0.55],
        }
    }
}

impl fmt::Display for BiomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BiomeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| Error::UnknownBiome(s.to_string()))
    }
}

/// Closed interval `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map `t` in `[0, 1]` onto the range
    pub fn at(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }

    /// Map noise in `[-1, 1]` onto the range
    pub fn map_signed(&self, n: f64) -> f64 {
        self.at((n + 1.0) * 0.5)
    }

    /// Component-wise `a * (1 - w) + b * w`
    pub fn lerp(a: &Self, b: &Self, w: f64) -> Self {
        Self {
            min: a.min * (1.0 - w) + b.min * w,
            max: a.max * (1.0 - w) + b.max * w,
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Containment for values stored as `f32`. Bounds are rounded the same way
    /// the stored value was, so rounding never pushes a value outside.
    pub fn contains_f32(&self, v: f32) -> bool {
        v >= self.min as f32 && v <= self.max as f32
    }
}

/// Fixed policy for one biome
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BiomeConstraints {
    pub biome_type: BiomeType,
    pub valid_features: Vec<&'static str>,
    pub elevation_range: ValueRange,
    pub moisture_range: ValueRange,
    /// Degrees Celsius
    pub temperature_range: ValueRange,
    /// 0-1
    pub vegetation_density: f64,
    pub allow_water: bool,
    pub allow_structures: bool,
}

impl BiomeConstraints {
    /// Valid features minus placeholder tags, in table order
    pub fn placeable_features(&self) -> Vec<&'static str> {
        self.valid_features
            .iter()
            .copied()
            .filter(|f| !PLACEHOLDER_FEATURES.contains(f))
            .collect()
    }
}

/// Whether `feature` may appear in `biome`
pub fn is_feature_valid(biome: BiomeType, feature: &str) -> bool {
    biome.constraints().valid_features.contains(&feature)
}

/// Blend two biomes' constraints for a transition zone.
///
/// `weight` 0 is all `a`, 1 is all `b` (clamped). Numeric ranges and density
/// interpolate linearly, features are the union (order of first appearance),
/// water is allowed if either side allows it, structures only if both do.
/// The resulting type is `a` below 0.5 and `b` from 0.5 up.
pub fn blend_biome_constraints(a: BiomeType, b: BiomeType, weight: f64) -> BiomeConstraints {
    let w = weight.clamp(0.0, 1.0);
    let ca = a.constraints();
    let cb = b.constraints();

    let mut valid_features = ca.valid_features.clone();
    for feature in &cb.valid_features {
        if !valid_features.contains(feature) {
            valid_features.push(feature);
        }
    }

    BiomeConstraints {
        biome_type: if w < 0.5 { a } else { b },
        valid_features,
        elevation_range: ValueRange::lerp(&ca.elevation_range, &cb.elevation_range, w),
        moisture_range: ValueRange::lerp(&ca.moisture_range, &cb.moisture_range, w),
        temperature_range: ValueRange::lerp(&ca.temperature_range, &cb.temperature_range, w),
        vegetation_density: ca.vegetation_density * (1.0 - w) + cb.vegetation_density * w,
        allow_water: ca.allow_water || cb.allow_water,
        allow_structures: ca.allow_structures && cb.allow_structures,
    }
}

#[allow(clippy::too_many_arguments)]
fn rule(
    biome_type: BiomeType,
    valid_features: &[&'static str],
    elevation: (f64, f64),
    moisture: (f64, f64),
    temperature: (f64, f64),
    vegetation_density: f64,
    allow_water: bool,
    allow_structures: bool,
) -> BiomeConstraints {
    BiomeConstraints {
        biome_type,
        valid_features: valid_features.to_vec(),
        elevation_range: ValueRange::new(elevation.0, elevation.1),
        moisture_range: ValueRange::new(moisture.0, moisture.1),
        temperature_range: ValueRange::new(temperature.0, temperature.1),
        vegetation_density,
        allow_water,
        allow_structures,
    }
}

/// Rule table indexed by `BiomeType as usize`
static BIOME_RULES: LazyLock<[BiomeConstraints; 13]> = LazyLock::new(|| {
    use BiomeType::*;
    [
        rule(
            TropicalRainforest,
            &[
                "tropical_tree", "palm_tree", "giant_tree", "jungle_vine", "river",
                "waterfall", "clearing", "jungle_floor", "canopy", "agent_home",
            ],
            (0.0, 500.0), (0.7, 1.0), (24.0, 32.0), 0.9, true, true,
        ),
        rule(
            TemperateForest,
            &[
                "oak_tree", "maple_tree", "birch_tree", "pine_tree", "stream", "glade",
                "forest_path", "fallen_log", "agent_home",
            ],
            (0.0, 800.0), (0.4, 0.8), (8.0, 20.0), 0.7, true, true,
        ),
        rule(
            BorealTaiga,
            &["spruce_tree", "fir_tree", "frozen_lake", "snow_patch", "rocky_ground", "agent_home"],
            (0.0, 600.0), (0.3, 0.6), (-15.0, 5.0), 0.5, true, true,
        ),
        rule(
            Tundra,
            &["shrub", "permafrost", "rock", "ice_patch", "low_plant", "agent_home"],
            (0.0, 400.0), (0.2, 0.4), (-30.0, 0.0), 0.2, true, true,
        ),
        rule(
            DesertHot,
            &[
                "cactus", "joshua_tree", "desert_palm", "sand_dune", "rock_formation", "oasis",
                "agent_home",
            ],
            (0.0, 600.0), (0.0, 0.2), (30.0, 50.0), 0.1, false, true,
        ),
        rule(
            DesertCold,
            &["shrub", "sage", "rock_outcrop", "gravel_plain", "agent_home"],
            (200.0, 1200.0), (0.0, 0.2), (-20.0, 15.0), 0.05, false, true,
        ),
        rule(
            Savanna,
            &["acacia_tree", "baobab_tree", "tall_grass", "watering_hole", "rock_outcrop", "agent_home"],
            (0.0, 500.0), (0.2, 0.5), (20.0, 35.0), 0.3, true, true,
        ),
        rule(
            Grassland,
            &[
                "grass_tree", "tall_grass", "rolling_hill", "scattered_tree", "wildflower_patch",
                "agent_home",
            ],
            (0.0, 400.0), (0.3, 0.6), (10.0, 25.0), 0.4, true, true,
        ),
        rule(
            Mediterranean,
            &[
                "olive_tree", "cypress_tree", "cork_oak", "scrubland", "rocky_terrain",
                "coastal_cliff", "agent_home",
            ],
            (0.0, 600.0), (0.3, 0.5), (12.0, 28.0), 0.5, true, true,
        ),
        rule(
            Mountain,
            &[
                "alpine_pine", "alpine_fir", "cliff_face", "rocky_peak", "alpine_meadow",
                "snow_cap", "agent_home",
            ],
            (800.0, 3000.0), (0.3, 0.7), (-20.0, 10.0), 0.3, true, true,
        ),
        rule(
            IceSheet,
            &["ice_field", "crevasse", "frozen_lake", "ice_formation", "agent_home"],
            (0.0, 200.0), (0.8, 1.0), (-60.0, -20.0), 0.0, true, false,
        ),
        rule(
            Wetland,
            &[
                "mangrove", "cypress_swamp", "willow_tree", "marsh", "standing_water", "mud_flat",
                "agent_home",
            ],
            (0.0, 50.0), (0.8, 1.0), (15.0, 30.0), 0.7, true, true,
        ),
        rule(
            Ocean,
            &["wave", "reef", "deep_trench", "seamount"],
            (-1000.0, 0.0), (1.0, 1.0), (2.0, 30.0), 0.0, true, false,
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for biome in BiomeType::ALL {
            assert_eq!(biome.constraints().biome_type, biome);
        }
    }

    #[test]
    fn test_ranges_are_ordered() {
        for biome in BiomeType::ALL {
            let c = biome.constraints();
            assert!(c.elevation_range.min <= c.elevation_range.max);
            assert!(c.moisture_range.min <= c.moisture_range.max);
            assert!(c.temperature_range.min <= c.temperature_range.max);
            assert!((0.0..=1.0).contains(&c.vegetation_density));
        }
    }

    #[test]
    fn test_ocean_has_no_structures_or_vegetation() {
        let ocean = BiomeType::Ocean.constraints();
        assert!(!ocean.allow_structures);
        assert_eq!(ocean.vegetation_density, 0.0);
        assert!(ocean.allow_water);
    }

    #[test]
    fn test_root_candidates_exclude_extremes() {
        for excluded in [BiomeType::Ocean, BiomeType::IceSheet, BiomeType::DesertCold] {
            assert!(!BiomeType::ROOT_CANDIDATES.contains(&excluded));
        }
        assert_eq!(BiomeType::for_root_triangle(0), BiomeType::TropicalRainforest);
        assert_eq!(BiomeType::for_root_triangle(9), BiomeType::Wetland);
        assert_eq!(BiomeType::for_root_triangle(42), BiomeType::BorealTaiga);
    }

    #[test]
    fn test_is_feature_valid() {
        assert!(is_feature_valid(BiomeType::TemperateForest, "oak_tree"));
        assert!(is_feature_valid(BiomeType::Ocean, "reef"));
        assert!(!is_feature_valid(BiomeType::Ocean, "agent_home"));
        assert!(!is_feature_valid(BiomeType::DesertHot, "oak_tree"));
    }

    #[test]
    fn test_placeable_features_drop_placeholders() {
        let features = BiomeType::TropicalRainforest.constraints().placeable_features();
        assert!(!features.contains(&"agent_home"));
        assert!(!features.contains(&"clearing"));
        assert_eq!(features.len(), 8);
        assert_eq!(features[0], "tropical_tree");
    }

    #[test]
    fn test_name_roundtrip() {
        for biome in BiomeType::ALL {
            assert_eq!(biome.name().parse::<BiomeType>().unwrap(), biome);
            assert_eq!(biome.to_string(), biome.name());
        }
    }

    #[test]
    fn test_unknown_biome_rejected() {
        assert!(matches!("SWAMPLAND".parse::<BiomeType>(), Err(Error::UnknownBiome(_))));
        assert!("ocean".parse::<BiomeType>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BiomeType::BorealTaiga).unwrap();
        assert_eq!(json, "\"BOREAL_TAIGA\"");
        let back: BiomeType = serde_json::from_str("\"ICE_SHEET\"").unwrap();
        assert_eq!(back, BiomeType::IceSheet);
    }

    #[test]
    fn test_blend_endpoints() {
        let at_a = blend_biome_constraints(BiomeType::Grassland, BiomeType::Mountain, 0.0);
        assert_eq!(at_a.biome_type, BiomeType::Grassland);
        assert_eq!(at_a.elevation_range, BiomeType::Grassland.constraints().elevation_range);

        let at_b = blend_biome_constraints(BiomeType::Grassland, BiomeType::Mountain, 1.0);
        assert_eq!(at_b.biome_type, BiomeType::Mountain);
        assert_eq!(at_b.elevation_range, BiomeType::Mountain.constraints().elevation_range);
        assert_eq!(at_b.vegetation_density, 0.3);
    }

    #[test]
    fn test_blend_midpoint() {
        let mid = blend_biome_constraints(BiomeType::Grassland, BiomeType::Mountain, 0.5);
        // Tie resolves to B
        assert_eq!(mid.biome_type, BiomeType::Mountain);
        assert_eq!(mid.elevation_range, ValueRange::new(400.0, 1700.0));
        assert!((mid.vegetation_density - 0.35).abs() < 1e-12);

        let below = blend_biome_constraints(BiomeType::Grassland, BiomeType::Mountain, 0.49);
        assert_eq!(below.biome_type, BiomeType::Grassland);
    }

    #[test]
    fn test_blend_flags() {
        let blended = blend_biome_constraints(BiomeType::DesertHot, BiomeType::Ocean, 0.3);
        // Ocean allows water, desert does not
        assert!(blended.allow_water);
        // Ocean forbids structures
        assert!(!blended.allow_structures);

        let both_dry = blend_biome_constraints(BiomeType::DesertHot, BiomeType::DesertCold, 0.5);
        assert!(!both_dry.allow_water);
        assert!(both_dry.allow_structures);
    }

    #[test]
    fn test_blend_feature_union() {
        let blended = blend_biome_constraints(BiomeType::Tundra, BiomeType::DesertCold, 0.2);
        // "shrub" and "agent_home" appear in both and are kept once
        assert_eq!(blended.valid_features.iter().filter(|f| **f == "shrub").count(), 1);
        assert_eq!(blended.valid_features.iter().filter(|f| **f == "agent_home").count(), 1);
        assert!(blended.valid_features.contains(&"permafrost"));
        assert!(blended.valid_features.contains(&"gravel_plain"));
        assert_eq!(blended.valid_features.len(), 6 + 5 - 2);
    }

    #[test]
    fn test_value_range_mapping() {
        let r = ValueRange::new(-10.0, 30.0);
        assert_eq!(r.map_signed(-1.0), -10.0);
        assert_eq!(r.map_signed(1.0), 30.0);
        assert_eq!(r.map_signed(0.0), 10.0);
        assert!(r.contains(0.0));
        assert!(!r.contains(31.0));
        assert!(r.contains_f32(30.0));
    }
}
