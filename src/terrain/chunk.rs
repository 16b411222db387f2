//! Terrain chunk data

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::types::Vec3;
use crate::seed::ChunkSeed;
use crate::terrain::address::ChunkAddress;
use crate::terrain::biome::{BiomeConstraints, BiomeType};

/// Cells per side of a chunk grid
pub const CHUNK_SIZE: usize = 64;

/// Cells per chunk grid
pub const CHUNK_CELLS: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Row-major 64x64 grid of scalar samples, indexed `y * 64 + x`
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Grid(Vec<f32>);

impl Grid {
    /// Fill a grid by evaluating `f(x, y)` for every cell
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(CHUNK_CELLS);
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                values.push(f(x, y));
            }
        }
        Self(values)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.0[y * CHUNK_SIZE + x]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Smallest and largest sample
    pub fn min_max(&self) -> (f32, f32) {
        self.0
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Category of a placed feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Tree,
    Structure,
    Water,
    Rock,
    AgentHome,
}

impl FeatureKind {
    /// Classify a feature tag by substring, first match wins:
    /// tree, water/river, agent_home, rock/formation, otherwise structure.
    pub fn classify(tag: &str) -> Self {
        if tag.contains("tree") {
            FeatureKind::Tree
        } else if tag.contains("water") || tag.contains("river") {
            FeatureKind::Water
        } else if tag.contains("agent_home") {
            FeatureKind::AgentHome
        } else if tag.contains("rock") || tag.contains("formation") {
            FeatureKind::Rock
        } else {
            FeatureKind::Structure
        }
    }
}

/// One placed feature
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChunkFeature {
    pub kind: FeatureKind,
    /// Chunk-local cell `(x, y)` and the terrain height there as `z`
    pub position: Vec3,
    /// Feature tag from the biome table
    pub variant: &'static str,
    /// Sub-seed `<chunk seed>_<index>` for feature-local randomness
    pub seed: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// A generated chunk. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct TerrainChunk {
    pub address: ChunkAddress,
    pub seed: ChunkSeed,
    pub biome: BiomeType,
    pub constraints: &'static BiomeConstraints,
    pub heightmap: Grid,
    pub moisture: Grid,
    pub temperature: Grid,
    pub features: Vec<ChunkFeature>,
    /// Build time, milliseconds since the Unix epoch
    pub generated_at_ms: u64,
    /// Set on the copy held by the cache
    pub cached: bool,
}

impl TerrainChunk {
    /// Compare everything derived from the address, ignoring build time and
    /// the cached flag
    pub fn same_content(&self, other: &Self) -> bool {
        self.address == other.address
            && self.seed == other.seed
            && self.biome == other.biome
            && self.heightmap == other.heightmap
            && self.moisture == other.moisture
            && self.temperature == other.temperature
            && self.features == other.features
    }
}
