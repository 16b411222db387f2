//! Seeded chunk generation
//!
//! A chunk is a pure function of its address: the address yields a seed via
//! the hash chain, the seed drives three fBm grids remapped into the biome's
//! ranges, and seeded draws place features. The generator memoizes results in
//! an LRU cache it owns.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{BiomeInheritance, WorldConfig};
use crate::core::Result;
use crate::core::types::Vec3;
use crate::seed::{generate_chunk_seed, seeded_choice, seeded_random_int, NoiseField};
use crate::streaming::cache::{CacheStats, ChunkCache};

use super::address::ChunkAddress;
use super::biome::{BiomeConstraints, BiomeType, ValueRange};
use super::chunk::{ChunkFeature, FeatureKind, Grid, TerrainChunk, CHUNK_SIZE};

/// Features placed at full vegetation density
pub const BASE_FEATURE_COUNT: f64 = 50.0;

/// Octaves and persistence for one grid layer
#[derive(Clone, Copy, Debug)]
struct Layer {
    salt: &'static str,
    octaves: u32,
    persistence: f64,
}

const HEIGHT_LAYER: Layer = Layer { salt: "", octaves: 6, persistence: 0.5 };
const MOISTURE_LAYER: Layer = Layer { salt: "_moisture", octaves: 4, persistence: 0.6 };
const TEMPERATURE_LAYER: Layer = Layer { salt: "_temp", octaves: 3, persistence: 0.7 };

/// Fill one 64x64 grid from fBm noise, remapped from `[-1, 1]` into `range`
fn generate_grid(seed: &str, layer: Layer, range: &ValueRange) -> Grid {
    let mut field = NoiseField::new(format!("{}{}", seed, layer.salt));
    let size = CHUNK_SIZE as f64;
    Grid::from_fn(|x, y| {
        let n = field.fbm(x as f64 / size, y as f64 / size, layer.octaves, layer.persistence);
        range.map_signed(n) as f32
    })
}

/// Place `floor(50 * vegetation_density)` features at seeded cells
fn generate_features(seed: &str, constraints: &BiomeConstraints, heightmap: &Grid) -> Vec<ChunkFeature> {
    let candidates = constraints.placeable_features();
    if candidates.is_empty() {
        return Vec::new();
    }

    let count = (BASE_FEATURE_COUNT * constraints.vegetation_density).floor() as i64;
    let max_cell = CHUNK_SIZE as i64 - 1;

    (0..count)
        .filter_map(|i| {
            let x = seeded_random_int(seed, 0, max_cell, i * 3);
            let y = seeded_random_int(seed, 0, max_cell, i * 3 + 1);
            let z = heightmap.get(x as usize, y as usize);
            let variant = *seeded_choice(seed, &candidates, i)?;

            Some(ChunkFeature {
                kind: FeatureKind::classify(variant),
                position: Vec3::new(x as f32, y as f32, z),
                variant,
                seed: format!("{}_{}", seed, i),
                metadata: BTreeMap::new(),
            })
        })
        .collect()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Build a chunk for `address` in `biome` without touching any cache
pub fn build_chunk(address: &ChunkAddress, biome: BiomeType) -> TerrainChunk {
    let seed = generate_chunk_seed(address);
    let constraints = biome.constraints();

    let heightmap = generate_grid(&seed.hash, HEIGHT_LAYER, &constraints.elevation_range);
    let moisture = generate_grid(&seed.hash, MOISTURE_LAYER, &constraints.moisture_range);
    let temperature = generate_grid(&seed.hash, TEMPERATURE_LAYER, &constraints.temperature_range);
    let features = generate_features(&seed.hash, constraints, &heightmap);

    TerrainChunk {
        address: address.clone(),
        seed,
        biome,
        constraints,
        heightmap,
        moisture,
        temperature,
        features,
        generated_at_ms: now_ms(),
        cached: false,
    }
}

/// Chunk generation service with its own LRU cache.
///
/// Safe to share across threads: the cache sits behind a mutex that is never
/// held while a chunk is being built, so concurrent misses on one address
/// both build it and the last insert wins. Content is identical either way.
pub struct ChunkGenerator {
    cache: Mutex<ChunkCache>,
    inheritance: BiomeInheritance,
}

impl ChunkGenerator {
    pub fn new(max_chunks: usize, inheritance: BiomeInheritance) -> Result<Self> {
        Ok(Self {
            cache: Mutex::new(ChunkCache::new(max_chunks)?),
            inheritance,
        })
    }

    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        Self::new(config.cache.max_chunks, config.generation.biome_inheritance)
    }

    fn cache(&self) -> MutexGuard<'_, ChunkCache> {
        // The cache holds no invariant a panicking holder could break halfway
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the chunk at `address`, generating and caching it on a miss.
    ///
    /// `parent_biome` overrides biome resolution when the caller already knows
    /// the enclosing region's biome.
    pub fn generate_chunk(
        &self,
        address: &ChunkAddress,
        parent_biome: Option<BiomeType>,
    ) -> Arc<TerrainChunk> {
        if let Some(chunk) = self.cache().get(address) {
            return chunk;
        }

        let biome = parent_biome.unwrap_or_else(|| self.resolve_biome(address));
        let chunk = build_chunk(address, biome);
        log::debug!(
            "Generated chunk {} ({}, {} features)",
            address,
            biome,
            chunk.features.len()
        );

        let fresh = Arc::new(chunk.clone());
        self.cache().insert(chunk);
        fresh
    }

    /// Biome for a chunk with no caller-supplied parent biome
    fn resolve_biome(&self, address: &ChunkAddress) -> BiomeType {
        if address.is_root() {
            return BiomeType::for_root_triangle(address.triangle_id());
        }
        match self.inheritance {
            BiomeInheritance::Fixed => BiomeType::DEFAULT_CHILD,
            BiomeInheritance::Parent => self
                .get_parent_chunk(address)
                .map_or(BiomeType::DEFAULT_CHILD, |parent| parent.biome),
        }
    }

    /// Chunk one level up, generating it if needed. `None` at the root.
    pub fn get_parent_chunk(&self, address: &ChunkAddress) -> Option<Arc<TerrainChunk>> {
        let parent = address.parent()?;
        Some(self.generate_chunk(&parent, None))
    }

    pub fn is_cached(&self, address: &ChunkAddress) -> bool {
        self.cache().contains(address)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    pub fn inheritance(&self) -> BiomeInheritance {
        self.inheritance
    }
}
