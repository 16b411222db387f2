//! Procedural terrain: addresses, biomes and chunk generation

pub mod address;
pub use address::{ChunkAddress, PathStep, N_FACES, SUBDIVISIONS};

pub mod biome;
pub use biome::{
    blend_biome_constraints, is_feature_valid, BiomeConstraints, BiomeType, ValueRange,
    PLACEHOLDER_FEATURES,
};

pub mod chunk;
pub use chunk::{ChunkFeature, FeatureKind, Grid, TerrainChunk, CHUNK_CELLS, CHUNK_SIZE};

pub mod generator;
pub use generator::{build_chunk, ChunkGenerator};

pub mod agent;
pub use agent::AgentHome;
