//! Error types for the terrain engine

use thiserror::Error;

/// Main error type for the terrain engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed chunk address {input:?}: {reason}")]
    MalformedAddress { input: String, reason: String },

    #[error("triangle id {triangle_id} out of range (must be < {max})")]
    TriangleOutOfRange { triangle_id: u64, max: u32 },

    #[error("path step ({x}, {y}) out of range (must be < {max})")]
    PathStepOutOfRange { x: u32, y: u32, max: u32 },

    #[error("address depth {depth} does not match path length {path_len}")]
    DepthMismatch { depth: u32, path_len: usize },

    #[error("unknown biome: {0}")]
    UnknownBiome(String),

    #[error("cache capacity must be greater than zero")]
    InvalidCacheCapacity,

    #[error("address {address} is at depth {depth}, expected {expected}")]
    UnexpectedDepth { address: String, depth: u32, expected: u32 },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
