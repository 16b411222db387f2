//! Chunk caching, visibility and LOD management

pub mod cache;
pub mod lod;
pub mod visibility;
pub mod view;

pub use cache::{CacheStats, ChunkCache};
pub use lod::{
    depth_from_altitude, visible_radius, LodManager, LodStats, ViewLevel, VisibleChunk,
    DEPTH_ALTITUDE_THRESHOLDS, MAX_DEPTH,
};
pub use visibility::{GridVisibility, VisibilityQuery};
pub use view::{TerrainView, ViewStats};
