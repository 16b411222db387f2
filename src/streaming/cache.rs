//! LRU cache for chunks
//!
//! Provides a bounded LRU (Least Recently Used) cache for generated chunks.
//! When the cache is full, the least recently accessed chunk is evicted
//! automatically. Hits and misses are counted for hit-rate reporting.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::core::{Error, Result};
use crate::terrain::{ChunkAddress, TerrainChunk};

/// Snapshot of cache occupancy and hit accounting
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0 when nothing has been looked up
    pub hit_rate: f64,
}

struct CacheEntry {
    chunk: Arc<TerrainChunk>,
    /// Value of the access counter at the last get/insert
    last_access: u64,
}

/// LRU cache for chunks
///
/// Recency is tracked with a monotonic access counter rather than wall-clock
/// time, so two accesses never tie and eviction order is deterministic.
pub struct ChunkCache {
    /// Map of chunk addresses to cached chunks
    entries: HashMap<ChunkAddress, CacheEntry>,
    /// Maximum number of chunks to keep in cache
    max_chunks: usize,
    /// Incremented on every access
    clock: u64,
    hits: u64,
    misses: u64,
}

impl ChunkCache {
    /// Create a new chunk cache with the given capacity
    ///
    /// # Arguments
    /// * `max_chunks` - Maximum number of chunks to keep in memory; must be > 0
    pub fn new(max_chunks: usize) -> Result<Self> {
        if max_chunks == 0 {
            return Err(Error::InvalidCacheCapacity);
        }
        Ok(Self {
            entries: HashMap::with_capacity(max_chunks),
            max_chunks,
            clock: 0,
            hits: 0,
            misses: 0,
        })
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Get a chunk by address
    ///
    /// A hit marks the chunk as recently used and counts a hit; a miss only
    /// counts a miss.
    pub fn get(&mut self, address: &ChunkAddress) -> Option<Arc<TerrainChunk>> {
        let now = self.tick();
        match self.entries.get_mut(address) {
            Some(entry) => {
                entry.last_access = now;
                self.hits += 1;
                Some(Arc::clone(&entry.chunk))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a chunk into the cache
    ///
    /// The stored copy is flagged `cached`. If the cache is at capacity and the
    /// address is new, the least recently used chunk is evicted first. If a
    /// chunk with the same address already exists, it is replaced.
    ///
    /// # Returns
    /// The evicted chunk if one was removed to make space, or the replaced chunk if it existed
    pub fn insert(&mut self, mut chunk: TerrainChunk) -> Option<Arc<TerrainChunk>> {
        chunk.cached = true;
        let address = chunk.address.clone();

        let evicted = if self.entries.len() >= self.max_chunks && !self.entries.contains_key(&address) {
            self.evict_oldest()
        } else {
            None
        };

        let entry = CacheEntry {
            chunk: Arc::new(chunk),
            last_access: self.tick(),
        };
        let replaced = self.entries.insert(address, entry).map(|e| e.chunk);

        evicted.or(replaced)
    }

    /// Check if the cache contains a chunk. Does not touch recency or stats.
    pub fn contains(&self, address: &ChunkAddress) -> bool {
        self.entries.contains_key(address)
    }

    /// Remove a chunk from the cache
    pub fn remove(&mut self, address: &ChunkAddress) -> Option<Arc<TerrainChunk>> {
        self.entries.remove(address).map(|e| e.chunk)
    }

    /// Evict the least recently used chunk
    pub fn evict_oldest(&mut self) -> Option<Arc<TerrainChunk>> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(address, _)| address.clone())?;

        log::debug!("Evicting chunk {} from cache", oldest);
        self.remove(&oldest)
    }

    /// Drop every chunk and reset hit accounting
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Get the number of chunks in the cache
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_chunks
    }

    /// Get an iterator over all cached addresses
    pub fn addresses(&self) -> impl Iterator<Item = &ChunkAddress> {
        self.entries.keys()
    }

    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_chunks,
            hits: self.hits,
            misses: self.misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                self.hits as f64 / lookups as f64
            },
        }
    }
}
