//! PS-SHA∞ seed derivation and seeded pseudo-random primitives
//!
//! Every random decision in the world flows from one compiled-in genesis
//! string. A chunk's seed is the hash chain over its address path, and all
//! per-cell randomness is a pure function of `(seed, index)`, so any chunk can
//! be regenerated byte-identically from its address alone.

pub mod hash;
pub mod random;
pub mod noise;

pub use hash::{
    ChunkSeed, GENESIS_SEED,
    derive_child_seed, generate_chunk_seed, verify_seed, ps_sha_hash,
};
pub use random::{seeded_random, seeded_random_int, seeded_choice};
pub use noise::{seeded_noise, fbm_noise, NoiseField};
