//! Hash-chain derivation of per-address seeds

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::terrain::address::ChunkAddress;

/// Root of the hash chain. Changing this value changes every world.
pub const GENESIS_SEED: &str =
    "aeebad4a8c7f2e1d9b5a3f6c4e7d2a1b8c5f3e6d9a2b7c4e1f8d3a6b9c2e5f7a4d";

/// Separator placed between hashed inputs
const SEPARATOR: &str = "||";

/// Seed of one chunk: the hash chain result plus the address it came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSeed {
    /// 64-char lowercase hex SHA-256 digest
    pub hash: String,
    pub depth: u32,
    pub address: ChunkAddress,
}

/// Raw SHA-256 of the `||`-joined decimal/string inputs
pub(crate) fn digest(parts: &[&dyn std::fmt::Display]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(SEPARATOR.as_bytes());
        }
        hasher.update(part.to_string().as_bytes());
    }
    hasher.finalize().into()
}

/// PS-SHA∞ hash: SHA-256 over the inputs joined with `||`, as lowercase hex
pub fn ps_sha_hash(parts: &[&dyn std::fmt::Display]) -> String {
    digest(parts).iter().map(|b| format!("{:02x}", b)).collect()
}

/// Derive a child seed from its parent and grid position.
///
/// `child = sha256("<parent>||<x>||<y>")`
pub fn derive_child_seed(parent_seed: &str, x: u32, y: u32) -> String {
    ps_sha_hash(&[&parent_seed, &x, &y])
}

/// Walk the address path from genesis, deriving each level in order
pub fn generate_chunk_seed(address: &ChunkAddress) -> ChunkSeed {
    let hash = address
        .path()
        .iter()
        .fold(GENESIS_SEED.to_string(), |seed, step| {
            derive_child_seed(&seed, step.x as u32, step.y as u32)
        });

    ChunkSeed {
        hash,
        depth: address.depth(),
        address: address.clone(),
    }
}

/// Re-derive a seed from its address and compare.
///
/// A mismatch means the genesis constant or digest changed between versions.
/// It is logged as a data-integrity warning; regenerating is always safe.
pub fn verify_seed(seed: &ChunkSeed) -> bool {
    let regenerated = generate_chunk_seed(&seed.address);
    let ok = regenerated.hash == seed.hash && regenerated.depth == seed.depth;
    if !ok {
        log::warn!(
            "Seed mismatch for {}: stored {}, derived {}",
            seed.address,
            seed.hash,
            regenerated.hash
        );
    }
    ok
}
