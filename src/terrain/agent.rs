//! Agent residences pinned to ground-level chunks

use serde::Serialize;

use crate::core::types::Vec3;
use crate::core::{Error, Result};
use crate::streaming::lod::MAX_DEPTH;

use super::address::ChunkAddress;
use super::biome::BiomeType;

/// Where an agent lives. Homes only exist at the deepest (ground) level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentHome {
    pub agent_id: String,
    pub name: String,
    pub address: ChunkAddress,
    pub biome: BiomeType,
    /// Chunk-local position
    pub position: Vec3,
    /// Milliseconds since the Unix epoch
    pub birthdate_ms: u64,
    /// Canonical text form of `address`
    pub address_string: String,
}

impl AgentHome {
    /// Create a home, rejecting any address that is not at ground depth
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        address: ChunkAddress,
        biome: BiomeType,
        position: Vec3,
        birthdate_ms: u64,
    ) -> Result<Self> {
        if address.depth() != MAX_DEPTH {
            return Err(Error::UnexpectedDepth {
                address: address.to_string(),
                depth: address.depth(),
                expected: MAX_DEPTH,
            });
        }
        Ok(Self {
            agent_id: agent_id.into(),
            name: name.into(),
            address_string: address.to_string(),
            address,
            biome,
            position,
            birthdate_ms,
        })
    }
}
