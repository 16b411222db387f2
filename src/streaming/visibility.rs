//! Which chunk addresses are in view
//!
//! The LOD manager asks a [`VisibilityQuery`] for the addresses to keep
//! resident. [`GridVisibility`] is a fixed-pattern stand-in; a real spatial
//! index can replace it without touching generation or caching.

use crate::core::camera::CameraState;
use crate::core::Result;
use crate::terrain::{ChunkAddress, PathStep, SUBDIVISIONS};

/// Source of the chunk addresses visible from a camera
pub trait VisibilityQuery: Send + Sync {
    fn addresses_in_view(&self, camera: &CameraState) -> Vec<ChunkAddress>;
}

/// Fixed 3x3 sample of the region under the camera.
///
/// At depth 0 the whole face is one chunk. Below that, each of the nine
/// addresses repeats the same grid cell at every level, picking cells at
/// thirds of the 64-wide grid (0, 21, 42).
#[derive(Clone, Debug)]
pub struct GridVisibility {
    root: ChunkAddress,
    grid_size: u32,
}

impl GridVisibility {
    pub const DEFAULT_GRID_SIZE: u32 = 3;

    pub fn new(triangle_id: u32) -> Result<Self> {
        Ok(Self {
            root: ChunkAddress::root(triangle_id)?,
            grid_size: Self::DEFAULT_GRID_SIZE,
        })
    }

    pub fn root(&self) -> &ChunkAddress {
        &self.root
    }

    /// Grid cell for sample `i` along one axis
    fn cell(&self, i: u32) -> u8 {
        (i * SUBDIVISIONS / self.grid_size) as u8
    }
}

impl Default for GridVisibility {
    fn default() -> Self {
        Self {
            root: ChunkAddress::default(),
            grid_size: Self::DEFAULT_GRID_SIZE,
        }
    }
}

impl VisibilityQuery for GridVisibility {
    fn addresses_in_view(&self, camera: &CameraState) -> Vec<ChunkAddress> {
        if camera.depth == 0 {
            return vec![self.root.clone()];
        }

        let mut addresses = Vec::with_capacity((self.grid_size * self.grid_size) as usize);
        for gx in 0..self.grid_size {
            for gy in 0..self.grid_size {
                let step = PathStep {
                    x: self.cell(gx),
                    y: self.cell(gy),
                };
                let address = (0..camera.depth).fold(self.root.clone(), |a, _| a.descend(step));
                addresses.push(address);
            }
        }
        addresses
    }
}
