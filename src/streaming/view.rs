//! Renderer-facing terrain view
//!
//! Bundles the zoom controller and the LOD manager behind the calls a frame
//! loop makes: `update` once per frame, zoom commands on user input, and
//! `stats` for on-screen telemetry.

use std::sync::Arc;

use serde::Serialize;

use crate::config::WorldConfig;
use crate::core::camera::CameraState;
use crate::core::camera_controller::ZoomController;
use crate::core::Result;
use crate::terrain::ChunkGenerator;

use super::lod::{LodManager, ViewLevel, VisibleChunk};
use super::visibility::VisibilityQuery;

/// Aggregated view telemetry
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewStats {
    pub current_depth: u32,
    pub target_depth: u32,
    pub transition_progress: f32,
    pub view_level: ViewLevel,
    pub altitude: f32,
    pub visible_chunks: usize,
    pub mesh_count: usize,
    pub cache_hit_rate: f64,
}

pub struct TerrainView {
    controller: ZoomController,
    lod: LodManager,
}

impl TerrainView {
    /// Build a view from a validated config
    pub fn new(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let generator = Arc::new(ChunkGenerator::from_config(config)?);
        Ok(Self {
            controller: ZoomController::new(config.zoom.clone()),
            lod: LodManager::new(config.lod.clone(), generator),
        })
    }

    pub fn with_visibility(mut self, visibility: Box<dyn VisibilityQuery>) -> Self {
        self.lod = self.lod.with_visibility(visibility);
        self
    }

    /// Ease the camera, then drive the LOD manager with the resulting state
    pub fn update(&mut self, dt: f32) {
        self.controller.update(dt);
        let camera = self.camera();
        self.lod.update(&camera, dt);
    }

    pub fn zoom_to_depth(&mut self, depth: u32) {
        self.controller.zoom_to_depth(depth);
    }

    pub fn zoom_in(&mut self) {
        self.controller.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.controller.zoom_out();
    }

    /// Camera state at the current altitude and active depth
    pub fn camera(&self) -> CameraState {
        self.controller.camera_state(self.lod.current_depth())
    }

    pub fn visible_chunks(&self) -> impl Iterator<Item = &VisibleChunk> {
        self.lod.visible_chunks()
    }

    pub fn controller(&self) -> &ZoomController {
        &self.controller
    }

    pub fn lod(&self) -> &LodManager {
        &self.lod
    }

    pub fn stats(&self) -> ViewStats {
        let lod = self.lod.stats();
        ViewStats {
            current_depth: lod.current_depth,
            target_depth: lod.target_depth,
            transition_progress: lod.transition_progress,
            view_level: lod.view_level,
            altitude: self.controller.altitude(),
            visible_chunks: lod.visible_chunks,
            mesh_count: lod.mesh_count,
            cache_hit_rate: self.lod.generator().cache_stats().hit_rate,
        }
    }
}
