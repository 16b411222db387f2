//! Level of Detail (LOD) management over subdivision depth
//!
//! Camera altitude picks a target depth 0-6. The active depth follows it
//! through a rate-limited transition so that hovering near a threshold does
//! not thrash between levels. Each update the manager refreshes the set of
//! visible chunks at the active depth, meshes new arrivals and picks the mesh
//! tier to draw for each.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::LodConfig;
use crate::core::camera::CameraState;
use crate::mesh::{generate_lod_meshes, select_lod, LodMesh};
use crate::terrain::{ChunkAddress, ChunkGenerator, TerrainChunk};

use super::visibility::{GridVisibility, VisibilityQuery};

/// Deepest subdivision level (ground)
pub const MAX_DEPTH: u32 = 6;

/// Default altitude thresholds: depth `i` is chosen while altitude > `[i]`
pub const DEPTH_ALTITUDE_THRESHOLDS: [f32; MAX_DEPTH as usize] = [250.0, 150.0, 90.0, 60.0, 40.0, 25.0];

/// Distance proxy per level of depth difference
pub const DEPTH_DISTANCE_UNIT: f32 = 100.0;

/// Named viewing tier for a depth
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLevel {
    Orbital,
    Continental,
    Regional,
    Local,
    Ground,
}

impl ViewLevel {
    /// Map a depth to its tier: 0 orbital, 1-2 continental, 3-4 regional,
    /// 5 local, 6 and deeper ground
    ///
    /// # Examples
    /// ```
    /// use fractal_terrain::streaming::lod::ViewLevel;
    ///
    /// assert_eq!(ViewLevel::from_depth(0), ViewLevel::Orbital);
    /// assert_eq!(ViewLevel::from_depth(2), ViewLevel::Continental);
    /// assert_eq!(ViewLevel::from_depth(4), ViewLevel::Regional);
    /// assert_eq!(ViewLevel::from_depth(6), ViewLevel::Ground);
    /// ```
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            0 => ViewLevel::Orbital,
            1 | 2 => ViewLevel::Continental,
            3 | 4 => ViewLevel::Regional,
            5 => ViewLevel::Local,
            _ => ViewLevel::Ground,
        }
    }
}

/// Target depth for a camera altitude
///
/// Returns the first level whose threshold the altitude is strictly above,
/// or [`MAX_DEPTH`] when it is at or below every threshold.
///
/// # Examples
/// ```
/// use fractal_terrain::streaming::lod::{depth_from_altitude, DEPTH_ALTITUDE_THRESHOLDS};
///
/// assert_eq!(depth_from_altitude(300.0, &DEPTH_ALTITUDE_THRESHOLDS), 0);
/// assert_eq!(depth_from_altitude(250.0, &DEPTH_ALTITUDE_THRESHOLDS), 1);
/// assert_eq!(depth_from_altitude(75.0, &DEPTH_ALTITUDE_THRESHOLDS), 3);
/// assert_eq!(depth_from_altitude(10.0, &DEPTH_ALTITUDE_THRESHOLDS), 6);
/// ```
pub fn depth_from_altitude(altitude: f32, thresholds: &[f32; MAX_DEPTH as usize]) -> u32 {
    thresholds
        .iter()
        .position(|&t| altitude > t)
        .map_or(MAX_DEPTH, |i| i as u32)
}

/// Radius within which chunks stay resident
pub fn visible_radius(altitude: f32, config: &LodConfig) -> f32 {
    (altitude * config.radius_scale).max(config.min_radius)
}

/// A chunk the manager is currently tracking
#[derive(Clone, Debug)]
pub struct VisibleChunk {
    pub chunk: Arc<TerrainChunk>,
    /// All four tiers, finest first
    pub meshes: Vec<LodMesh>,
    /// Index into `meshes` selected for the last camera altitude
    pub active_tier: usize,
    /// Depth-difference distance proxy used for eviction
    pub distance: f32,
}

impl VisibleChunk {
    pub fn address(&self) -> &ChunkAddress {
        &self.chunk.address
    }

    pub fn active_mesh(&self) -> Option<&LodMesh> {
        self.meshes.get(self.active_tier)
    }
}

/// LOD statistics
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LodStats {
    pub current_depth: u32,
    pub target_depth: u32,
    pub transition_progress: f32,
    pub view_level: ViewLevel,
    pub visible_chunks: usize,
    /// Total LOD tier meshes held across visible chunks
    pub mesh_count: usize,
    pub visible_radius: f32,
}

/// Depth state machine plus the visible chunk set
pub struct LodManager {
    config: LodConfig,
    generator: Arc<ChunkGenerator>,
    visibility: Box<dyn VisibilityQuery>,
    current_depth: u32,
    target_depth: u32,
    /// 0-1 toward `target_depth`; 1 when settled
    transition_progress: f32,
    visible: BTreeMap<ChunkAddress, VisibleChunk>,
    last_altitude: f32,
}

impl LodManager {
    pub fn new(config: LodConfig, generator: Arc<ChunkGenerator>) -> Self {
        Self {
            config,
            generator,
            visibility: Box::new(GridVisibility::default()),
            current_depth: 0,
            target_depth: 0,
            transition_progress: 1.0,
            visible: BTreeMap::new(),
            last_altitude: 0.0,
        }
    }

    /// Replace the visibility source
    pub fn with_visibility(mut self, visibility: Box<dyn VisibilityQuery>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Advance one tick
    pub fn update(&mut self, camera: &CameraState, dt: f32) {
        self.last_altitude = camera.altitude;
        self.advance_transition(camera.altitude, dt);
        self.refresh_visible(camera);
        self.evict_distant(camera.altitude);
    }

    fn advance_transition(&mut self, altitude: f32, dt: f32) {
        let target = depth_from_altitude(altitude, &self.config.altitude_thresholds);
        if target != self.target_depth {
            self.target_depth = target;
            // Progress restarts on every retarget
            self.transition_progress = if target == self.current_depth { 1.0 } else { 0.0 };
        }

        if self.current_depth == self.target_depth {
            return;
        }

        self.transition_progress += dt.max(0.0) * self.config.transition_rate;
        if self.transition_progress >= 1.0 {
            log::info!(
                "LOD depth {} -> {} ({:?})",
                self.current_depth,
                self.target_depth,
                ViewLevel::from_depth(self.target_depth)
            );
            self.current_depth = self.target_depth;
            self.transition_progress = 1.0;
            self.visible.clear();
        }
    }

    fn refresh_visible(&mut self, camera: &CameraState) {
        let view = camera.with_depth(self.current_depth);
        let addresses = self.visibility.addresses_in_view(&view);

        let (known, fresh): (Vec<_>, Vec<_>) = addresses
            .into_iter()
            .partition(|a| self.visible.contains_key(a));

        // Touch tracked chunks so the cache keeps them warm
        for address in &known {
            self.generator.generate_chunk(address, None);
        }

        let generator = &self.generator;
        let built: Vec<VisibleChunk> = fresh
            .par_iter()
            .map(|address| {
                let chunk = generator.generate_chunk(address, None);
                let meshes = generate_lod_meshes(&chunk);
                VisibleChunk {
                    chunk,
                    meshes,
                    active_tier: 0,
                    distance: 0.0,
                }
            })
            .collect();

        for entry in built {
            self.visible.insert(entry.address().clone(), entry);
        }

        for entry in self.visible.values_mut() {
            entry.active_tier = select_lod(&entry.meshes, camera.altitude).map_or(0, |m| m.tier);
        }
    }

    fn evict_distant(&mut self, altitude: f32) {
        let limit = visible_radius(altitude, &self.config) * self.config.eviction_factor;
        let current = self.current_depth;

        self.visible.retain(|address, entry| {
            entry.distance = current.abs_diff(address.depth()) as f32 * DEPTH_DISTANCE_UNIT;
            let keep = entry.distance <= limit;
            if !keep {
                log::debug!("Evicting visible chunk {} (distance {})", address, entry.distance);
            }
            keep
        });
    }

    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    pub fn target_depth(&self) -> u32 {
        self.target_depth
    }

    /// 0-1 while moving toward the target depth, 1 when settled
    pub fn transition_progress(&self) -> f32 {
        self.transition_progress
    }

    pub fn view_level(&self) -> ViewLevel {
        ViewLevel::from_depth(self.current_depth)
    }

    pub fn visible_chunks(&self) -> impl Iterator<Item = &VisibleChunk> {
        self.visible.values()
    }

    pub fn visible_chunk(&self, address: &ChunkAddress) -> Option<&VisibleChunk> {
        self.visible.get(address)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.visible.values().map(|v| v.meshes.len()).sum()
    }

    pub fn generator(&self) -> &Arc<ChunkGenerator> {
        &self.generator
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn stats(&self) -> LodStats {
        LodStats {
            current_depth: self.current_depth,
            target_depth: self.target_depth,
            transition_progress: self.transition_progress,
            view_level: self.view_level(),
            visible_chunks: self.visible.len(),
            mesh_count: self.mesh_count(),
            visible_radius: visible_radius(self.last_altitude, &self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BiomeInheritance;

    fn manager() -> LodManager {
        let generator = Arc::new(ChunkGenerator::new(256, BiomeInheritance::Fixed).unwrap());
        LodManager::new(LodConfig::default(), generator)
    }

    #[test]
    fn test_depth_from_altitude_thresholds() {
        let t = &DEPTH_ALTITUDE_THRESHOLDS;
        assert_eq!(depth_from_altitude(400.0, t), 0);
        assert_eq!(depth_from_altitude(250.1, t), 0);
        // Comparisons are strict
        assert_eq!(depth_from_altitude(250.0, t), 1);
        assert_eq!(depth_from_altitude(151.0, t), 1);
        assert_eq!(depth_from_altitude(150.0, t), 2);
        assert_eq!(depth_from_altitude(91.0, t), 2);
        assert_eq!(depth_from_altitude(61.0, t), 3);
        assert_eq!(depth_from_altitude(41.0, t), 4);
        assert_eq!(depth_from_altitude(26.0, t), 5);
        assert_eq!(depth_from_altitude(25.0, t), 6);
        assert_eq!(depth_from_altitude(0.0, t), 6);
    }

    #[test]
    fn test_depth_monotonic_in_altitude() {
        let mut prev = MAX_DEPTH;
        for i in 0..400 {
            let depth = depth_from_altitude(i as f32, &DEPTH_ALTITUDE_THRESHOLDS);
            assert!(depth <= prev);
            prev = depth;
        }
    }

    #[test]
    fn test_view_levels() {
        let levels: Vec<_> = (0..=MAX_DEPTH).map(ViewLevel::from_depth).collect();
        assert_eq!(
            levels,
            vec![
                ViewLevel::Orbital,
                ViewLevel::Continental,
                ViewLevel::Continental,
                ViewLevel::Regional,
                ViewLevel::Regional,
                ViewLevel::Local,
                ViewLevel::Ground,
            ]
        );
    }

    #[test]
    fn test_visible_radius() {
        let config = LodConfig::default();
        assert_eq!(visible_radius(100.0, &config), 50.0);
        assert_eq!(visible_radius(1.0, &config), 1.0);
        assert_eq!(visible_radius(0.0, &config), 1.0);
    }

    #[test]
    fn test_orbital_single_chunk() {
        let mut lod = manager();
        lod.update(&CameraState::overhead(300.0, 0), 0.016);

        assert_eq!(lod.current_depth(), 0);
        assert_eq!(lod.visible_count(), 1);
        assert_eq!(lod.mesh_count(), 4);

        let root = ChunkAddress::root(0).unwrap();
        let chunk = lod.visible_chunk(&root).unwrap();
        // Altitude 300 is past every band
        assert_eq!(chunk.active_tier, 3);
    }

    #[test]
    fn test_transition_is_rate_limited() {
        let mut lod = manager();
        let low = CameraState::overhead(15.0, 0);

        lod.update(&low, 0.25);
        assert_eq!(lod.target_depth(), 6);
        assert_eq!(lod.current_depth(), 0);
        assert_eq!(lod.transition_progress(), 0.5);
        // Still showing the old depth
        assert_eq!(lod.visible_count(), 1);

        lod.update(&low, 0.25);
        assert_eq!(lod.current_depth(), 6);
        assert_eq!(lod.transition_progress(), 1.0);
        assert_eq!(lod.view_level(), ViewLevel::Ground);
        assert_eq!(lod.visible_count(), 9);
        assert!(lod.visible_chunks().all(|v| v.address().depth() == 6));
    }

    #[test]
    fn test_oscillation_does_not_switch() {
        let mut lod = manager();
        let above = CameraState::overhead(251.0, 0);
        let below = CameraState::overhead(249.0, 0);

        for _ in 0..20 {
            lod.update(&below, 0.25);
            lod.update(&above, 0.25);
        }
        assert_eq!(lod.current_depth(), 0);
    }

    #[test]
    fn test_target_change_restarts_progress() {
        let mut lod = manager();
        lod.update(&CameraState::overhead(200.0, 0), 0.25);
        assert_eq!(lod.target_depth(), 1);
        assert_eq!(lod.transition_progress(), 0.5);

        lod.update(&CameraState::overhead(100.0, 0), 0.0);
        assert_eq!(lod.target_depth(), 2);
        assert_eq!(lod.transition_progress(), 0.0);
        assert_eq!(lod.current_depth(), 0);
    }

    #[test]
    fn test_active_tier_follows_altitude() {
        let mut lod = manager();
        lod.update(&CameraState::overhead(75.0, 0), 1.0);
        assert_eq!(lod.current_depth(), 3);

        lod.update(&CameraState::overhead(75.0, 0), 0.016);
        assert!(lod.visible_chunks().all(|v| v.active_tier == 1));
        assert!(lod.visible_chunks().all(|v| v.active_mesh().is_some()));
    }

    #[test]
    fn test_same_depth_chunks_not_evicted() {
        let mut lod = manager();
        lod.update(&CameraState::overhead(30.0, 0), 1.0);
        lod.update(&CameraState::overhead(30.0, 0), 0.016);
        assert_eq!(lod.visible_count(), 9);
        assert!(lod.visible_chunks().all(|v| v.distance == 0.0));
    }

    /// Visibility source that keeps returning the same fixed addresses
    struct Fixed(Vec<ChunkAddress>);

    impl VisibilityQuery for Fixed {
        fn addresses_in_view(&self, _camera: &CameraState) -> Vec<ChunkAddress> {
            self.0.clone()
        }
    }

    #[test]
    fn test_distant_depth_evicted() {
        let near: ChunkAddress = "T0:".parse().unwrap();
        let far: ChunkAddress = "T0:1,1:1,1:1,1:1,1".parse().unwrap();
        let mut lod = manager().with_visibility(Box::new(Fixed(vec![near.clone(), far.clone()])));

        // Radius 150 at altitude 300 tolerates at most two levels of depth difference
        lod.update(&CameraState::overhead(300.0, 0), 0.016);
        assert!(lod.visible_chunk(&near).is_some());
        assert!(lod.visible_chunk(&far).is_none());
    }

    #[test]
    fn test_stats() {
        let mut lod = manager();
        lod.update(&CameraState::overhead(300.0, 0), 0.016);
        let stats = lod.stats();
        assert_eq!(stats.current_depth, 0);
        assert_eq!(stats.view_level, ViewLevel::Orbital);
        assert_eq!(stats.visible_chunks, 1);
        assert_eq!(stats.mesh_count, 4);
        assert_eq!(stats.visible_radius, 150.0);
    }
}
