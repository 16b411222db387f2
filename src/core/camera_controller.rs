//! Zoom camera controller

use crate::config::ZoomConfig;
use crate::core::camera::CameraState;
use crate::core::types::Vec3;

/// Altitude-driven camera controller.
///
/// Zoom commands only move the target altitude; `update` eases the current
/// altitude toward it so depth changes downstream happen gradually.
#[derive(Clone, Debug)]
pub struct ZoomController {
    config: ZoomConfig,
    current_altitude: f32,
    target_altitude: f32,
    /// Horizontal position of the camera (y is replaced by altitude)
    position: Vec3,
}

impl ZoomController {
    /// Create new controller starting at the configured initial altitude
    pub fn new(config: ZoomConfig) -> Self {
        let altitude = config
            .initial_altitude
            .clamp(config.min_altitude, config.max_altitude);
        Self {
            config,
            current_altitude: altitude,
            target_altitude: altitude,
            position: Vec3::ZERO,
        }
    }

    /// Fly to the preset altitude for `depth` (clamped to the deepest preset)
    pub fn zoom_to_depth(&mut self, depth: u32) {
        let last = self.config.depth_altitudes.len() - 1;
        let idx = (depth as usize).min(last);
        self.target_altitude = self.config.depth_altitudes[idx];
    }

    /// Move the target altitude closer to the ground
    pub fn zoom_in(&mut self) {
        self.target_altitude =
            (self.target_altitude * self.config.zoom_in_factor).max(self.config.min_altitude);
    }

    /// Move the target altitude away from the ground
    pub fn zoom_out(&mut self) {
        self.target_altitude =
            (self.target_altitude * self.config.zoom_out_factor).min(self.config.max_altitude);
    }

    /// Jump straight to an altitude without easing
    pub fn set_altitude(&mut self, altitude: f32) {
        let altitude = altitude.max(0.0);
        self.current_altitude = altitude;
        self.target_altitude = altitude;
    }

    /// Ease the current altitude toward the target
    pub fn update(&mut self, dt: f32) {
        let t = (self.config.altitude_lerp_rate * dt).clamp(0.0, 1.0);
        self.current_altitude += (self.target_altitude - self.current_altitude) * t;
    }

    /// Camera state to hand to the LOD manager
    pub fn camera_state(&self, depth: u32) -> CameraState {
        CameraState {
            position: Vec3::new(self.position.x, self.current_altitude, self.position.z),
            target: Vec3::new(self.position.x, 0.0, self.position.z),
            altitude: self.current_altitude,
            depth,
        }
    }

    /// Current (eased) altitude
    pub fn altitude(&self) -> f32 {
        self.current_altitude
    }

    /// Altitude the controller is heading to
    pub fn target_altitude(&self) -> f32 {
        self.target_altitude
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
