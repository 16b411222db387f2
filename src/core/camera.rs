//! Camera state consumed by the LOD manager

use crate::core::types::Vec3;

/// Snapshot of the viewer, owned by the caller and read-only to the terrain core
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraState {
    /// World position
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Height above the surface (>= 0)
    pub altitude: f32,
    /// Zoom depth the caller believes it is at (0-6)
    pub depth: u32,
}

impl CameraState {
    /// Camera hovering straight above the origin
    pub fn overhead(altitude: f32, depth: u32) -> Self {
        let altitude = altitude.max(0.0);
        Self {
            position: Vec3::new(0.0, altitude, 0.0),
            target: Vec3::ZERO,
            altitude,
            depth,
        }
    }

    /// Copy of this state reporting a different depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::overhead(300.0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overhead_camera() {
        let cam = CameraState::overhead(120.0, 2);
        assert_eq!(cam.position, Vec3::new(0.0, 120.0, 0.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.altitude, 120.0);
        assert_eq!(cam.depth, 2);
    }

    #[test]
    fn test_overhead_clamps_negative_altitude() {
        let cam = CameraState::overhead(-5.0, 0);
        assert_eq!(cam.altitude, 0.0);
    }

    #[test]
    fn test_with_depth() {
        let cam = CameraState::default().with_depth(4);
        assert_eq!(cam.depth, 4);
        assert_eq!(cam.altitude, 300.0);
    }
}
