//! Per-vertex terrain coloring

use crate::terrain::BiomeType;

/// Elevation (in height units) at which the elevation tint saturates
const ELEVATION_NORMALIZER: f32 = 1000.0;

/// Shade a biome's base color by elevation and moisture.
///
/// Higher ground darkens red and green and lifts blue slightly; moisture
/// brightens every channel, green the most.
pub fn vertex_color(biome: BiomeType, elevation: f32, moisture: f32) -> [f32; 3] {
    let [r, g, b] = biome.base_color();
    let e = (elevation / ELEVATION_NORMALIZER).clamp(0.0, 1.0);
    let m = moisture;

    [
        r * (1.0 - e * 0.3) * (1.0 + m * 0.1),
        g * (1.0 - e * 0.2) * (1.0 + m * 0.2),
        b * (1.0 + e * 0.1) * (1.0 + m * 0.1),
    ]
}
