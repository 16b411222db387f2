//! LOD mesh generation from chunk height grids
//!
//! Each chunk yields four tiers, sampling every 1st, 2nd, 4th and 8th cell.
//! Tiers are paired with contiguous altitude bands so exactly one applies at
//! any altitude.

use serde::Serialize;

use crate::core::types::Vec3;
use crate::streaming::lod::ViewLevel;
use crate::terrain::{TerrainChunk, CHUNK_SIZE};

use super::color::vertex_color;

/// Sampling step for each tier, finest first
pub const LOD_STEPS: [usize; 4] = [1, 2, 4, 8];

/// Lower altitude bound of each tier; each band ends where the next begins
pub const LOD_ALTITUDE_BREAKS: [f32; 4] = [0.0, 50.0, 100.0, 200.0];

/// Height units per unit of mesh y
const HEIGHT_SCALE: f32 = 100.0;

/// Half-open altitude band `[min, max)`; `max = None` is unbounded
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AltitudeRange {
    pub min: f32,
    pub max: Option<f32>,
}

impl AltitudeRange {
    pub fn contains(&self, altitude: f32) -> bool {
        altitude >= self.min && self.max.is_none_or(|max| altitude < max)
    }

    /// Band for tier `index` of [`LOD_ALTITUDE_BREAKS`]
    pub fn for_tier(index: usize) -> Self {
        Self {
            min: LOD_ALTITUDE_BREAKS[index],
            max: LOD_ALTITUDE_BREAKS.get(index + 1).copied(),
        }
    }
}

/// Renderer-ready buffers. Plain data, no GPU ownership.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<[u32; 3]>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Raw bytes for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// One detail tier of a chunk
#[derive(Clone, Debug, Serialize)]
pub struct LodMesh {
    /// Depth of the chunk this mesh was built from
    pub depth: u32,
    pub view_level: ViewLevel,
    /// Index into [`LOD_STEPS`]
    pub tier: usize,
    pub step: usize,
    pub mesh: MeshData,
    pub triangle_count: usize,
    pub visible_range: AltitudeRange,
}

/// Build the mesh for one tier, sampling every `step`-th cell
pub fn generate_terrain_mesh(chunk: &TerrainChunk, step: usize) -> MeshData {
    let step = step.clamp(1, CHUNK_SIZE);
    let res = CHUNK_SIZE / step;
    let size = CHUNK_SIZE as f32;
    let uv_span = res.saturating_sub(1).max(1) as f32;

    let mut mesh = MeshData {
        vertices: Vec::with_capacity(res * res),
        normals: Vec::new(),
        colors: Vec::with_capacity(res * res),
        uvs: Vec::with_capacity(res * res),
        indices: Vec::with_capacity(2 * res.saturating_sub(1).pow(2)),
    };

    for y in 0..res {
        for x in 0..res {
            let (sx, sy) = (x * step, y * step);
            let height = chunk.heightmap.get(sx, sy);
            let moisture = chunk.moisture.get(sx, sy);

            mesh.vertices.push([sx as f32 / size, height / HEIGHT_SCALE, sy as f32 / size]);
            mesh.uvs.push([x as f32 / uv_span, y as f32 / uv_span]);
            mesh.colors.push(vertex_color(chunk.biome, height, moisture));
        }
    }

    let res32 = res as u32;
    for y in 0..res32.saturating_sub(1) {
        for x in 0..res32 - 1 {
            let i0 = y * res32 + x;
            let i1 = i0 + 1;
            let i2 = i0 + res32;
            let i3 = i2 + 1;
            mesh.indices.push([i0, i2, i1]);
            mesh.indices.push([i1, i2, i3]);
        }
    }

    mesh.normals = compute_normals(&mesh.vertices, &mesh.indices);
    mesh
}

/// Area-weighted vertex normals: sum of unnormalized face normals, then
/// normalized. Vertices touched by no triangle keep a zero normal.
pub fn compute_normals(vertices: &[[f32; 3]], indices: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; vertices.len()];

    for &[a, b, c] in indices {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let v0 = Vec3::from_array(vertices[a]);
        let v1 = Vec3::from_array(vertices[b]);
        let v2 = Vec3::from_array(vertices[c]);
        let face = (v1 - v0).cross(v2 - v0);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    acc.into_iter()
        .map(|n| if n.length() > 0.0 { n.normalize() } else { n })
        .map(|n| n.to_array())
        .collect()
}

/// Build all four detail tiers for a chunk, finest first
pub fn generate_lod_meshes(chunk: &TerrainChunk) -> Vec<LodMesh> {
    let depth = chunk.address.depth();
    let view_level = ViewLevel::from_depth(depth);

    LOD_STEPS
        .iter()
        .enumerate()
        .map(|(tier, &step)| {
            let mesh = generate_terrain_mesh(chunk, step);
            LodMesh {
                depth,
                view_level,
                tier,
                step,
                triangle_count: mesh.triangle_count(),
                mesh,
                visible_range: AltitudeRange::for_tier(tier),
            }
        })
        .collect()
}

/// Tier index whose band contains `altitude`, falling back to the coarsest
///
/// # Examples
/// ```
/// use fractal_terrain::mesh::select_lod_index;
///
/// assert_eq!(select_lod_index(10.0), 0);
/// assert_eq!(select_lod_index(50.0), 1);
/// assert_eq!(select_lod_index(75.0), 1);
/// assert_eq!(select_lod_index(1000.0), 3);
/// ```
pub fn select_lod_index(altitude: f32) -> usize {
    (0..LOD_STEPS.len())
        .find(|&i| AltitudeRange::for_tier(i).contains(altitude))
        .unwrap_or(LOD_STEPS.len() - 1)
}

/// First tier whose band contains `altitude`, else the last one given.
/// `None` only for an empty slice.
pub fn select_lod(tiers: &[LodMesh], altitude: f32) -> Option<&LodMesh> {
    tiers
        .iter()
        .find(|t| t.visible_range.contains(altitude))
        .or_else(|| tiers.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{build_chunk, BiomeType, ChunkAddress};

    fn chunk() -> TerrainChunk {
        let address: ChunkAddress = "T5:10,10".parse().unwrap();
        build_chunk(&address, BiomeType::Grassland)
    }

    #[test]
    fn test_tier_resolutions() {
        let tiers = generate_lod_meshes(&chunk());
        assert_eq!(tiers.len(), 4);

        for (tier, res) in tiers.iter().zip([64usize, 32, 16, 8]) {
            assert_eq!(tier.mesh.vertex_count(), res * res);
            assert_eq!(tier.mesh.normals.len(), res * res);
            assert_eq!(tier.mesh.colors.len(), res * res);
            assert_eq!(tier.mesh.uvs.len(), res * res);
            assert_eq!(tier.triangle_count, 2 * (res - 1) * (res - 1));
        }
    }

    #[test]
    fn test_tier_metadata() {
        let tiers = generate_lod_meshes(&chunk());
        assert_eq!(tiers[0].depth, 1);
        assert_eq!(tiers[0].view_level, ViewLevel::Continental);
        assert_eq!(tiers[2].step, 4);
    }

    #[test]
    fn test_ranges_partition_altitude() {
        let tiers = generate_lod_meshes(&chunk());
        assert_eq!(tiers[0].visible_range.min, 0.0);
        for pair in tiers.windows(2) {
            assert_eq!(pair[0].visible_range.max, Some(pair[1].visible_range.min));
        }
        assert_eq!(tiers[3].visible_range.max, None);
    }

    #[test]
    fn test_vertex_positions_and_uvs() {
        let c = chunk();
        let mesh = generate_terrain_mesh(&c, 2);
        let res = 32;

        // Vertex (x=3, y=5) samples source cell (6, 10)
        let i = 5 * res + 3;
        let [vx, vy, vz] = mesh.vertices[i];
        assert_eq!(vx, 6.0 / 64.0);
        assert_eq!(vz, 10.0 / 64.0);
        assert_eq!(vy, c.heightmap.get(6, 10) / 100.0);

        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs[res * res - 1], [1.0, 1.0]);
    }

    #[test]
    fn test_quad_winding() {
        let mesh = generate_terrain_mesh(&chunk(), 8);
        assert_eq!(mesh.indices[0], [0, 8, 1]);
        assert_eq!(mesh.indices[1], [1, 8, 9]);
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = generate_terrain_mesh(&chunk(), 1);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().flatten().all(|&i| i < n));
    }

    #[test]
    fn test_normals_unit_and_upward() {
        let mesh = generate_terrain_mesh(&chunk(), 4);
        for n in &mesh.normals {
            let v = Vec3::from_array(*n);
            assert!((v.length() - 1.0).abs() < 1e-4);
            assert!(v.y > 0.0);
        }
    }

    #[test]
    fn test_flat_normals_point_up() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0]];
        let indices = [[0, 2, 1], [1, 2, 3]];
        let normals = compute_normals(&vertices, &indices);
        for n in normals {
            assert_eq!(n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_unused_vertex_keeps_zero_normal() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [5.0, 5.0, 5.0]];
        let normals = compute_normals(&vertices, &[[0, 2, 1]]);
        assert_eq!(normals[3], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_select_lod() {
        let tiers = generate_lod_meshes(&chunk());
        assert_eq!(select_lod(&tiers, 0.0).unwrap().tier, 0);
        assert_eq!(select_lod(&tiers, 49.9).unwrap().tier, 0);
        assert_eq!(select_lod(&tiers, 75.0).unwrap().tier, 1);
        assert_eq!(select_lod(&tiers, 100.0).unwrap().tier, 2);
        assert_eq!(select_lod(&tiers, 1000.0).unwrap().tier, 3);
        assert!(select_lod(&[], 10.0).is_none());
    }

    #[test]
    fn test_byte_views() {
        let mesh = generate_terrain_mesh(&chunk(), 8);
        assert_eq!(mesh.vertex_bytes().len(), 64 * 12);
        assert_eq!(mesh.uv_bytes().len(), 64 * 8);
        assert_eq!(mesh.index_bytes().len(), mesh.triangle_count() * 12);
    }
}
