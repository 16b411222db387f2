//! Terrain mesh building

pub mod builder;
pub mod color;

pub use builder::{
    compute_normals, generate_lod_meshes, generate_terrain_mesh, select_lod, select_lod_index,
    AltitudeRange, LodMesh, MeshData, LOD_ALTITUDE_BREAKS, LOD_STEPS,
};
pub use color::vertex_color;
