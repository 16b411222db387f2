//! Fractal Terrain - deterministic, infinitely zoomable planetary terrain
//!
//! Every chunk is a pure function of its hierarchical address: a hash chain
//! from a fixed genesis seed drives noise grids and feature placement, so any
//! region at any depth can be rebuilt on demand and only a cache is kept.

pub mod core;
pub mod config;
pub mod seed;
pub mod terrain;
pub mod streaming;
pub mod mesh;
