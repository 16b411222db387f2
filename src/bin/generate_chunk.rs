//! Generate a single chunk and print a JSON summary.
//!
//! Usage: cargo run --release --bin generate_chunk -- [OPTIONS]
//!
//! Options:
//!   --address <ADDR>  Chunk address, e.g. "T42:31,17" (default: "T0:")
//!   --biome <NAME>    Override the resolved biome, e.g. "MOUNTAIN"
//!   --config <PATH>   World config JSON (default: built-in defaults)
//!   --tiers           Include LOD mesh tier summaries
//!   --features        Include the full feature list

use std::path::PathBuf;

use serde_json::json;

use fractal_terrain::config::WorldConfig;
use fractal_terrain::mesh::generate_lod_meshes;
use fractal_terrain::seed::verify_seed;
use fractal_terrain::terrain::{BiomeType, ChunkAddress, ChunkGenerator};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let address = parse_str_arg(&args, "--address").unwrap_or_else(|| "T0:".to_string());
    let biome = parse_str_arg(&args, "--biome");
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let with_tiers = has_flag(&args, "--tiers");
    let with_features = has_flag(&args, "--features");

    let address: ChunkAddress = match address.parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    let biome: Option<BiomeType> = match biome.map(|b| b.parse::<BiomeType>()).transpose() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let config = match config_path {
        Some(path) => WorldConfig::load_sync(&path).expect("Failed to load config"),
        None => WorldConfig::default(),
    };

    let generator = ChunkGenerator::from_config(&config).expect("Invalid config");
    let chunk = generator.generate_chunk(&address, biome);

    let (h_min, h_max) = chunk.heightmap.min_max();
    let (m_min, m_max) = chunk.moisture.min_max();
    let (t_min, t_max) = chunk.temperature.min_max();

    let mut summary = json!({
        "address": chunk.address,
        "depth": chunk.address.depth(),
        "seed": chunk.seed.hash,
        "seed_verified": verify_seed(&chunk.seed),
        "biome": chunk.biome,
        "elevation": [h_min, h_max],
        "moisture": [m_min, m_max],
        "temperature": [t_min, t_max],
        "feature_count": chunk.features.len(),
    });

    if with_features {
        summary["features"] = json!(chunk.features);
    }

    if with_tiers {
        let tiers: Vec<_> = generate_lod_meshes(&chunk)
            .iter()
            .map(|t| json!({
                "tier": t.tier,
                "step": t.step,
                "vertices": t.mesh.vertex_count(),
                "triangles": t.triangle_count,
                "visible_range": t.visible_range,
            }))
            .collect();
        summary["tiers"] = json!(tiers);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("Failed to serialize summary")
    );
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
