//! Headless fly-through driver.
//!
//! Runs a fixed-timestep loop over a `TerrainView`, issuing a scripted
//! sequence of zoom commands and logging view statistics once per simulated
//! second. Stands in for a renderer's frame loop.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   World config JSON (default: built-in defaults)
//!   --seconds <S>     Simulated duration (default: 30)
//!   --dt <SECS>       Fixed timestep (default: 1/60)
//!   --interval <S>    Seconds between scripted zoom commands (default: 2.5)

use std::path::PathBuf;

use fractal_terrain::config::WorldConfig;
use fractal_terrain::core::logging;
use fractal_terrain::core::time::TickTimer;
use fractal_terrain::streaming::TerrainView;

/// One scripted camera command
#[derive(Clone, Copy, Debug)]
enum Command {
    ZoomToDepth(u32),
    ZoomIn,
    ZoomOut,
}

/// Dive to the ground one level at a time, nudge around, then climb back out
const SCRIPT: &[Command] = &[
    Command::ZoomToDepth(1),
    Command::ZoomToDepth(2),
    Command::ZoomToDepth(3),
    Command::ZoomToDepth(4),
    Command::ZoomToDepth(5),
    Command::ZoomToDepth(6),
    Command::ZoomIn,
    Command::ZoomOut,
    Command::ZoomOut,
    Command::ZoomOut,
    Command::ZoomToDepth(0),
];

fn main() {
    logging::init();
    log::info!("fractal-terrain starting...");

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let seconds = parse_f32_arg(&args, "--seconds").unwrap_or(30.0);
    let dt = parse_f32_arg(&args, "--dt").unwrap_or(1.0 / 60.0);
    let interval = parse_f32_arg(&args, "--interval").unwrap_or(2.5);

    let config = match config_path {
        Some(ref path) => {
            log::info!("Loading config from: {}", path.display());
            WorldConfig::load_sync(path).expect("Failed to load config")
        }
        None => WorldConfig::default(),
    };

    let mut view = TerrainView::new(&config).expect("Invalid config");
    let mut timer = TickTimer::fixed(dt);
    let mut script = SCRIPT.iter();
    let mut next_command_at = 0.0f64;
    let mut next_report_at = 1.0f64;

    while timer.simulated_secs() < seconds as f64 {
        let dt = timer.begin();

        if timer.simulated_secs() >= next_command_at {
            if let Some(&command) = script.next() {
                log::info!("Command: {:?}", command);
                match command {
                    Command::ZoomToDepth(depth) => view.zoom_to_depth(depth),
                    Command::ZoomIn => view.zoom_in(),
                    Command::ZoomOut => view.zoom_out(),
                }
            }
            next_command_at += interval as f64;
        }

        view.update(dt);
        timer.end();

        if timer.simulated_secs() >= next_report_at {
            let stats = view.stats();
            log::info!(
                "t={:.1}s depth {} -> {} ({:?}, {:.0}%) alt {:.1} chunks {} meshes {} hit rate {:.1}%",
                timer.simulated_secs(),
                stats.current_depth,
                stats.target_depth,
                stats.view_level,
                stats.transition_progress * 100.0,
                stats.altitude,
                stats.visible_chunks,
                stats.mesh_count,
                stats.cache_hit_rate * 100.0,
            );
            next_report_at += 1.0;
        }
    }

    let summary = serde_json::json!({
        "view": view.stats(),
        "cache": view.lod().generator().cache_stats(),
        "ticks": timer.stats(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("Failed to serialize summary")
    );
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
