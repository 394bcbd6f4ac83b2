//! Headless Moon descent demo.
//!
//! Builds a Moon quadsphere, then flies the viewer from orbit down toward
//! the surface over a fixed number of frames, logging how the tile tree
//! refines. Uses disk tile assets when the configured data directory
//! exists, and procedural terrain otherwise.

mod procedural;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glam::DVec3;
use selene_config::{CliArgs, Config};
use selene_planet::BodyDef;
use selene_provider::TileProvider;
use selene_quadsphere::{LodSettings, Quadsphere};
use tracing::info;

use crate::procedural::ProceduralProvider;

fn build_sphere(config: &Config) -> Quadsphere {
    let mut body = BodyDef::moon();
    if let Some(radius) = config.planet.radius_m {
        body.radius_m = radius;
    }
    body.vertex_max_level = config.fetch.vertex_max_level;
    body.texture_max_level = config.fetch.texture_max_level;

    let lod = LodSettings {
        subdivide_limit: config.lod.subdivide_limit,
        max_level: config.lod.max_level,
    };
    let threads = (config.fetch.threads > 0).then_some(config.fetch.threads);

    if config.planet.data_dir.is_dir() {
        info!(dir = %config.planet.data_dir.display(), "using disk tile data");
        body.build_from_disk(&config.planet.data_dir, lod, threads)
    } else {
        info!("data directory not found, using procedural terrain");
        let provider: Arc<dyn TileProvider> = Arc::new(ProceduralProvider::new(
            0,
            body.vertex_max_level,
            body.texture_max_level,
        ));
        body.build(provider, lod, threads)
    }
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .expect("Failed to resolve config directory")
            .join("selene")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    selene_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut sphere = build_sphere(&config);
    sphere.render_toggles_mut().wireframe = config.debug.wireframe;
    sphere.render_toggles_mut().level_colors = config.debug.level_colors;

    let radius = sphere.radius();
    let frames = config.demo.frames.max(1);
    let start_altitude = config.planet.start_altitude_m.max(1.0);
    let end_altitude = config.demo.end_altitude_m.max(1.0);
    let descent_dir = DVec3::Z;

    info!(
        frames,
        start_altitude_m = start_altitude,
        end_altitude_m = end_altitude,
        "starting descent"
    );

    let mut peak_tiles = 0usize;
    let mut peak_level = 0u8;
    for frame in 0..frames {
        // Exponential descent: spend as many frames close to the surface as
        // in orbit, where the LOD actually changes.
        let t = f64::from(frame) / f64::from(frames - 1).max(1.0);
        let altitude = start_altitude * (end_altitude / start_altitude).powf(t);
        let viewer = descent_dir * (radius + altitude);

        sphere.update(viewer);

        let tiles = sphere.visible_tiles();
        let max_level = tiles
            .iter()
            .map(|tile| tile.address.level)
            .max()
            .unwrap_or(0);
        peak_tiles = peak_tiles.max(tiles.len());
        peak_level = peak_level.max(max_level);

        if frame % 30 == 0 || frame + 1 == frames {
            let triangles: usize = tiles.iter().map(|tile| tile.mesh.triangle_count()).sum();
            info!(
                frame,
                altitude_m = format!("{altitude:.0}"),
                tiles = tiles.len(),
                max_level,
                triangles,
                in_flight = sphere.fetches_in_flight(),
                "descent frame"
            );
        }

        // Leave the fetch workers a time slice, as a render loop would.
        std::thread::sleep(Duration::from_millis(5));
    }

    info!(peak_tiles, peak_level, "descent finished");
}
