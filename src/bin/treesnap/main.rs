//! treesnap - Render the tree scene headlessly to PNG frames
//!
//! Usage:
//!   treesnap [--config scene.toml] [--frames 120] [--save-every 30] [--snow] [--out frames]

mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tree_engine::{Layer, RasterSurface, Snowfield, TreeWorld};

#[derive(Parser)]
#[command(name = "treesnap")]
#[command(about = "Render the particle tree to PNG frames without a browser")]
struct Args {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Write every Nth frame (the last frame is always written)
    #[arg(long, default_value_t = 30)]
    save_every: u32,

    /// Output directory
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Simulated time between frames, in milliseconds
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f64,

    /// RNG seed
    #[arg(long, default_value_t = 0x5EED)]
    seed: u32,

    /// Composite the snowfall layer over the tree
    #[arg(long)]
    snow: bool,

    #[command(flatten)]
    scene: config::SceneArgs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.scene.resolve()?;
    log::info!(
        "rendering {} frames at {}x{} ({} particles, {}, glow {}, rotation {})",
        args.frames,
        args.width,
        args.height,
        settings.particle_count,
        settings.tree_color,
        settings.glow_intensity,
        settings.rotation_speed
    );

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let (w, h) = (args.width as f32, args.height as f32);
    let mut world = TreeWorld::new(w, h, settings, args.seed);
    let mut canvas = RasterSurface::new(args.width, args.height);

    let mut snow = args.snow.then(|| {
        (
            Snowfield::new(w, h, args.seed.wrapping_add(1)),
            RasterSurface::new(args.width, args.height),
        )
    });

    let save_every = args.save_every.max(1);
    let mut written = 0;
    for i in 0..args.frames {
        let now = i as f64 * args.frame_ms;
        world.tick(&mut canvas, now)?;
        if let Some((field, layer)) = snow.as_mut() {
            field.tick(layer, now)?;
        }

        let last = i + 1 == args.frames;
        if (i + 1) % save_every != 0 && !last {
            continue;
        }

        let path = args.out.join(format!("frame_{i:04}.png"));
        let saved = match snow.as_ref() {
            Some((_, layer)) => {
                let mut out = canvas.clone();
                out.composite_over(layer)?;
                out.save_png(&path)
            }
            None => canvas.save_png(&path),
        };
        saved.with_context(|| format!("Failed to write {}", path.display()))?;

        log::debug!("wrote {}", path.display());
        written += 1;
    }

    log::info!("wrote {} frames to {}", written, args.out.display());
    Ok(())
}
