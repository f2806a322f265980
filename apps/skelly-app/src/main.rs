//! skelly asset CLI.
//!
//! Provides three modes of operation:
//! - `validate`: Load a `.skf` file and report its contents
//! - `dump`: Run the pose pipeline once and print the draw list as JSON
//! - `info`: Print workspace crate versions

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use skelly_compose::compose;
use skelly_core::config::StageConfig;
use skelly_core::playback::frame_for_time;
use skelly_core::types::{Armature, Style, Vec2};
use skelly_pose::{construct, Animator, Layer, RenderOptions};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// skelly 2D skeletal animation toolkit.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a .skf file and report what it contains.
    Validate {
        /// Path to the .skf asset.
        file: PathBuf,
    },

    /// Run the pipeline for one frame and print the draw list as JSON.
    Dump {
        /// Stage configuration (TOML).
        #[arg(short, long)]
        config: PathBuf,

        /// Wall-clock time into the animation, seconds.
        #[arg(short, long, default_value_t = 0.0)]
        time: f32,

        /// Skip IK solving.
        #[arg(long)]
        no_ik: bool,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_validate(file: &PathBuf) -> Result<(), Box<dyn Error>> {
    let (armature, atlases) = skelly_skf::load(file)?;
    println!("{} is valid", file.display());
    println!(
        "  bones: {} ({} meshes)",
        armature.bones.len(),
        armature.bones.iter().filter(|b| b.is_mesh()).count()
    );
    for anim in &armature.animations {
        println!(
            "  animation '{}': {} fps, {} frames, {} keyframes",
            anim.name,
            anim.fps,
            anim.last_frame() + 1,
            anim.keyframes.len()
        );
    }
    for family in &armature.ik_families {
        println!(
            "  ik family '{}': {} bones -> {}",
            family.name,
            family.bones.len(),
            family.target
        );
    }
    for style in &armature.styles {
        println!("  style '{}': {} textures", style.name, style.textures.len());
    }
    for (i, atlas) in atlases.iter().enumerate() {
        let (w, h) = atlas.dimensions();
        println!("  atlas {i}: {w}x{h}");
    }
    Ok(())
}

fn run_dump(config: &PathBuf, time: f32, no_ik: bool) -> Result<(), Box<dyn Error>> {
    let cfg = StageConfig::from_file(config)?;
    let (armature, _atlases) = skelly_skf::load(&cfg.armature)?;

    let layers = match pick_animation(&armature, cfg.animation.as_deref())? {
        Some(index) => {
            let anim = &armature.animations[index];
            let frame = frame_for_time(
                anim,
                Duration::from_secs_f32(time.max(0.0)),
                cfg.reverse,
                cfg.looped,
            );
            log::debug!("clip '{}' at frame {frame}", anim.name);
            vec![Layer {
                animation: index,
                frame,
            }]
        }
        None => Vec::new(),
    };

    let mut animator = Animator::new(cfg.blend_frames);
    let pose = animator.animate(&armature, &layers, !no_ik)?;

    let options = RenderOptions {
        scale: Vec2::new(cfg.scale[0], cfg.scale[1]),
        position: Vec2::new(cfg.position[0], cfg.position[1]),
    };
    let render = construct(&armature, &pose, &options);

    let styles = pick_styles(&armature, cfg.style.as_deref())?;
    let primitives = compose(&armature, &render, &styles);

    println!("{}", serde_json::to_string_pretty(&primitives)?);
    Ok(())
}

fn run_info() {
    println!("skelly v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  skelly-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  skelly-anim    {}", env!("CARGO_PKG_VERSION"));
    println!("  skelly-ik      {}", env!("CARGO_PKG_VERSION"));
    println!("  skelly-pose    {}", env!("CARGO_PKG_VERSION"));
    println!("  skelly-compose {}", env!("CARGO_PKG_VERSION"));
    println!("  skelly-skf     {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("edition: 2024");
}

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

/// Resolve the configured clip name to an index; `None` config means the
/// first clip, or no clip at all for a static armature.
fn pick_animation(armature: &Armature, name: Option<&str>) -> Result<Option<usize>, String> {
    match name {
        Some(name) => armature
            .animations
            .iter()
            .position(|a| a.name == name)
            .map(Some)
            .ok_or_else(|| format!("armature has no animation named '{name}'")),
        None => Ok((!armature.animations.is_empty()).then_some(0)),
    }
}

/// Resolve the configured style name; `None` config means the first style.
fn pick_styles<'a>(armature: &'a Armature, name: Option<&str>) -> Result<Vec<&'a Style>, String> {
    match name {
        Some(name) => armature
            .style_by_name(name)
            .map(|i| vec![&armature.styles[i]])
            .ok_or_else(|| format!("armature has no style named '{name}'")),
        None => Ok(armature.styles.first().into_iter().collect()),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Dump {
            config,
            time,
            no_ik,
        } => run_dump(&config, time, no_ik),
        Commands::Info => {
            run_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
