use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use showreel_assets::{AssetLoader, GltfFileLoader, StaticAssetLoader};
use showreel_input::WheelDelta;
use showreel_player::{Presentation, PresentationManifest};
use showreel_render::{DebugTextRenderer, Viewport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "showreel-cli", about = "Headless driver for showreel presentations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Write the default presentation manifest as JSON
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play a presentation against the debug text renderer
    Play {
        /// Presentation manifest (built-in default when omitted)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// Directory of `<name>.gltf` files (synthetic models when omitted)
        #[arg(short, long)]
        assets: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "360")]
        frames: u64,
        /// Frame interval in milliseconds
        #[arg(long, default_value = "16.0")]
        frame_ms: f64,
        /// Times (ms) at which to inject a downward wheel event
        #[arg(short, long, value_delimiter = ',')]
        scroll_at: Vec<f64>,
        /// Print every Nth frame (0 prints only the last)
        #[arg(long, default_value = "0")]
        print_every: u64,
        /// Viewport width
        #[arg(long, default_value = "1280")]
        width: u32,
        /// Viewport height
        #[arg(long, default_value = "720")]
        height: u32,
    },
}

struct PlayOptions {
    frames: u64,
    frame_ms: f64,
    scroll_at: Vec<f64>,
    print_every: u64,
    viewport: Viewport,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("showreel-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", showreel_assets::crate_info());
            println!("animation: {}", showreel_animation::crate_info());
            println!("storyboard: {}", showreel_storyboard::crate_info());
            println!("render: {}", showreel_render::crate_info());
            println!("player: {}", showreel_player::crate_info());
            let manifest = PresentationManifest::default();
            println!(
                "default manifest: {} models, lead={:?}",
                manifest.assets.models.len(),
                manifest.cast.lead
            );
        }
        Commands::Manifest { output } => {
            let manifest = PresentationManifest::default();
            match output {
                Some(path) => {
                    manifest
                        .save(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", manifest.to_json()?),
            }
        }
        Commands::Play {
            manifest,
            assets,
            frames,
            frame_ms,
            mut scroll_at,
            print_every,
            width,
            height,
        } => {
            let manifest = match manifest {
                Some(path) => PresentationManifest::load(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => PresentationManifest::default(),
            };
            scroll_at.sort_by(f64::total_cmp);
            let options = PlayOptions {
                frames,
                frame_ms,
                scroll_at,
                print_every,
                viewport: Viewport::new(width, height),
            };
            match assets {
                Some(dir) => play(manifest, &GltfFileLoader::new(dir), options)?,
                None => play(manifest, &StaticAssetLoader::new(), options)?,
            }
        }
    }

    Ok(())
}

fn play<L: AssetLoader>(
    manifest: PresentationManifest,
    loader: &L,
    options: PlayOptions,
) -> anyhow::Result<()> {
    tracing::info!(frames = options.frames, scrolls = options.scroll_at.len(), "playing");
    let mut renderer = DebugTextRenderer::new();
    let mut presentation = Presentation::new(manifest);
    presentation.resize(options.viewport, &mut renderer);

    let booted = presentation.boot(loader, 0.0);
    for event in presentation.drain_events() {
        println!("lifecycle: {event:?}");
    }
    booted.context("booting presentation")?;

    let mut pending = options.scroll_at.iter().copied().peekable();
    let mut last = None;
    for frame in 1..=options.frames {
        let now = frame as f64 * options.frame_ms;
        while let Some(at) = pending.next_if(|at| *at <= now) {
            presentation.on_wheel(WheelDelta::from_delta_y(100.0), at);
        }
        if let Some(outcome) = presentation.poll_input(now)? {
            println!("t={now:.0}ms trigger: {outcome:?} (slide {})", presentation.slide());
        }
        let output = presentation.tick(now, &renderer)?;
        if options.print_every > 0 && frame % options.print_every == 0 {
            if let Some(text) = &output {
                println!("--- t={now:.0}ms ---\n{text}");
            }
        }
        last = output;
    }

    if let Some(text) = last {
        println!("{text}");
    }
    let stats = presentation.stats();
    println!(
        "Frames: {} slide={} busy={} avg={:?} worst={:?} idle={}",
        stats.frames(),
        presentation.slide(),
        presentation.is_busy(),
        stats.average(),
        stats.worst(),
        stats.idle_frames()
    );
    Ok(())
}
