use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use raybatch::{FieldPath, IniTemplate, MutateSpec, MutateTargets, Renderer, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "raybatch", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write per-frame scene JSON and ini files without invoking a renderer.
    Emit(EmitArgs),
    /// Write per-frame files and invoke the renderer once per frame.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct EmitArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Renderer executable, invoked as `<exe> <ini-path>`.
    #[arg(long)]
    renderer: PathBuf,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Directory for per-frame scene JSON files.
    #[arg(long)]
    frames_dir: PathBuf,

    /// Directory for per-frame ini files.
    #[arg(long)]
    ini_dir: PathBuf,

    /// Directory the renderer writes PNG frames into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Tuning preset.
    #[arg(long, value_enum, default_value_t = PresetChoice::Fall)]
    preset: PresetChoice,

    /// Number of frames (indices 0..frames-1).
    #[arg(long, default_value_t = 11)]
    frames: u64,

    /// Seed for the per-frame scatter offsets.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Dotted path to the falling object's group.
    #[arg(long, default_value = "groups.1.groups.0")]
    object: String,

    /// Dotted path to the camera data block.
    #[arg(long, default_value = "cameraData")]
    camera: String,

    /// Dotted path to the card stack group.
    #[arg(long, default_value = "groups.2")]
    cards: String,

    /// Canvas width passed to the renderer.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Canvas height passed to the renderer.
    #[arg(long, default_value_t = 768)]
    height: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    /// Plain linear fall.
    Fall,
    /// Faster fall with object spin, camera orbit, and card scatter.
    Plunge,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Emit(args) => run_batch(args.common, None),
        Command::Render(args) => run_batch(args.common, Some(Renderer::new(args.renderer))),
    }
}

fn build_config(args: CommonArgs, renderer: Option<Renderer>) -> anyhow::Result<RunConfig> {
    let spec = match args.preset {
        PresetChoice::Fall => MutateSpec::fall(),
        PresetChoice::Plunge => MutateSpec::plunge(),
    };

    let targets = MutateTargets {
        object: args.object.parse::<FieldPath>()?,
        camera: args.camera.parse::<FieldPath>()?,
        cards: args.cards.parse::<FieldPath>()?,
    };

    let template = IniTemplate {
        width: args.width,
        height: args.height,
        shadows: spec.shadows,
        ..IniTemplate::default()
    };

    Ok(RunConfig {
        scene_path: args.scene,
        frames_dir: args.frames_dir,
        ini_dir: args.ini_dir,
        out_dir: args.out_dir,
        renderer,
        frames: args.frames,
        seed: args.seed,
        spec,
        targets,
        template,
    })
}

fn run_batch(args: CommonArgs, renderer: Option<Renderer>) -> anyhow::Result<()> {
    let cfg = build_config(args, renderer)?;
    let rendering = cfg.renderer.is_some();

    let report = raybatch::run(&cfg)?;

    if rendering {
        for outcome in report.failed() {
            let detail = outcome.stderr.trim();
            if detail.is_empty() {
                eprintln!("frame {} failed: {}", outcome.frame.0, outcome.status);
            } else {
                eprintln!(
                    "frame {} failed: {} ({detail})",
                    outcome.frame.0, outcome.status
                );
            }
        }
        eprintln!(
            "rendered {}/{} frames",
            report.outcomes.len() - report.failed_count(),
            report.outcomes.len()
        );
    } else {
        eprintln!("wrote {} frames to {}", cfg.frames, cfg.frames_dir.display());
    }

    Ok(())
}
