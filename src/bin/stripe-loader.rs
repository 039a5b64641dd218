use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stripe_loader::{
    Animator, CpuSurface, FrameOutcome, LoaderOptions, LoaderState, ManualScheduler, Surface,
};

#[derive(Parser, Debug)]
#[command(name = "stripe-loader", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the indicator at one point in time as a PNG.
    Frame(FrameArgs),
    /// Render a numbered PNG sequence until the indicator finishes.
    Sequence(SequenceArgs),
    /// Print the default options as JSON.
    Defaults,
}

#[derive(Args, Debug)]
struct SurfaceArgs {
    /// Surface width in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8192))]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8192))]
    height: u32,

    /// Options JSON (camelCase keys, missing keys keep their defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the rectangle phase.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Time (ms) at which `stop` is issued.
    #[arg(long)]
    stop_at: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Elapsed time (ms) of the rendered frame.
    #[arg(long)]
    at: f64,

    /// Frame spacing (ms) used to reach `--at`.
    #[arg(long, default_value_t = 16.0)]
    step: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,

    /// Upper bound (ms) of the rendered timeline.
    #[arg(long)]
    duration: f64,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_options(path: Option<&Path>) -> anyhow::Result<LoaderOptions> {
    let Some(path) = path else {
        return Ok(LoaderOptions::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read options '{}'", path.display()))?;
    let opts = LoaderOptions::from_json_str(&json)
        .with_context(|| format!("parse options '{}'", path.display()))?;
    Ok(opts)
}

/// An animator plus the host-side clock and scheduler feeding it.
struct Timeline {
    animator: Animator<CpuSurface>,
    sched: ManualScheduler,
    stop_at: Option<f64>,
}

impl Timeline {
    fn new(args: &SurfaceArgs) -> anyhow::Result<Self> {
        let opts = read_options(args.config.as_deref())?;
        let surface = CpuSurface::new(args.width, args.height);
        let mut animator = Animator::with_seed(surface, opts, args.seed);
        let mut sched = ManualScheduler::new();
        animator.start(&mut sched);
        Ok(Self {
            animator,
            sched,
            stop_at: args.stop_at,
        })
    }

    /// Deliver the pending frame at `t`; `None` when nothing was pending.
    fn advance(&mut self, t: f64) -> Option<FrameOutcome> {
        if let Some(stop_at) = self.stop_at
            && t >= stop_at
            && self.animator.state() == LoaderState::Active
        {
            self.animator.stop();
        }
        let ticket = self.sched.next_ticket()?;
        Some(self.animator.on_frame(ticket, t, &mut self.sched))
    }
}

fn write_png(surface: &CpuSurface, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        surface.pixels(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        anyhow::bail!("--step must be a positive number of milliseconds");
    }
    if !(args.at.is_finite() && args.at >= 0.0) {
        anyhow::bail!("--at must be a non-negative number of milliseconds");
    }

    let mut timeline = Timeline::new(&args.surface)?;
    let mut t = 0.0;
    loop {
        if timeline.advance(t).is_none() {
            break;
        }
        if t >= args.at {
            break;
        }
        t = (t + args.step).min(args.at);
    }

    write_png(timeline.animator.surface(), &args.out)?;
    eprintln!(
        "wrote {} (state {:?})",
        args.out.display(),
        timeline.animator.state()
    );
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration >= 0.0) {
        anyhow::bail!("--duration must be a non-negative number of milliseconds");
    }
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let mut timeline = Timeline::new(&args.surface)?;
    let frame_ms = 1000.0 / f64::from(args.fps);
    let mut index: u64 = 0;
    loop {
        let t = index as f64 * frame_ms;
        if t > args.duration {
            break;
        }
        let Some(outcome) = timeline.advance(t) else {
            break;
        };

        let path = args.out.join(format!("frame_{index:05}.png"));
        write_png(timeline.animator.surface(), &path)?;
        index += 1;
        if outcome == FrameOutcome::Finished {
            break;
        }
    }

    eprintln!("wrote {index} frames to {}", args.out.display());
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&LoaderOptions::default())
        .context("serialize default options")?;
    println!("{json}");
    Ok(())
}
