use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;

use crt_filter::{FilterSession, FrameLayout, RasterGeometry, SessionOpts, Size, run_stream};

/// Read raw `0x00RRGGBB` frames from stdin and write CRT-filtered frames to stdout.
#[derive(Parser, Debug)]
#[command(name = "crt-filter", version)]
struct Cli {
    /// Input frame width in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    in_width: u32,

    /// Input frame height in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    in_height: u32,

    /// Output frame width in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    out_width: u32,

    /// Output frame height in pixels.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    out_height: u32,

    /// Number of virtual scanlines.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    scanlines: u32,

    /// Raster geometry JSON overriding the built-in shadow mask.
    #[arg(long)]
    geometry: Option<PathBuf>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Recently seen frames to memoize (0 disables the cache).
    #[arg(long, default_value_t = 4)]
    cache_frames: usize,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let layout = FrameLayout::new(
        Size::new(cli.in_width, cli.in_height),
        Size::new(cli.out_width, cli.out_height),
        cli.scanlines,
    )
    .context("invalid frame layout")?;

    let geometry = match &cli.geometry {
        Some(path) => RasterGeometry::load(path)
            .with_context(|| format!("load geometry '{}'", path.display()))?,
        None => RasterGeometry::default(),
    };

    let opts = SessionOpts {
        geometry,
        threads: cli.threads,
        cache_frames: cli.cache_frames,
    };
    let mut session = FilterSession::new(layout, opts).context("build filter session")?;

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let summary = run_stream(stdin, stdout, &mut session).context("filter frame stream")?;

    tracing::info!(
        frames = summary.frames,
        reused = summary.reused,
        rendered = session.stats().frames_rendered,
        "done"
    );
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
