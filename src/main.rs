//! BINVIS - binary visualizer.
//!
//! Renders a file onto a Hilbert curve PNG.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use memmap2::Mmap;

use binvis::{visualize, ColorMode, Error, Highlight, Layout, Sampling, VisualizeConfig};

#[derive(Parser)]
#[command(name = "binvis")]
#[command(about = "Render a binary file onto a Hilbert curve image")]
#[command(version)]
struct Cli {
    /// File to visualize
    input: PathBuf,

    /// Output PNG (defaults to <INPUT>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Color mode: class, hilbert, gradient or entropy
    #[arg(short, long, default_value = "hilbert")]
    color: ColorMode,

    /// Tile edge in pixels, a power of two
    #[arg(short, long, default_value_t = binvis::DEFAULT_IMAGE_SIZE)]
    size: u32,

    /// Canvas layout: unrolled (size x 4*size) or square (size x size)
    #[arg(short, long, default_value = "unrolled")]
    layout: Layout,

    /// Byte range drawn in a fixed color, as START:END:RRGGBB
    #[arg(long)]
    highlight: Option<Highlight>,

    /// Sampling strategy: sequential or parallel
    #[arg(long, default_value = "parallel")]
    sampling: Sampling,
}

/// Size above which loading prints a warning.
const LARGE_FILE_WARNING_SIZE: u64 = 1024 * 1024 * 1024;

fn run(cli: &Cli) -> Result<(), Error> {
    let file = File::open(&cli.input)?;
    let size = file.metadata()?.len();
    if size == 0 {
        return Err(Error::EmptyBuffer);
    }
    if size > LARGE_FILE_WARNING_SIZE {
        warn!(
            "{} is {:.1} GB; the whole file is sampled",
            cli.input.display(),
            size as f64 / (1024.0 * 1024.0 * 1024.0)
        );
    }

    // SAFETY: the map is read-only and dropped before returning; the file is
    // not expected to be truncated while it is being drawn.
    let mmap = unsafe { Mmap::map(&file)? };

    let output = cli.output.clone().unwrap_or_else(|| {
        let mut name = cli.input.clone().into_os_string();
        name.push(".png");
        PathBuf::from(name)
    });

    let config = VisualizeConfig::default()
        .with_color_mode(cli.color)
        .with_image_size(cli.size)
        .with_layout(cli.layout)
        .with_highlight(cli.highlight)
        .with_sampling(cli.sampling);

    info!("loaded {} ({size} bytes)", cli.input.display());
    visualize(&mmap[..], &output, &config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}: {e}", cli.input.display());
            ExitCode::FAILURE
        }
    }
}
