//! Binary entrypoint for slideview.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use slideview::config::Configuration;
use slideview::loader::Loader;
use slideview::scan::{self, ScanOptions};
use slideview::shell::{Shell, ShellOptions};
use slideview::viewer::Viewer;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "slideview", about = "Image browser and slideshow viewer")]
struct Cli {
    /// Image files or directories to browse
    images: Vec<PathBuf>,

    /// Path to YAML config file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start in fullscreen
    #[arg(short, long)]
    fullscreen: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Follow symbolic links while walking
    #[arg(short = 'L', long)]
    follow_links: bool,

    /// Include every regular file, not only image types
    #[arg(short, long)]
    all_files: bool,

    /// Signed slideshow delay in seconds (positive random, negative sequential)
    #[arg(short, long, value_name = "SECS", allow_negative_numbers = true)]
    delay: Option<i64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("slideview={level}").parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = Configuration::load(cli.config.as_deref())
        .context("loading configuration")?
        .validated()
        .context("validating configuration")?;
    let keymap = cfg.keymap()?;

    let opts = ScanOptions {
        recursive: cli.recursive || cfg.scan.recursive,
        follow_links: cli.follow_links || cfg.scan.follow_links,
        filter_images: cfg.scan.filter_images && !cli.all_files,
    };
    let scan = scan::resolve(&cli.images, &opts).context("resolving image paths")?;
    info!(count = scan.images.len(), "resolved images");

    let viewer = Viewer::new(Loader, scan);
    let shell = Shell::new(
        viewer,
        ShellOptions {
            gui: cfg.gui.clone(),
            keymap,
            initial_delay: cli.delay.unwrap_or(cfg.slideshow.delay),
            fullscreen: cli.fullscreen,
        },
    );
    shell.run()
}
