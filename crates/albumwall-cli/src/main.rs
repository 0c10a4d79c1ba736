use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use albumwall_core::{AppConfig, ScrollDirection};

mod commands;

#[derive(Parser)]
#[command(name = "albumwall")]
#[command(author, version, about = "An infinitely scrolling album art wall")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wall in the terminal
    Run {
        #[command(flatten)]
        palette: PaletteArgs,
        /// Preferred cell size in halfblock pixels
        #[arg(short = 'c', long)]
        cell_size: Option<f64>,
        /// Wait for `s` before scrolling
        #[arg(long)]
        paused: bool,
    },
    /// Render frames to PNG files without a terminal
    Render {
        #[command(flatten)]
        palette: PaletteArgs,
        /// Frame width in pixels
        #[arg(short = 'W', long)]
        width: Option<u32>,
        /// Frame height in pixels
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Number of frames to write
        #[arg(short = 'n', long)]
        frames: Option<u32>,
        /// Output directory
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
        /// Preferred cell size in pixels
        #[arg(short = 'c', long)]
        cell_size: Option<f64>,
        /// Scroll direction (rising, falling)
        #[arg(short = 'd', long)]
        direction: Option<ScrollDirection>,
    },
    /// Print the grid derived for a surface size
    Layout {
        /// Surface width in pixels
        #[arg(short = 'W', long)]
        width: Option<u32>,
        /// Surface height in pixels
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Preferred cell size in pixels
        #[arg(short = 'c', long)]
        cell_size: Option<f64>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

/// Where the wall's images come from
#[derive(Args, Debug, Clone, Default)]
pub struct PaletteArgs {
    /// Directory of images (defaults to general.image_dir)
    #[arg(short = 'i', long, conflicts_with = "demo")]
    pub images: Option<PathBuf>,
    /// Use generated demo tiles instead of image files
    #[arg(long)]
    pub demo: bool,
}

/// Install the global subscriber. `RUST_LOG` wins over `general.log_level`.
/// With `log_file` set, output goes to that file instead of stderr.
fn init_logging(config: &AppConfig, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    // The TUI owns the terminal, so its logs go to a file
    let log_file = match cli.command {
        Some(Commands::Run { .. }) | None => Some(config.log_path()),
        _ => None,
    };
    init_logging(&config, log_file.as_deref())?;

    match cli.command {
        Some(Commands::Run {
            palette,
            cell_size,
            paused,
        }) => {
            if let Some(cell_size) = cell_size {
                config.ui.cell_size = cell_size;
            }
            if paused {
                config.composite.start_automatically = false;
            }
            let tiles = commands::load_palette(&config, &palette).await?;
            commands::run::run(Arc::new(config), tiles).await
        }
        None => {
            let tiles = commands::load_palette(&config, &PaletteArgs::default()).await?;
            commands::run::run(Arc::new(config), tiles).await
        }
        Some(Commands::Render {
            palette,
            width,
            height,
            frames,
            out,
            cell_size,
            direction,
        }) => {
            if let Some(width) = width {
                config.render.width = width;
            }
            if let Some(height) = height {
                config.render.height = height;
            }
            if let Some(frames) = frames {
                config.render.frames = frames;
            }
            if let Some(out) = out {
                config.render.output_dir = out;
            }
            if let Some(cell_size) = cell_size {
                config.composite.preferred_cell_size = cell_size;
            }
            if let Some(direction) = direction {
                config.composite.scroll_direction = direction;
            }
            config.composite.validate()?;
            let tiles = commands::load_palette(&config, &palette).await?;
            commands::render::run(&config, tiles)
        }
        Some(Commands::Layout {
            width,
            height,
            cell_size,
        }) => commands::layout::run(
            width.unwrap_or(config.render.width),
            height.unwrap_or(config.render.height),
            cell_size.unwrap_or(config.composite.preferred_cell_size),
        ),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
