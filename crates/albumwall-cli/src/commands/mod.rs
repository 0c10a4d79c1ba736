pub mod config;
pub mod layout;
pub mod render;
pub mod run;

use anyhow::{bail, Result};
use tracing::info;

use albumwall_core::palette::{demo_palette, load_tiles};
use albumwall_core::{AppConfig, Tile};

use crate::PaletteArgs;

const DEMO_TILES: usize = 12;
const DEMO_TILE_SIDE: u32 = 64;

/// Resolve the images for the wall.
///
/// An explicit `--images` directory must exist. The configured default may
/// be missing, in which case the demo tiles are used.
pub async fn load_palette(config: &AppConfig, args: &PaletteArgs) -> Result<Vec<Tile>> {
    if args.demo {
        return Ok(demo_palette(DEMO_TILES, DEMO_TILE_SIDE));
    }

    let dir = match &args.images {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Image directory {} does not exist", dir.display());
            }
            dir.clone()
        }
        None => {
            let dir = config.image_dir();
            if !dir.is_dir() {
                info!(
                    "Image directory {} not found, using demo tiles",
                    dir.display()
                );
                return Ok(demo_palette(DEMO_TILES, DEMO_TILE_SIDE));
            }
            dir
        }
    };

    Ok(load_tiles(dir).await?)
}
