use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::surface::Tile;
use crate::{Error, Result};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check whether a path has an extension the decoder is expected to handle
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Decode every supported image in `dir`, ordered by file name
///
/// Files that fail to decode are skipped with a warning. An empty result is
/// not an error here; starting the wall with it is.
pub fn load_tiles_blocking(dir: &Path) -> Result<Vec<Tile>> {
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "Image directory does not exist: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    paths.sort();

    let mut tiles = Vec::with_capacity(paths.len());
    for path in &paths {
        match image::open(path) {
            Ok(image) => {
                debug!("Loaded {}", path.display());
                tiles.push(Tile::from(image));
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    info!(
        "Loaded {} of {} images from {}",
        tiles.len(),
        paths.len(),
        dir.display()
    );
    Ok(tiles)
}

/// Decode a directory of images on the blocking thread pool
pub async fn load_tiles(dir: PathBuf) -> Result<Vec<Tile>> {
    tokio::task::spawn_blocking(move || load_tiles_blocking(&dir))
        .await
        .map_err(|e| Error::Other(format!("Image loading task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "albumwall-loader-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("cover.PNG")));
        assert!(is_supported_image(Path::new("a/b/cover.jpeg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_missing_directory() {
        let result = load_tiles_blocking(Path::new("/definitely/not/here/albumwall"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_loads_sorted_and_skips_broken_files() {
        let dir = scratch_dir("sorted");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))
            .save(dir.join("b.png"))
            .unwrap();
        RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]))
            .save(dir.join("a.png"))
            .unwrap();
        std::fs::write(dir.join("c.png"), b"not really a png").unwrap();
        std::fs::write(dir.join("readme.txt"), b"ignored").unwrap();

        let tiles = load_tiles(dir.clone()).await.unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].pixels().dimensions(), (3, 3));
        assert_eq!(tiles[1].pixels().dimensions(), (2, 2));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
