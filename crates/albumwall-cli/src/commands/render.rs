use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use albumwall_core::{AppConfig, LayoutInputs, RasterSurface, ScrollEngine, SurfaceSize, Tile};

pub fn run(config: &AppConfig, tiles: Vec<Tile>) -> Result<()> {
    let out = &config.render.output_dir;
    let written = render_frames(config, tiles, out)?;
    println!("Wrote {} frames to {}", written.len(), out.display());
    Ok(())
}

/// Start the wall headlessly and write `render.frames` consecutive frames
/// as numbered PNG files. The first file is the frame drawn by start.
pub fn render_frames(config: &AppConfig, tiles: Vec<Tile>, out: &Path) -> Result<Vec<PathBuf>> {
    let frames = config.render.frames;
    if frames == 0 {
        bail!("Nothing to render: frames must be at least 1");
    }

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let size = SurfaceSize::new(config.render.width, config.render.height);
    let inputs = LayoutInputs::fixed(size, config.composite.preferred_cell_size);
    let mut engine =
        ScrollEngine::new(config.composite.clone(), RasterSurface::new(size), inputs, tiles)?;
    engine.start()?;

    if let Some(layout) = engine.last_layout() {
        info!(
            "Rendering {} frames at {}x{}: {} columns x {} rows of {:.2}px",
            frames,
            size.width,
            size.height,
            layout.column_count,
            layout.row_count,
            layout.actual_cell_size
        );
    }

    let mut written = Vec::with_capacity(frames as usize);
    for index in 0..frames {
        if index > 0 {
            engine.tick()?;
        }
        let path = out.join(format!("frame_{:05}.png", index));
        engine
            .surface()
            .canvas()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(frame = index, scroll = ?engine.scroll_state(), "Wrote frame");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use albumwall_core::palette::demo_palette;
    use albumwall_core::ScrollDirection;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "albumwall-render-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn config(frames: u32) -> AppConfig {
        let mut config = AppConfig::default();
        config.render.width = 40;
        config.render.height = 30;
        config.render.frames = frames;
        config.composite.preferred_cell_size = 10.0;
        config
    }

    #[test]
    fn test_writes_numbered_frames() {
        let dir = scratch_dir("frames");
        let written = render_frames(&config(3), demo_palette(4, 8), &dir).unwrap();

        assert_eq!(written.len(), 3);
        assert!(written[0].ends_with("frame_00000.png"));
        assert!(written[2].ends_with("frame_00002.png"));

        let first = image::open(&written[0]).unwrap();
        assert_eq!((first.width(), first.height()), (40, 30));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_palette_fails_before_writing() {
        let dir = scratch_dir("empty");
        assert!(render_frames(&config(2), Vec::new(), &dir).is_err());
        let entries = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
        assert_eq!(entries, 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_falling_direction_is_rejected() {
        let dir = scratch_dir("falling");
        let mut config = config(1);
        config.composite.scroll_direction = ScrollDirection::Falling;
        let err = render_frames(&config, demo_palette(2, 8), &dir).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_frames_rejected() {
        let dir = scratch_dir("zero");
        assert!(render_frames(&config(0), demo_palette(2, 8), &dir).is_err());
    }
}
