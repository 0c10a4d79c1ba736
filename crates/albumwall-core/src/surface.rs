//! Drawing surface abstraction
//!
//! The engine only needs four primitives from whatever it draws on: resize,
//! clear a rectangle, fill a rectangle and draw an image scaled into a
//! rectangle. [`RasterSurface`] implements them on an in-memory RGBA canvas.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tokio::sync::mpsc;

use crate::color::Color;
use crate::layout::SurfaceSize;

/// Decoded raster with intrinsic pixel dimensions
pub trait Bitmap {
    fn dimensions(&self) -> (u32, u32);
}

impl Bitmap for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }
}

impl Bitmap for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        image::GenericImageView::dimensions(self)
    }
}

impl<T: Bitmap + ?Sized> Bitmap for Arc<T> {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}

/// Axis-aligned rectangle in surface pixels. Positions may be negative or
/// extend past the surface; the surface clips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn of_size(size: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    pub fn square(x: f64, y: f64, side: f64) -> Self {
        Self::new(x, y, side, side)
    }
}

pub trait DrawSurface {
    type Image: Bitmap;

    /// Change the surface dimensions. Contents are discarded.
    fn resize(&mut self, size: SurfaceSize);

    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `image` scaled to exactly fill `rect`
    fn draw_image(&mut self, image: &Self::Image, rect: Rect);

    /// Called once a complete frame has been drawn
    fn present(&mut self) {}
}

static NEXT_TILE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared, immutable image handle drawn by [`RasterSurface`]
#[derive(Debug, Clone)]
pub struct Tile {
    id: u64,
    pixels: Arc<RgbaImage>,
}

impl Tile {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: NEXT_TILE_ID.fetch_add(1, Ordering::Relaxed),
            pixels: Arc::new(pixels),
        }
    }

    /// Square tile filled with a single color
    pub fn solid(color: Color, side: u32) -> Self {
        Self::new(RgbaImage::from_pixel(side, side, color.into()))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl From<DynamicImage> for Tile {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }
}

impl From<RgbaImage> for Tile {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

impl Bitmap for Tile {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// In-memory RGBA canvas
pub struct RasterSurface {
    canvas: RgbaImage,
    /// Scaled copies of tiles, keyed by tile id and edge length
    scaled: HashMap<(u64, u32), RgbaImage>,
    filter: FilterType,
    frame_tx: Option<mpsc::UnboundedSender<RgbaImage>>,
}

impl RasterSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            canvas: RgbaImage::new(size.width, size.height),
            scaled: HashMap::new(),
            filter: FilterType::Triangle,
            frame_tx: None,
        }
    }

    /// Publish a copy of every presented frame on `tx`
    pub fn with_frame_sender(mut self, tx: mpsc::UnboundedSender<RgbaImage>) -> Self {
        self.frame_tx = Some(tx);
        self
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    /// Clip a rectangle to the canvas and return integer pixel bounds
    /// `(x0, y0, x1, y1)`, or `None` when nothing is visible.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.floor().max(0.0);
        let y0 = rect.y.floor().max(0.0);
        let x1 = (rect.x + rect.width).ceil().min(self.canvas.width() as f64);
        let y1 = (rect.y + rect.height).ceil().min(self.canvas.height() as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn paint(&mut self, rect: Rect, pixel: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.put_pixel(x, y, pixel);
            }
        }
    }
}

impl DrawSurface for RasterSurface {
    type Image = Tile;

    fn resize(&mut self, size: SurfaceSize) {
        if self.size() != size {
            tracing::debug!(width = size.width, height = size.height, "Resizing raster surface");
        }
        self.canvas = RgbaImage::new(size.width, size.height);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.paint(rect, Color::TRANSPARENT.into());
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.paint(rect, color.into());
    }

    fn draw_image(&mut self, image: &Tile, rect: Rect) {
        // Round the edge up so adjacent fractional cells never leave a seam
        let side = rect.width.max(rect.height).ceil().max(1.0) as u32;
        let key = (image.id(), side);

        if !self.scaled.contains_key(&key) {
            // Layout changes make old sizes useless; keep the cache to one size
            self.scaled.retain(|(_, cached_side), _| *cached_side == side);
            let resized = imageops::resize(image.pixels(), side, side, self.filter);
            self.scaled.insert(key, resized);
        }

        if let Some(scaled) = self.scaled.get(&key) {
            imageops::overlay(
                &mut self.canvas,
                scaled,
                rect.x.floor() as i64,
                rect.y.floor() as i64,
            );
        }
    }

    fn present(&mut self) {
        let disconnected = match self.frame_tx {
            Some(ref tx) => tx.send(self.canvas.clone()).is_err(),
            None => false,
        };
        if disconnected {
            tracing::warn!("Frame receiver dropped, no longer publishing frames");
            self.frame_tx = None;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(0xff, 0, 0);

    #[test]
    fn test_fill_and_clear_are_clipped() {
        let mut surface = RasterSurface::new(SurfaceSize::new(4, 4));
        surface.fill_rect(Rect::new(-2.0, -2.0, 4.0, 4.0), RED);
        assert_eq!(surface.canvas().get_pixel(0, 0), &Rgba(RED.to_array()));
        assert_eq!(surface.canvas().get_pixel(1, 1), &Rgba(RED.to_array()));
        assert_eq!(surface.canvas().get_pixel(2, 2), &Rgba([0, 0, 0, 0]));

        surface.clear_rect(Rect::of_size(surface.size()));
        assert!(surface.canvas().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_scales_into_cell() {
        let mut surface =
            RasterSurface::new(SurfaceSize::new(8, 8)).with_filter(FilterType::Nearest);
        let tile = Tile::solid(RED, 2);
        surface.draw_image(&tile, Rect::square(4.0, -2.0, 4.0));

        // Visible part: x 4..8, y 0..2
        assert_eq!(surface.canvas().get_pixel(5, 1), &Rgba(RED.to_array()));
        assert_eq!(surface.canvas().get_pixel(5, 2), &Rgba([0, 0, 0, 0]));
        assert_eq!(surface.canvas().get_pixel(3, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_scaled_cache_keeps_one_size() {
        let mut surface = RasterSurface::new(SurfaceSize::new(8, 8));
        let tile = Tile::solid(RED, 2);
        surface.draw_image(&tile, Rect::square(0.0, 0.0, 4.0));
        surface.draw_image(&tile, Rect::square(4.0, 0.0, 4.0));
        assert_eq!(surface.scaled.len(), 1);
        surface.draw_image(&tile, Rect::square(0.0, 0.0, 3.0));
        assert_eq!(surface.scaled.len(), 1);
        assert!(surface.scaled.contains_key(&(tile.id(), 3)));
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut surface = RasterSurface::new(SurfaceSize::new(2, 2));
        surface.fill_rect(Rect::of_size(surface.size()), RED);
        surface.resize(SurfaceSize::new(3, 1));
        assert_eq!(surface.size(), SurfaceSize::new(3, 1));
        assert!(surface.canvas().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_present_publishes_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = RasterSurface::new(SurfaceSize::new(2, 2)).with_frame_sender(tx);
        surface.fill_rect(Rect::of_size(surface.size()), RED);
        surface.present();
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.get_pixel(1, 1), &Rgba(RED.to_array()));

        drop(rx);
        surface.present();
        assert!(surface.frame_tx.is_none());
    }

    #[test]
    fn test_tiles_have_distinct_ids() {
        let a = Tile::solid(RED, 1);
        let b = Tile::solid(RED, 1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert_eq!(a.dimensions(), (1, 1));
    }
}
