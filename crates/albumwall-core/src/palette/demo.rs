use image::{Rgba, RgbaImage};

use crate::surface::Tile;

/// Album-cover-like placeholder tiles: diagonal two-tone gradients whose
/// hues walk around the color wheel.
pub fn demo_palette(count: usize, side: u32) -> Vec<Tile> {
    let side = side.max(1);
    (0..count)
        .map(|i| {
            let hue = i as f64 / count.max(1) as f64;
            let from = hue_to_rgb(hue);
            let to = hue_to_rgb((hue + 0.35) % 1.0);
            Tile::new(diagonal_gradient(side, from, to))
        })
        .collect()
}

fn diagonal_gradient(side: u32, from: [u8; 3], to: [u8; 3]) -> RgbaImage {
    let span = (2 * (side - 1)).max(1) as f64;
    RgbaImage::from_fn(side, side, |x, y| {
        let t = (x + y) as f64 / span;
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba([mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2]), 0xff])
    })
}

/// Fully saturated color for a hue in [0, 1)
fn hue_to_rgb(hue: f64) -> [u8; 3] {
    let h = hue * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}
