//! Gapless grid calculation
//!
//! Derives the column count, row count and the actual (square) cell size
//! from the surface dimensions and a preferred cell size. The leftover
//! horizontal space is spread evenly over the columns so the grid always
//! spans the full width; rows are rounded up so the bottom edge is always
//! covered, with the last row clipped by the surface.

use crate::{Error, Result};

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Grid derived from a surface size and a preferred cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: SurfaceSize,
    pub preferred_cell_size: f64,
    pub column_count: u32,
    pub row_count: u32,
    /// Width the preferred-size columns leave unused, always in `[0, preferred)`
    pub horizontal_gap: f64,
    pub actual_cell_size: f64,
}

impl Layout {
    pub fn compute(size: SurfaceSize, preferred_cell_size: f64) -> Result<Self> {
        let degenerate = || Error::DegenerateLayout {
            width: size.width,
            preferred: preferred_cell_size,
        };

        if !preferred_cell_size.is_finite() || preferred_cell_size <= 0.0 {
            return Err(degenerate());
        }

        let too_large = || Error::GridTooLarge {
            width: size.width,
            height: size.height,
            preferred: preferred_cell_size,
        };

        let columns = column_count(size.width, preferred_cell_size);
        if columns == 0.0 {
            return Err(degenerate());
        }
        let column_count = u32::try_from(columns as u64).map_err(|_| too_large())?;

        let horizontal_gap = size.width as f64 - columns * preferred_cell_size;
        let actual_cell_size = preferred_cell_size + horizontal_gap / columns;

        let rows = row_count(size.height, actual_cell_size);
        let row_count = u32::try_from(rows as u64).map_err(|_| too_large())?;

        Ok(Self {
            size,
            preferred_cell_size,
            column_count,
            row_count,
            horizontal_gap,
            actual_cell_size,
        })
    }

    /// Number of images a full frame pulls from the cursor. Includes the
    /// extra row that is partially hidden above the top edge while offset.
    pub fn cells_per_frame(&self, offset: f64) -> usize {
        let mut rows = 0usize;
        let mut y = -offset;
        while y < self.size.height as f64 {
            rows += 1;
            y += self.actual_cell_size;
        }
        rows * self.column_count as usize
    }
}

/// `floor(width / preferred)` as an exact whole number, kept in f64 so huge
/// ratios are not clamped. Rounding in the division is corrected so that
/// `0 <= width - columns * preferred < preferred` holds for the result.
fn column_count(width: u32, preferred: f64) -> f64 {
    let width = width as f64;
    let mut columns = (width / preferred).floor();
    while columns > 0.0 && columns * preferred > width {
        columns -= 1.0;
    }
    while width - columns * preferred >= preferred {
        columns += 1.0;
    }
    columns
}

/// `ceil(height / actual)`, corrected the same way so the rows cover the
/// height with no spare row.
fn row_count(height: u32, actual_cell_size: f64) -> f64 {
    let height = height as f64;
    let mut rows = (height / actual_cell_size).ceil();
    while rows * actual_cell_size < height {
        rows += 1.0;
    }
    while rows > 0.0 && (rows - 1.0) * actual_cell_size >= height {
        rows -= 1.0;
    }
    rows
}
