use anyhow::Result;

use albumwall_core::{Layout, SurfaceSize};

pub fn run(width: u32, height: u32, cell_size: f64) -> Result<()> {
    let layout = Layout::compute(SurfaceSize::new(width, height), cell_size)?;
    println!("{}", describe(&layout));
    Ok(())
}

fn describe(layout: &Layout) -> String {
    format!(
        "Surface:         {}x{} px\n\
         Preferred cell:  {} px\n\
         Columns:         {}\n\
         Rows:            {}\n\
         Horizontal gap:  {} px\n\
         Actual cell:     {:.3} px\n\
         Cells per frame: {}",
        layout.size.width,
        layout.size.height,
        layout.preferred_cell_size,
        layout.column_count,
        layout.row_count,
        layout.horizontal_gap,
        layout.actual_cell_size,
        layout.cells_per_frame(0.0),
    )
}
