mod status_bar;
mod wall;

pub use status_bar::StatusBarWidget;
pub use wall::WallWidget;
