pub mod animation;
pub mod color;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod layout;
pub mod palette;
pub mod surface;

pub use animation::{AnimationEvent, AnimationHandle, AnimationService};
pub use color::Color;
pub use config::{AppConfig, CompositeConfig, ScrollDirection};
pub use cursor::RepeatingCursor;
pub use engine::{EngineState, ScrollEngine, ScrollState};
pub use error::{Error, Result};
pub use inputs::{InputsController, LayoutInputs};
pub use layout::{Layout, SurfaceSize};
pub use palette::Palette;
pub use surface::{Bitmap, DrawSurface, RasterSurface, Rect, Tile};
