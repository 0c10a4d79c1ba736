//! Scroll engine for the album wall
//!
//! # Layers
//!
//! ## Atomic
//! - `state` - Scroll position arithmetic (offset step, row commit)
//!
//! ## Molecular
//! - `composite` - State machine combining layout, cursor and surface
//!
//! # Usage
//!
//! ```ignore
//! use albumwall_core::engine::ScrollEngine;
//! use albumwall_core::{CompositeConfig, LayoutInputs, RasterSurface, SurfaceSize};
//!
//! let (inputs, controller) = LayoutInputs::new(SurfaceSize::new(800, 600), 50.0);
//! let surface = RasterSurface::new(inputs.size());
//! let mut engine = ScrollEngine::new(CompositeConfig::default(), surface, inputs, tiles)?;
//!
//! engine.start()?;
//! loop {
//!     engine.tick()?;
//! }
//! ```

// Atomic
pub mod state;

// Molecular
pub mod composite;

pub use composite::{EngineState, ScrollEngine};
pub use state::{offset_step, ScrollState};
