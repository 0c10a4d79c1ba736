//! Timer that drives the scroll engine
//!
//! The engine is moved into a tokio task that ticks it every
//! `redraw_rate_ms`. The returned handle stops the timer when asked or when
//! dropped.

mod handle;
mod service;

pub use handle::AnimationHandle;
pub use service::{AnimationEvent, AnimationService};
