//! Observable layout inputs
//!
//! The surface size and the preferred cell size can change at any time
//! (window resize, user setting). The engine holds the receiving side and
//! reads the latest values at the start of every tick; whoever owns the
//! window holds the [`InputsController`].

use tokio::sync::watch;

use crate::layout::SurfaceSize;

/// Receiving side, owned by the engine
#[derive(Debug, Clone)]
pub struct LayoutInputs {
    size: watch::Receiver<SurfaceSize>,
    preferred_cell_size: watch::Receiver<f64>,
}

/// Sending side, owned by the host
#[derive(Debug, Clone)]
pub struct InputsController {
    size: watch::Sender<SurfaceSize>,
    preferred_cell_size: watch::Sender<f64>,
}

impl LayoutInputs {
    pub fn new(size: SurfaceSize, preferred_cell_size: f64) -> (Self, InputsController) {
        let (size_tx, size_rx) = watch::channel(size);
        let (cell_tx, cell_rx) = watch::channel(preferred_cell_size);
        (
            Self {
                size: size_rx,
                preferred_cell_size: cell_rx,
            },
            InputsController {
                size: size_tx,
                preferred_cell_size: cell_tx,
            },
        )
    }

    /// Inputs that never change
    pub fn fixed(size: SurfaceSize, preferred_cell_size: f64) -> Self {
        Self::new(size, preferred_cell_size).0
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        *self.size.borrow()
    }

    #[inline]
    pub fn preferred_cell_size(&self) -> f64 {
        *self.preferred_cell_size.borrow()
    }
}

impl InputsController {
    /// Publish a new surface size. Takes effect on the next tick.
    pub fn resize(&self, width: u32, height: u32) {
        let size = SurfaceSize::new(width, height);
        self.size.send_if_modified(|current| {
            if *current == size {
                false
            } else {
                *current = size;
                true
            }
        });
    }

    pub fn set_preferred_cell_size(&self, preferred_cell_size: f64) {
        self.preferred_cell_size.send_replace(preferred_cell_size);
    }

    pub fn size(&self) -> SurfaceSize {
        *self.size.borrow()
    }

    pub fn preferred_cell_size(&self) -> f64 {
        *self.preferred_cell_size.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_value_is_observed() {
        let (inputs, controller) = LayoutInputs::new(SurfaceSize::new(100, 100), 50.0);
        assert_eq!(inputs.size(), SurfaceSize::new(100, 100));

        controller.resize(300, 200);
        controller.resize(320, 240);
        controller.set_preferred_cell_size(64.0);

        assert_eq!(inputs.size(), SurfaceSize::new(320, 240));
        assert_eq!(inputs.preferred_cell_size(), 64.0);
    }

    #[test]
    fn test_values_survive_dropped_controller() {
        let (inputs, controller) = LayoutInputs::new(SurfaceSize::new(10, 10), 5.0);
        drop(controller);
        // The last published values stay readable
        assert_eq!(inputs.size(), SurfaceSize::new(10, 10));
        assert_eq!(inputs.preferred_cell_size(), 5.0);
    }

    #[test]
    fn test_fixed_inputs() {
        let inputs = LayoutInputs::fixed(SurfaceSize::new(1, 2), 3.0);
        assert_eq!(inputs.size(), SurfaceSize::new(1, 2));
        assert_eq!(inputs.preferred_cell_size(), 3.0);
    }
}
