use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::engine::ScrollEngine;
use crate::surface::DrawSurface;
use crate::{Error, Result};

/// Owner of a running animation
///
/// Stopping is cooperative: a frame being drawn is always finished. Dropping
/// the handle stops the animation as well.
pub struct AnimationHandle<S: DrawSurface> {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<ScrollEngine<S>>>,
}

impl<S: DrawSurface> AnimationHandle<S> {
    pub(super) fn new(shutdown_tx: watch::Sender<bool>, task: JoinHandle<ScrollEngine<S>>) -> Self {
        Self {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Ask the animation to stop after the current frame. Idempotent.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_stopping(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Whether the redraw loop has exited (stopped or failed for good)
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Stop the animation and wait for the loop to exit, returning the engine
    pub async fn shutdown(mut self) -> Result<ScrollEngine<S>> {
        self.stop();
        let task = self
            .task
            .take()
            .ok_or_else(|| Error::Other("Animation already joined".to_string()))?;
        task.await
            .map_err(|e| Error::Other(format!("Animation task failed: {}", e)))
    }
}

impl<S: DrawSurface> Drop for AnimationHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
