use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::handle::AnimationHandle;
use crate::engine::{ScrollEngine, ScrollState};
use crate::layout::Layout;
use crate::surface::DrawSurface;
use crate::Result;

/// Events emitted by the animation loop to notify the host
#[derive(Debug, Clone)]
pub enum AnimationEvent {
    /// A frame was drawn
    FrameDrawn {
        frame: u64,
        layout: Layout,
        scroll: ScrollState,
    },
    /// A tick failed; nothing was drawn and the scroll position is unchanged
    DrawFailed { message: String, recoverable: bool },
    /// The loop exited and will draw no more frames
    Stopped { frames: u64 },
}

/// Periodic redraw loop around a [`ScrollEngine`]
pub struct AnimationService<S: DrawSurface> {
    engine: ScrollEngine<S>,
    event_tx: Option<mpsc::UnboundedSender<AnimationEvent>>,
}

impl<S> AnimationService<S>
where
    S: DrawSurface + Send + 'static,
    S::Image: Send + Sync + 'static,
{
    pub fn new(engine: ScrollEngine<S>) -> Self {
        Self {
            engine,
            event_tx: None,
        }
    }

    /// Set the event sender for host notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<AnimationEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Send an event to the host (if event channel is configured)
    fn send_event(&self, event: AnimationEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                debug!("Animation event dropped: receiver closed");
            }
        }
    }

    /// Start the engine (unless the host already did) and spawn the redraw
    /// timer.
    ///
    /// Start errors are returned here and no task is spawned. Must be called
    /// within a tokio runtime.
    pub fn spawn(mut self) -> Result<AnimationHandle<S>> {
        if !self.engine.is_running() {
            self.engine.start()?;
        }
        self.emit_frame();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        Ok(AnimationHandle::new(shutdown_tx, task))
    }

    fn emit_frame(&self) {
        if self.event_tx.is_none() {
            return;
        }
        if let Some(layout) = self.engine.last_layout() {
            self.send_event(AnimationEvent::FrameDrawn {
                frame: self.engine.frames_drawn(),
                layout,
                scroll: self.engine.scroll_state(),
            });
        }
    }

    /// Tick the engine until shutdown is signalled or a draw fails for good.
    /// Returns the engine so its final state can be inspected.
    async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ScrollEngine<S> {
        let period = self.engine.config().redraw_interval();
        let mut interval = tokio::time::interval(period);
        // A slow draw pushes the next tick back instead of bursting
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick fires immediately; start() already drew that frame
        interval.tick().await;

        info!("Animation running: redraw every {}ms", period.as_millis());

        loop {
            tokio::select! {
                biased;

                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Animation received shutdown signal");
                        break;
                    }
                }

                _ = interval.tick() => {
                    match self.engine.tick() {
                        Ok(()) => self.emit_frame(),
                        Err(e) => {
                            let recoverable = e.is_recoverable();
                            self.send_event(AnimationEvent::DrawFailed {
                                message: e.to_string(),
                                recoverable,
                            });
                            if recoverable {
                                warn!("Skipped frame: {}", e);
                            } else {
                                error!("Animation stopped: {}", e);
                                break;
                            }
                        }
                    }
                }
            }
        }

        let frames = self.engine.frames_drawn();
        self.send_event(AnimationEvent::Stopped { frames });
        info!("Animation stopped after {} frames", frames);
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::{CompositeConfig, ScrollDirection};
    use crate::inputs::{InputsController, LayoutInputs};
    use crate::layout::SurfaceSize;
    use crate::surface::testing::{RecordingSurface, Swatch};
    use crate::Error;

    fn animation(
        images: u32,
        direction: ScrollDirection,
    ) -> (AnimationService<RecordingSurface>, InputsController) {
        let (inputs, controller) = LayoutInputs::new(SurfaceSize::new(200, 200), 100.0);
        let config = CompositeConfig {
            preferred_cell_size: 100.0,
            redraw_rate_ms: 20,
            scroll_speed_ms: 1000,
            scroll_direction: direction,
            ..Default::default()
        };
        let images = (0..images).map(Swatch).collect();
        let engine =
            ScrollEngine::new(config, RecordingSurface::default(), inputs, images).unwrap();
        (AnimationService::new(engine), controller)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_redraw_rate_until_stopped() {
        let (service, _controller) = animation(3, ScrollDirection::Rising);
        let handle = service.spawn().unwrap();

        tokio::time::sleep(Duration::from_millis(110)).await;
        let engine = handle.shutdown().await.unwrap();

        // One synchronous frame from start plus one per 20ms
        assert_eq!(engine.frames_drawn(), 1 + 5);
        assert!(engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_report_frames_and_stop() {
        let (service, _controller) = animation(3, ScrollDirection::Rising);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = service.with_event_sender(tx).spawn().unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await.unwrap();

        let mut frames = Vec::new();
        let mut stopped = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                AnimationEvent::FrameDrawn { frame, layout, .. } => {
                    assert_eq!(layout.column_count, 2);
                    frames.push(frame);
                }
                AnimationEvent::Stopped { frames } => stopped = Some(frames),
                AnimationEvent::DrawFailed { message, .. } => panic!("draw failed: {message}"),
            }
        }
        assert_eq!(frames, vec![1, 2, 3]);
        assert_eq!(stopped, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_degenerate_resize_skips_frames_and_recovers() {
        let (service, controller) = animation(3, ScrollDirection::Rising);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = service.with_event_sender(tx).spawn().unwrap();

        controller.resize(40, 200);
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.resize(200, 200);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let engine = handle.shutdown().await.unwrap();

        let mut failed = 0;
        while let Ok(event) = rx.try_recv() {
            if let AnimationEvent::DrawFailed { recoverable, .. } = event {
                assert!(recoverable);
                failed += 1;
            }
        }
        assert!(failed >= 2);
        assert!(engine.frames_drawn() > 1);
    }

    #[tokio::test]
    async fn test_start_errors_spawn_nothing() {
        let (service, _controller) = animation(0, ScrollDirection::Rising);
        assert!(matches!(service.spawn(), Err(Error::EmptyPalette)));

        let (service, _controller) = animation(3, ScrollDirection::Falling);
        assert!(matches!(
            service.spawn(),
            Err(Error::UnsupportedDirection(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_reuses_started_engine() {
        let (mut service, _controller) = animation(3, ScrollDirection::Rising);
        service.engine.start().unwrap();
        let handle = service.spawn().unwrap();
        handle.stop();

        // No second start frame
        let engine = handle.shutdown().await.unwrap();
        assert_eq!(engine.frames_drawn(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_finished_loop() {
        let (service, _controller) = animation(3, ScrollDirection::Rising);
        let handle = service.spawn().unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());

        handle.stop();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let (service, _controller) = animation(3, ScrollDirection::Rising);
        let handle = service.spawn().unwrap();
        handle.stop();
        handle.stop();
        assert!(handle.is_stopping());

        let engine = handle.shutdown().await.unwrap();
        assert_eq!(engine.frames_drawn(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_timer() {
        let (service, _controller) = animation(3, ScrollDirection::Rising);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = service.with_event_sender(tx).spawn().unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let mut stopped = false;
        let mut frames = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                AnimationEvent::FrameDrawn { .. } => frames += 1,
                AnimationEvent::Stopped { .. } => stopped = true,
                _ => {}
            }
        }
        assert!(stopped);
        assert_eq!(frames, 1);
    }
}
