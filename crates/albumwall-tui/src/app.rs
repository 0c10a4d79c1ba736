use std::sync::Arc;

use albumwall_core::{AnimationEvent, AppConfig, Layout, ScrollState, SurfaceSize};
use image::RgbaImage;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::theme::{to_terminal_color, Theme};

/// Lifecycle of the wall as seen by the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallStatus {
    /// Background only, waiting for a start request
    Idle,
    Running,
    /// The redraw loop exited
    Stopped,
}

/// Terminal-side state: the latest presented frame plus what the status bar
/// reports. The engine itself lives in the animation task.
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub image_count: usize,
    pub frame: Option<RgbaImage>,
    pub layout: Option<Layout>,
    pub scroll: Option<ScrollState>,
    pub frames_drawn: u64,
    pub started: bool,
    pub status: WallStatus,
    /// Preferred cell size in halfblock pixels
    pub cell_size: f64,
    pub show_status_bar: bool,
    pub status_message: Option<String>,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub const MIN_CELL_SIZE: f64 = 2.0;
    const CELL_SIZE_STEP: f64 = 1.25;

    pub fn new(config: Arc<AppConfig>, image_count: usize) -> Self {
        let cell_size = config.ui.cell_size.max(Self::MIN_CELL_SIZE);
        let show_status_bar = config.ui.show_status_bar;
        Self {
            config,
            theme: Theme::default(),
            image_count,
            frame: None,
            layout: None,
            scroll: None,
            frames_drawn: 0,
            started: false,
            status: WallStatus::Idle,
            cell_size,
            show_status_bar,
            status_message: None,
            last_error: None,
            should_quit: false,
        }
    }

    /// Keep only the newest frame; older ones were never shown
    pub fn handle_frame(&mut self, frame: RgbaImage) {
        self.frame = Some(frame);
    }

    pub fn handle_animation_event(&mut self, event: AnimationEvent) {
        match event {
            AnimationEvent::FrameDrawn {
                frame,
                layout,
                scroll,
            } => {
                self.frames_drawn = frame;
                self.layout = Some(layout);
                self.scroll = Some(scroll);
                self.last_error = None;
            }
            AnimationEvent::DrawFailed {
                message,
                recoverable,
            } => {
                if recoverable {
                    self.last_error = Some(message);
                } else {
                    self.set_error(message);
                }
            }
            AnimationEvent::Stopped { frames } => {
                tracing::info!("Wall stopped after {} frames", frames);
                self.frames_drawn = frames;
                self.status = WallStatus::Stopped;
            }
        }
    }

    pub fn mark_started(&mut self) {
        self.started = true;
        self.status = WallStatus::Running;
        self.status_message = None;
    }

    /// The redraw loop exited without a `Stopped` event reaching us
    pub fn mark_stopped(&mut self) {
        if self.status == WallStatus::Running {
            self.status = WallStatus::Stopped;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status_message = Some(format!("Error: {}", message));
        self.last_error = Some(message);
    }

    pub fn grow_cells(&mut self) -> f64 {
        self.cell_size *= Self::CELL_SIZE_STEP;
        self.cell_size
    }

    pub fn shrink_cells(&mut self) -> f64 {
        self.cell_size = (self.cell_size / Self::CELL_SIZE_STEP).max(Self::MIN_CELL_SIZE);
        self.cell_size
    }

    /// Split the terminal into the wall and, when shown, a one-line status bar
    pub fn split_area(&self, area: Rect) -> (Rect, Option<Rect>) {
        if !self.show_status_bar || area.height < 2 {
            return (area, None);
        }
        let wall = Rect {
            height: area.height - 1,
            ..area
        };
        let status = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        (wall, Some(status))
    }

    /// Pixel size of the raster behind `wall`; every cell shows two pixels
    pub fn surface_size(wall: Rect) -> SurfaceSize {
        SurfaceSize::new(wall.width as u32, wall.height as u32 * 2)
    }

    /// Terminal color of the wall background, falling back to the theme
    pub fn wall_background(&self) -> Color {
        match self.config.composite.background() {
            Ok(color) => to_terminal_color(color, self.theme.bg0),
            Err(_) => self.theme.bg0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), 4)
    }

    #[test]
    fn test_split_area_reserves_status_line() {
        let app = app();
        let (wall, status) = app.split_area(Rect::new(0, 0, 80, 24));
        assert_eq!(wall, Rect::new(0, 0, 80, 23));
        assert_eq!(status, Some(Rect::new(0, 23, 80, 1)));
        assert_eq!(App::surface_size(wall), SurfaceSize::new(80, 46));
    }

    #[test]
    fn test_split_area_without_status_bar() {
        let mut app = app();
        app.show_status_bar = false;
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(app.split_area(area), (area, None));
    }

    #[test]
    fn test_frame_events_update_status() {
        let mut app = app();
        app.mark_started();
        let layout = Layout::compute(SurfaceSize::new(100, 100), 50.0).unwrap();
        app.handle_animation_event(AnimationEvent::FrameDrawn {
            frame: 7,
            layout,
            scroll: ScrollState::default(),
        });
        assert_eq!(app.frames_drawn, 7);
        assert_eq!(app.layout.map(|l| l.column_count), Some(2));

        app.handle_animation_event(AnimationEvent::Stopped { frames: 9 });
        assert_eq!(app.status, WallStatus::Stopped);
        assert_eq!(app.frames_drawn, 9);
    }

    #[test]
    fn test_mark_stopped_only_after_start() {
        let mut app = app();
        app.mark_stopped();
        assert_eq!(app.status, WallStatus::Idle);

        app.mark_started();
        app.mark_stopped();
        assert_eq!(app.status, WallStatus::Stopped);
    }

    #[test]
    fn test_recoverable_failure_keeps_status_message() {
        let mut app = app();
        app.handle_animation_event(AnimationEvent::DrawFailed {
            message: "too narrow".into(),
            recoverable: true,
        });
        assert_eq!(app.last_error.as_deref(), Some("too narrow"));
        assert!(app.status_message.is_none());

        app.handle_animation_event(AnimationEvent::DrawFailed {
            message: "broken".into(),
            recoverable: false,
        });
        assert_eq!(app.status_message.as_deref(), Some("Error: broken"));
    }

    #[test]
    fn test_cell_size_bounds() {
        let mut app = app();
        let start = app.cell_size;
        assert!(app.grow_cells() > start);
        for _ in 0..100 {
            app.shrink_cells();
        }
        assert_eq!(app.cell_size, App::MIN_CELL_SIZE);
    }

    #[test]
    fn test_wall_background_from_config() {
        let mut config = AppConfig::default();
        config.composite.background_color = "#102030".into();
        let app = App::new(Arc::new(config), 1);
        assert_eq!(app.wall_background(), Color::Rgb(0x10, 0x20, 0x30));
    }
}
