//! Scrolling composite state machine
//!
//! `NotStarted -> Running`. The surface is painted with the background color
//! on construction; [`ScrollEngine::start`] freezes the images and draws the
//! first frame, after which every [`ScrollEngine::tick`] draws one frame and
//! moves the wall up by a fraction of a row.

use tracing::{debug, info, warn};

use super::state::ScrollState;
use crate::color::Color;
use crate::config::{CompositeConfig, ScrollDirection};
use crate::cursor::RepeatingCursor;
use crate::inputs::LayoutInputs;
use crate::layout::{Layout, SurfaceSize};
use crate::palette::Palette;
use crate::surface::{DrawSurface, Rect};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Running,
}

/// Infinitely scrolling wall of square images
pub struct ScrollEngine<S: DrawSurface> {
    config: CompositeConfig,
    background: Color,
    surface: S,
    inputs: LayoutInputs,
    /// Images supplied before start; moved into `palette` on start
    pending: Vec<S::Image>,
    palette: Option<Palette<S::Image>>,
    state: EngineState,
    scroll: ScrollState,
    /// Size last applied to the surface
    applied_size: SurfaceSize,
    /// Layout of the most recently drawn frame
    last_layout: Option<Layout>,
    frames_drawn: u64,
}

impl<S: DrawSurface> ScrollEngine<S> {
    /// Create the engine and paint the background.
    ///
    /// The background stays visible until [`start`](Self::start) draws the
    /// first frame.
    pub fn new(
        config: CompositeConfig,
        mut surface: S,
        inputs: LayoutInputs,
        images: Vec<S::Image>,
    ) -> Result<Self> {
        config.validate()?;
        let background = config.background()?;

        let size = inputs.size();
        surface.resize(size);
        surface.fill_rect(Rect::of_size(size), background);
        surface.present();

        Ok(Self {
            config,
            background,
            surface,
            inputs,
            pending: images,
            palette: None,
            state: EngineState::NotStarted,
            scroll: ScrollState::default(),
            applied_size: size,
            last_layout: None,
            frames_drawn: 0,
        })
    }

    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn last_layout(&self) -> Option<Layout> {
        self.last_layout
    }

    /// Images waiting to be frozen. `None` once the wall is running.
    pub fn images_mut(&mut self) -> Option<&mut Vec<S::Image>> {
        match self.state {
            EngineState::NotStarted => Some(&mut self.pending),
            EngineState::Running => None,
        }
    }

    /// The frozen palette, available once the wall is running
    pub fn palette(&self) -> Option<&Palette<S::Image>> {
        self.palette.as_ref()
    }

    /// Layout for the current inputs. Callable at any time, including
    /// before start.
    pub fn layout(&self) -> Result<Layout> {
        Layout::compute(self.inputs.size(), self.inputs.preferred_cell_size())
    }

    pub fn row_count(&self) -> Result<u32> {
        self.layout().map(|layout| layout.row_count)
    }

    pub fn column_count(&self) -> Result<u32> {
        self.layout().map(|layout| layout.column_count)
    }

    pub fn actual_cell_size(&self) -> Result<f64> {
        self.layout().map(|layout| layout.actual_cell_size)
    }

    /// Freeze the images and draw the first frame.
    ///
    /// Fails with [`Error::AlreadyStarted`] on a second call and with
    /// [`Error::EmptyPalette`] when there are no images; neither changes any
    /// state. If the first frame cannot be drawn the engine stays
    /// `NotStarted` with its images untouched, so the caller may fix the
    /// inputs and try again.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyStarted);
        }
        if self.pending.is_empty() {
            return Err(Error::EmptyPalette);
        }

        let layout = self.prepare_frame()?;
        let first = ScrollState::default();
        let scroll = match render(&mut self.surface, &self.pending, &layout, first, &self.config) {
            Ok(scroll) => scroll,
            Err(e) => {
                warn!("First frame failed, composite not started: {}", e);
                return Err(e);
            }
        };

        self.palette = Some(Palette::freeze(std::mem::take(&mut self.pending))?);
        self.state = EngineState::Running;
        self.scroll = scroll;
        self.last_layout = Some(layout);
        self.frames_drawn = 1;

        info!(
            "Composite started: {} images, {}x{} cells of {:.1}px, redraw every {}ms",
            self.palette.as_ref().map_or(0, |p| p.len()),
            layout.column_count,
            layout.row_count,
            layout.actual_cell_size,
            self.config.redraw_rate_ms
        );
        Ok(())
    }

    /// Draw one frame and advance the scroll position.
    ///
    /// Reads the latest surface size and preferred cell size first. On error
    /// nothing is drawn and the scroll position is unchanged.
    pub fn tick(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(Error::NotStarted);
        }

        let layout = self.prepare_frame()?;
        let Some(ref palette) = self.palette else {
            return Err(Error::NotStarted);
        };

        self.scroll = render(&mut self.surface, palette, &layout, self.scroll, &self.config)?;
        self.last_layout = Some(layout);
        self.frames_drawn += 1;
        Ok(())
    }

    /// Keep an idle (not yet started) wall in sync with its inputs: apply a
    /// pending resize and repaint the background. No-op once running.
    pub fn refresh_idle(&mut self) {
        if self.is_running() {
            return;
        }
        let size = self.inputs.size();
        if size != self.applied_size {
            self.apply_size(size);
            self.surface.fill_rect(Rect::of_size(size), self.background);
            self.surface.present();
        }
    }

    /// Apply a changed surface size and compute this frame's layout
    fn prepare_frame(&mut self) -> Result<Layout> {
        let size = self.inputs.size();
        if size != self.applied_size {
            self.apply_size(size);
        }
        Layout::compute(size, self.inputs.preferred_cell_size())
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        debug!(
            "Surface resized {}x{} -> {}x{}",
            self.applied_size.width, self.applied_size.height, size.width, size.height
        );
        self.surface.resize(size);
        self.applied_size = size;
    }
}

/// Draw one frame for `scroll` and return the position for the next frame
fn render<S: DrawSurface>(
    surface: &mut S,
    images: &[S::Image],
    layout: &Layout,
    scroll: ScrollState,
    config: &CompositeConfig,
) -> Result<ScrollState> {
    if config.scroll_direction != ScrollDirection::Rising {
        return Err(Error::UnsupportedDirection(
            config.scroll_direction.to_string(),
        ));
    }

    let mut cursor = RepeatingCursor::new(images)?;
    let scroll = scroll.normalized(cursor.len());
    cursor.skip_to(scroll.cursor_index);

    let size = layout.size;
    let cell = layout.actual_cell_size;
    surface.clear_rect(Rect::of_size(size));

    // The first row starts above the top edge by the offset
    let mut y = -scroll.offset_pixels;
    while y < size.height as f64 {
        for column in 0..layout.column_count {
            let (image, _) = cursor.advance();
            surface.draw_image(image, Rect::square(column as f64 * cell, y, cell));
        }
        y += cell;
    }
    surface.present();

    let (next, committed) = scroll.advanced(layout, config.redraw_rate_ms, config.scroll_speed_ms);
    if committed {
        debug!(
            "Row committed: cursor index {} -> {}",
            scroll.cursor_index, next.cursor_index
        );
    }
    Ok(next)
}
