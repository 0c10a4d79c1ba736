use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use albumwall_core::{
    AnimationEvent, AnimationHandle, AnimationService, AppConfig, Error, InputsController,
    LayoutInputs, RasterSurface, ScrollEngine, Tile,
};
use albumwall_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    widgets::{StatusBarWidget, WallWidget},
};

/// The engine before start, or the handle of its running animation
enum Wall {
    Idle(ScrollEngine<RasterSurface>),
    Running(AnimationHandle<RasterSurface>),
    /// Spawning failed after the engine had been handed over
    Lost,
}

impl Wall {
    fn start(&mut self, app: &mut App, event_tx: &mpsc::UnboundedSender<AnimationEvent>) {
        match std::mem::replace(self, Wall::Lost) {
            Wall::Idle(mut engine) => {
                // Start here so a failed first draw leaves the engine with us
                if let Err(e) = engine.start() {
                    warn!("Failed to start wall: {}", e);
                    app.set_error(e.to_string());
                    *self = Wall::Idle(engine);
                    return;
                }
                match AnimationService::new(engine)
                    .with_event_sender(event_tx.clone())
                    .spawn()
                {
                    Ok(handle) => {
                        app.mark_started();
                        *self = Wall::Running(handle);
                    }
                    Err(e) => app.set_error(e.to_string()),
                }
            }
            Wall::Running(handle) => {
                app.set_status(Error::AlreadyStarted.to_string());
                *self = Wall::Running(handle);
            }
            Wall::Lost => app.set_error("The wall is no longer available"),
        }
    }

    fn animation_finished(&self) -> bool {
        matches!(self, Wall::Running(handle) if handle.is_finished())
    }

    fn refresh_idle(&mut self) {
        if let Wall::Idle(engine) = self {
            engine.refresh_idle();
        }
    }

    async fn shutdown(self) -> Result<()> {
        if let Wall::Running(handle) = self {
            let engine = handle.shutdown().await?;
            info!("Wall shut down after {} frames", engine.frames_drawn());
        }
        Ok(())
    }
}

pub async fn run(config: Arc<AppConfig>, tiles: Vec<Tile>) -> Result<()> {
    info!("Starting wall with {} images", tiles.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("albumwall"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_wall(&mut terminal, config, tiles).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_wall<B: Backend>(
    terminal: &mut Terminal<B>,
    config: Arc<AppConfig>,
    tiles: Vec<Tile>,
) -> Result<()> {
    let mut app = App::new(config.clone(), tiles.len());

    let size = terminal.size()?;
    let (wall_area, _) = app.split_area(Rect::new(0, 0, size.width, size.height));
    let surface_size = App::surface_size(wall_area);

    let (inputs, controller) = LayoutInputs::new(surface_size, app.cell_size);
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AnimationEvent>();

    let surface = RasterSurface::new(surface_size).with_frame_sender(frame_tx);
    let mut wall = Wall::Idle(ScrollEngine::new(
        config.composite.clone(),
        surface,
        inputs,
        tiles,
    )?);

    if config.composite.start_automatically {
        wall.start(&mut app, &event_tx);
    } else {
        app.set_status("Press s to start");
    }

    let event_handler =
        EventHandler::with_redraw_rate(config.ui.tick_rate_ms, config.composite.redraw_rate_ms);

    // Main loop
    loop {
        // Only the newest frame is drawn
        while let Ok(frame) = frame_rx.try_recv() {
            app.handle_frame(frame);
        }
        while let Ok(event) = event_rx.try_recv() {
            app.handle_animation_event(event);
        }

        terminal.draw(|frame| {
            let (wall_area, status_area) = app.split_area(frame.area());
            WallWidget::render(frame, wall_area, &app);
            if let Some(status_area) = status_area {
                StatusBarWidget::render(frame, status_area, &app);
            }
        })?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => match handle_key_event(key, &app) {
                    Action::Quit => app.should_quit = true,
                    Action::Start => wall.start(&mut app, &event_tx),
                    Action::ToggleStatusBar => {
                        app.show_status_bar = !app.show_status_bar;
                        let size = terminal.size()?;
                        publish_size(&app, &controller, size.width, size.height);
                    }
                    Action::GrowCells => controller.set_preferred_cell_size(app.grow_cells()),
                    Action::ShrinkCells => controller.set_preferred_cell_size(app.shrink_cells()),
                    Action::None => {}
                },
                AppEvent::Resize(width, height) => {
                    publish_size(&app, &controller, width, height);
                }
                AppEvent::Tick => {}
            }
        }

        wall.refresh_idle();
        if wall.animation_finished() {
            app.mark_stopped();
        }

        if app.should_quit {
            break;
        }
    }

    wall.shutdown().await
}

/// Publish the raster size behind the wall area of a `width` x `height` terminal
fn publish_size(app: &App, controller: &InputsController, width: u16, height: u16) {
    let (wall_area, _) = app.split_area(Rect::new(0, 0, width, height));
    let size = App::surface_size(wall_area);
    controller.resize(size.width, size.height);
}
