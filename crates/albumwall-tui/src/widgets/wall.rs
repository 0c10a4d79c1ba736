use image::RgbaImage;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::to_terminal_color;

pub struct WallWidget;

impl WallWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let background = app.wall_background();
        match &app.frame {
            Some(image) => {
                let lines = Self::halfblock_lines(image, area.width, area.height, background);
                frame.render_widget(Paragraph::new(lines), area);
            }
            None => {
                frame.render_widget(Block::default().style(Style::default().bg(background)), area);
            }
        }
    }

    /// Convert a frame into terminal lines, two pixel rows per line.
    ///
    /// A frame smaller than the area (mid-resize) is padded with the
    /// background; a larger one is cropped.
    pub fn halfblock_lines(
        image: &RgbaImage,
        width: u16,
        height: u16,
        background: Color,
    ) -> Vec<Line<'static>> {
        let pixel = |x: u32, y: u32| -> Color {
            if x < image.width() && y < image.height() {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                to_terminal_color(albumwall_core::Color::rgba(r, g, b, a), background)
            } else {
                background
            }
        };

        (0..height as u32)
            .map(|row| {
                let y = row * 2;
                let spans: Vec<Span> = (0..width as u32)
                    .map(|x| {
                        Span::styled(
                            "▀",
                            Style::default().fg(pixel(x, y)).bg(pixel(x, y + 1)),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
