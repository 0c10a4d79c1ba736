use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, WallStatus};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let (mode_str, mode_color) = match app.status {
            WallStatus::Idle => ("IDLE", theme.yellow),
            WallStatus::Running => ("RUNNING", theme.success),
            WallStatus::Stopped => ("STOPPED", theme.error),
        };

        let status_text = match &app.status_message {
            Some(msg) => format!(" {} ", msg),
            None => Self::summary(app),
        };
        let status_color = if app.status_message.is_some() && app.last_error.is_some() {
            theme.error
        } else {
            theme.fg0
        };

        let help_hint = if app.started {
            " q:quit b:bar +/-:cells "
        } else {
            " q:quit s:start b:bar +/-:cells "
        };

        let mode_label = format!(" {} ", mode_str);
        let used = mode_label.chars().count() + status_text.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                mode_label,
                Style::default()
                    .fg(theme.bg0)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, Style::default().fg(status_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Layout and progress, e.g. ` 5x3 @ 16.0px | frame 42 | 12 images `
    pub fn summary(app: &App) -> String {
        let mut parts = Vec::new();
        if let Some(layout) = &app.layout {
            parts.push(format!(
                "{}x{} @ {:.1}px",
                layout.column_count, layout.row_count, layout.actual_cell_size
            ));
        } else {
            parts.push(format!("cell {:.1}px", app.cell_size));
        }
        parts.push(format!("frame {}", app.frames_drawn));
        parts.push(format!("{} images", app.image_count));
        if let Some(err) = &app.last_error {
            parts.push(format!("skipped: {}", err));
        }
        format!(" {} ", parts.join(" | "))
    }
}
