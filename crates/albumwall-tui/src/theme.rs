use ratatui::style::Color;

/// Colors for the status bar and the area around the wall
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey2: Color,

    // Palette colors
    pub yellow: Color,

    // Semantic colors
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            error: Color::Rgb(0xea, 0x69, 0x62),
            success: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}

/// Terminal color for a wall color, compositing translucent colors onto `under`
pub fn to_terminal_color(color: albumwall_core::Color, under: Color) -> Color {
    if color.a == u8::MAX {
        return Color::Rgb(color.r, color.g, color.b);
    }
    let (ur, ug, ub) = match under {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    };
    let alpha = color.a as u16;
    let blend = |top: u8, bottom: u8| -> u8 {
        ((top as u16 * alpha + bottom as u16 * (255 - alpha)) / 255) as u8
    };
    Color::Rgb(blend(color.r, ur), blend(color.g, ug), blend(color.b, ub))
}
