use ratatui::style::Color;

use crate::edit::Notice;
use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub tag: Color,
    pub selection_bg: Color,
    pub input_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x14, 0x16, 0x1E),
            text: Color::Rgb(0xC8, 0xCC, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xF5, 0xA9, 0x42),
            dim: Color::Rgb(0x6E, 0x74, 0x88),
            red: Color::Rgb(0xF0, 0x55, 0x5A),
            green: Color::Rgb(0x6C, 0xD9, 0x8A),
            tag: Color::Rgb(0x5F, 0xB4, 0xF0),
            selection_bg: Color::Rgb(0x2A, 0x2E, 0x3D),
            input_bg: Color::Rgb(0x1F, 0x22, 0x2D),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "tag" => theme.tag = color,
                "selection_bg" => theme.selection_bg = color,
                "input_bg" => theme.input_bg = color,
                _ => {}
            }
        }

        theme
    }

    pub fn notice_color(&self, notice: &Notice) -> Color {
        match notice {
            Notice::Success(_) => self.green,
            Notice::Error(_) => self.red,
        }
    }
}
