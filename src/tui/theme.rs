use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub border: Color,
    pub border_active: Color,
    pub accent: Color,
    pub error: Color,
    pub status_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            border: Color::Rgb(0x3D, 0x35, 0x6B),
            border_active: Color::Rgb(0xFB, 0x41, 0x96),
            accent: Color::Rgb(0x44, 0xDD, 0xFF),
            error: Color::Rgb(0xFF, 0x44, 0x44),
            status_bg: Color::Rgb(0x1A, 0x0E, 0x33),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Create a theme from `[ui.colors]`, falling back to defaults.
    /// Unknown keys and unparseable values are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(%key, %value, "ignoring invalid color");
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "dim" => &mut theme.dim,
                "border" => &mut theme.border,
                "border_active" => &mut theme.border_active,
                "accent" => &mut theme.accent,
                "error" => &mut theme.error,
                "status_bg" => &mut theme.status_bg,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }

    /// Border color for a pane
    pub fn border_color(&self, active: bool) -> Color {
        if active { self.border_active } else { self.border }
    }
}
