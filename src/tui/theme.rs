use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::UiConfig;
use crate::model::label::Label;
use crate::model::store::Store;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-status colors from `[ui.status_colors]`; these win over the store
    pub status_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut status_colors = HashMap::new();
        status_colors.insert("in-progress".into(), Color::Rgb(0xFF, 0xD7, 0x00));
        status_colors.insert("done".into(), Color::Rgb(0x44, 0xFF, 0x88));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            status_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
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
    /// Create a theme from project UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "selection_bg" => theme.selection_bg = color,
                    "search_match_bg" => theme.search_match_bg = color,
                    "search_match_fg" => theme.search_match_fg = color,
                    _ => tracing::debug!(key = %key, "unknown ui color key"),
                }
            }
        }

        for (status, value) in &ui.status_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.status_colors.insert(status.clone(), color);
            }
        }

        theme
    }

    /// Color for a status: config override, then the store's color, then text
    pub fn status_color(&self, store: &Store, status: &str) -> Color {
        if let Some(color) = self.status_colors.get(status) {
            return *color;
        }
        store
            .status(status)
            .and_then(|s| s.color.as_deref())
            .and_then(parse_hex_color)
            .unwrap_or(self.text)
    }

    /// Color for a label chip, falling back to the dim color
    pub fn label_color(&self, label: &Label) -> Color {
        label
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(self.dim)
    }
}
