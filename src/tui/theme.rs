use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeColor;

/// Colors for one theme color in light or dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub on_accent: Color,
    pub error: Color,
}

fn accent(color: ThemeColor) -> Color {
    match color {
        ThemeColor::Gray => Color::Rgb(75, 85, 99),
        ThemeColor::Red => Color::Rgb(220, 38, 38),
        ThemeColor::Yellow => Color::Rgb(202, 138, 4),
        ThemeColor::Green => Color::Rgb(22, 163, 74),
        ThemeColor::Blue => Color::Rgb(37, 99, 235),
        ThemeColor::Indigo => Color::Rgb(79, 70, 229),
        ThemeColor::Purple => Color::Rgb(147, 51, 234),
        ThemeColor::Pink => Color::Rgb(219, 39, 119),
    }
}

impl Palette {
    pub fn new(color: ThemeColor, dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                bg: Color::Rgb(17, 24, 39),
                surface: Color::Rgb(31, 41, 55),
                border: Color::Rgb(75, 85, 99),
                text: Color::Rgb(243, 244, 246),
                text_dim: Color::Rgb(156, 163, 175),
                accent: accent(color),
                on_accent: Color::Rgb(255, 255, 255),
                error: Color::Rgb(248, 113, 113),
            }
        } else {
            Self {
                bg: Color::Rgb(243, 244, 246),
                surface: Color::Rgb(255, 255, 255),
                border: Color::Rgb(209, 213, 219),
                text: Color::Rgb(31, 41, 55),
                text_dim: Color::Rgb(107, 114, 128),
                accent: accent(color),
                on_accent: Color::Rgb(255, 255, 255),
                error: Color::Rgb(220, 38, 38),
            }
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn surface(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Filled row used for the next prayer.
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.on_accent)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }
}
