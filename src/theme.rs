use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                fg: Color::Gray,
                bg: Color::Reset,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                border: Color::DarkGray,
                badge: Color::Magenta,
                success: Color::Green,
                error: Color::Red,
                info: Color::Yellow,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::Gray,
                badge: Color::Rgb(128, 0, 128),
                success: Color::Rgb(0, 128, 0),
                error: Color::Rgb(178, 34, 34),
                info: Color::Rgb(184, 134, 11),
            },
        }
    }
}

/// Colors every screen draws with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub badge: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, elevated: bool) -> Style {
        if elevated {
            self.base().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            self.base().fg(self.border)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_dark_and_light() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn theme_serializes_as_flag_string() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn palettes_differ_per_theme() {
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
    }
}
