use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct Theme {
    pub border_focused: Color,
    pub border_unfocused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_highlight: Color,
    pub status_idle: Color,
    pub status_running: Color,
    pub status_completed: Color,
    pub status_failed: Color,
    pub monitor_fill: Color,
    pub monitor_selected: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeType {
    Dark,
    Light,
}

impl ThemeType {
    pub fn palette(self) -> Theme {
        match self {
            ThemeType::Dark => Theme {
                border_focused: Color::Rgb(118, 227, 73),
                border_unfocused: Color::White,
                text_primary: Color::White,
                text_secondary: Color::Gray,
                text_highlight: Color::Yellow,
                status_idle: Color::Yellow,
                status_running: Color::Blue,
                status_completed: Color::Green,
                status_failed: Color::Red,
                monitor_fill: Color::Cyan,
                monitor_selected: Color::Yellow,
            },
            ThemeType::Light => Theme {
                border_focused: Color::Rgb(30, 120, 200),
                border_unfocused: Color::DarkGray,
                text_primary: Color::Black,
                text_secondary: Color::DarkGray,
                text_highlight: Color::Rgb(170, 80, 0),
                status_idle: Color::Rgb(150, 110, 0),
                status_running: Color::Blue,
                status_completed: Color::Rgb(0, 130, 0),
                status_failed: Color::Red,
                monitor_fill: Color::Blue,
                monitor_selected: Color::Rgb(200, 90, 0),
            },
        }
    }
}

/// `theme` key of the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeChoice {
    /// Follow the GNOME color-scheme setting.
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn resolve(self, prefers_dark: impl FnOnce() -> bool) -> ThemeType {
        match self {
            ThemeChoice::Dark => ThemeType::Dark,
            ThemeChoice::Light => ThemeType::Light,
            ThemeChoice::Auto if prefers_dark() => ThemeType::Dark,
            ThemeChoice::Auto => ThemeType::Light,
        }
    }
}

static CURRENT: RwLock<ThemeType> = RwLock::new(ThemeType::Dark);

pub fn set_theme(theme: ThemeType) {
    if let Ok(mut current) = CURRENT.write() {
        *current = theme;
    }
}

pub fn get_current_theme_type() -> ThemeType {
    CURRENT.read().map(|t| *t).unwrap_or(ThemeType::Dark)
}

pub fn get_theme() -> Theme {
    get_current_theme_type().palette()
}
