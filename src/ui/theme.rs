use crate::config::Config;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub section_header: Color,
    pub checked: Color,
    pub highlight_bg: Color,
    pub dim: Color,
    pub border: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub key_hint: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            section_header: Color::Yellow,
            checked: Color::Green,
            highlight_bg: Color::Rgb(60, 60, 80),
            dim: Color::DarkGray,
            border: Color::Cyan,
            status_bar_bg: Color::Rgb(40, 40, 40),
            status_bar_fg: Color::White,
            key_hint: Color::Cyan,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            ..Self::default_theme()
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::White,
            foreground: Color::Black,
            section_header: Color::Rgb(180, 130, 0),
            checked: Color::Rgb(0, 130, 0),
            highlight_bg: Color::Rgb(200, 220, 255),
            dim: Color::Gray,
            border: Color::Blue,
            status_bar_bg: Color::LightBlue,
            status_bar_fg: Color::Black,
            key_hint: Color::Blue,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.theme.as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::default_theme(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_picks_named_theme() {
        let mut config = Config::default();
        config.theme = "light".to_string();
        assert_eq!(Theme::from_config(&config).foreground, Color::Black);

        config.theme = "unknown".to_string();
        assert_eq!(Theme::from_config(&config).background, Color::Reset);
    }
}
