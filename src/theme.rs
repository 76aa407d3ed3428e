use ratatui::style::Color;

/// Light or dark rendering. Persisted as `true` for dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                background: Color::Rgb(5, 6, 10),
                text: Color::Rgb(230, 238, 248),
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight_bg: Color::Rgb(6, 18, 38),
                rating: Color::Yellow,
                favorite: Color::LightRed,
                wishlist: Color::Rgb(255, 216, 90),
                link: Color::LightBlue,
                error: Color::Red,
            },
            Self::Light => Palette {
                background: Color::Rgb(244, 247, 251),
                text: Color::Rgb(7, 16, 36),
                muted: Color::Gray,
                accent: Color::Blue,
                highlight_bg: Color::Rgb(214, 226, 245),
                rating: Color::Rgb(180, 120, 0),
                favorite: Color::Red,
                wishlist: Color::Rgb(200, 130, 0),
                link: Color::Blue,
                error: Color::Red,
            },
        }
    }
}

/// Colours shared by every view.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub rating: Color,
    pub favorite: Color,
    pub wishlist: Color,
    pub link: Color,
    pub error: Color,
}
