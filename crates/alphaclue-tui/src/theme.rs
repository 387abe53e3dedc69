use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Tile bracket color
    pub border: Color,
    /// Clue heading color ("Starts with K")
    pub heading: Color,
    /// Letter typed by the player
    pub filled: Color,
    /// Letter copied in through a reveal link
    pub revealed: Color,
    /// Group badge on linked tiles
    pub badge: Color,
    /// Cursor tile background
    pub selected_bg: Color,
    /// Linked-tile highlight background
    pub highlight_bg: Color,
    /// Incorrect letter color (autocheck)
    pub error: Color,
    /// Correct letter / solved color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            heading: Color::Rgb { r: 130, g: 140, b: 170 },
            filled: Color::Rgb { r: 255, g: 255, b: 255 },
            revealed: Color::Rgb { r: 80, g: 180, b: 255 },
            badge: Color::Rgb { r: 140, g: 150, b: 180 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            highlight_bg: Color::Rgb { r: 45, g: 52, b: 72 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            heading: Color::White,
            filled: Color::White,
            revealed: Color::Cyan,
            badge: Color::Yellow,
            selected_bg: Color::Blue,
            highlight_bg: Color::Rgb { r: 40, g: 40, b: 40 },
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }
}
