use crate::theme::ThemeMode;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub function: Color,
    pub type_name: Color,    // Cyan for type names
    pub preprocessor: Color, // Pink for #include and friends
    pub badge_fg: Color,     // Text drawn on coloured badges
}

pub const DARK_THEME: Theme = Theme {
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),        // Blue for keywords
    string: Color::Rgb(250, 179, 135),         // Orange for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    function: Color::Rgb(249, 226, 175),       // Yellow for functions
    type_name: Color::Rgb(148, 226, 213),      // Cyan/teal for type names
    preprocessor: Color::Rgb(245, 194, 231),
    badge_fg: Color::Black,
};

pub const LIGHT_THEME: Theme = Theme {
    bg: Color::Rgb(239, 241, 245),
    fg: Color::Rgb(76, 79, 105),
    primary: Color::Rgb(30, 102, 245),
    secondary: Color::Rgb(254, 100, 11),
    comment: Color::Rgb(140, 143, 161),
    success: Color::Rgb(64, 160, 43),
    error: Color::Rgb(210, 15, 57),
    keyword: Color::Rgb(30, 102, 245),
    string: Color::Rgb(254, 100, 11),
    number: Color::Rgb(254, 100, 11),
    border_focused: Color::Rgb(223, 142, 29),
    border_normal: Color::Rgb(156, 160, 176),
    current_line_bg: Color::Rgb(220, 224, 232), // Slightly darker BG for current line
    function: Color::Rgb(223, 142, 29),
    type_name: Color::Rgb(23, 146, 153),
    preprocessor: Color::Rgb(234, 118, 203),
    badge_fg: Color::White,
};

/// Palette for a theme mode
pub fn palette(mode: ThemeMode) -> &'static Theme {
    match mode {
        ThemeMode::Dark => &DARK_THEME,
        ThemeMode::Light => &LIGHT_THEME,
    }
}
