use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub keyword: Color,
    pub function: Color,
    pub type_name: Color,   // Cyan for class names
    pub grid_text: Color,   // Instruction cells without a jump color
    pub grid_header: Color, // OFF / OPERATION / ARGS
    pub line_number: Color,
    pub status_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    keyword: Color::Rgb(203, 166, 247),   // Mauve for import/class/def
    function: Color::Rgb(249, 226, 175),  // Yellow for functions
    type_name: Color::Rgb(148, 226, 213), // Cyan/teal for type names
    grid_text: Color::White,
    grid_header: Color::White,
    line_number: Color::Rgb(108, 112, 134),
    status_bg: Color::Rgb(49, 50, 68),
};
