//! Colors, glyphs, and spacing for table rendering
//!
//! Styling goes through crossterm's `ContentStyle` and is formatted to
//! `String`, so frames can be assembled before they reach the terminal.

use crossterm::style::{Attribute, Color, ContentStyle};

/// Box drawing characters
pub struct BoxChars;

impl BoxChars {
    pub const TOP_LEFT: &'static str = "╭";
    pub const TOP_RIGHT: &'static str = "╮";
    pub const BOTTOM_LEFT: &'static str = "╰";
    pub const BOTTOM_RIGHT: &'static str = "╯";
    pub const HORIZONTAL: &'static str = "─";
    pub const VERTICAL: &'static str = "│";
    pub const TEE_DOWN: &'static str = "┬";
    pub const TEE_UP: &'static str = "┴";
    pub const TEE_RIGHT: &'static str = "├";
    pub const TEE_LEFT: &'static str = "┤";
    pub const CROSS: &'static str = "┼";
}

/// Marker appended to truncated cell text
pub const ELLIPSIS: char = '…';

/// Spacing and sizing of the table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyle {
    /// Spaces on each side of a cell's text
    pub cell_padding: usize,
    /// Upper bound for automatically sized columns
    pub max_column_width: usize,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            cell_padding: 1,
            max_column_width: 40,
        }
    }
}

/// Colors used by the renderer; `None` leaves the terminal default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub selection_bg: Option<Color>,
    pub selection_fg: Option<Color>,
    pub border: Option<Color>,
    pub header: Option<Color>,
    pub header_bold: bool,
    pub help: Option<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selection_bg: parse_color("blue"),
            selection_fg: Some(Color::Black),
            border: parse_color("dim"),
            header: parse_color("cyan"),
            header_bold: true,
            help: parse_color("dim"),
        }
    }
}

impl Theme {
    /// No colors at all (pipes, tests, monochrome terminals)
    pub fn plain() -> Self {
        Self {
            selection_bg: None,
            selection_fg: None,
            border: None,
            header: None,
            header_bold: false,
            help: None,
        }
    }
}

/// Parse a color from string
/// Supports: hex (#rrggbb), named colors (red, blue, etc.)
pub fn parse_color(s: &str) -> Option<Color> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        return Some(Color::Rgb { r, g, b });
    }

    Some(match s.to_lowercase().as_str() {
        // Tokyo Night palette
        "dim" => Color::Rgb {
            r: 86,
            g: 95,
            b: 137,
        },
        "cyan" => Color::Rgb {
            r: 125,
            g: 207,
            b: 255,
        },
        "blue" => Color::Rgb {
            r: 122,
            g: 162,
            b: 247,
        },
        "green" => Color::Rgb {
            r: 158,
            g: 206,
            b: 106,
        },
        "yellow" => Color::Rgb {
            r: 224,
            g: 175,
            b: 104,
        },
        "red" => Color::Rgb {
            r: 247,
            g: 118,
            b: 142,
        },
        "magenta" => Color::Rgb {
            r: 187,
            g: 154,
            b: 247,
        },

        // Basic colors
        "black" => Color::Black,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "darkgrey" | "darkgray" => Color::DarkGrey,

        _ => return None,
    })
}

/// Text decoration applied by `paint`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paint {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

impl Paint {
    pub fn fg(color: Option<Color>) -> Self {
        Self {
            fg: color,
            ..Self::default()
        }
    }

    pub fn on(mut self, bg: Option<Color>) -> Self {
        self.bg = bg;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn dim(mut self, dim: bool) -> Self {
        self.dim = dim;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Format `text` with the given decoration
///
/// Plain decorations return the text untouched, with no escape sequences.
pub fn paint(text: &str, decoration: Paint) -> String {
    if decoration.is_plain() || text.is_empty() {
        return text.to_string();
    }
    let mut style = ContentStyle::new();
    style.foreground_color = decoration.fg;
    style.background_color = decoration.bg;
    if decoration.bold {
        style.attributes.set(Attribute::Bold);
    }
    if decoration.dim {
        style.attributes.set(Attribute::Dim);
    }
    style.apply(text).to_string()
}
