//! Column layout and border drawing
//!
//! `TableLayout` is the seam the renderer draws through. `BoxLayout` is the
//! default: rounded box borders, one space of padding, content-sized
//! columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::table::{Alignment, TableCell, TableColumn, TableData};
use crate::theme::{paint, BoxChars, Paint, TableStyle, Theme, ELLIPSIS};

/// Computed column geometry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    /// Content width of each column, excluding padding and borders
    pub column_widths: Vec<usize>,
}

/// Which horizontal rule to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPosition {
    Top,
    /// Between the header and the body
    HeaderSeparator,
    /// Between the body and the footer
    FooterSeparator,
    Bottom,
}

/// Layout engine used by the renderer
pub trait TableLayout: Send + Sync {
    fn calculate_layout(&self, data: &TableData, style: &TableStyle) -> Layout;

    fn render_border(
        &self,
        position: BorderPosition,
        layout: &Layout,
        style: &TableStyle,
        theme: &Theme,
    ) -> String;

    fn render_row(
        &self,
        cells: &[TableCell],
        layout: &Layout,
        style: &TableStyle,
        theme: &Theme,
        columns: &[TableColumn],
        is_header: bool,
    ) -> String;
}

/// Rounded box-drawing layout
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxLayout;

impl TableLayout for BoxLayout {
    fn calculate_layout(&self, data: &TableData, style: &TableStyle) -> Layout {
        let column_widths = data
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                if let Some(width) = column.width {
                    return width.max(1);
                }
                let cells = data
                    .rows()
                    .iter()
                    .chain(data.footer_row())
                    .filter_map(|row| row.cells.get(i))
                    .map(|cell| display_width(cell.plain()));
                let widest = cells.fold(display_width(&column.title), usize::max);
                widest.clamp(1, style.max_column_width.max(1))
            })
            .collect();

        Layout { column_widths }
    }

    fn render_border(
        &self,
        position: BorderPosition,
        layout: &Layout,
        style: &TableStyle,
        theme: &Theme,
    ) -> String {
        let (left, junction, right) = match position {
            BorderPosition::Top => (BoxChars::TOP_LEFT, BoxChars::TEE_DOWN, BoxChars::TOP_RIGHT),
            BorderPosition::HeaderSeparator | BorderPosition::FooterSeparator => {
                (BoxChars::TEE_RIGHT, BoxChars::CROSS, BoxChars::TEE_LEFT)
            }
            BorderPosition::Bottom => (
                BoxChars::BOTTOM_LEFT,
                BoxChars::TEE_UP,
                BoxChars::BOTTOM_RIGHT,
            ),
        };

        let segments: Vec<String> = layout
            .column_widths
            .iter()
            .map(|w| BoxChars::HORIZONTAL.repeat(w + 2 * style.cell_padding))
            .collect();
        let line = format!("{}{}{}", left, segments.join(junction), right);
        paint(&line, Paint::fg(theme.border))
    }

    fn render_row(
        &self,
        cells: &[TableCell],
        layout: &Layout,
        style: &TableStyle,
        theme: &Theme,
        columns: &[TableColumn],
        is_header: bool,
    ) -> String {
        let border = paint(BoxChars::VERTICAL, Paint::fg(theme.border));
        let pad = " ".repeat(style.cell_padding);
        let empty = TableCell::default();

        let mut line = border.clone();
        for (i, width) in layout.column_widths.iter().copied().enumerate() {
            let cell = cells.get(i).unwrap_or(&empty);
            let alignment = columns.get(i).map(|c| c.alignment).unwrap_or_default();
            let text = fit(cell.plain(), width, alignment);

            let decoration = if is_header {
                Paint::fg(theme.header).bold(theme.header_bold)
            } else {
                Paint::fg(cell.style.fg)
                    .bold(cell.style.bold)
                    .dim(cell.style.dim)
            };

            line.push_str(&pad);
            line.push_str(&paint(&text, decoration));
            line.push_str(&pad);
            line.push_str(&border);
        }
        line
    }
}

/// Terminal column width of `text`
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `width` columns
///
/// When anything is cut, the last column is given to the ellipsis marker.
/// Returns the text and whether it was truncated.
pub fn truncate(text: &str, width: usize) -> (String, bool) {
    if display_width(text) <= width {
        return (text.to_string(), false);
    }
    if width == 0 {
        return (String::new(), true);
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    (out, true)
}

/// Pad `text` to exactly `width` columns
///
/// Center alignment puts the odd leftover column on the right.
pub fn align(text: &str, width: usize, alignment: Alignment) -> String {
    let extra = width.saturating_sub(display_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, extra),
        Alignment::Right => (extra, 0),
        Alignment::Center => (extra / 2, extra - extra / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Truncate then align
pub fn fit(text: &str, width: usize, alignment: Alignment) -> String {
    let (text, _) = truncate(text, width);
    align(&text, width, alignment)
}
