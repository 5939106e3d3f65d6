//! Table data model
//!
//! Immutable column/row/section values handed to the picker, plus the
//! viewport arithmetic used to window over them.

pub mod viewport;

pub use viewport::TableViewport;

use crossterm::style::Color;
use thiserror::Error;

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A table column: title, alignment, and an optional width hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub title: String,
    pub alignment: Alignment,
    /// Fixed content width; `None` sizes the column from its content
    pub width: Option<usize>,
}

impl TableColumn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alignment: Alignment::Left,
            width: None,
        }
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// Per-cell text styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
}

/// A single styled text cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    pub text: String,
    pub style: CellStyle,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::default(),
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.style.fg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.style.dim = true;
        self
    }

    /// Text without styling
    pub fn plain(&self) -> &str {
        &self.text
    }
}

impl From<&str> for TableCell {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TableCell {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// An ordered sequence of cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<T: Into<TableCell>> FromIterator<T> for TableRow {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A titled group of rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSection {
    pub title: String,
    pub rows: Vec<TableRow>,
}

impl TableSection {
    pub fn new(title: impl Into<String>, rows: Vec<TableRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }
}

/// A row whose cell count does not match the column count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{location} has {cells} cells, expected {columns}")]
pub struct ShapeError {
    pub location: RowLocation,
    pub cells: usize,
    pub columns: usize,
}

/// Where a mis-shaped row sits in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocation {
    Body(usize),
    Footer,
}

impl std::fmt::Display for RowLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowLocation::Body(index) => write!(f, "row {}", index),
            RowLocation::Footer => write!(f, "footer"),
        }
    }
}

/// Title and row count of one section, in body order
#[derive(Debug, Clone, PartialEq, Eq)]
struct SectionSpan {
    title: String,
    len: usize,
}

/// Immutable table contents
///
/// When built from sections, `rows` is the flattened concatenation of
/// every section's rows, in order; only titles and lengths are kept
/// alongside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableData {
    columns: Vec<TableColumn>,
    rows: Vec<TableRow>,
    sections: Option<Vec<SectionSpan>>,
    footer: Option<TableRow>,
}

impl TableData {
    pub fn new(columns: Vec<TableColumn>, rows: Vec<TableRow>) -> Self {
        Self {
            columns,
            rows,
            sections: None,
            footer: None,
        }
    }

    pub fn with_sections(columns: Vec<TableColumn>, sections: Vec<TableSection>) -> Self {
        let mut rows = Vec::with_capacity(sections.iter().map(|s| s.rows.len()).sum());
        let spans = sections
            .into_iter()
            .map(|section| {
                let len = section.rows.len();
                rows.extend(section.rows);
                SectionSpan {
                    title: section.title,
                    len,
                }
            })
            .collect();
        Self {
            columns,
            rows,
            sections: Some(spans),
            footer: None,
        }
    }

    pub fn footer(mut self, footer: TableRow) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn footer_row(&self) -> Option<&TableRow> {
        self.footer.as_ref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that every row (and the footer) has one cell per column
    pub fn validate(&self) -> Result<(), ShapeError> {
        let columns = self.columns.len();
        let body = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (RowLocation::Body(i), row));
        let footer = self.footer.iter().map(|row| (RowLocation::Footer, row));

        for (location, row) in body.chain(footer) {
            if row.len() != columns {
                return Err(ShapeError {
                    location,
                    cells: row.len(),
                    columns,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Title of the section containing the row at `index`
    pub fn section_of(&self, index: usize) -> Option<&str> {
        let mut end = 0;
        for span in self.sections.as_deref()? {
            end += span.len;
            if index < end {
                return Some(&span.title);
            }
        }
        None
    }
}
