//! Frame rendering for the picker
//!
//! Turns a `Snapshot` into a full frame of text: the visible slice of the
//! table, with the selected row highlighted, followed by navigation help.
//! Writes to the output sink are serialized, and a snapshot older than
//! the last one painted is dropped.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::layout::{fit, BorderPosition, Layout, TableLayout};
use crate::session::Snapshot;
use crate::table::{TableCell, TableColumn};
use crate::terminal::CRLF;
use crate::theme::{paint, BoxChars, Paint, TableStyle, Theme};

/// Destination for complete frames
pub trait FrameSink: Send {
    /// Replace whatever was painted before with `frame`
    fn render(&mut self, frame: &str) -> io::Result<()>;
}

/// Sink that keeps every frame in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSink for MemorySink {
    fn render(&mut self, frame: &str) -> io::Result<()> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.to_string());
        Ok(())
    }
}

struct Output {
    sink: Box<dyn FrameSink>,
    last_version: Option<u64>,
}

/// Paints snapshots through a layout engine onto a sink
pub struct Renderer {
    layout: Arc<dyn TableLayout>,
    style: TableStyle,
    theme: Theme,
    output: Mutex<Output>,
}

impl Renderer {
    pub fn new(
        layout: Arc<dyn TableLayout>,
        style: TableStyle,
        theme: Theme,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        Self {
            layout,
            style,
            theme,
            output: Mutex::new(Output {
                sink,
                last_version: None,
            }),
        }
    }

    /// Paint `snapshot` unless a newer one is already on screen
    ///
    /// Returns whether the frame was written.
    pub fn render(&self, snapshot: &Snapshot) -> bool {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        if output.last_version.is_some_and(|v| v > snapshot.version) {
            tracing::trace!(version = snapshot.version, "skipping stale snapshot");
            return false;
        }

        let frame = self.frame(snapshot);
        match output.sink.render(&frame) {
            Ok(()) => {
                output.last_version = Some(snapshot.version);
                true
            }
            Err(e) => {
                tracing::warn!("failed to write frame: {}", e);
                false
            }
        }
    }

    /// Build the frame text for `snapshot` without writing it
    pub fn frame(&self, snapshot: &Snapshot) -> String {
        self.lines(snapshot).join(CRLF)
    }

    fn lines(&self, snapshot: &Snapshot) -> Vec<String> {
        let data = &snapshot.data;
        let columns = data.columns();
        let layout = self.layout.calculate_layout(data, &self.style);
        let border = |position| {
            self.layout
                .render_border(position, &layout, &self.style, &self.theme)
        };

        let header: Vec<TableCell> = columns
            .iter()
            .map(|c| TableCell::new(c.title.clone()))
            .collect();

        let mut lines = vec![
            border(BorderPosition::Top),
            self.layout
                .render_row(&header, &layout, &self.style, &self.theme, columns, true),
            border(BorderPosition::HeaderSeparator),
        ];

        let start = snapshot.viewport.start_index;
        let end = snapshot.viewport.end_index();
        debug_assert!(
            snapshot.viewport.contains(snapshot.selected_index),
            "selection {} outside viewport {:?}",
            snapshot.selected_index,
            snapshot.viewport
        );
        let selected = snapshot.selected_in_viewport();

        for (local, row) in data.rows()[start..end].iter().enumerate() {
            let line = if local == selected {
                self.highlighted_row(&row.cells, &layout, columns)
            } else {
                self.layout
                    .render_row(&row.cells, &layout, &self.style, &self.theme, columns, false)
            };
            lines.push(line);
        }

        if let Some(footer) = data.footer_row() {
            lines.push(border(BorderPosition::FooterSeparator));
            lines.push(self.layout.render_row(
                &footer.cells,
                &layout,
                &self.style,
                &self.theme,
                columns,
                false,
            ));
        }
        lines.push(border(BorderPosition::Bottom));

        let help = navigation_help(
            snapshot.selected_index,
            snapshot.total_rows(),
            snapshot.page_size,
            data.section_of(snapshot.selected_index),
        );
        lines.extend(
            help.iter()
                .map(|line| paint(line, Paint::fg(self.theme.help))),
        );
        lines
    }

    /// Draw the selected row in the selection colors
    ///
    /// Padding, text, and border glyphs all sit on the selection background,
    /// so the bar spans the whole row.
    fn highlighted_row(&self, cells: &[TableCell], layout: &Layout, columns: &[TableColumn]) -> String {
        let bg = self.theme.selection_bg;
        let pad = paint(&" ".repeat(self.style.cell_padding), Paint::default().on(bg));
        let border = paint(BoxChars::VERTICAL, Paint::fg(self.theme.border).on(bg));
        let text_paint = Paint::fg(self.theme.selection_fg).on(bg);
        let empty = TableCell::default();

        let mut line = border.clone();
        for (i, width) in layout.column_widths.iter().copied().enumerate() {
            let cell = cells.get(i).unwrap_or(&empty);
            let alignment = columns.get(i).map(|c| c.alignment).unwrap_or_default();

            line.push_str(&pad);
            line.push_str(&paint(&fit(cell.plain(), width, alignment), text_paint));
            line.push_str(&pad);
            line.push_str(&border);
        }
        line
    }
}

/// Pages needed to show `total_rows` at `page_size` rows per page
pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    total_rows.div_ceil(page_size.max(1))
}

/// Position line and key legend shown under the table
pub fn navigation_help(
    selected_index: usize,
    total_rows: usize,
    page_size: usize,
    section: Option<&str>,
) -> Vec<String> {
    let page_size = page_size.max(1);
    let pages = total_pages(total_rows, page_size);

    let mut position = format!("Row {} of {}", selected_index + 1, total_rows);
    if pages > 1 {
        position.push_str(&format!(" (Page {}/{})", selected_index / page_size + 1, pages));
    }
    if let Some(section) = section {
        position.push_str(&format!(" · {}", section));
    }

    let mut legend = vec!["↑/↓ j/k move"];
    if pages > 1 {
        legend.push("PgUp/PgDn page");
    }
    legend.extend(["Home/End jump", "Enter select", "Esc cancel"]);

    vec![position, legend.join(" · ")]
}
