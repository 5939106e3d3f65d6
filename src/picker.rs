//! The interactive picker
//!
//! `TablePicker` validates the table, takes over the terminal, and runs
//! the key reader and the update consumer side by side until the user
//! confirms or cancels.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{PickerConfig, DEFAULT_PAGE_SIZE};
use crate::error::PickerError;
use crate::input::{CrosstermKeys, InputHandler, Key};
use crate::layout::{BoxLayout, TableLayout};
use crate::render::{FrameSink, Renderer};
use crate::selection::{SelectionEvent, SelectionNotifier, DEFAULT_NEAR_END_THRESHOLD};
use crate::session::Session;
use crate::table::TableData;
use crate::terminal::{CrosstermTerminal, RawModeGuard, StdoutSink, Terminal};
use crate::theme::{TableStyle, Theme};
use crate::updates::consume_updates;

/// Paging knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerOptions {
    pub page_size: usize,
    pub near_end_threshold: usize,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            near_end_threshold: DEFAULT_NEAR_END_THRESHOLD,
        }
    }
}

/// Builder and entry point for one picker run
pub struct TablePicker {
    data: TableData,
    options: PickerOptions,
    notifier: SelectionNotifier,
    layout: Arc<dyn TableLayout>,
    style: TableStyle,
    theme: Theme,
}

impl TablePicker {
    pub fn new(data: TableData) -> Self {
        Self {
            data,
            options: PickerOptions::default(),
            notifier: SelectionNotifier::default(),
            layout: Arc::new(BoxLayout),
            style: TableStyle::default(),
            theme: Theme::default(),
        }
    }

    /// Picker with paging, style and theme taken from `config`
    pub fn from_config(data: TableData, config: &PickerConfig) -> Self {
        Self::new(data)
            .options(PickerOptions {
                page_size: config.page_size,
                near_end_threshold: config.near_end_threshold,
            })
            .style(config.style())
            .theme(config.theme())
    }

    pub fn options(mut self, options: PickerOptions) -> Self {
        self.options = options;
        self.notifier.set_threshold(options.near_end_threshold);
        self
    }

    /// Called on the initial load, on every move, and once when the
    /// session ends
    pub fn on_selection<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        self.notifier = self.notifier.with_callback(callback);
        self
    }

    pub fn layout(mut self, layout: impl TableLayout + 'static) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn check(&self, terminal: &dyn Terminal) -> Result<(), PickerError> {
        if !terminal.is_interactive() {
            return Err(PickerError::NonInteractiveTerminal);
        }
        self.data.validate()?;
        if self.data.is_empty() {
            return Err(PickerError::EmptyTable);
        }
        Ok(())
    }

    /// Run until the user picks a row
    ///
    /// Returns the index of the confirmed row. Keys are read on a blocking
    /// thread; `updates` replace the table while the user navigates. The
    /// terminal is restored before this returns, whatever the outcome.
    pub async fn run<K, S, E>(
        self,
        terminal: Arc<dyn Terminal>,
        keys: K,
        sink: impl FrameSink + 'static,
        updates: S,
    ) -> Result<usize, PickerError>
    where
        K: IntoIterator<Item = Key> + Send + 'static,
        S: Stream<Item = Result<TableData, E>> + Unpin,
        E: Display,
    {
        self.check(terminal.as_ref())?;

        let Self {
            data,
            options,
            notifier,
            layout,
            style,
            theme,
        } = self;

        info!(
            rows = data.row_count(),
            columns = data.columns().len(),
            page_size = options.page_size,
            "starting picker"
        );

        let session = Session::new(data, options.page_size);
        let notifier = Arc::new(notifier);
        let renderer = Arc::new(Renderer::new(layout, style, theme, Box::new(sink)));
        let shutdown = CancellationToken::new();

        let initial = session.snapshot();
        notifier.selection_changed(&initial);

        let guard = RawModeGuard::acquire(terminal)?;
        renderer.render(&initial);

        let handler = InputHandler::new(
            session.clone(),
            renderer.clone(),
            notifier,
            shutdown.clone(),
        );
        let input = tokio::task::spawn_blocking(move || handler.run(keys));
        let consumer = consume_updates(session.clone(), renderer, updates, shutdown);

        let (input, stats) = tokio::join!(input, consumer);
        drop(guard);

        let state = input?;
        debug!(?state, ?stats, "picker finished");

        session.final_result()
    }

    /// Run on the process terminal with the crossterm key reader
    pub async fn run_interactive<S, E>(self, updates: S) -> Result<usize, PickerError>
    where
        S: Stream<Item = Result<TableData, E>> + Unpin,
        E: Display,
    {
        self.run(
            Arc::new(CrosstermTerminal),
            CrosstermKeys,
            StdoutSink,
            updates,
        )
        .await
    }

    /// Run on the process terminal over a fixed table
    pub async fn pick(self) -> Result<usize, PickerError> {
        self.run_interactive(futures::stream::empty::<Result<TableData, Infallible>>())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;
    use crate::table::{TableColumn, TableRow};

    struct Tty(bool);

    impl Terminal for Tty {
        fn is_interactive(&self) -> bool {
            self.0
        }

        fn enter_raw_mode(&self) -> std::io::Result<()> {
            Ok(())
        }

        fn leave_raw_mode(&self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn table(rows: usize) -> TableData {
        TableData::new(
            vec![TableColumn::new("n")],
            (0..rows)
                .map(|i| -> TableRow { [i.to_string()].into_iter().collect() })
                .collect(),
        )
    }

    #[test]
    fn test_options_update_threshold() {
        let picker = TablePicker::new(table(3)).options(PickerOptions {
            page_size: 4,
            near_end_threshold: 2,
        });
        assert_eq!(picker.options.page_size, 4);
        assert_eq!(picker.notifier.threshold(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = PickerConfig::parse("page_size = 7\nnear_end_threshold = 1\n").unwrap();
        let picker = TablePicker::from_config(table(3), &config);
        assert_eq!(picker.options.page_size, 7);
        assert_eq!(picker.notifier.threshold(), 1);
        assert_eq!(picker.theme, Theme::default());
    }

    #[test]
    fn test_check_order() {
        let ragged = TableData::new(
            vec![TableColumn::new("a"), TableColumn::new("b")],
            vec![["x"].into_iter().collect()],
        );

        // Interactivity is checked before the data
        let err = TablePicker::new(ragged.clone()).check(&Tty(false));
        assert!(matches!(err, Err(PickerError::NonInteractiveTerminal)));

        let err = TablePicker::new(ragged).check(&Tty(true));
        assert!(matches!(err, Err(PickerError::InvalidTableData(_))));

        let err = TablePicker::new(table(0)).check(&Tty(true));
        assert!(matches!(err, Err(PickerError::EmptyTable)));

        assert!(TablePicker::new(table(1)).check(&Tty(true)).is_ok());
    }

    #[tokio::test]
    async fn test_run_over_fixed_keys() {
        let sink = MemorySink::new();
        let picker = TablePicker::new(table(8)).theme(Theme::plain());

        let index = picker
            .run(
                Arc::new(Tty(true)),
                vec![Key::Down, Key::Down, Key::Up, Key::Enter],
                sink.clone(),
                futures::stream::empty::<Result<TableData, Infallible>>(),
            )
            .await
            .unwrap();

        assert_eq!(index, 1);
        // Initial frame plus one per move
        assert_eq!(sink.len(), 4);
    }
}
