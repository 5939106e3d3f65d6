//! tablepick - pick a row from a table in the terminal
//!
//! Reads a JSON array of objects (or makes up rows when no file is given),
//! shows it a page at a time, and prints the chosen row as JSON. Rows are
//! handed to the picker in batches as the selection nears the end, the way
//! a caller backed by a slow source would.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::style::Color;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, info};

use tablepick::{
    Alignment, PickerConfig, PickerError, SelectionEvent, TableCell, TableColumn, TableData,
    TablePicker, TableRow,
};

const SYNTHETIC_ROWS: usize = 250;

/// Where the demo rows come from
enum RowSource {
    Json {
        columns: Vec<String>,
        records: Vec<Map<String, Value>>,
    },
    Synthetic(usize),
}

impl RowSource {
    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records: Vec<Map<String, Value>> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        info!(
            "loaded {} records with {} columns from {}",
            records.len(),
            columns.len(),
            path.display()
        );
        Ok(RowSource::Json { columns, records })
    }

    fn len(&self) -> usize {
        match self {
            RowSource::Json { records, .. } => records.len(),
            RowSource::Synthetic(n) => *n,
        }
    }

    fn columns(&self) -> Vec<TableColumn> {
        match self {
            RowSource::Json { columns, .. } => columns.iter().map(TableColumn::new).collect(),
            RowSource::Synthetic(_) => vec![
                TableColumn::new("#").align(Alignment::Right),
                TableColumn::new("name"),
                TableColumn::new("status").align(Alignment::Center),
                TableColumn::new("size").align(Alignment::Right),
            ],
        }
    }

    fn row(&self, index: usize) -> TableRow {
        match self {
            RowSource::Json { columns, records } => columns
                .iter()
                .map(|column| cell_text(records[index].get(column)))
                .collect(),
            RowSource::Synthetic(_) => {
                let status = if index % 7 == 3 {
                    TableCell::new("failed").fg(Color::Red)
                } else {
                    TableCell::new("ok").fg(Color::Green)
                };
                TableRow::new(vec![
                    TableCell::new(index.to_string()).dim(),
                    TableCell::new(format!("item-{:04}", index)),
                    status,
                    TableCell::new(format!("{} KiB", (index * 37) % 1024)),
                ])
            }
        }
    }

    /// First `count` rows as a table
    fn table(&self, count: usize) -> TableData {
        let count = count.min(self.len());
        TableData::new(self.columns(), (0..count).map(|i| self.row(i)).collect())
    }

    fn record(&self, index: usize) -> Value {
        match self {
            RowSource::Json { records, .. } => Value::Object(records[index].clone()),
            RowSource::Synthetic(_) => {
                let record: Map<String, Value> = self
                    .columns()
                    .into_iter()
                    .zip(self.row(index).cells)
                    .map(|(column, cell)| (column.title, Value::String(cell.text)))
                    .collect();
                Value::Object(record)
            }
        }
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tablepick=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("TABLEPICK_CONFIG").unwrap_or_else(|_| "tablepick.toml".to_string());
    let config = PickerConfig::load(&config_path).context("failed to load picker config")?;

    let source = match std::env::args().nth(1) {
        Some(path) => RowSource::from_file(Path::new(&path))?,
        None => RowSource::Synthetic(SYNTHETIC_ROWS),
    };
    let source = Arc::new(source);

    let batch = config.page_size * 2;
    let initial = source.table(batch);

    // Selection callback -> loader: "the user is near the end of N rows"
    let (more_tx, mut more_rx) = mpsc::unbounded_channel::<usize>();
    // Loader -> picker: grown tables
    let (update_tx, update_rx) = mpsc::unbounded_channel::<Result<TableData, Infallible>>();

    let loader_source = source.clone();
    let mut loaded = initial.row_count();
    tokio::spawn(async move {
        while let Some(seen) = more_rx.recv().await {
            // Stale request: a bigger table is already on its way
            if seen < loaded || loaded >= loader_source.len() {
                continue;
            }
            loaded = (loaded + batch).min(loader_source.len());
            debug!(loaded, "loading more rows");
            if update_tx.send(Ok(loader_source.table(loaded))).is_err() {
                break;
            }
        }
    });

    let updates = Box::pin(futures::stream::unfold(update_rx, |mut rx| async move {
        rx.recv().await.map(|update| (update, rx))
    }));

    let picker = TablePicker::from_config(initial, &config).on_selection(move |event| {
        if let SelectionEvent::Changed(info) = event {
            if info.is_near_end {
                let _ = more_tx.send(info.total_rows);
            }
        }
    });

    match picker.run_interactive(updates).await {
        Ok(index) => {
            println!("{}", serde_json::to_string_pretty(&source.record(index))?);
            Ok(())
        }
        Err(PickerError::UserCancelled) => {
            info!("nothing selected");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
