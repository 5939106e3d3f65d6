//! tablepick - interactive, lazily populated table picker for the terminal
//!
//! Shows a boxed table one page at a time, lets the user move a highlight
//! with the keyboard, and returns the index of the row they confirm. The
//! table can be replaced while the picker is open, which is how callers
//! load more rows when the selection nears the end.
//!
//! The binary in `main.rs` is a small demo over JSON or synthetic rows.

pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod picker;
pub mod render;
pub mod selection;
pub mod session;
pub mod table;
pub mod terminal;
pub mod theme;
pub mod updates;

pub use config::PickerConfig;
pub use error::{PickerError, UpdateRejected};
pub use input::Key;
pub use picker::{PickerOptions, TablePicker};
pub use render::{FrameSink, MemorySink};
pub use selection::{SelectionEvent, SelectionInfo};
pub use session::Outcome;
pub use table::{Alignment, TableCell, TableColumn, TableData, TableRow, TableSection};
pub use terminal::Terminal;
