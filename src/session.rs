//! Session state shared by the input and update tasks
//!
//! `SessionState` holds the selection logic. `Session` is the cloneable
//! handle both tasks use; every operation takes the lock exactly once, so
//! each call is atomic with respect to every other call and to snapshots.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{PickerError, UpdateRejected};
use crate::table::{TableData, TableViewport};

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(usize),
    Cancelled,
}

/// Immutable point-in-time copy of the session for rendering
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub data: Arc<TableData>,
    pub selected_index: usize,
    pub viewport: TableViewport,
    pub page_size: usize,
    /// Bumped on every mutation; later snapshots have larger versions
    pub version: u64,
}

impl Snapshot {
    pub fn total_rows(&self) -> usize {
        self.data.row_count()
    }

    /// Position of the selected row inside the viewport
    pub fn selected_in_viewport(&self) -> usize {
        self.selected_index - self.viewport.start_index
    }
}

/// Mutable selection state
#[derive(Debug)]
pub struct SessionState {
    data: Arc<TableData>,
    selected_index: usize,
    viewport: TableViewport,
    page_size: usize,
    outcome: Option<Outcome>,
    version: u64,
}

impl SessionState {
    /// Build state over already-validated, non-empty data
    pub fn new(data: TableData, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let rows = data.row_count();
        Self {
            data: Arc::new(data),
            selected_index: 0,
            viewport: TableViewport::new(page_size.min(rows), rows),
            page_size,
            outcome: None,
            version: 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: self.data.clone(),
            selected_index: self.selected_index,
            viewport: self.viewport,
            page_size: self.page_size,
            version: self.version,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn viewport(&self) -> TableViewport {
        self.viewport
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn is_stopped(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Swap in new table data, keeping the selection and window in range
    ///
    /// A rejected update leaves the state untouched.
    pub fn replace_data(&mut self, data: TableData) -> Result<Snapshot, UpdateRejected> {
        if self.is_stopped() {
            return Err(UpdateRejected::Stopped);
        }
        data.validate()?;
        if data.is_empty() {
            return Err(UpdateRejected::Empty);
        }
        let expected = self.data.columns().len();
        if data.columns().len() != expected {
            return Err(UpdateRejected::ColumnsChanged {
                expected,
                found: data.columns().len(),
            });
        }

        let rows = data.row_count();
        self.data = Arc::new(data);
        self.selected_index = self.selected_index.min(rows - 1);
        self.viewport =
            TableViewport::with_start(self.viewport.start_index, self.page_size.min(rows), rows);
        self.viewport.scroll_to_show(self.selected_index);
        self.version += 1;
        Ok(self.snapshot())
    }

    /// Move the selection by `delta` rows, clamping at both ends
    pub fn move_selection(&mut self, delta: isize) -> Snapshot {
        let rows = self.data.row_count();
        if rows == 0 {
            return self.snapshot();
        }
        let last = (rows - 1) as isize;
        let target = (self.selected_index as isize).saturating_add(delta).clamp(0, last);
        self.select(target as usize)
    }

    pub fn move_to(&mut self, index: usize) -> Snapshot {
        let rows = self.data.row_count();
        if rows == 0 {
            return self.snapshot();
        }
        self.select(index.min(rows - 1))
    }

    pub fn move_to_end(&mut self) -> Snapshot {
        let rows = self.data.row_count();
        if rows == 0 {
            return self.snapshot();
        }
        self.select(rows - 1)
    }

    fn select(&mut self, index: usize) -> Snapshot {
        self.selected_index = index;
        self.viewport.scroll_to_show(index);
        self.version += 1;
        self.snapshot()
    }

    /// Stop with the current row selected; the first outcome wins
    pub fn confirm(&mut self) -> Outcome {
        self.finish(Outcome::Confirmed(self.selected_index))
    }

    pub fn cancel(&mut self) -> Outcome {
        self.finish(Outcome::Cancelled)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        if let Some(existing) = self.outcome {
            return existing;
        }
        self.outcome = Some(outcome);
        self.version += 1;
        outcome
    }

    pub fn final_result(&self) -> Result<usize, PickerError> {
        match self.outcome {
            Some(Outcome::Confirmed(index)) => Ok(index),
            Some(Outcome::Cancelled) => Err(PickerError::UserCancelled),
            None => Err(PickerError::Pending),
        }
    }
}

/// Shared handle to a `SessionState`
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(data: TableData, page_size: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(data, page_size))),
        }
    }

    // Mutations only assign fields after their checks pass, so a poisoned
    // lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn replace_data(&self, data: TableData) -> Result<Snapshot, UpdateRejected> {
        self.lock().replace_data(data)
    }

    pub fn move_selection(&self, delta: isize) -> Snapshot {
        self.lock().move_selection(delta)
    }

    pub fn move_to(&self, index: usize) -> Snapshot {
        self.lock().move_to(index)
    }

    pub fn move_to_end(&self) -> Snapshot {
        self.lock().move_to_end()
    }

    pub fn confirm(&self) -> Outcome {
        self.lock().confirm()
    }

    pub fn cancel(&self) -> Outcome {
        self.lock().cancel()
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().is_stopped()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.lock().outcome()
    }

    pub fn final_result(&self) -> Result<usize, PickerError> {
        self.lock().final_result()
    }
}
