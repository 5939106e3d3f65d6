//! Selection-change notifications
//!
//! Listeners learn where the cursor is and whether it is close enough to
//! the last loaded row to start fetching more (`is_near_end`).

use crate::session::{Outcome, Snapshot};

/// Default row distance from the end that counts as "near end"
pub const DEFAULT_NEAR_END_THRESHOLD: usize = 5;

/// Where the selection currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionInfo {
    pub selected_index: usize,
    pub total_rows: usize,
    pub is_near_end: bool,
}

impl SelectionInfo {
    pub fn new(selected_index: usize, total_rows: usize, threshold: usize) -> Self {
        Self {
            selected_index,
            total_rows,
            is_near_end: total_rows.saturating_sub(selected_index) <= threshold,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot, threshold: usize) -> Self {
        Self::new(snapshot.selected_index, snapshot.total_rows(), threshold)
    }
}

/// Event delivered to the selection callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Initial load or a navigation key moved the cursor
    Changed(SelectionInfo),
    /// The user confirmed or cancelled; no further events follow
    Ended(Outcome),
}

impl SelectionEvent {
    pub fn info(&self) -> Option<&SelectionInfo> {
        match self {
            SelectionEvent::Changed(info) => Some(info),
            SelectionEvent::Ended(_) => None,
        }
    }
}

type Callback = Box<dyn Fn(&SelectionEvent) + Send + Sync>;

/// Derives `SelectionInfo` from snapshots and forwards events to a callback
pub struct SelectionNotifier {
    threshold: usize,
    callback: Option<Callback>,
}

impl Default for SelectionNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_END_THRESHOLD)
    }
}

impl std::fmt::Debug for SelectionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionNotifier")
            .field("threshold", &self.threshold)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl SelectionNotifier {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            callback: None,
        }
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    /// Emit `Changed` for the snapshot and return the derived info
    pub fn selection_changed(&self, snapshot: &Snapshot) -> SelectionInfo {
        let info = SelectionInfo::from_snapshot(snapshot, self.threshold);
        if info.is_near_end {
            tracing::debug!(
                selected = info.selected_index,
                total = info.total_rows,
                "selection near end of loaded rows"
            );
        }
        self.emit(&SelectionEvent::Changed(info));
        info
    }

    pub fn interaction_ended(&self, outcome: Outcome) {
        self.emit(&SelectionEvent::Ended(outcome));
    }

    fn emit(&self, event: &SelectionEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::table::{TableColumn, TableData, TableRow};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_near_end_threshold() {
        assert!(!SelectionInfo::new(3, 10, 5).is_near_end);
        assert!(SelectionInfo::new(5, 10, 5).is_near_end);
        assert!(SelectionInfo::new(6, 10, 5).is_near_end);
        assert!(SelectionInfo::new(9, 10, 5).is_near_end);
    }

    #[test]
    fn test_small_table_is_always_near_end() {
        assert!(SelectionInfo::new(0, 3, DEFAULT_NEAR_END_THRESHOLD).is_near_end);
    }

    #[test]
    fn test_zero_threshold() {
        assert!(!SelectionInfo::new(9, 10, 0).is_near_end);
    }

    #[test]
    fn test_notifier_forwards_events() {
        let seen = Arc::new(Mutex::new(Vec::<SelectionEvent>::new()));
        let sink = seen.clone();
        let notifier = SelectionNotifier::new(5)
            .with_callback(move |event| sink.lock().unwrap().push(*event));

        let data = TableData::new(
            vec![TableColumn::new("n")],
            (0..10)
                .map(|i| -> TableRow { [i.to_string()].into_iter().collect() })
                .collect(),
        );
        let mut state = SessionState::new(data, 4);

        let info = notifier.selection_changed(&state.snapshot());
        assert_eq!(info.selected_index, 0);
        assert!(!info.is_near_end);

        let info = notifier.selection_changed(&state.move_to(6));
        assert!(info.is_near_end);

        notifier.interaction_ended(state.confirm());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].info().map(|i| i.selected_index), Some(6));
        assert_eq!(seen[2], SelectionEvent::Ended(Outcome::Confirmed(6)));
        assert!(seen[2].info().is_none());
    }

    #[test]
    fn test_notifier_without_callback() {
        let notifier = SelectionNotifier::default();
        assert_eq!(notifier.threshold(), DEFAULT_NEAR_END_THRESHOLD);
        notifier.interaction_ended(Outcome::Cancelled);
    }
}
