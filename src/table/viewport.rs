//! Viewport arithmetic over a row set
//!
//! A viewport is the half-open window `[start_index, end_index)` of rows
//! currently on screen.

/// Visible window over `total_rows` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableViewport {
    /// First visible row
    pub start_index: usize,
    /// Maximum number of visible rows
    pub size: usize,
    /// Rows in the underlying table
    pub total_rows: usize,
}

impl TableViewport {
    pub fn new(size: usize, total_rows: usize) -> Self {
        Self {
            start_index: 0,
            size,
            total_rows,
        }
    }

    /// Build a viewport keeping `start_index` where possible
    ///
    /// The start is clamped so the window never hangs past the last row.
    pub fn with_start(start_index: usize, size: usize, total_rows: usize) -> Self {
        Self {
            start_index: start_index.min(total_rows.saturating_sub(size)),
            size,
            total_rows,
        }
    }

    /// One past the last visible row
    pub fn end_index(&self) -> usize {
        (self.start_index + self.size).min(self.total_rows)
    }

    /// Number of rows actually visible
    pub fn visible_len(&self) -> usize {
        self.end_index() - self.start_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index()
    }

    /// Scroll the minimum distance that makes `index` visible
    pub fn scroll_to_show(&mut self, index: usize) {
        if index < self.start_index {
            self.start_index = index;
        } else if index >= self.end_index() {
            self.start_index = (index + 1).saturating_sub(self.size);
        }
    }

    pub fn can_scroll_up(&self) -> bool {
        self.start_index > 0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.end_index() < self.total_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_index_clips_to_total() {
        let vp = TableViewport::new(10, 4);
        assert_eq!(vp.end_index(), 4);
        assert_eq!(vp.visible_len(), 4);
        assert!(!vp.can_scroll_up());
        assert!(!vp.can_scroll_down());
    }

    #[test]
    fn test_empty_table() {
        let mut vp = TableViewport::new(5, 0);
        assert_eq!(vp.end_index(), 0);
        assert_eq!(vp.visible_len(), 0);
        assert!(!vp.can_scroll_down());

        vp.scroll_to_show(0);
        assert_eq!(vp.start_index, 0);
    }

    #[test]
    fn test_scroll_down_by_one_past_end() {
        let mut vp = TableViewport::new(5, 12);
        vp.scroll_to_show(5);
        assert_eq!(vp.start_index, 1);
        assert_eq!(vp.end_index(), 6);
        assert!(vp.can_scroll_up());
        assert!(vp.can_scroll_down());
    }

    #[test]
    fn test_scroll_up_above_start() {
        let mut vp = TableViewport::with_start(7, 5, 12);
        vp.scroll_to_show(3);
        assert_eq!(vp.start_index, 3);
        assert_eq!(vp.end_index(), 8);
    }

    #[test]
    fn test_visible_index_does_not_scroll() {
        let mut vp = TableViewport::with_start(2, 5, 12);
        for i in 2..7 {
            vp.scroll_to_show(i);
            assert_eq!(vp.start_index, 2, "index {} is already visible", i);
        }
    }

    #[test]
    fn test_scroll_to_last_row() {
        let mut vp = TableViewport::new(5, 12);
        vp.scroll_to_show(11);
        assert_eq!(vp.start_index, 7);
        assert_eq!(vp.end_index(), 12);
        assert!(!vp.can_scroll_down());
    }

    #[test]
    fn test_with_start_clamps_into_range() {
        let vp = TableViewport::with_start(10, 5, 12);
        assert_eq!(vp.start_index, 7);

        let vp = TableViewport::with_start(3, 5, 2);
        assert_eq!(vp.start_index, 0);
    }

    #[test]
    fn test_scroll_to_show_is_minimal_for_all_indices() {
        for total in 0..20usize {
            for size in 1..8usize {
                for start in 0..total.max(1) {
                    for index in 0..total {
                        let mut vp = TableViewport::with_start(start, size, total);
                        let before = vp.start_index;
                        vp.scroll_to_show(index);

                        assert!(vp.contains(index), "{:?} should contain {}", vp, index);

                        // No overscroll: the start moved no further than needed
                        let expected = if index < before {
                            index
                        } else if index >= (before + size).min(total) {
                            index + 1 - size
                        } else {
                            before
                        };
                        assert_eq!(vp.start_index, expected);
                    }
                }
            }
        }
    }
}
