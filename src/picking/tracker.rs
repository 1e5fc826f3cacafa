use super::selection::{HighlightMode, Selection};
use crate::scene::ObjectPath;

/// Holds the current selection read by the display pass's highlight stage.
///
/// Every replacement bumps the version so the display pass can tell a new
/// selection from a re-set identical one.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selection: Selection,
    version: u64,
}

impl SelectionTracker {
    /// Tracker with an empty selection at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.version += 1;
        log::debug!(
            "selection v{}: {} selected, {} located",
            self.version,
            self.selection.selected_paths(HighlightMode::Select).len(),
            self.selection.selected_paths(HighlightMode::Locate).len()
        );
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.set_selection(Selection::new());
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replacement counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Highlight mode to draw `path` with, if any.
    #[must_use]
    pub fn highlight_of(&self, path: &ObjectPath) -> Option<HighlightMode> {
        self.selection.highlight_of(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_bumps_version() {
        let mut tracker = SelectionTracker::new();
        let cube = ObjectPath::new("/cube1").unwrap();
        let mut selection = Selection::new();
        selection.add_object(HighlightMode::Select, cube.clone());
        tracker.set_selection(selection);
        assert_eq!(tracker.version(), 1);
        assert_eq!(tracker.highlight_of(&cube), Some(HighlightMode::Select));

        tracker.clear();
        assert_eq!(tracker.version(), 2);
        assert_eq!(tracker.highlight_of(&cube), None);
    }
}
