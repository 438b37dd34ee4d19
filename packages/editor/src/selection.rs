//! Selection values shared between the two views.
//!
//! The platform's selection primitives stay in the rendering layer; the core
//! only tracks paths (tree side) and a caret offset (text side).

use pretext_parser::{line_column, NodePath};
use serde::{Deserialize, Serialize};

/// Structural selection: a pair of paths. A caret-style selection has
/// `anchor_path == focus_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor_path: NodePath,
    pub focus_path: NodePath,
}

impl Selection {
    pub fn caret(path: NodePath) -> Self {
        Self {
            anchor_path: path.clone(),
            focus_path: path,
        }
    }
}

/// Which view currently has keyboard focus. The synchronizer avoids
/// scrolling the view the user is actively working in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedView {
    Visual,
    #[default]
    Source,
}

/// Proportional scroll position for a byte offset: the offset's line number
/// over the total line count. A line-based approximation, good enough for
/// long documents.
pub fn scroll_ratio(text: &str, offset: usize) -> f64 {
    let total = text.lines().count().max(1);
    let (line, _) = line_column(text, offset.min(text.len()));
    (line.saturating_sub(1)) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_selection_collapses_both_ends() {
        let path: NodePath = "a[1]/b[1]".parse().unwrap();
        let selection = Selection::caret(path.clone());
        assert_eq!(selection.anchor_path, selection.focus_path);
        assert_eq!(selection.focus_path, path);
    }

    #[test]
    fn scroll_ratio_is_line_proportional() {
        let text = "l1\nl2\nl3\nl4";
        assert_eq!(scroll_ratio(text, 0), 0.0);
        // Offset on line 3 of 4.
        let offset = text.find("l3").unwrap();
        assert_eq!(scroll_ratio(text, offset), 0.5);
    }

    #[test]
    fn scroll_ratio_clamps_past_end() {
        let text = "one\ntwo";
        let ratio = scroll_ratio(text, 999);
        assert!(ratio <= 1.0);
    }
}
