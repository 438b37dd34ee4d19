//! # Undo/Redo History
//!
//! Whole-document snapshots on two stacks.
//!
//! ## Design
//!
//! - A snapshot captures both views (text + serialized tree) at one instant
//! - The top of the undo stack is always the currently displayed state
//! - Undo pops onto the redo stack and re-applies the new top
//! - New snapshots clear the redo stack
//! - Rapid edits are coalesced: `schedule` restarts a debounce deadline and
//!   only the last one fires a capture

use crate::scheduler::Debouncer;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long typing must pause before a debounced snapshot is captured.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(600);

/// Default maximum number of retained undo entries.
const MAX_LEVELS: usize = 100;

/// Immutable capture of both views at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The source text.
    pub text: String,
    /// The visual tree, serialized to JSON.
    pub structure: String,
    /// Whether the document had unsaved changes.
    pub modified: bool,
}

/// Snapshot stacks plus the debounce deadline for coalescing.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_levels: usize,
    debouncer: Debouncer,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_levels(MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            debouncer: Debouncer::new(DEBOUNCE_DELAY),
        }
    }

    /// Record a snapshot. Returns whether an entry was actually pushed.
    ///
    /// With `force == false` a snapshot equal to the current top is skipped,
    /// so focus-only events never pollute history. A forced record also
    /// cancels any pending debounced capture, which it supersedes.
    pub fn record(&mut self, snapshot: Snapshot, force: bool) -> bool {
        if force {
            self.debouncer.cancel();
        }

        if let Some(top) = self.undo_stack.last() {
            // Textual/structural equality only: a focus-only event may have
            // flipped the modified flag without changing either view.
            if !force && top.text == snapshot.text && top.structure == snapshot.structure {
                return false;
            }
        }

        self.undo_stack.push(snapshot);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New forward edit invalidates the redo branch.
        self.redo_stack.clear();
        true
    }

    /// (Re)start the debounce deadline. `poll` reports when it elapses.
    pub fn schedule(&mut self, now: Instant) {
        self.debouncer.schedule(now);
    }

    /// True exactly once when the pending debounced capture comes due.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.debouncer.poll(now)
    }

    pub fn is_capture_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Step back. Returns the snapshot to re-apply, or `None` when only the
    /// initial state remains.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let current = self.undo_stack.pop().expect("stack checked non-empty");
        self.redo_stack.push(current);
        self.undo_stack.last().cloned()
    }

    /// Step forward. Returns the snapshot to re-apply, or `None` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot.clone());
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
