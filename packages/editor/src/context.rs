//! # Editor Context
//!
//! The pair of live views and everything that keeps them honest: the source
//! text, the visual tree, the memoized location index, the selection, the
//! validation state, and the snapshot history.
//!
//! There is no singleton; the host constructs an [`EditorContext`] and passes
//! it to whatever owns the UI. Every operation is synchronous, runs to
//! completion, and returns the [`EditorEvent`]s it produced — callbacks never
//! re-enter the core, and a guard flag turns any synchronous re-entry that
//! does happen into a no-op.

use crate::errors::EditorError;
use crate::events::EditorEvent;
use crate::history::{History, Snapshot};
use crate::location_index::LocationIndex;
use crate::mutations::Mutation;
use crate::outline::{build_outline, OutlineEntry};
use crate::scheduler::{Clock, SystemClock};
use crate::selection::{scroll_ratio, FocusedView, Selection};
use crate::templates::{element_snippet, template};
use crate::validation::{
    SourcePosition, ValidationState, Validator, WellFormednessValidator,
};
use pretext_parser::{
    assign_paths, parse, path_of, serialize, text_to_structure, to_visual, Node, NodePath,
};
use std::ops::Range;
use tracing::{debug, warn};

/// Tag of the placeholder root shown when the text no longer parses.
pub const PARSE_ERROR_TAG: &str = "parse-error";

pub struct EditorContext {
    text: String,
    visual: Node,
    caret: usize,
    selection: Option<Selection>,
    focused: FocusedView,
    modified: bool,
    /// Reentrancy guard: set while a synchronization pass is overwriting the
    /// views. Mutating operations invoked while it is held are no-ops.
    guard: bool,
    index: Option<LocationIndex>,
    history: History,
    validator: Box<dyn Validator>,
    validation: ValidationState,
    clock: Box<dyn Clock>,
}

impl EditorContext {
    pub fn new(text: &str) -> Self {
        Self::with_parts(
            text,
            Box::new(WellFormednessValidator),
            Box::new(SystemClock),
        )
    }

    /// Construct with a manually driven clock (deterministic tests).
    pub fn with_clock(text: &str, clock: Box<dyn Clock>) -> Self {
        Self::with_parts(text, Box::new(WellFormednessValidator), clock)
    }

    pub fn with_parts(
        text: &str,
        validator: Box<dyn Validator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut context = Self {
            text: text.to_string(),
            visual: Node::new(PARSE_ERROR_TAG),
            caret: 0,
            selection: None,
            focused: FocusedView::default(),
            modified: false,
            guard: false,
            index: None,
            history: History::new(),
            validator,
            validation: ValidationState::default(),
            clock,
        };

        let mut events = Vec::new();
        context.resync_from_text(&mut events);
        // Seed history: from here on the undo stack is never empty and its
        // top always mirrors the displayed state.
        context.record_snapshot_into(true, &mut events);
        context
    }

    // ---- read model -----------------------------------------------------

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visual_tree(&self) -> &Node {
        &self.visual
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn outline(&self) -> Vec<OutlineEntry> {
        build_outline(&self.visual)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn focused_view(&self) -> FocusedView {
        self.focused
    }

    pub fn set_focused_view(&mut self, view: FocusedView) {
        self.focused = view;
    }

    // ---- text edits -----------------------------------------------------

    /// Replace the whole source buffer (a source-view input event).
    /// Schedules a debounced history capture.
    pub fn apply_text_edit(&mut self, new_text: impl Into<String>) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            debug!("text edit ignored: synchronization in progress");
            return events;
        }

        self.text = new_text.into();
        self.caret = self.caret.min(self.text.len());
        self.modified = true;
        self.resync_from_text(&mut events);
        self.schedule_snapshot();
        events
    }

    /// Replace a byte range of the source text. Offsets are clamped to the
    /// buffer and snapped down to character boundaries.
    pub fn replace_text_range(
        &mut self,
        range: Range<usize>,
        replacement: &str,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            debug!("text edit ignored: synchronization in progress");
            return events;
        }

        let (start, end) = self.clamp_range(range);
        self.text.replace_range(start..end, replacement);
        self.caret = start + replacement.len();
        self.modified = true;
        self.resync_from_text(&mut events);
        events.push(EditorEvent::TextChanged { caret: self.caret });
        self.schedule_snapshot();
        events
    }

    // ---- structural edits -----------------------------------------------

    /// Apply a structural edit to the tree and resynchronize the text.
    /// Forces a history checkpoint.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<Vec<EditorEvent>, EditorError> {
        let mut events = Vec::new();
        if self.guard {
            return Ok(events);
        }

        let mut source = parse(&self.text)?;
        mutation.apply(&mut source)?;
        assign_paths(&mut source);

        self.text = serialize(&source);
        self.visual = to_visual(&source);
        self.index = None;
        self.modified = true;
        self.caret = self.caret.min(self.text.len());
        self.refresh_validation();

        events.push(EditorEvent::TextChanged { caret: self.caret });
        events.push(EditorEvent::TreeChanged {
            selected_path: self.selected_path(),
        });
        self.record_snapshot_into(true, &mut events);
        Ok(events)
    }

    /// Insert a palette element's markup at the caret. Unknown kinds are a
    /// soft status, not an error.
    pub fn insert_element(&mut self, kind: &str) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }

        let Some(snippet) = element_snippet(kind) else {
            events.push(EditorEvent::Status(format!("Unknown element: {kind}")));
            return events;
        };

        let (at, _) = self.clamp_range(self.caret..self.caret);
        let insertion = format!("\n{snippet}\n");
        self.text.insert_str(at, &insertion);
        self.caret = at + insertion.len();
        self.modified = true;
        self.resync_from_text(&mut events);
        events.push(EditorEvent::TextChanged { caret: self.caret });
        self.record_snapshot_into(true, &mut events);
        events
    }

    /// Replace the document with a template skeleton.
    pub fn apply_template(&mut self, id: &str) -> Vec<EditorEvent> {
        match template(id) {
            Some(found) => {
                let mut events = self.load_document(found.skeleton);
                events.push(EditorEvent::Status(format!("Applied: {}", found.label)));
                events
            }
            None => vec![EditorEvent::Status(format!("Unknown template: {id}"))],
        }
    }

    /// Load a document the host read from somewhere. Clears the modified
    /// flag and forces a history checkpoint.
    pub fn load_document(&mut self, text: &str) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }

        self.text = text.to_string();
        self.caret = 0;
        self.selection = None;
        self.modified = false;
        self.resync_from_text(&mut events);
        events.push(EditorEvent::TextChanged { caret: 0 });
        self.record_snapshot_into(true, &mut events);
        events
    }

    // ---- history --------------------------------------------------------

    /// Capture a snapshot now. `force` bypasses the equal-to-top skip.
    pub fn record_snapshot(&mut self, force: bool) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        self.record_snapshot_into(force, &mut events);
        events
    }

    /// (Re)start the debounce deadline; `tick` captures once it elapses.
    pub fn schedule_snapshot(&mut self) {
        if self.guard {
            return;
        }
        let now = self.clock.now();
        self.history.schedule(now);
    }

    /// Drive pending deferred work. The host calls this from its event loop.
    pub fn tick(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let now = self.clock.now();
        if self.history.poll(now) {
            self.record_snapshot_into(false, &mut events);
        }
        events
    }

    pub fn undo(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_snapshot(&snapshot, &mut events);
                events.push(self.history_changed());
            }
            None => events.push(EditorEvent::Status("Nothing to undo".to_string())),
        }
        events
    }

    pub fn redo(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_snapshot(&snapshot, &mut events);
                events.push(self.history_changed());
            }
            None => events.push(EditorEvent::Status("Nothing to redo".to_string())),
        }
        events
    }

    // ---- navigation / selection sync ------------------------------------

    /// Structure → text: place the source selection on the node at `path`.
    pub fn navigate_to_path(&mut self, path: &NodePath) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }
        self.guard = true;

        match self.index().location_at(path).cloned() {
            Some(location) => {
                let start = location.start.min(self.text.len());
                let end = location.end.min(self.text.len());
                self.caret = start;
                self.selection = Some(Selection::caret(path.clone()));
                events.push(EditorEvent::SelectTextRange { start, end });
                events.push(EditorEvent::ScrollText {
                    ratio: scroll_ratio(&self.text, start),
                });
            }
            None => events.push(EditorEvent::ResolutionFailed {
                target: path.to_string(),
            }),
        }

        self.guard = false;
        events
    }

    /// Structure → text, starting from a node. The node must carry a path
    /// annotation; transcoded trees always do.
    pub fn navigate_to_node(&mut self, node: &Node) -> Vec<EditorEvent> {
        match path_of(node) {
            Some(path) => self.navigate_to_path(&path),
            None => vec![EditorEvent::ResolutionFailed {
                target: node.name.clone(),
            }],
        }
    }

    /// Text → structure: select the node enclosing a text offset. The
    /// visual view is only scrolled when it is not the focused view.
    pub fn navigate_to_offset(&mut self, offset: usize) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }
        self.guard = true;

        match self.index().path_at(offset).cloned() {
            Some(path) => {
                self.selection = Some(Selection::caret(path.clone()));
                events.push(EditorEvent::TreeChanged {
                    selected_path: Some(path.clone()),
                });
                if self.focused != FocusedView::Visual {
                    events.push(EditorEvent::ScrollNodeIntoView { path });
                }
            }
            None => events.push(EditorEvent::ResolutionFailed {
                target: format!("offset {offset}"),
            }),
        }

        self.guard = false;
        events
    }

    /// Navigate both views to the element carrying `xml:id="id"`.
    pub fn navigate_to_xml_id(&mut self, id: &str) -> Vec<EditorEvent> {
        let Some(path) = self.visual.find_by_xml_id(id).and_then(path_of) else {
            return vec![EditorEvent::ResolutionFailed {
                target: id.to_string(),
            }];
        };

        let mut events = self.navigate_to_path(&path);
        events.push(EditorEvent::TreeChanged {
            selected_path: Some(path.clone()),
        });
        if self.focused != FocusedView::Visual {
            events.push(EditorEvent::ScrollNodeIntoView { path });
        }
        events
    }

    /// Jump the source caret to a line/column locator (validation click).
    pub fn focus_source_position(&mut self, position: SourcePosition) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if self.guard {
            return events;
        }

        let offset = offset_of_position(&self.text, position);
        self.caret = offset;
        events.push(EditorEvent::SelectTextRange {
            start: offset,
            end: offset,
        });
        events.push(EditorEvent::ScrollText {
            ratio: scroll_ratio(&self.text, offset),
        });
        events
    }

    // ---- internals ------------------------------------------------------

    /// Rebuild the visual tree and validation state from the current text,
    /// degrading to a placeholder tree when the markup no longer parses.
    fn resync_from_text(&mut self, events: &mut Vec<EditorEvent>) {
        self.index = None;
        match text_to_structure(&self.text) {
            Ok(tree) => self.visual = tree,
            Err(error) => {
                warn!(%error, "markup does not parse; showing degraded structure");
                self.visual = Node::with_text(PARSE_ERROR_TAG, error.to_string());
            }
        }
        self.refresh_validation();
        events.push(EditorEvent::TreeChanged {
            selected_path: self.selected_path(),
        });
    }

    fn refresh_validation(&mut self) {
        let outcome = self.validator.check(&self.text);
        self.validation = ValidationState::from_outcome(outcome);
    }

    /// The lazily rebuilt location index for the current text.
    fn index(&mut self) -> &LocationIndex {
        let valid = self
            .index
            .as_ref()
            .is_some_and(|index| index.is_valid_for(&self.text));
        if !valid {
            self.index = Some(LocationIndex::build(&self.text));
        }
        self.index.as_ref().expect("index built above")
    }

    fn record_snapshot_into(&mut self, force: bool, events: &mut Vec<EditorEvent>) {
        if self.guard {
            return;
        }
        let structure = serde_json::to_string(&self.visual).unwrap_or_else(|error| {
            warn!(%error, "tree did not serialize; snapshot will re-parse on apply");
            String::new()
        });
        let snapshot = Snapshot {
            text: self.text.clone(),
            structure,
            modified: self.modified,
        };
        if self.history.record(snapshot, force) {
            events.push(self.history_changed());
        }
    }

    /// Overwrite both views from a snapshot under the reentrancy guard,
    /// then resynchronize the derived state once, at the end.
    fn apply_snapshot(&mut self, snapshot: &Snapshot, events: &mut Vec<EditorEvent>) {
        self.guard = true;

        self.text = snapshot.text.clone();
        self.caret = self.caret.min(self.text.len());
        self.modified = snapshot.modified;
        self.index = None;
        self.visual = match serde_json::from_str(&snapshot.structure) {
            Ok(tree) => tree,
            Err(_) => match text_to_structure(&self.text) {
                Ok(tree) => tree,
                Err(error) => Node::with_text(PARSE_ERROR_TAG, error.to_string()),
            },
        };
        self.refresh_validation();

        self.guard = false;

        events.push(EditorEvent::TextChanged { caret: self.caret });
        events.push(EditorEvent::TreeChanged {
            selected_path: self.selected_path(),
        });
    }

    fn history_changed(&self) -> EditorEvent {
        EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    fn selected_path(&self) -> Option<NodePath> {
        self.selection
            .as_ref()
            .map(|selection| selection.focus_path.clone())
    }

    /// Clamp a byte range to the buffer, snapping down to char boundaries.
    fn clamp_range(&self, range: Range<usize>) -> (usize, usize) {
        let mut start = range.start.min(self.text.len());
        let mut end = range.end.clamp(start, self.text.len());
        while start > 0 && !self.text.is_char_boundary(start) {
            start -= 1;
        }
        while end > start && !self.text.is_char_boundary(end) {
            end -= 1;
        }
        (start, end.max(start))
    }
}

/// Byte offset of a 1-based line/column locator, clamped into the text.
fn offset_of_position(text: &str, position: SourcePosition) -> usize {
    let line = position.line.max(1) - 1;
    let column = position.column.max(1) - 1;

    let mut offset = 0;
    for (index, l) in text.split('\n').enumerate() {
        if index == line {
            return (offset + column.min(l.len())).min(text.len());
        }
        offset += l.len() + 1;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_of_position_walks_lines() {
        let text = "one\ntwo\nthree";
        assert_eq!(
            offset_of_position(text, SourcePosition { line: 1, column: 1 }),
            0
        );
        assert_eq!(
            offset_of_position(text, SourcePosition { line: 2, column: 1 }),
            4
        );
        assert_eq!(
            offset_of_position(text, SourcePosition { line: 2, column: 3 }),
            6
        );
        // Column past end of line clamps to the line end.
        assert_eq!(
            offset_of_position(text, SourcePosition { line: 1, column: 99 }),
            3
        );
        // Line past end of document clamps to the document end.
        assert_eq!(
            offset_of_position(text, SourcePosition { line: 99, column: 1 }),
            text.len()
        );
    }

    #[test]
    fn new_context_seeds_history_and_parses() {
        let context = EditorContext::new("<a><b>1</b></a>");
        assert!(!context.can_undo());
        assert!(!context.can_redo());
        assert!(!context.is_modified());
        assert_eq!(context.visual_tree().name, "a");
        assert!(context.validation().well_formed);
    }

    #[test]
    fn new_context_with_broken_markup_degrades() {
        let context = EditorContext::new("<a><b></a>");
        assert_eq!(context.visual_tree().name, PARSE_ERROR_TAG);
        assert!(!context.validation().well_formed);
        assert!(context.validation().message.is_some());
    }
}
