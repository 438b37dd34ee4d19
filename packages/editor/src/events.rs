use pretext_parser::NodePath;

/// Notifications from the core to the rendering layer.
///
/// Operations return the events they produced instead of invoking callbacks;
/// the host drains them in order. This keeps the core synchronous and makes
/// re-entry impossible by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The visual tree was rebuilt; re-render it. Carries the currently
    /// resolved selected path, if any.
    TreeChanged { selected_path: Option<NodePath> },

    /// The source text changed; re-render it and place the caret.
    TextChanged { caret: usize },

    /// Undo/redo availability changed.
    HistoryChanged { can_undo: bool, can_redo: bool },

    /// Transient status line message ("Nothing to undo", …).
    Status(String),

    /// A path, offset, or identifier could not be resolved. Soft signal;
    /// nothing was changed.
    ResolutionFailed { target: String },

    /// Move the source view's selection to this byte range (text unchanged).
    SelectTextRange { start: usize, end: usize },

    /// Scroll the source view to this proportion of its height.
    ScrollText { ratio: f64 },

    /// Bring the node at `path` into view in the visual editor.
    ScrollNodeIntoView { path: NodePath },
}
