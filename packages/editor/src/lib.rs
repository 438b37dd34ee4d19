//! # PreTeXt Editor
//!
//! Synchronization and history engine for dual-view document editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup text ⇄ Node tree             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorContext                       │
//! │  - two live views (text + visual tree)      │
//! │  - location index: path ⇄ byte range        │
//! │  - selection sync between the views         │
//! │  - snapshot history with debounced capture  │
//! │  - validation bridge, outline, templates    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host: renders views, drains EditorEvents    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Text is what persists**: the tree is rebuilt from it, never patched
//! 2. **Everything is synchronous**: operations return their events; the
//!    host applies them, so nothing can re-enter the core mid-pass
//! 3. **Soft failure**: unresolved paths and history underflow degrade to
//!    no-ops and status messages, never panics
//! 4. **One pending deadline**: debounced history capture is driven by the
//!    host's event loop through `tick`, no timers inside the core
//!
//! ## Usage
//!
//! ```rust
//! use pretext_editor::{EditorContext, Mutation};
//!
//! let mut context = EditorContext::new("<article><p>Hello</p></article>");
//!
//! // Structural edit: forces a history checkpoint.
//! let events = context
//!     .apply_mutation(Mutation::UpdateText {
//!         path: "article[1]/p[1]".parse().unwrap(),
//!         content: "Hello world".to_string(),
//!     })
//!     .unwrap();
//! assert!(!events.is_empty());
//!
//! // Text edit: coalesced into one history entry once typing pauses.
//! context.apply_text_edit("<article><p>Hello again</p></article>");
//!
//! // Navigation: resolve a caret offset to the enclosing element.
//! let events = context.navigate_to_offset(12);
//! # let _ = events;
//! ```

mod context;
mod errors;
mod events;
mod history;
mod location_index;
mod mutations;
mod outline;
mod scheduler;
mod selection;
mod templates;
mod validation;

pub use context::{EditorContext, PARSE_ERROR_TAG};
pub use errors::EditorError;
pub use events::EditorEvent;
pub use history::{History, Snapshot, DEBOUNCE_DELAY};
pub use location_index::{Location, LocationIndex};
pub use mutations::{Mutation, MutationError};
pub use outline::{build_outline, OutlineEntry};
pub use scheduler::{Clock, Debouncer, ManualClock, SystemClock};
pub use selection::{scroll_ratio, FocusedView, Selection};
pub use templates::{
    builtin_templates, element_snippet, template, DocumentTemplate, NEW_DOCUMENT,
};
pub use validation::{
    extract_locator, SourcePosition, ValidationOutcome, ValidationState, Validator,
    WellFormednessValidator,
};

// Re-export the tree types most hosts need alongside the context.
pub use pretext_parser::{Node, NodePath};
