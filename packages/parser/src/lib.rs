//! # PreTeXt Parser
//!
//! Markup side of the PreTeXt Canvas engine: the document tree model, the
//! tag tokenizer, parsing (text → tree), serialization (tree → text), path
//! addressing, and the vocabulary transcoding between the source and visual
//! views.
//!
//! ```text
//! markup text ──tokenize──▶ tokens ──parse──▶ Node tree (source vocabulary)
//!                                                │ assign_paths
//!                                                ▼
//!                                     path-annotated tree ──to_visual──▶ visual tree
//!
//! visual tree ──to_source──▶ source tree ──serialize──▶ markup text
//! ```
//!
//! Only well-formedness is enforced here; schema validation is out of scope.

pub mod ast;
pub mod error;
pub mod parser;
pub mod path;
pub mod serializer;
pub mod tokenizer;
pub mod transcode;

pub use ast::{walk_node, Attribute, Node, Visitor};
pub use error::{line_column, ParseError, ParseResult};
pub use parser::{parse, Parser};
pub use path::{
    assign_paths, find_by_path, find_by_path_mut, path_of, NodePath, PathStep, PATH_ATTR,
};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tag_name, tokenize, Token};
pub use transcode::{structure_to_text, text_to_structure, to_source, to_visual};
