//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Malformed markup: {0}")]
    MalformedMarkup(#[from] pretext_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}
