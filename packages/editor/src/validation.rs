//! Well-formedness validation bridge.
//!
//! The core never validates markup itself: it submits the current text to a
//! [`Validator`] and consumes back a pass/fail plus a human-readable message.
//! When the message happens to carry a line/column locator, a permissive
//! pattern extracts it so the rendering layer can offer a clickable jump.

use pretext_parser::parse;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// What a validator reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub well_formed: bool,
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            well_formed: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            well_formed: false,
            message: Some(message.into()),
        }
    }
}

/// External well-formedness checker.
pub trait Validator {
    fn check(&self, text: &str) -> ValidationOutcome;
}

/// Default validator backed by the markup parser. Well-formedness only;
/// no schema awareness.
#[derive(Debug, Default)]
pub struct WellFormednessValidator;

impl Validator for WellFormednessValidator {
    fn check(&self, text: &str) -> ValidationOutcome {
        match parse(text) {
            Ok(_) => ValidationOutcome::ok(),
            Err(error) => ValidationOutcome::failed(error.to_string()),
        }
    }
}

/// A parsed `line N, column M` locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

/// Pull a line/column locator out of a free-form validator message.
///
/// Permissive on purpose: any "line … 12" phrasing counts, the column is
/// optional and defaults to 1.
pub fn extract_locator(message: &str) -> Option<SourcePosition> {
    static LINE: OnceLock<Regex> = OnceLock::new();
    static COLUMN: OnceLock<Regex> = OnceLock::new();

    let line_re = LINE.get_or_init(|| Regex::new(r"(?i)line\D*(\d+)").expect("valid pattern"));
    let column_re =
        COLUMN.get_or_init(|| Regex::new(r"(?i)column\D*(\d+)").expect("valid pattern"));

    let line = line_re
        .captures(message)?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    let column = column_re
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1);

    Some(SourcePosition { line, column })
}

/// Validation read model kept on the editor context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationState {
    pub well_formed: bool,
    pub message: Option<String>,
    pub locator: Option<SourcePosition>,
}

impl ValidationState {
    pub fn from_outcome(outcome: ValidationOutcome) -> Self {
        let locator = outcome.message.as_deref().and_then(extract_locator);
        Self {
            well_formed: outcome.well_formed,
            message: outcome.message,
            locator,
        }
    }
}

impl Default for ValidationState {
    fn default() -> Self {
        Self {
            well_formed: true,
            message: None,
            locator: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_markup_passes() {
        let outcome = WellFormednessValidator.check("<a><b>1</b></a>");
        assert!(outcome.well_formed);
        assert!(outcome.message.is_none());
    }

    #[test]
    fn malformed_markup_fails_with_message() {
        let outcome = WellFormednessValidator.check("<a><b></a>");
        assert!(!outcome.well_formed);
        assert!(outcome.message.is_some());
    }

    #[test]
    fn locator_parses_line_and_column() {
        let position = extract_locator("error on line 4, column 17: oops").unwrap();
        assert_eq!(position, SourcePosition { line: 4, column: 17 });
    }

    #[test]
    fn locator_tolerates_phrasing_variants() {
        assert_eq!(
            extract_locator("Line: 12 is broken").unwrap().line,
            12
        );
        let only_line = extract_locator("at line 3").unwrap();
        assert_eq!(only_line.column, 1);
        assert!(extract_locator("no numbers here").is_none());
    }

    #[test]
    fn parser_messages_produce_clickable_locators() {
        let outcome = WellFormednessValidator.check("<a>\n  <b>x</c>\n</a>");
        let state = ValidationState::from_outcome(outcome);
        assert!(!state.well_formed);
        assert_eq!(state.locator.unwrap().line, 2);
    }
}
