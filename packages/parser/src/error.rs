use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of document at {pos}: <{tag}> is never closed")]
    UnexpectedEof { pos: usize, tag: String },

    #[error("Mismatched closing tag at line {line}, column {column}: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid markup at line {line}, column {column}: {message}")]
    InvalidMarkup {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Content after the root element at line {line}, column {column}")]
    TrailingContent { line: usize, column: usize },
}

impl ParseError {
    pub fn unexpected_token(
        pos: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, tag: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            tag: tag.into(),
        }
    }

    pub fn invalid_markup(source: &str, pos: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_column(source, pos);
        Self::InvalidMarkup {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn mismatched_closing_tag(
        source: &str,
        pos: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let (line, column) = line_column(source, pos);
        Self::MismatchedClosingTag {
            line,
            column,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn trailing_content(source: &str, pos: usize) -> Self {
        let (line, column) = line_column(source, pos);
        Self::TrailingContent { line, column }
    }
}

/// 1-based line/column of a byte offset, for human-readable messages.
pub fn line_column(source: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(source.len());
    let before = &source[..pos];
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before.rfind('\n').map(|i| pos - i).unwrap_or(pos + 1);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_counts_from_one() {
        let text = "abc\ndef\nghi";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 2), (1, 3));
        assert_eq!(line_column(text, 4), (2, 1));
        assert_eq!(line_column(text, 9), (3, 2));
    }

    #[test]
    fn line_column_clamps_past_end() {
        assert_eq!(line_column("ab", 100), (1, 3));
    }

    #[test]
    fn error_messages_carry_locators() {
        let err = ParseError::mismatched_closing_tag("<a>\n</b>", 4, "a", "b");
        let rendered = err.to_string();
        assert!(rendered.contains("line 2"));
        assert!(rendered.contains("column 1"));
        assert!(rendered.contains("</a>"));
    }
}
