use crate::ast::Node;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{parse_attributes, tag_name, tokenize, Token};
use std::ops::Range;

/// Recursive-descent parser building a [`Node`] tree from markup text.
///
/// Well-formedness only: balanced tags and quoted attributes. Anything
/// schema-shaped is someone else's problem.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
}

/// Parse markup text into a tree.
pub fn parse(source: &str) -> ParseResult<Node> {
    Parser::new(source).parse_document()
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
        }
    }

    /// Parse a complete document: optional prolog, one root element,
    /// optional trailing trivia.
    pub fn parse_document(&mut self) -> ParseResult<Node> {
        self.skip_trivia();

        let root = match self.peek() {
            Some((Token::OpenTag(_), _)) | Some((Token::SelfClosingTag(_), _)) => {
                self.parse_element()?
            }
            Some((_, span)) => {
                return Err(ParseError::invalid_markup(
                    self.source,
                    span.start,
                    "expected a root element",
                ));
            }
            None => return Err(ParseError::EmptyDocument),
        };

        self.skip_trivia();
        if let Some((_, span)) = self.peek() {
            return Err(ParseError::trailing_content(self.source, span.start));
        }

        Ok(root)
    }

    fn parse_element(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some((Token::SelfClosingTag(slice), span)) => {
                let node = self.element_from_tag(slice, span.start)?;
                self.advance();
                Ok(node)
            }
            Some((Token::OpenTag(slice), span)) => {
                let open_start = span.start;
                let mut node = self.element_from_tag(slice, open_start)?;
                let name = node.name.clone();
                self.advance();
                self.parse_children(&mut node, &name, open_start)?;
                Ok(node)
            }
            Some((other, span)) => Err(ParseError::unexpected_token(
                span.start,
                "an element",
                format!("{:?}", other),
            )),
            None => Err(ParseError::EmptyDocument),
        }
    }

    fn parse_children(
        &mut self,
        node: &mut Node,
        name: &str,
        open_start: usize,
    ) -> ParseResult<()> {
        let mut text_segments: Vec<String> = Vec::new();

        loop {
            match self.peek() {
                Some((Token::Text(raw), _)) => {
                    let decoded = html_escape::decode_html_entities(raw);
                    let collapsed = collapse_whitespace(&decoded);
                    if !collapsed.is_empty() {
                        text_segments.push(collapsed);
                    }
                    self.advance();
                }
                Some((Token::Comment(_), _)) | Some((Token::Declaration(_), _)) => {
                    self.advance();
                }
                Some((Token::OpenTag(_), _)) | Some((Token::SelfClosingTag(_), _)) => {
                    let child = self.parse_element()?;
                    node.push_child(child);
                }
                Some((Token::CloseTag(slice), span)) => {
                    let closing = tag_name(slice);
                    if closing != name {
                        return Err(ParseError::mismatched_closing_tag(
                            self.source,
                            span.start,
                            name,
                            closing,
                        ));
                    }
                    self.advance();
                    break;
                }
                Some((Token::Error, span)) => {
                    return Err(ParseError::invalid_markup(
                        self.source,
                        span.start,
                        "unrecognized markup",
                    ));
                }
                None => return Err(ParseError::unexpected_eof(open_start, name)),
            }
        }

        if !text_segments.is_empty() {
            node.text = Some(text_segments.join(" "));
        }
        Ok(())
    }

    fn element_from_tag(&self, slice: &str, start: usize) -> ParseResult<Node> {
        let mut node = Node::new(tag_name(slice));
        let attributes = parse_attributes(slice)
            .map_err(|message| ParseError::invalid_markup(self.source, start, message))?;
        for (attr_name, value) in attributes {
            node.set_attr(attr_name, value);
        }
        Ok(node)
    }

    fn peek(&self) -> Option<(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos).cloned()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Skip declarations, comments, and whitespace-only text.
    fn skip_trivia(&mut self) {
        while let Some((token, _)) = self.peek() {
            match token {
                Token::Declaration(_) | Token::Comment(_) => self.advance(),
                Token::Text(t) if t.trim().is_empty() => self.advance(),
                _ => break,
            }
        }
    }
}

/// Trim and collapse internal whitespace runs to single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let tree = parse("<a><b>1</b><b>2</b></a>").unwrap();
        assert_eq!(tree.name, "a");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].text.as_deref(), Some("1"));
        assert_eq!(tree.children[1].text.as_deref(), Some("2"));
    }

    #[test]
    fn parses_attributes_and_self_closing() {
        let tree = parse(r#"<figure xml:id="fig-1"><image source="cat.png" width="50%"/></figure>"#)
            .unwrap();
        assert_eq!(tree.attr("xml:id"), Some("fig-1"));
        assert_eq!(tree.children[0].name, "image");
        assert_eq!(tree.children[0].attr("width"), Some("50%"));
        assert!(tree.children[0].children.is_empty());
    }

    #[test]
    fn skips_prolog_and_comments() {
        let source = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- draft -->\n<article><p>x</p></article>\n";
        let tree = parse(source).unwrap();
        assert_eq!(tree.name, "article");
    }

    #[test]
    fn joins_mixed_content_text_segments() {
        let tree = parse("<p>Inline math: <m>x^2</m> and more.</p>").unwrap();
        assert_eq!(tree.text.as_deref(), Some("Inline math: and more."));
        assert_eq!(tree.children[0].name, "m");
        assert_eq!(tree.children[0].text.as_deref(), Some("x^2"));
    }

    #[test]
    fn collapses_pretty_printed_whitespace() {
        let tree = parse("<p>\n    Start writing\n    your content here.\n</p>").unwrap();
        assert_eq!(
            tree.text.as_deref(),
            Some("Start writing your content here.")
        );
    }

    #[test]
    fn decodes_entities_in_text() {
        let tree = parse("<mrow>f(x) &amp;= x^2</mrow>").unwrap();
        assert_eq!(tree.text.as_deref(), Some("f(x) &= x^2"));
    }

    #[test]
    fn rejects_mismatched_closing_tag() {
        let err = parse("<a><b>1</a></b>").unwrap_err();
        match err {
            ParseError::MismatchedClosingTag {
                expected, found, ..
            } => {
                assert_eq!(expected, "b");
                assert_eq!(found, "a");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_unterminated_element() {
        let err = parse("<a><b>1</b>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { ref tag, .. } if tag == "a"));
    }

    #[test]
    fn rejects_trailing_content() {
        let err = parse("<a/>\n<b/>").unwrap_err();
        assert!(matches!(err, ParseError::TrailingContent { line: 2, .. }));
    }

    #[test]
    fn rejects_empty_document() {
        assert_eq!(parse("  \n ").unwrap_err(), ParseError::EmptyDocument);
        assert_eq!(parse("").unwrap_err(), ParseError::EmptyDocument);
    }

    #[test]
    fn rejects_stray_angle_bracket() {
        let err = parse("<p>a < b</p>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidMarkup { .. }));
    }

    #[test]
    fn error_messages_mention_line_and_column() {
        let err = parse("<a>\n  <b>x</c>\n</a>").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"), "got: {message}");
    }
}
