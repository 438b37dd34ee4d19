use logos::Logos;
use std::ops::Range;

/// Markup tokens, produced by a single linear scan.
///
/// This is a tag scanner, not a parser: every token carries its raw slice and
/// byte span, and nothing here checks that tags balance. The parser builds a
/// tree out of these tokens; the editor's location index walks them directly.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// `<tag attr="value"/>`
    #[regex(r"<[A-Za-z][A-Za-z0-9_:.-]*([ \t\r\n][^<>]*)?/>", |lex| lex.slice(), priority = 4)]
    SelfClosingTag(&'src str),

    /// `<tag attr="value">`
    #[regex(r"<[A-Za-z][A-Za-z0-9_:.-]*([ \t\r\n][^<>]*)?>", |lex| lex.slice(), priority = 3)]
    OpenTag(&'src str),

    /// `</tag>`
    #[regex(r"</[A-Za-z][A-Za-z0-9_:.-]*[ \t\r\n]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    #[regex(r"<!--([^-]|-[^-])*-->", |lex| lex.slice())]
    Comment(&'src str),

    /// `<?xml version="1.0"?>` and other processing instructions.
    #[regex(r"<\?[^>]*>", |lex| lex.slice())]
    Declaration(&'src str),

    /// Character data between tags (entities still encoded).
    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A bare `<` that does not start any recognized construct. Longest
    /// match means this only fires when every tag pattern has failed.
    #[token("<")]
    Error,
}

/// Tokenize markup source into (token, byte span) pairs.
pub fn tokenize(source: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        // The grammar is total (a lone `<` lexes as `Token::Error`), but map
        // lexer failures to the same marker rather than dropping bytes.
        let token = result.unwrap_or(Token::Error);
        tokens.push((token, lexer.span()));
    }

    tokens
}

/// Extract the tag name from a raw tag slice (`<p ...>`, `</p>`, `<p/>`).
pub fn tag_name(tag: &str) -> &str {
    let rest = tag.strip_prefix("</").unwrap_or(&tag[1..]);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')))
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Parse `name="value"` pairs from inside an open or self-closing tag slice.
///
/// Values may use double or single quotes; entities inside values are decoded.
/// Returns an error message (position-free; the caller knows the tag's span)
/// on malformed attribute syntax.
pub fn parse_attributes(tag: &str) -> Result<Vec<(String, String)>, String> {
    let name = tag_name(tag);
    let body = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    let mut rest = body[name.len()..].trim_start();

    let mut attributes = Vec::new();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .ok_or_else(|| format!("attribute `{}` has no value", rest.trim()))?;
        let attr_name = &rest[..name_end];
        if attr_name.is_empty() {
            return Err(format!("malformed attribute list near `{}`", rest));
        }

        rest = rest[name_end..].trim_start();
        rest = rest
            .strip_prefix('=')
            .ok_or_else(|| format!("attribute `{}` has no value", attr_name))?
            .trim_start();

        let quote = rest
            .chars()
            .next()
            .filter(|&c| c == '"' || c == '\'')
            .ok_or_else(|| format!("attribute `{}` value is not quoted", attr_name))?;
        let value_end = rest[1..]
            .find(quote)
            .ok_or_else(|| format!("attribute `{}` value is never terminated", attr_name))?;

        let raw_value = &rest[1..1 + value_end];
        attributes.push((
            attr_name.to_string(),
            html_escape::decode_html_entities(raw_value).into_owned(),
        ));

        rest = rest[1 + value_end + 1..].trim_start();
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_open_close_and_text() {
        let tokens = tokenize("<p>hello</p>");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0].0, Token::OpenTag("<p>")));
        assert!(matches!(tokens[1].0, Token::Text("hello")));
        assert!(matches!(tokens[2].0, Token::CloseTag("</p>")));
        assert_eq!(tokens[0].1, 0..3);
        assert_eq!(tokens[2].1, 8..12);
    }

    #[test]
    fn tokenizes_self_closing_with_attributes() {
        let tokens = tokenize(r#"<image source="cat.png" width="50%"/>"#);
        assert_eq!(tokens.len(), 1);
        match tokens[0].0 {
            Token::SelfClosingTag(slice) => assert_eq!(tag_name(slice), "image"),
            ref other => panic!("expected self-closing tag, got {:?}", other),
        }
    }

    #[test]
    fn tokenizes_declaration_and_comment() {
        let tokens = tokenize("<?xml version=\"1.0\"?>\n<!-- note -->\n<a/>");
        assert!(matches!(tokens[0].0, Token::Declaration(_)));
        assert!(matches!(tokens[2].0, Token::Comment(_)));
        assert!(matches!(tokens[4].0, Token::SelfClosingTag(_)));
    }

    #[test]
    fn multiline_open_tag() {
        let tokens = tokenize("<chapter\n    xml:id=\"ch-1\">x</chapter>");
        match tokens[0].0 {
            Token::OpenTag(slice) => assert_eq!(tag_name(slice), "chapter"),
            ref other => panic!("expected open tag, got {:?}", other),
        }
    }

    #[test]
    fn bare_angle_bracket_is_an_error_token() {
        let tokens = tokenize("a < b");
        assert!(tokens.iter().any(|(t, _)| matches!(t, Token::Error)));
    }

    #[test]
    fn tag_name_variants() {
        assert_eq!(tag_name("<p>"), "p");
        assert_eq!(tag_name("</section>"), "section");
        assert_eq!(tag_name("<image source=\"x\"/>"), "image");
        assert_eq!(tag_name("<xi:include href=\"x\"/>"), "xi:include");
    }

    #[test]
    fn parses_attribute_pairs_in_order() {
        let attrs = parse_attributes(r#"<figure xml:id="fig-1" landscape="yes">"#).unwrap();
        assert_eq!(
            attrs,
            vec![
                ("xml:id".to_string(), "fig-1".to_string()),
                ("landscape".to_string(), "yes".to_string()),
            ]
        );
    }

    #[test]
    fn decodes_entities_in_attribute_values() {
        let attrs = parse_attributes(r#"<video title="Tom &amp; Jerry">"#).unwrap();
        assert_eq!(attrs[0].1, "Tom & Jerry");
    }

    #[test]
    fn single_quoted_values() {
        let attrs = parse_attributes("<a href='x'>").unwrap();
        assert_eq!(attrs, vec![("href".to_string(), "x".to_string())]);
    }

    #[test]
    fn rejects_unquoted_and_unterminated_values() {
        assert!(parse_attributes("<a href=x>").is_err());
        assert!(parse_attributes("<a href=\"x>").is_err());
        assert!(parse_attributes("<a disabled>").is_err());
    }
}
