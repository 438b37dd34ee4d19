//! Bidirectional transcoding between the two views of a document.
//!
//! The source view speaks markup vocabulary (`title`, `m`, `me`); the visual
//! view speaks presentation vocabulary (`heading`, `math-inline`,
//! `math-display`, with typesetting delimiters around math text). Both
//! directions rebuild the tree rather than mutate it, and both carry the
//! path annotation through so either view can resolve a node back to its
//! byte range in the text.

use crate::ast::Node;
use crate::error::ParseResult;
use crate::parser::parse;
use crate::path::assign_paths;
use crate::serializer::Serializer;

/// Tag substitutions between source and visual vocabulary, with optional
/// typesetting delimiters wrapped around the node's text in the visual form.
const SUBSTITUTIONS: &[(&str, &str, Option<(&str, &str)>)] = &[
    ("title", "heading", None),
    ("m", "math-inline", Some(("\\(", "\\)"))),
    ("me", "math-display", Some(("\\[", "\\]"))),
];

/// Serialize a visual tree to markup text (with prolog). Presentation
/// vocabulary is mapped back to markup vocabulary; the path annotation is
/// stripped by the serializer and never reaches the output.
pub fn structure_to_text(visual: &Node) -> String {
    let source = to_source(visual);
    Serializer::new().serialize_document(&source)
}

/// Parse markup text into a path-annotated visual tree.
///
/// Paths are assigned on the source tree, *before* the vocabulary
/// substitution, so they always agree with what a tag scan of the text
/// produces.
pub fn text_to_structure(text: &str) -> ParseResult<Node> {
    let mut source = parse(text)?;
    assign_paths(&mut source);
    Ok(to_visual(&source))
}

/// Rebuild a source tree in visual vocabulary.
pub fn to_visual(source: &Node) -> Node {
    map_tree(source, |name| {
        SUBSTITUTIONS
            .iter()
            .find(|(from, _, _)| *from == name)
            .map(|&(_, to, delimiters)| (to, delimiters, true))
    })
}

/// Rebuild a visual tree in source vocabulary.
pub fn to_source(visual: &Node) -> Node {
    map_tree(visual, |name| {
        SUBSTITUTIONS
            .iter()
            .find(|(_, to, _)| *to == name)
            .map(|&(from, _, delimiters)| (from, delimiters, false))
    })
}

type Substitution<'a> = Option<(&'a str, Option<(&'a str, &'a str)>, bool)>;

fn map_tree(node: &Node, lookup: fn(&str) -> Substitution<'static>) -> Node {
    let mut mapped = match lookup(&node.name) {
        Some((renamed, delimiters, wrapping)) => {
            let mut out = Node::new(renamed);
            out.text = node.text.clone();
            if let (Some(text), Some((open, close))) = (&node.text, delimiters) {
                out.text = Some(if wrapping {
                    format!("{open}{text}{close}")
                } else {
                    unwrap_delimiters(text, open, close)
                });
            }
            out
        }
        None => {
            let mut out = Node::new(node.name.clone());
            out.text = node.text.clone();
            out
        }
    };

    mapped.attributes = node.attributes.clone();
    for child in &node.children {
        mapped.push_child(map_tree(child, lookup));
    }
    mapped
}

/// Strip typesetting delimiters if present; text built without them passes
/// through unchanged.
fn unwrap_delimiters(text: &str, open: &str, close: &str) -> String {
    text.strip_prefix(open)
        .and_then(|t| t.strip_suffix(close))
        .unwrap_or(text)
        .to_string()
}
