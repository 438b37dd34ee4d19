//! Document outline extraction.
//!
//! Walks the visual tree collecting the structural divisions, each with its
//! title, nesting level, `xml:id`, and path. Outline clicks navigate through
//! the selection synchronizer using the recorded path.

use crate::context::PARSE_ERROR_TAG;
use pretext_parser::{path_of, walk_node, Node, NodePath, Visitor};

/// Division elements that appear in the outline, outermost first.
const STRUCTURAL_ELEMENTS: &[&str] = &[
    "book",
    "article",
    "chapter",
    "section",
    "subsection",
    "subsubsection",
];

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub title: String,
    pub kind: String,
    pub xml_id: Option<String>,
    pub path: Option<NodePath>,
    pub level: usize,
}

/// Build the outline for a visual tree. A degraded (parse failure) tree
/// yields a single error placeholder entry.
pub fn build_outline(root: &Node) -> Vec<OutlineEntry> {
    if root.name == PARSE_ERROR_TAG {
        return vec![OutlineEntry {
            title: "Parse Error".to_string(),
            kind: "error".to_string(),
            xml_id: None,
            path: None,
            level: 0,
        }];
    }

    let mut builder = OutlineBuilder {
        entries: Vec::new(),
        level: 0,
    };
    builder.visit_node(root);
    builder.entries
}

struct OutlineBuilder {
    entries: Vec<OutlineEntry>,
    level: usize,
}

impl<'ast> Visitor<'ast> for OutlineBuilder {
    fn visit_node(&mut self, node: &'ast Node) {
        if STRUCTURAL_ELEMENTS.contains(&node.name.as_str()) {
            self.entries.push(OutlineEntry {
                title: title_of(node),
                kind: node.name.clone(),
                xml_id: node.attr("xml:id").map(str::to_string),
                path: path_of(node),
                level: self.level,
            });
            self.level += 1;
            walk_node(self, node);
            self.level -= 1;
        } else {
            walk_node(self, node);
        }
    }
}

/// The text of the division's title child, falling back to the tag name.
/// The visual vocabulary calls it `heading`; a hand-built source tree may
/// still say `title`.
fn title_of(node: &Node) -> String {
    node.children
        .iter()
        .find(|child| child.name == "heading" || child.name == "title")
        .and_then(|child| child.text.clone())
        .unwrap_or_else(|| node.name.clone())
}
