//! Path ⇄ byte-range index over the source text.
//!
//! Built by a single linear tag scan — not a parse. The index is advisory:
//! it only drives view synchronization, so it tolerates malformed nesting
//! instead of failing (mismatched closers are skipped, unterminated elements
//! span to end-of-document).

use pretext_parser::{tag_name, tokenize, NodePath, Token};
use std::collections::HashMap;
use tracing::debug;

/// A node's byte range in the text it was indexed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub path: NodePath,
    pub start: usize,
    pub end: usize,
}

impl Location {
    fn span(&self) -> usize {
        self.end - self.start
    }

    fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Memoized mapping between paths and byte ranges.
///
/// The index remembers the exact text it was built from; it is valid only
/// for queries against that identical text. The owner checks
/// [`LocationIndex::is_valid_for`] lazily and rebuilds on mismatch.
#[derive(Debug)]
pub struct LocationIndex {
    text: String,
    by_path: HashMap<NodePath, Location>,
    ordered: Vec<Location>,
}

struct OpenFrame {
    name: String,
    path: NodePath,
    start: usize,
    counters: HashMap<String, usize>,
}

impl LocationIndex {
    pub fn build(text: &str) -> Self {
        debug!(bytes = text.len(), "building location index");

        let mut ordered: Vec<Location> = Vec::new();
        // Sentinel frame holds the root-level occurrence counters.
        let mut stack = vec![OpenFrame {
            name: String::new(),
            path: NodePath::root(),
            start: 0,
            counters: HashMap::new(),
        }];

        for (token, span) in tokenize(text) {
            match token {
                Token::OpenTag(slice) => {
                    let name = tag_name(slice).to_string();
                    let path = next_path(stack.last_mut().expect("sentinel"), &name);
                    stack.push(OpenFrame {
                        name,
                        path,
                        start: span.start,
                        counters: HashMap::new(),
                    });
                }
                Token::SelfClosingTag(slice) => {
                    let name = tag_name(slice);
                    let path = next_path(stack.last_mut().expect("sentinel"), name);
                    ordered.push(Location {
                        path,
                        start: span.start,
                        end: span.end,
                    });
                }
                Token::CloseTag(slice) => {
                    let name = tag_name(slice);
                    // Topmost same-named frame; tolerates out-of-order
                    // nesting. Index 0 is the sentinel and never matches.
                    if let Some(at) = stack.iter().rposition(|f| f.name == name) {
                        if at > 0 {
                            let frame = stack.remove(at);
                            ordered.push(Location {
                                path: frame.path,
                                start: frame.start,
                                end: span.end,
                            });
                        }
                    }
                }
                Token::Comment(_) | Token::Declaration(_) | Token::Text(_) | Token::Error => {}
            }
        }

        // Unterminated elements span to end-of-document.
        while stack.len() > 1 {
            let frame = stack.pop().expect("len checked");
            ordered.push(Location {
                path: frame.path,
                start: frame.start,
                end: text.len(),
            });
        }

        ordered.sort_by_key(|location| (location.start, location.end));

        let by_path = ordered
            .iter()
            .map(|location| (location.path.clone(), location.clone()))
            .collect();

        Self {
            text: text.to_string(),
            by_path,
            ordered,
        }
    }

    /// Valid if and only if built from text identical to `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.text == text
    }

    /// Resolve a text offset to the tightest enclosing element.
    ///
    /// Fallback chain, in order: smallest containing span, then the nearest
    /// element starting after the offset, then retry one byte earlier
    /// (handles end-of-document clicks). Deterministic by construction.
    pub fn path_at(&self, offset: usize) -> Option<&NodePath> {
        let offset = offset.min(self.text.len());

        if let Some(location) = self
            .ordered
            .iter()
            .filter(|location| location.contains(offset))
            .min_by_key(|location| (location.span(), location.start))
        {
            return Some(&location.path);
        }

        if let Some(location) = self
            .ordered
            .iter()
            .filter(|location| location.start > offset)
            .min_by_key(|location| location.start)
        {
            return Some(&location.path);
        }

        if offset > 0 {
            return self.path_at(offset - 1);
        }

        None
    }

    /// Direct lookup. `None` means the node no longer exists in the indexed
    /// text; callers treat that as a no-op.
    pub fn location_at(&self, path: &NodePath) -> Option<&Location> {
        self.by_path.get(path)
    }

    pub fn locations(&self) -> &[Location] {
        &self.ordered
    }
}

fn next_path(parent: &mut OpenFrame, name: &str) -> NodePath {
    let count = parent.counters.entry(name.to_string()).or_insert(0);
    *count += 1;
    parent.path.child(name, *count)
}
