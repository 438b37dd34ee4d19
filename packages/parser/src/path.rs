use crate::ast::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Internal attribute carrying a node's path annotation. Stripped by the
/// serializer so it never reaches persisted markup.
pub const PATH_ATTR: &str = "data-path";

/// One step of a path: the occurrence-th child with this tag among its
/// same-tag siblings, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    pub tag: String,
    pub occurrence: usize,
}

/// Deterministic address of a node: tag+occurrence steps from the root.
///
/// Canonical text form is `article[1]/section[2]/p[1]`. Occurrence counting
/// makes paths insensitive to unrelated siblings, but inserting a same-tag
/// sibling *before* a node shifts the paths of every later same-tag sibling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodePath(Vec<PathStep>);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid path segment `{0}`")]
pub struct InvalidPathError(String);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, tag: impl Into<String>, occurrence: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep {
            tag: tag.into(),
            occurrence,
        });
        Self(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", step.tag, step.occurrence)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = InvalidPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut steps = Vec::new();
        for segment in s.split('/') {
            let open = segment
                .find('[')
                .ok_or_else(|| InvalidPathError(segment.to_string()))?;
            let close = segment
                .strip_suffix(']')
                .ok_or_else(|| InvalidPathError(segment.to_string()))?;
            let tag = &segment[..open];
            let occurrence: usize = close[open + 1..]
                .parse()
                .map_err(|_| InvalidPathError(segment.to_string()))?;
            if tag.is_empty() || occurrence == 0 {
                return Err(InvalidPathError(segment.to_string()));
            }
            steps.push(PathStep {
                tag: tag.to_string(),
                occurrence,
            });
        }
        Ok(Self(steps))
    }
}

/// Annotate every node of the tree with its path, carried in [`PATH_ATTR`].
///
/// Traversal is pre-order depth-first; each level keeps a per-tag counter so
/// a node's step is `(tag, count_after_increment)` among its siblings.
pub fn assign_paths(root: &mut Node) {
    let path = NodePath::root().child(root.name.clone(), 1);
    annotate(root, path);
}

fn annotate(node: &mut Node, path: NodePath) {
    node.set_attr(PATH_ATTR, path.to_string());
    let mut counters: HashMap<String, usize> = HashMap::new();
    for child in &mut node.children {
        let count = counters.entry(child.name.clone()).or_insert(0);
        *count += 1;
        let child_path = path.child(child.name.clone(), *count);
        annotate(child, child_path);
    }
}

/// Read the path annotation off a node, if it carries one.
pub fn path_of(node: &Node) -> Option<NodePath> {
    node.attr(PATH_ATTR)?.parse().ok()
}

/// Resolve a path against a tree, recomputing occurrence counts on the way
/// down. Returns `None` when any step no longer matches.
pub fn find_by_path<'a>(root: &'a Node, path: &NodePath) -> Option<&'a Node> {
    let mut steps = path.steps().iter();
    let first = steps.next()?;
    if root.name != first.tag || first.occurrence != 1 {
        return None;
    }
    let mut current = root;
    for step in steps {
        let mut seen = 0;
        current = current.children.iter().find(|child| {
            if child.name == step.tag {
                seen += 1;
                seen == step.occurrence
            } else {
                false
            }
        })?;
    }
    Some(current)
}

pub fn find_by_path_mut<'a>(root: &'a mut Node, path: &NodePath) -> Option<&'a mut Node> {
    let mut steps = path.steps().iter();
    let first = steps.next()?;
    if root.name != first.tag || first.occurrence != 1 {
        return None;
    }
    let mut current = root;
    for step in steps {
        let mut seen = 0;
        let index = current.children.iter().position(|child| {
            if child.name == step.tag {
                seen += 1;
                seen == step.occurrence
            } else {
                false
            }
        })?;
        current = &mut current.children[index];
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(children: &[&str]) -> Node {
        let mut root = Node::new("root");
        for tag in children {
            root.push_child(Node::new(*tag));
        }
        root
    }

    #[test]
    fn display_and_from_str_round_trip() {
        let path: NodePath = "article[1]/section[2]/p[1]".parse().unwrap();
        assert_eq!(path.steps().len(), 3);
        assert_eq!(path.to_string(), "article[1]/section[2]/p[1]");
        assert_eq!("".parse::<NodePath>().unwrap(), NodePath::root());
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("a".parse::<NodePath>().is_err());
        assert!("a[0]".parse::<NodePath>().is_err());
        assert!("a[x]".parse::<NodePath>().is_err());
        assert!("[1]".parse::<NodePath>().is_err());
    }

    #[test]
    fn assign_paths_counts_per_tag() {
        let mut root = tree_with(&["a", "a", "b"]);
        assign_paths(&mut root);

        assert_eq!(root.attr(PATH_ATTR), Some("root[1]"));
        assert_eq!(root.children[0].attr(PATH_ATTR), Some("root[1]/a[1]"));
        assert_eq!(root.children[1].attr(PATH_ATTR), Some("root[1]/a[2]"));
        assert_eq!(root.children[2].attr(PATH_ATTR), Some("root[1]/b[1]"));
    }

    #[test]
    fn paths_survive_unrelated_sibling_insertion() {
        let mut root = tree_with(&["a", "a", "b"]);
        assign_paths(&mut root);
        let before = path_of(&root.children[1]).unwrap();

        // A new `b` anywhere does not disturb `a` occurrences.
        root.children.insert(0, Node::new("b"));
        assign_paths(&mut root);
        let after = path_of(&root.children[2]).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn paths_shift_when_same_tag_sibling_inserted_before() {
        let mut root = tree_with(&["a", "a", "b"]);
        assign_paths(&mut root);
        let second_a = path_of(&root.children[1]).unwrap();
        assert_eq!(second_a.to_string(), "root[1]/a[2]");

        root.children.insert(0, Node::new("a"));
        assign_paths(&mut root);
        // The node formerly at a[2] is now a[3].
        let shifted = path_of(&root.children[2]).unwrap();
        assert_eq!(shifted.to_string(), "root[1]/a[3]");
    }

    #[test]
    fn find_by_path_resolves_occurrences() {
        let mut root = tree_with(&["a", "a", "b"]);
        root.children[1].text = Some("second".to_string());
        assign_paths(&mut root);

        let path: NodePath = "root[1]/a[2]".parse().unwrap();
        let found = find_by_path(&root, &path).unwrap();
        assert_eq!(found.text.as_deref(), Some("second"));

        let missing: NodePath = "root[1]/c[1]".parse().unwrap();
        assert!(find_by_path(&root, &missing).is_none());
    }

    #[test]
    fn find_by_path_mut_allows_edits() {
        let mut root = tree_with(&["a", "b"]);
        assign_paths(&mut root);
        let path: NodePath = "root[1]/b[1]".parse().unwrap();
        find_by_path_mut(&mut root, &path).unwrap().text = Some("edited".to_string());
        assert_eq!(root.children[1].text.as_deref(), Some("edited"));
    }
}
