use serde::{Deserialize, Serialize};

/// A single attribute. Attributes keep their source order so that
/// serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One element of the document tree.
///
/// The same type backs both views: the source view's tree uses markup
/// vocabulary (`title`, `m`, `me`), the visual view's tree uses presentation
/// vocabulary (`heading`, `math-inline`, `math-display`). Trees are rebuilt,
/// never patched in place, on each full resynchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Direct character data. Mixed content is normalized: all of an
    /// element's text segments are joined ahead of its child elements.
    pub text: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one of the same name in place
    /// (order is preserved) or appending.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Find the first descendant-or-self carrying `xml:id="id"`.
    pub fn find_by_xml_id(&self, id: &str) -> Option<&Node> {
        let mut finder = XmlIdFinder { id, found: None };
        finder.visit_node(self);
        finder.found
    }
}

/// Visitor for immutable tree traversal.
///
/// Default implementations walk the whole tree; override `visit_node` to act
/// on nodes, calling `walk_node` to continue downward.
pub trait Visitor<'ast>: Sized {
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }
}

pub fn walk_node<'ast, V: Visitor<'ast>>(visitor: &mut V, node: &'ast Node) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}

struct XmlIdFinder<'a, 'ast> {
    id: &'a str,
    found: Option<&'ast Node>,
}

impl<'a, 'ast> Visitor<'ast> for XmlIdFinder<'a, 'ast> {
    fn visit_node(&mut self, node: &'ast Node) {
        if self.found.is_some() {
            return;
        }
        if node.attr("xml:id") == Some(self.id) {
            self.found = Some(node);
            return;
        }
        walk_node(self, node);
    }
}
