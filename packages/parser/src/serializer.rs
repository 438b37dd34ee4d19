use crate::ast::Node;
use crate::path::PATH_ATTR;

/// Serializer converts a tree back to markup text.
///
/// Output is normalization-stable: serializing, parsing, and serializing
/// again produces identical text. Elements with character data render inline
/// on one line; element-only containers render as indented blocks. Internal
/// bookkeeping attributes (the path annotation) are never written out.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
}

/// Serialize a tree to markup with the standard document prolog.
pub fn serialize(node: &Node) -> String {
    Serializer::new().serialize_document(node)
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "    ".to_string(), // 4 spaces
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
        }
    }

    /// Serialize with the XML declaration on top.
    pub fn serialize_document(&mut self, node: &Node) -> String {
        let mut output = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.serialize_node(node, &mut output);
        output
    }

    /// Serialize a bare element (no prolog).
    pub fn serialize_fragment(&mut self, node: &Node) -> String {
        let mut output = String::new();
        self.serialize_node(node, &mut output);
        output
    }

    fn serialize_node(&mut self, node: &Node, output: &mut String) {
        let text = node.text.as_deref().filter(|t| !t.is_empty());

        self.write_indent(output);

        if text.is_none() && node.children.is_empty() {
            self.write_tag(node, output, true);
            output.push('\n');
            return;
        }

        if let Some(text) = text {
            // Character data: render the whole element inline.
            self.write_tag(node, output, false);
            output.push_str(&html_escape::encode_text(text));
            for child in &node.children {
                self.serialize_inline(child, output);
            }
            output.push_str("</");
            output.push_str(&node.name);
            output.push('>');
            output.push('\n');
            return;
        }

        // Element-only container: indented block.
        self.write_tag(node, output, false);
        output.push('\n');
        self.indent_level += 1;
        for child in &node.children {
            self.serialize_node(child, output);
        }
        self.indent_level -= 1;
        self.write_indent(output);
        output.push_str("</");
        output.push_str(&node.name);
        output.push('>');
        output.push('\n');
    }

    fn serialize_inline(&self, node: &Node, output: &mut String) {
        let text = node.text.as_deref().filter(|t| !t.is_empty());

        if text.is_none() && node.children.is_empty() {
            self.write_tag(node, output, true);
            return;
        }

        self.write_tag(node, output, false);
        if let Some(text) = text {
            output.push_str(&html_escape::encode_text(text));
        }
        for child in &node.children {
            self.serialize_inline(child, output);
        }
        output.push_str("</");
        output.push_str(&node.name);
        output.push('>');
    }

    fn write_tag(&self, node: &Node, output: &mut String, self_closing: bool) {
        output.push('<');
        output.push_str(&node.name);
        for attribute in &node.attributes {
            if attribute.name == PATH_ATTR {
                continue;
            }
            output.push(' ');
            output.push_str(&attribute.name);
            output.push_str("=\"");
            output.push_str(&html_escape::encode_double_quoted_attribute(
                &attribute.value,
            ));
            output.push('"');
        }
        if self_closing {
            output.push('/');
        }
        output.push('>');
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::parser::parse;
    use crate::path::assign_paths;

    #[test]
    fn leaf_with_text_renders_inline() {
        let node = Node::with_text("p", "Hello");
        assert_eq!(Serializer::new().serialize_fragment(&node), "<p>Hello</p>\n");
    }

    #[test]
    fn empty_element_self_closes() {
        let mut node = Node::new("image");
        node.set_attr("source", "cat.png");
        assert_eq!(
            Serializer::new().serialize_fragment(&node),
            "<image source=\"cat.png\"/>\n"
        );
    }

    #[test]
    fn containers_render_as_indented_blocks() {
        let mut section = Node::new("section");
        section.set_attr("xml:id", "sec-1");
        section.push_child(Node::with_text("title", "Overview"));
        section.push_child(Node::with_text("p", "Body"));

        let output = Serializer::new().serialize_fragment(&section);
        assert_eq!(
            output,
            "<section xml:id=\"sec-1\">\n    <title>Overview</title>\n    <p>Body</p>\n</section>\n"
        );
    }

    #[test]
    fn mixed_content_renders_children_inline() {
        let mut p = Node::with_text("p", "Inline math: and more.");
        p.push_child(Node::with_text("m", "x^2"));
        let output = Serializer::new().serialize_fragment(&p);
        assert_eq!(output, "<p>Inline math: and more.<m>x^2</m></p>\n");
    }

    #[test]
    fn encodes_entities_in_text_and_attributes() {
        let mut node = Node::with_text("p", "a < b & c");
        node.set_attr("title", "Tom \"T\" & Jerry");
        let output = Serializer::new().serialize_fragment(&node);
        assert!(output.contains("a &lt; b &amp; c"));
        assert!(output.contains("&amp; Jerry"));
        assert!(output.contains("&quot;T&quot;"));
    }

    #[test]
    fn strips_path_annotations() {
        let mut tree = parse("<a><b>1</b></a>").unwrap();
        assign_paths(&mut tree);
        let output = Serializer::new().serialize_fragment(&tree);
        assert!(!output.contains("data-path"));
    }

    #[test]
    fn document_form_carries_prolog() {
        let node = Node::with_text("p", "x");
        let output = serialize(&node);
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<p>x</p>"));
    }

    #[test]
    fn serialization_is_a_fixed_point_of_parse() {
        let source = "<article xml:id=\"art\">\n    <title>T</title>\n    <section>\n        <p>Body text</p>\n        <image source=\"x.png\"/>\n    </section>\n</article>\n";
        let once = Serializer::new().serialize_fragment(&parse(source).unwrap());
        let twice = Serializer::new().serialize_fragment(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }
}
