//! Node tree produced by materializing page markup.

/// A node in a materialized page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Decoded text content.
    Text(String),
    /// An HTML comment.
    Comment(String),
    /// Trusted markup passed through without being parsed.
    Raw(String),
}

impl Node {
    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Node::Text(text) => out.push_str(text),
            Node::Comment(_) | Node::Raw(_) => {}
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => escape_into(text, false, out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Raw(markup) => out.push_str(markup),
        }
    }
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase
    pub tag: String,

    /// Attributes in source order
    pub attrs: Vec<(String, String)>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// True when the `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// True for `h1` through `h6`.
    pub fn is_heading(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// True for void elements, which never have children or an end tag.
    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        out.push('>');

        if self.is_void() {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// An ordered list of materialized nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(Node::as_element)
    }

    /// Every element in document order, depth-first.
    pub fn descendants(&self) -> Vec<&Element> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
            for element in nodes.iter().filter_map(Node::as_element) {
                out.push(element);
                walk(&element.children, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Heading elements anywhere in the fragment.
    pub fn headings(&self) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.is_heading())
            .collect()
    }

    /// Code blocks, one per `<pre>` element.
    pub fn code_blocks(&self) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag == "pre")
            .collect()
    }

    /// Serialize the fragment back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }

    /// Indented one-line-per-node outline, for inspection.
    pub fn outline(&self) -> String {
        fn walk(nodes: &[Node], depth: usize, out: &mut String) {
            for node in nodes {
                let indent = "  ".repeat(depth);
                match node {
                    Node::Element(element) => {
                        out.push_str(&indent);
                        out.push_str(&element.tag);
                        if let Some(id) = element.id() {
                            out.push('#');
                            out.push_str(id);
                        }
                        if let Some(class) = element.attr("class") {
                            for c in class.split_whitespace() {
                                out.push('.');
                                out.push_str(c);
                            }
                        }
                        out.push('\n');
                        walk(&element.children, depth + 1, out);
                    }
                    Node::Text(text) if text.trim().is_empty() => {}
                    Node::Text(text) => {
                        out.push_str(&format!("{}{:?}\n", indent, text.trim()));
                    }
                    Node::Comment(_) => {
                        out.push_str(&format!("{}<!-- -->\n", indent));
                    }
                    Node::Raw(markup) => {
                        out.push_str(&format!("{}raw ({} bytes)\n", indent, markup.len()));
                    }
                }
            }
        }

        let mut out = String::new();
        walk(&self.nodes, 0, &mut out);
        out
    }
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
