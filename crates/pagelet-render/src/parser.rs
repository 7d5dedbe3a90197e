//! HTML fragment parser built on quick-xml.
//!
//! Page markup is generated HTML, which is close to XML but not quite:
//! void elements may be left open, attributes may lack values, and named
//! entities beyond the XML set appear in text. The reader runs with its
//! well-formedness checks relaxed and the tree builder closes elements
//! the way an HTML parser would.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::node::{is_void_tag, Element, Fragment, Node};

/// Errors that can occur when parsing markup.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("Markup syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
}

/// Turns a markup payload into a node tree.
pub trait FragmentParser: Send + Sync {
    /// Parse a complete fragment.
    fn parse(&self, markup: &str) -> Result<Fragment, MarkupError>;
}

/// The default HTML fragment parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

impl MarkupParser {
    pub fn new() -> Self {
        Self
    }
}

impl FragmentParser for MarkupParser {
    fn parse(&self, markup: &str) -> Result<Fragment, MarkupError> {
        parse_fragment(markup)
    }
}

/// Parse an HTML fragment into a node tree.
pub fn parse_fragment(markup: &str) -> Result<Fragment, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.trim_text(false);
    config.enable_all_checks(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) => {
                let element = element_from_start(&elem, builder.in_foreign_content());
                if element.is_void() {
                    builder.push(Node::Element(element));
                } else {
                    builder.open(element);
                }
            }
            Ok(Event::Empty(elem)) => {
                let element = element_from_start(&elem, builder.in_foreign_content());
                builder.push(Node::Element(element));
            }
            Ok(Event::End(elem)) => {
                let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
                builder.close(&tag);
            }
            Ok(Event::Text(text)) => {
                builder.push_text(decode_entities(&String::from_utf8_lossy(&text)));
            }
            Ok(Event::GeneralRef(reference)) => {
                let entity = format!("&{};", String::from_utf8_lossy(&reference));
                builder.push_text(decode_entities(&entity));
            }
            Ok(Event::CData(data)) => {
                builder.push_text(String::from_utf8_lossy(&data).into_owned());
            }
            Ok(Event::Comment(comment)) => {
                builder.push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Ok(Event::Eof) => break,
            // Declarations, processing instructions and doctypes carry no content
            Ok(_) => {}
            Err(e) => {
                return Err(MarkupError::Syntax {
                    position: reader.error_position(),
                    message: e.to_string(),
                })
            }
        }
    }

    Ok(builder.finish())
}

/// Build an element from a start tag. HTML tag names are case-insensitive
/// and normalized to lowercase; inside SVG the source case is kept, since
/// names like `foreignObject` are case-sensitive there.
fn element_from_start(elem: &BytesStart<'_>, keep_case: bool) -> Element {
    let qname = elem.name();
    let name = String::from_utf8_lossy(qname.as_ref());
    let tag = if keep_case {
        name.into_owned()
    } else {
        name.to_ascii_lowercase()
    };
    let attrs = elem
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = decode_entities(&String::from_utf8_lossy(&attr.value));
            (key, value)
        })
        .collect();

    Element {
        tag,
        attrs,
        children: Vec::new(),
    }
}

/// Builds the node tree from a flat event stream.
#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Append text, merging with a preceding text node.
    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        match siblings.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(&text),
            _ => siblings.push(Node::Text(text)),
        }
    }

    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    /// Whether the next element opens inside an `<svg>` subtree.
    fn in_foreign_content(&self) -> bool {
        self.open.iter().any(|e| e.tag == "svg")
    }

    /// Close the innermost open element named `tag`, closing any elements
    /// still open inside it. End tags with no matching open element and
    /// end tags of void elements are ignored.
    fn close(&mut self, tag: &str) {
        if is_void_tag(&tag.to_ascii_lowercase()) {
            return;
        }
        let Some(position) = self
            .open
            .iter()
            .rposition(|e| e.tag.eq_ignore_ascii_case(tag))
        else {
            return;
        };
        while self.open.len() > position {
            if let Some(element) = self.open.pop() {
                self.push(Node::Element(element));
            }
        }
    }

    fn finish(mut self) -> Fragment {
        while let Some(element) = self.open.pop() {
            self.push(Node::Element(element));
        }
        Fragment::new(self.roots)
    }
}

/// Decode character and entity references.
///
/// Unknown named entities are left as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        let decoded = candidate
            .find(';')
            .filter(|&end| end > 1 && end <= 32)
            .and_then(|end| resolve_entity(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((resolved, end)) => {
                out.push_str(&resolved);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ZeroWidthSpace" => "\u{200b}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "hellip" => "\u{2026}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "middot" => "\u{b7}",
        "times" => "\u{d7}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        _ => return None,
    };
    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(node: &Node) -> &Element {
        node.as_element().expect("expected element")
    }

    #[test]
    fn parses_nested_elements() {
        let fragment = parse_fragment(r#"<div class="a"><p>One <em>two</em></p></div>"#).unwrap();

        assert_eq!(fragment.len(), 1);
        let div = element(&fragment.nodes()[0]);
        assert_eq!(div.tag, "div");
        assert_eq!(div.attr("class"), Some("a"));

        let p = element(&div.children[0]);
        assert_eq!(p.children.len(), 2);
        assert_eq!(fragment.nodes()[0].text_content(), "One two");
    }

    #[test]
    fn decodes_entities_in_text_and_attributes() {
        let fragment = parse_fragment(
            r##"<a aria-label="Permalink to &quot;Intro&quot;" href="#x">a &amp; b&nbsp;&#8203;&#x41;</a>"##,
        )
        .unwrap();

        let a = element(&fragment.nodes()[0]);
        assert_eq!(a.attr("aria-label"), Some("Permalink to \"Intro\""));
        assert_eq!(a.children, vec![Node::Text("a & b\u{a0}\u{200b}A".to_string())]);
    }

    #[test]
    fn handles_unclosed_void_elements() {
        let fragment = parse_fragment("<p>line<br>next</p><hr><img src=\"x.png\">").unwrap();

        assert_eq!(fragment.len(), 3);
        let p = element(&fragment.nodes()[0]);
        assert_eq!(p.children.len(), 3);
        assert_eq!(element(&p.children[1]).tag, "br");
        assert_eq!(element(&fragment.nodes()[2]).attr("src"), Some("x.png"));
    }

    #[test]
    fn accepts_valueless_attributes() {
        let fragment = parse_fragment("<input type=\"checkbox\" checked disabled>").unwrap();

        let input = element(&fragment.nodes()[0]);
        assert_eq!(input.attr("checked"), Some(""));
        assert_eq!(input.attr("type"), Some("checkbox"));
    }

    #[test]
    fn recovers_from_misnested_end_tags() {
        let fragment = parse_fragment("<ul><li>one<li>two</ul></span><p>after</p>").unwrap();

        assert_eq!(fragment.len(), 2);
        let ul = element(&fragment.nodes()[0]);
        assert_eq!(ul.tag, "ul");
        assert_eq!(element(&fragment.nodes()[1]).tag, "p");
    }

    #[test]
    fn closes_elements_left_open() {
        let fragment = parse_fragment("<div><p>dangling").unwrap();

        assert_eq!(fragment.to_html(), "<div><p>dangling</p></div>");
    }

    #[test]
    fn keeps_comments() {
        let fragment = parse_fragment("<!-- note --><p>x</p>").unwrap();

        assert_eq!(fragment.nodes()[0], Node::Comment(" note ".to_string()));
    }

    #[test]
    fn leaves_unknown_entities_alone() {
        assert_eq!(decode_entities("a &bogus; b & c"), "a &bogus; b & c");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
    }

    #[test]
    fn keeps_bare_ampersands_in_text() {
        let fragment = parse_fragment("<p>Tom & Jerry &amp; friends</p>").unwrap();

        let p = element(&fragment.nodes()[0]);
        assert_eq!(p.children, vec![Node::Text("Tom & Jerry & friends".to_string())]);
    }

    #[test]
    fn keeps_svg_tag_case() {
        let fragment = parse_fragment(
            "<DIV><svg><linearGradient id=\"g\"></linearGradient><foreignObject/></svg></DIV>",
        )
        .unwrap();

        let div = element(&fragment.nodes()[0]);
        assert_eq!(div.tag, "div");
        let svg = element(&div.children[0]);
        assert_eq!(element(&svg.children[0]).tag, "linearGradient");
        assert_eq!(element(&svg.children[1]).tag, "foreignObject");
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(parse_fragment("<div class=\"x").is_err());
    }
}
