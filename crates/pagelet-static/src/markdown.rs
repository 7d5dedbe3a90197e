//! Markdown to page markup.
//!
//! Renders a source document into the pieces a page bundle needs: opaque
//! frontmatter, title, description, section headers, and the body HTML.
//! Headings get stable anchor ids and permalink anchors, fenced code gets
//! a language wrapper with a copy button.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use pagelet_page::frontmatter::string_value;
use pagelet_page::{
    extract_frontmatter, nest_headers, slugify, FrontmatterError, FrontmatterMap, Header,
    SlugCounter,
};

/// Heading levels collected into page headers.
const HEADER_LEVELS: std::ops::RangeInclusive<u8> = 2..=3;

/// A rendered markdown document.
#[derive(Debug, Clone)]
pub struct RenderedDoc {
    /// Frontmatter as declared
    pub frontmatter: FrontmatterMap,

    /// Frontmatter `title`, else the first h1, else empty
    pub title: String,

    /// Frontmatter `description`, else empty
    pub description: String,

    /// h2/h3 headers, nested
    pub headers: Vec<Header>,

    /// Body HTML
    pub markup: String,
}

/// Errors that can occur when rendering markdown.
#[derive(Debug, thiserror::Error)]
pub enum MarkdownError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Heading being collected.
struct OpenHeading<'a> {
    level: u8,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    inner: Vec<Event<'a>>,
}

/// Code block being collected.
struct OpenCodeBlock {
    lang: String,
    source: String,
}

/// Render a markdown document.
pub fn render_document(source: &str) -> Result<RenderedDoc, MarkdownError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut slugs = SlugCounter::new();
    let mut flat_headers = Vec::new();
    let mut first_h1: Option<String> = None;

    let mut heading: Option<OpenHeading<'_>> = None;
    let mut code: Option<OpenCodeBlock> = None;

    for event in Parser::new_ext(content, options) {
        if let Some(open) = heading.as_mut() {
            match event {
                Event::End(TagEnd::Heading(_)) => {
                    let Some(open) = heading.take() else {
                        continue;
                    };
                    let text = open.text.trim().to_string();
                    let slug = slugs.unique(open.id.clone().unwrap_or_else(|| slugify(&text)));

                    if open.level == 1 && first_h1.is_none() {
                        first_h1 = Some(text.clone());
                    }
                    if HEADER_LEVELS.contains(&open.level) {
                        flat_headers.push(Header::new(open.level, text.clone(), slug.clone()));
                    }

                    events.push(Event::Html(heading_open(&open, &slug).into()));
                    events.extend(open.inner);
                    let label = match &open.id {
                        Some(id) => format!("{} {{#{}}}", text, id),
                        None => text.clone(),
                    };
                    events.push(Event::Html(heading_close(open.level, &slug, &label).into()));
                }
                Event::Text(ref text) | Event::Code(ref text) => {
                    open.text.push_str(text);
                    open.inner.push(event);
                }
                other => open.inner.push(other),
            }
            continue;
        }

        if let Some(open) = code.as_mut() {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(open) = code.take() {
                        events.push(Event::Html(code_block_html(&open).into()));
                    }
                }
                Event::Text(text) => open.source.push_str(&text),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                heading = Some(OpenHeading {
                    level: heading_level(level),
                    id: id.map(|id| id.to_string()),
                    classes: classes.iter().map(|c| c.to_string()).collect(),
                    text: String::new(),
                    inner: Vec::new(),
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => language_from_info(info),
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some(OpenCodeBlock {
                    lang,
                    source: String::new(),
                });
            }
            other => events.push(other),
        }
    }

    let mut markup = String::new();
    html::push_html(&mut markup, events.into_iter());

    let title = string_value(&frontmatter, "title")
        .map(str::to_string)
        .or(first_h1)
        .unwrap_or_default();
    let description = string_value(&frontmatter, "description")
        .unwrap_or_default()
        .to_string();

    Ok(RenderedDoc {
        frontmatter,
        title,
        description,
        headers: nest_headers(flat_headers),
        markup,
    })
}

fn heading_level(level: HeadingLevel) -> u8 {
    level as u8
}

fn heading_open(heading: &OpenHeading<'_>, slug: &str) -> String {
    let mut tag = format!("<h{} id=\"{}\"", heading.level, escape_html(slug));
    if !heading.classes.is_empty() {
        tag.push_str(&format!(" class=\"{}\"", escape_html(&heading.classes.join(" "))));
    }
    tag.push_str(" tabindex=\"-1\">");
    tag
}

/// Closing tag with the permalink anchor. An explicit `{#id}` stays in the
/// label.
fn heading_close(level: u8, slug: &str, label: &str) -> String {
    format!(
        " <a class=\"header-anchor\" href=\"#{}\" aria-label=\"Permalink to &quot;{}&quot;\">&#8203;</a></h{}>\n",
        escape_html(slug),
        escape_html(label),
        level
    )
}

fn code_block_html(block: &OpenCodeBlock) -> String {
    let lang = if block.lang.is_empty() {
        "text"
    } else {
        block.lang.as_str()
    };
    let lang = escape_html(lang);

    let source = block.source.strip_suffix('\n').unwrap_or(&block.source);
    let lines: Vec<String> = source
        .split('\n')
        .map(|line| format!("<span class=\"line\"><span>{}</span></span>", escape_html(line)))
        .collect();

    format!(
        "<div class=\"language-{lang}\"><button title=\"Copy Code\" class=\"copy\"></button><span class=\"lang\">{lang}</span><pre tabindex=\"0\"><code>{}</code></pre></div>\n",
        lines.join("\n")
    )
}

/// Language label from a code fence info string.
fn language_from_info(info: &CowStr<'_>) -> String {
    info.split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| c == '{' || c == '}')
        .to_lowercase()
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_geodesic_tutorial() {
        let source = r#"# Geodesic paths {#Geodesic-paths}

Geodesic paths are paths computed on an ellipsoid, as opposed to a plane.

```@example
import GeometryOps as GO, GeoInterface as GI
fig
```
"#;

        let doc = render_document(source).unwrap();

        assert_eq!(doc.title, "Geodesic paths");
        assert_eq!(doc.description, "");
        assert!(doc.frontmatter.is_empty());
        assert!(doc.headers.is_empty());
        assert!(doc.markup.starts_with(
            r##"<h1 id="Geodesic-paths" tabindex="-1">Geodesic paths <a class="header-anchor" href="#Geodesic-paths""##
        ));
        assert!(doc.markup.contains(
            r#"aria-label="Permalink to &quot;Geodesic paths {#Geodesic-paths}&quot;""#
        ));
        assert!(doc.markup.contains(r#"<div class="language-@example">"#));
        assert!(doc
            .markup
            .contains(r#"<span class="line"><span>fig</span></span></code></pre></div>"#));
    }

    #[test]
    fn collects_nested_headers() {
        let source = r#"---
title: Guide
description: How to use it
---

# Ignored for title

## Install

### From source

## Usage `cli`
"#;

        let doc = render_document(source).unwrap();

        assert_eq!(doc.title, "Guide");
        assert_eq!(doc.description, "How to use it");
        assert_eq!(doc.headers.len(), 2);
        assert_eq!(doc.headers[0].slug, "install");
        assert_eq!(doc.headers[0].children[0].title, "From source");
        assert_eq!(doc.headers[0].children[0].link, "#from-source");
        assert_eq!(doc.headers[1].title, "Usage cli");
    }

    #[test]
    fn deduplicates_heading_ids() {
        let doc = render_document("## Example\n\n## Example\n").unwrap();

        assert_eq!(doc.headers[0].slug, "example");
        assert_eq!(doc.headers[1].slug, "example-1");
        assert!(doc.markup.contains(r#"<h2 id="example-1" tabindex="-1">"#));
    }

    #[test]
    fn explicit_id_does_not_reuse_a_suffixed_slug() {
        let doc = render_document("## Example\n\n## Example\n\n## Other {#example-1}\n").unwrap();

        let slugs: Vec<&str> = doc.headers.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["example", "example-1", "example-1-1"]);
        assert_eq!(doc.markup.matches(r#"id="example-1""#).count(), 1);
        assert!(doc.markup.contains(r#"aria-label="Permalink to &quot;Other {#example-1}&quot;""#));
    }

    #[test]
    fn escapes_code_and_labels() {
        let doc = render_document("## a < b\n\n```rust\nlet x = 1 < 2 && true;\n```\n").unwrap();

        assert!(doc.markup.contains("let x = 1 &lt; 2 &amp;&amp; true;"));
        assert!(doc.markup.contains("aria-label=\"Permalink to &quot;a &lt; b&quot;\""));
    }

    #[test]
    fn empty_document_has_empty_markup() {
        let doc = render_document("").unwrap();

        assert_eq!(doc.title, "");
        assert!(doc.markup.is_empty());
    }

    #[test]
    fn indented_code_is_labelled_text() {
        let doc = render_document("Para\n\n    indented\n").unwrap();

        assert!(doc.markup.contains(r#"<div class="language-text">"#));
    }

    #[test]
    fn propagates_frontmatter_errors() {
        assert!(matches!(
            render_document("---\ntitle: x\n"),
            Err(MarkdownError::Frontmatter(FrontmatterError::Unclosed))
        ));
    }
}
