//! Page metadata emitted once per source document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque frontmatter mapping, passed through untouched.
pub type FrontmatterMap = Map<String, Value>;

/// Metadata for a single page.
///
/// Produced exactly once by the build step and read-only afterwards. The
/// `relative_path` is the stable identifier of the page within a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Page title (may be empty)
    pub title: String,

    /// Page description (may be empty)
    pub description: String,

    /// Frontmatter declared by the source document
    pub frontmatter: FrontmatterMap,

    /// Section headings, nested by level
    pub headers: Vec<Header>,

    /// Source path relative to the docs root
    pub relative_path: String,

    /// Source file path as seen by the build step
    pub file_path: String,

    /// Last modification time, serialized as epoch milliseconds or `null`
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl PageData {
    /// Create page data with empty optional fields.
    pub fn new(title: impl Into<String>, relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        Self {
            title: title.into(),
            description: String::new(),
            frontmatter: FrontmatterMap::new(),
            headers: Vec::new(),
            file_path: relative_path.clone(),
            relative_path,
            last_updated: None,
        }
    }

    /// Output path of the rendered page, relative to the output root.
    ///
    /// `guide/intro.md` becomes `guide/intro.html`.
    pub fn output_path(&self) -> String {
        let stem = self
            .relative_path
            .strip_suffix(".md")
            .unwrap_or(&self.relative_path);
        format!("{}.html", stem)
    }

    /// Look up a frontmatter value by key.
    pub fn frontmatter_value(&self, key: &str) -> Option<&Value> {
        self.frontmatter.get(key)
    }

    /// Iterate over every header depth-first, in document order.
    pub fn flat_headers(&self) -> Vec<&Header> {
        fn walk<'a>(headers: &'a [Header], out: &mut Vec<&'a Header>) {
            for header in headers {
                out.push(header);
                walk(&header.children, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.headers, &mut out);
        out
    }
}

/// A heading record collected from the page body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Heading level (1-6)
    pub level: u8,

    /// Heading text
    pub title: String,

    /// Anchor ID
    pub slug: String,

    /// In-page link (`#slug`)
    pub link: String,

    /// Nested deeper headings
    #[serde(default)]
    pub children: Vec<Header>,
}

impl Header {
    /// Create a header with a link derived from its slug.
    pub fn new(level: u8, title: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            level,
            title: title.into(),
            link: format!("#{}", slug),
            slug,
            children: Vec::new(),
        }
    }
}

/// Arrange a flat list of headers into a tree.
///
/// Each header becomes a child of the nearest preceding header with a
/// lower level.
pub fn nest_headers(flat: Vec<Header>) -> Vec<Header> {
    let mut roots: Vec<Header> = Vec::new();

    for header in flat {
        insert_header(&mut roots, header);
    }

    roots
}

fn insert_header(siblings: &mut Vec<Header>, header: Header) {
    match siblings.last_mut() {
        Some(last) if last.level < header.level => insert_header(&mut last.children, header),
        _ => siblings.push(header),
    }
}
