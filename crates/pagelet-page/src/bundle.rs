//! Serialized export pair for one page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::body::{Markup, PageBody};
use crate::data::PageData;
use crate::loader::{page_data_from_value, LoadError};

/// Everything the build step emits for a single document.
///
/// Serialized as `{"__pageData": {...}, "default": {...}}`, the data
/// export and the mountable default export a page router resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBundle {
    /// Data export consumed by page chrome
    #[serde(rename = "__pageData")]
    pub page_data: PageData,

    /// Mountable component definition
    #[serde(rename = "default")]
    pub component: ComponentExport,
}

/// The default export of a page bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExport {
    /// Component identifier, the page's relative path
    pub name: String,

    /// Pre-rendered body markup
    pub markup: String,

    /// Sparse slot overrides keyed by slot index
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<u32, String>,
}

impl PageBundle {
    /// Bundle page data with its body, naming the component after the page.
    pub fn new(page_data: PageData, body: &PageBody) -> Self {
        let component = ComponentExport {
            name: page_data.relative_path.clone(),
            markup: body.markup().as_str().to_string(),
            slots: body
                .slots()
                .iter()
                .map(|(index, markup)| (*index, markup.as_str().to_string()))
                .collect(),
        };

        Self {
            page_data,
            component,
        }
    }

    /// Parse a bundle, validating its page data with the loader.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(mut object) = value else {
            return Err(LoadError::NotAnObject("page bundle"));
        };

        let data = object.remove("__pageData").ok_or_else(|| LoadError::Malformed {
            what: "page bundle",
            message: "missing field `__pageData`".to_string(),
        })?;
        let page_data = page_data_from_value(data)?;

        let export = object.remove("default").ok_or_else(|| LoadError::Malformed {
            what: "page bundle",
            message: "missing field `default`".to_string(),
        })?;
        let component: ComponentExport =
            serde_json::from_value(export).map_err(|e| LoadError::Malformed {
                what: "component export",
                message: e.to_string(),
            })?;

        Ok(Self {
            page_data,
            component,
        })
    }

    /// Serialize the bundle.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Rebuild the page body carried by the default export.
    pub fn body(&self) -> PageBody {
        self.component.slots.iter().fold(
            PageBody::new(Markup::raw(self.component.markup.as_str())),
            |body, (index, markup)| body.with_slot(*index, Markup::raw(markup.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_component_after_relative_path() {
        let data = PageData::new("Home", "guide/index.md");
        let bundle = PageBundle::new(data, &PageBody::new(Markup::raw("<p>hi</p>")));

        assert_eq!(bundle.component.name, "guide/index.md");
        assert_eq!(bundle.component.markup, "<p>hi</p>");
    }

    #[test]
    fn parses_serialized_bundle() {
        let body = PageBody::new(Markup::raw("<h1>Title</h1>")).with_slot(3, Markup::raw("<p/>"));
        let bundle = PageBundle::new(PageData::new("Title", "a.md"), &body);

        let json = bundle.to_json().unwrap();
        assert!(json.contains("\"__pageData\""));
        assert!(json.contains("\"default\""));

        let parsed = PageBundle::from_json(&json).unwrap();
        assert_eq!(parsed, bundle);
        assert_eq!(parsed.body(), body);
    }

    #[test]
    fn slots_default_to_empty() {
        let json = r#"{
            "__pageData": {"title":"","description":"","frontmatter":{},"headers":[],"relativePath":"x.md","filePath":"x.md","lastUpdated":null},
            "default": {"name":"x.md","markup":""}
        }"#;

        let bundle = PageBundle::from_json(json).unwrap();

        assert!(bundle.component.slots.is_empty());
        assert!(bundle.body().markup().is_blank());
    }

    #[test]
    fn rejects_bundle_without_data_export() {
        let json = r#"{"default": {"name":"x.md","markup":""}}"#;

        assert!(matches!(
            PageBundle::from_json(json),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_page_data_without_relative_path() {
        let json = r#"{
            "__pageData": {"title":"","description":"","frontmatter":{},"headers":[],"filePath":"x.md","lastUpdated":null},
            "default": {"name":"x.md","markup":""}
        }"#;

        let err = PageBundle::from_json(json).unwrap_err();
        assert!(err.to_string().contains("relativePath"));
    }
}
