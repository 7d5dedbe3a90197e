//! Loading serialized page data.
//!
//! Payloads come from the build step and are expected to be well formed.
//! Anything else is a build integrity violation, so every function here
//! fails fast instead of returning a partially valid page.

use serde_json::Value;

use crate::data::PageData;

/// Errors that can occur when loading page data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object for {0}")]
    NotAnObject(&'static str),

    #[error("Malformed {what}: {message}")]
    Malformed { what: &'static str, message: String },

    #[error("Page data has an empty relativePath")]
    EmptyRelativePath,
}

/// Load page data from its serialized JSON form.
pub fn load_page_data(json: &str) -> Result<PageData, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    page_data_from_value(value)
}

/// Load page data from an already parsed JSON value.
pub fn page_data_from_value(value: Value) -> Result<PageData, LoadError> {
    if !value.is_object() {
        return Err(LoadError::NotAnObject("page data"));
    }

    let data: PageData = serde_json::from_value(value).map_err(|e| LoadError::Malformed {
        what: "page data",
        message: e.to_string(),
    })?;

    if data.relative_path.trim().is_empty() {
        return Err(LoadError::EmptyRelativePath);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{nest_headers, Header};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const GEODESIC: &str = r#"{"title":"Geodesic paths","description":"","frontmatter":{},"headers":[],"relativePath":"tutorials/geodesic_paths.md","filePath":"tutorials/geodesic_paths.md","lastUpdated":null}"#;

    #[test]
    fn loads_generated_payload() {
        let data = load_page_data(GEODESIC).unwrap();

        assert_eq!(data.title, "Geodesic paths");
        assert_eq!(data.description, "");
        assert!(data.frontmatter.is_empty());
        assert!(data.headers.is_empty());
        assert_eq!(data.relative_path, "tutorials/geodesic_paths.md");
        assert_eq!(data.file_path, "tutorials/geodesic_paths.md");
        assert_eq!(data.last_updated, None);
    }

    #[test]
    fn round_trips_every_field() {
        let mut data = PageData::new("Guide", "guide/intro.md");
        data.description = "Getting started".to_string();
        data.file_path = "docs/guide/intro.md".to_string();
        data.frontmatter
            .insert("outline".to_string(), json!([2, 3]));
        data.frontmatter
            .insert("sidebar".to_string(), json!({ "collapsed": true }));
        data.headers = nest_headers(vec![
            Header::new(2, "Install", "install"),
            Header::new(3, "Linux", "linux"),
        ]);
        data.last_updated = Some(Utc.timestamp_millis_opt(1_718_000_000_123).unwrap());

        let loaded = load_page_data(&serde_json::to_string(&data).unwrap()).unwrap();

        assert_eq!(loaded, data);
    }

    #[test]
    fn round_trips_absent_last_updated() {
        let data = PageData::new("Home", "index.md");
        let mut value = serde_json::to_value(&data).unwrap();
        value.as_object_mut().unwrap().remove("lastUpdated");

        let loaded = page_data_from_value(value).unwrap();

        assert_eq!(loaded, data);
    }

    #[test]
    fn rejects_missing_relative_path() {
        let mut value: Value = serde_json::from_str(GEODESIC).unwrap();
        value.as_object_mut().unwrap().remove("relativePath");

        let err = page_data_from_value(value).unwrap_err();

        match err {
            LoadError::Malformed { message, .. } => assert!(message.contains("relativePath")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_relative_path() {
        let payload = GEODESIC.replace(
            r#""relativePath":"tutorials/geodesic_paths.md""#,
            r#""relativePath":"""#,
        );

        assert!(matches!(
            load_page_data(&payload),
            Err(LoadError::EmptyRelativePath)
        ));
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(
            load_page_data("[1, 2, 3]"),
            Err(LoadError::NotAnObject(_))
        ));
        assert!(matches!(load_page_data("{not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn ignores_unknown_keys() {
        let payload = GEODESIC.replace("{\"title\"", "{\"isNotFound\":false,\"title\"");

        assert!(load_page_data(&payload).is_ok());
    }
}
