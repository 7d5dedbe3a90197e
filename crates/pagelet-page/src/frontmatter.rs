//! Frontmatter extraction and parsing.

use serde_json::Value;

use crate::data::FrontmatterMap;

/// Extract frontmatter from a markdown document.
///
/// Returns the frontmatter mapping (empty when the document has none) and
/// the remaining content after the frontmatter block. Values are kept
/// opaque; no key is required.
pub fn extract_frontmatter(source: &str) -> Result<(FrontmatterMap, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((FrontmatterMap::new(), source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let value: Value = if yaml_content.is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    let frontmatter = match value {
        Value::Object(map) => map,
        Value::Null => FrontmatterMap::new(),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    Ok((frontmatter, remaining.trim_start()))
}

/// Read a string-valued frontmatter key.
pub fn string_value<'a>(frontmatter: &'a FrontmatterMap, key: &str) -> Option<&'a str> {
    frontmatter.get(key).and_then(Value::as_str)
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Frontmatter must be a mapping")]
    NotAMapping,
}
