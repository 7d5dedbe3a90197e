//! Configuration file (pagelet.toml).

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_last_updated")]
    pub last_updated: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            last_updated: default_last_updated(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_last_updated() -> bool {
    true
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("pagelet.toml")).unwrap();

        assert_eq!(config.docs.dir, "docs");
        assert_eq!(config.docs.output, "dist");
        assert!(config.build.last_updated);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pagelet.toml");
        fs::write(&path, "[docs]\ntitle = \"Geometry\"\n\n[build]\nlast_updated = false\n").unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.docs.title, "Geometry");
        assert_eq!(config.docs.base_url, "/");
        assert!(!config.build.last_updated);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pagelet.toml");
        fs::write(&path, "[docs\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
