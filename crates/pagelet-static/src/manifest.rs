//! Bundle manifest and site loading.
//!
//! The manifest maps each page's relative path to the bundle file holding
//! its export pair. Loading a site reads the manifest back and mounts
//! every bundle into a [`PageRegistry`].

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use pagelet_page::{LoadError, PageBundle};
use pagelet_render::{PageRegistry, RegistryError};

/// Directory, relative to the output root, holding bundles and the manifest.
pub const ASSETS_DIR: &str = "assets";

/// Manifest file name inside [`ASSETS_DIR`].
pub const MANIFEST_FILE: &str = "manifest.json";

/// Index of emitted page bundles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Bundle file names by relative path
    pub pages: BTreeMap<String, String>,

    #[serde(skip)]
    used: HashSet<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a bundle file name for a page and record it.
    ///
    /// `tutorials/geodesic_paths.md` maps to
    /// `tutorials_geodesic_paths.md.json`. Flattened names that collide
    /// get a numeric suffix.
    pub fn assign(&mut self, relative_path: &str) -> String {
        let flat = relative_path.replace('/', "_");
        let mut file = format!("{}.json", flat);
        let mut n = 1;
        while self.used.contains(&file) {
            file = format!("{}.{}.json", flat, n);
            n += 1;
        }

        self.used.insert(file.clone());
        self.pages.insert(relative_path.to_string(), file.clone());
        file
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        manifest.used = manifest.pages.values().cloned().collect();
        Ok(manifest)
    }
}

/// Errors that can occur when loading a built site.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Invalid bundle {path}: {source}")]
    Bundle { path: String, source: LoadError },

    #[error("Manifest entry {entry} points at the bundle for {relative_path}")]
    ManifestMismatch { entry: String, relative_path: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Load every page of a built site into a registry.
pub fn load_site(output_dir: &Path) -> Result<PageRegistry, ReadError> {
    let assets = output_dir.join(ASSETS_DIR);
    let manifest_path = assets.join(MANIFEST_FILE);

    let manifest = Manifest::from_json(&read(&manifest_path)?)?;
    let mut registry = PageRegistry::new();

    for (relative_path, file) in &manifest.pages {
        let bundle_path = assets.join(file);
        let bundle =
            PageBundle::from_json(&read(&bundle_path)?).map_err(|source| ReadError::Bundle {
                path: bundle_path.display().to_string(),
                source,
            })?;

        if &bundle.page_data.relative_path != relative_path {
            return Err(ReadError::ManifestMismatch {
                entry: relative_path.clone(),
                relative_path: bundle.page_data.relative_path.clone(),
            });
        }

        registry.mount_bundle(&bundle)?;
    }

    tracing::debug!("Loaded {} pages from {}", registry.len(), output_dir.display());

    Ok(registry)
}

fn read(path: &Path) -> Result<String, ReadError> {
    fs::read_to_string(path).map_err(|e| ReadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelet_page::{Markup, PageBody, PageData};
    use tempfile::tempdir;

    #[test]
    fn assigns_flat_file_names() {
        let mut manifest = Manifest::new();

        assert_eq!(
            manifest.assign("tutorials/geodesic_paths.md"),
            "tutorials_geodesic_paths.md.json"
        );
        assert_eq!(manifest.assign("index.md"), "index.md.json");
    }

    #[test]
    fn suffixes_colliding_names() {
        let mut manifest = Manifest::new();

        assert_eq!(manifest.assign("a/b.md"), "a_b.md.json");
        assert_eq!(manifest.assign("a_b.md"), "a_b.md.1.json");
        assert_eq!(manifest.pages.len(), 2);
    }

    #[test]
    fn loads_site_from_disk() {
        let temp = tempdir().unwrap();
        let assets = temp.path().join(ASSETS_DIR);
        fs::create_dir_all(&assets).unwrap();

        let mut manifest = Manifest::new();
        for (path, markup) in [("index.md", "<h1 id=\"home\">Home</h1>"), ("guide/a.md", "")] {
            let bundle = PageBundle::new(PageData::new("T", path), &PageBody::new(Markup::raw(markup)));
            let file = manifest.assign(path);
            fs::write(assets.join(file), bundle.to_json().unwrap()).unwrap();
        }
        fs::write(assets.join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();

        let registry = load_site(temp.path()).unwrap();

        assert_eq!(registry.names(), vec!["guide/a.md", "index.md"]);
        let home = registry.resolve("index.md").unwrap();
        assert_eq!(home.render().headings()[0].id(), Some("home"));
        assert!(registry.resolve("guide/a.md").unwrap().render().is_empty());
    }

    #[test]
    fn reports_missing_manifest() {
        let temp = tempdir().unwrap();

        assert!(matches!(load_site(temp.path()), Err(ReadError::Io { .. })));
    }

    #[test]
    fn reports_malformed_bundle() {
        let temp = tempdir().unwrap();
        let assets = temp.path().join(ASSETS_DIR);
        fs::create_dir_all(&assets).unwrap();

        let mut manifest = Manifest::new();
        let file = manifest.assign("x.md");
        fs::write(assets.join(file), r#"{"__pageData": {"title": "x"}, "default": {}}"#).unwrap();
        fs::write(assets.join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();

        assert!(matches!(load_site(temp.path()), Err(ReadError::Bundle { .. })));
    }

    #[test]
    fn rejects_entry_pointing_at_another_page() {
        let temp = tempdir().unwrap();
        let assets = temp.path().join(ASSETS_DIR);
        fs::create_dir_all(&assets).unwrap();

        let bundle = PageBundle::new(PageData::new("Other", "other.md"), &PageBody::new(Markup::raw("")));
        fs::write(assets.join("x.json"), bundle.to_json().unwrap()).unwrap();
        fs::write(assets.join(MANIFEST_FILE), r#"{"pages": {"index.md": "x.json"}}"#).unwrap();

        match load_site(temp.path()) {
            Err(ReadError::ManifestMismatch {
                entry,
                relative_path,
            }) => {
                assert_eq!(entry, "index.md");
                assert_eq!(relative_path, "other.md");
            }
            other => panic!("expected manifest mismatch, got {:?}", other.map(|r| r.len())),
        }
    }
}
