//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use walkdir::WalkDir;

use pagelet_page::{Markup, PageBody, PageBundle, PageData};
use pagelet_render::{validate_markup, PageComponent, PageRegistry, RegistryError};

use crate::manifest::{Manifest, ASSETS_DIR, MANIFEST_FILE};
use crate::markdown::{escape_html, render_document};
use crate::templates::{Context, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source docs directory
    pub docs_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Record file modification times as `lastUpdated`
    pub last_updated: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("dist"),
            base_url: "/".to_string(),
            title: "Documentation".to_string(),
            last_updated: true,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to parse markdown: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid page markup: {path}: {message}")]
    MarkupError { path: String, message: String },

    #[error("Failed to register page: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A source document rendered to its page unit.
#[derive(Debug)]
struct SourcePage {
    /// Source file path
    source_path: PathBuf,

    /// Page data export
    data: PageData,

    /// Pre-rendered body
    body: PageBody,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self { config, templates })
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        // Ensure output directory exists
        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let sources = self.discover_sources()?;
        tracing::info!("Found {} documents in {}", sources.len(), self.config.docs_dir.display());

        // Render documents in parallel
        let pages: Vec<SourcePage> = sources
            .par_iter()
            .map(|path| self.render_source(path))
            .collect::<Result<_, _>>()?;

        let registry = self.register_pages(pages)?;
        let mut components: Vec<Arc<PageComponent>> = registry.iter().cloned().collect();
        components.sort_by(|a, b| a.name().cmp(b.name()));

        let manifest = self.write_bundles(&components)?;

        components
            .par_iter()
            .map(|component| self.write_page(component))
            .collect::<Result<Vec<()>, BuildError>>()?;

        self.generate_sitemap(&components)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: manifest.pages.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all markdown documents in the docs directory.
    fn discover_sources(&self) -> Result<Vec<PathBuf>, BuildError> {
        if !self.config.docs_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.config.docs_dir.display()
            )));
        }

        let mut sources: Vec<PathBuf> = WalkDir::new(&self.config.docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
            .collect();

        sources.sort();
        Ok(sources)
    }

    /// Render one source document into page data and body.
    fn render_source(&self, path: &Path) -> Result<SourcePage, BuildError> {
        let content = fs::read_to_string(path)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

        let doc = render_document(&content).map_err(|e| BuildError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let relative_path = relative_path(&self.config.docs_dir, path);

        let last_updated = if self.config.last_updated {
            modified_time(path)
        } else {
            None
        };

        let data = PageData {
            title: doc.title,
            description: doc.description,
            frontmatter: doc.frontmatter,
            headers: doc.headers,
            file_path: relative_path.clone(),
            relative_path,
            last_updated,
        };

        tracing::debug!("Rendered {}", data.relative_path);

        Ok(SourcePage {
            source_path: path.to_path_buf(),
            data,
            body: PageBody::new(Markup::raw(doc.markup)),
        })
    }

    /// Validate page markup and register every page.
    ///
    /// Invalid markup or a repeated relative path aborts the build.
    fn register_pages(&self, pages: Vec<SourcePage>) -> Result<PageRegistry, BuildError> {
        let mut registry = PageRegistry::new();

        for page in pages {
            validate_markup(page.body.markup().as_str()).map_err(|e| BuildError::MarkupError {
                path: page.source_path.display().to_string(),
                message: e.to_string(),
            })?;

            registry.register(PageComponent::new(page.data, page.body))?;
        }

        Ok(registry)
    }

    /// Write one bundle per page plus the manifest.
    fn write_bundles(&self, components: &[Arc<PageComponent>]) -> Result<Manifest, BuildError> {
        let assets_dir = self.config.output_dir.join(ASSETS_DIR);
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut manifest = Manifest::new();

        for component in components {
            let bundle = PageBundle::new(component.data().clone(), component.body());
            let json = bundle
                .to_json()
                .map_err(|e| BuildError::WriteError(e.to_string()))?;

            let file = manifest.assign(component.name());
            fs::write(assets_dir.join(&file), json)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        let json = manifest
            .to_json()
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        fs::write(assets_dir.join(MANIFEST_FILE), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        tracing::info!("Wrote {} bundles", manifest.pages.len());

        Ok(manifest)
    }

    /// Mount a page and write its pre-rendered HTML shell.
    fn write_page(&self, component: &PageComponent) -> Result<(), BuildError> {
        let content = component.render().to_html();
        let data = component.data();

        let context = Context::for_page(data, content, &self.config.title, &self.config.base_url);

        let html = self
            .templates
            .render_page("page.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self.config.output_dir.join(data.output_path());

        // Ensure output directory exists
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, components: &[Arc<PageComponent>]) -> Result<(), BuildError> {
        let urls: Vec<String> = components
            .iter()
            .map(|component| {
                let data = component.data();
                let mut entry = format!(
                    "  <url>\n    <loc>{}{}</loc>\n",
                    escape_html(&self.config.base_url),
                    escape_html(&data.output_path())
                );
                if let Some(updated) = data.last_updated {
                    entry.push_str(&format!(
                        "    <lastmod>{}</lastmod>\n",
                        updated.format("%Y-%m-%d")
                    ));
                }
                entry.push_str("  </url>");
                entry
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Source path relative to the docs directory, with `/` separators.
fn relative_path(docs_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(docs_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// File modification time, truncated to milliseconds.
fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let modified: DateTime<Utc> = modified.into();
    DateTime::from_timestamp_millis(modified.timestamp_millis())
}
