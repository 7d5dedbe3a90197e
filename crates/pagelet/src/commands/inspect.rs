//! Inspect a built page.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagelet_static::load_site;

use crate::config::load_config;

/// Run the inspect command.
pub async fn run(config_path: &Path, page: &str, dir: Option<PathBuf>, html: bool) -> Result<()> {
    let file_config = load_config(config_path)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&file_config.docs.output));

    let registry = load_site(&dir)
        .with_context(|| format!("Failed to load site from {}", dir.display()))?;

    let Some(component) = registry.resolve(page) else {
        let known = registry.names().join(", ");
        anyhow::bail!("Page not found: {}. Known pages: {}", page, known);
    };

    println!("{}", serde_json::to_string_pretty(component.data())?);
    println!();

    let fragment = component.render();
    if html {
        println!("{}", fragment.to_html());
    } else {
        print!("{}", fragment.outline());
    }

    Ok(())
}
