//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pagelet_static::{BuildConfig, StaticBuilder};

use crate::config::load_config;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    last_updated: Option<bool>,
) -> Result<()> {
    tracing::info!("Building page bundles...");

    let file_config = load_config(config_path)?;

    let config = BuildConfig {
        docs_dir: PathBuf::from(&file_config.docs.dir),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file_config.docs.output)),
        base_url: file_config.docs.base_url,
        title: file_config.docs.title,
        last_updated: last_updated.unwrap_or(file_config.build.last_updated),
    };

    let result = StaticBuilder::new(config)?.build().await?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
