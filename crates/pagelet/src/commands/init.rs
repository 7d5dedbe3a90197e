//! Initialize documentation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing pagelet...");

    let docs_dir = Path::new("docs");

    // Check if docs already exists
    if docs_dir.exists() {
        if !yes {
            tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(docs_dir).context("Failed to create docs directory")?;
    }

    // Create default config
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    // Create index page
    let index_path = docs_dir.join("index.md");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.md")?;
        tracing::info!("Created docs/index.md");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pagelet build' to generate page bundles.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Pagelet Configuration

[docs]
# Source directory for documentation
dir = "docs"

# Output directory for built pages
output = "dist"

# Site title
title = "My Documentation"

# Base URL (for deployment)
base_url = "/"

[build]
# Record file modification times as lastUpdated
last_updated = true
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
---

# Welcome {#welcome}

This page is built into a page bundle: its metadata, a pre-rendered body,
and a component that mounts it.

## Building

```bash
pagelet build
```

## Inspecting

```bash
pagelet inspect index.md
```
"#;
