//! Pagelet CLI - build and inspect pre-rendered documentation page bundles.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pagelet")]
#[command(about = "Build and inspect pre-rendered documentation page bundles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to pagelet.toml config file
    #[arg(short, long, default_value = "pagelet.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize documentation in current project
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build page bundles from markdown documents
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not record file modification times
        #[arg(long)]
        no_last_updated: bool,
    },

    /// Load a built page and print its data and rendered body
    Inspect {
        /// Relative path of the page, e.g. guide/intro.md
        page: String,

        /// Built site directory (defaults to config or "dist")
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print the body as HTML instead of a node outline
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            no_last_updated,
        } => {
            let last_updated = if no_last_updated { Some(false) } else { None };
            commands::build::run(&cli.config, output, last_updated).await?;
        }
        Commands::Inspect { page, dir, html } => {
            commands::inspect::run(&cli.config, &page, dir, html).await?;
        }
    }

    Ok(())
}
