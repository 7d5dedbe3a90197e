//! Static build step for page bundles.
//!
//! Renders a directory of markdown documents into one page bundle per
//! document, a manifest indexing them, and a pre-rendered HTML shell per
//! page.

pub mod builder;
pub mod manifest;
pub mod markdown;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use manifest::{load_site, Manifest, ReadError};
pub use markdown::{render_document, MarkdownError, RenderedDoc};
