//! Page data, bodies and bundles for pre-rendered documentation pages.
//!
//! This crate defines the per-document contract between the build step and
//! the runtime: immutable page metadata, a trusted pre-rendered body, and
//! the serialized bundle that carries both.

pub mod body;
pub mod bundle;
pub mod data;
pub mod frontmatter;
pub mod loader;
pub mod slug;

pub use body::{Markup, PageBody, PRIMARY_SLOT};
pub use bundle::{ComponentExport, PageBundle};
pub use data::{nest_headers, FrontmatterMap, Header, PageData};
pub use frontmatter::{extract_frontmatter, FrontmatterError};
pub use loader::{load_page_data, page_data_from_value, LoadError};
pub use slug::{slugify, SlugCounter};
