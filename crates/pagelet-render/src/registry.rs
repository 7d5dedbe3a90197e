//! Page registry for resolving components by relative path.
//!
//! Plays the part of a page router's lookup table: every mounted page is
//! registered under its `relativePath`, which must be unique in a build.

use std::collections::HashMap;
use std::sync::Arc;

use pagelet_page::PageBundle;

use crate::component::PageComponent;

/// A registry of mounted page components.
#[derive(Debug, Default)]
pub struct PageRegistry {
    /// Components by relative path
    pages: HashMap<String, Arc<PageComponent>>,
}

impl PageRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its name.
    ///
    /// Fails if another component already uses the same relative path.
    pub fn register(
        &mut self,
        component: PageComponent,
    ) -> Result<Arc<PageComponent>, RegistryError> {
        let name = component.name().to_string();
        if self.pages.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        let component = Arc::new(component);
        self.pages.insert(name, Arc::clone(&component));
        Ok(component)
    }

    /// Build a component from a bundle's export pair and register it.
    pub fn mount_bundle(
        &mut self,
        bundle: &PageBundle,
    ) -> Result<Arc<PageComponent>, RegistryError> {
        if bundle.component.name != bundle.page_data.relative_path {
            return Err(RegistryError::ExportMismatch {
                name: bundle.component.name.clone(),
                relative_path: bundle.page_data.relative_path.clone(),
            });
        }

        self.register(PageComponent::new(
            bundle.page_data.clone(),
            bundle.body(),
        ))
    }

    /// Look up a component by relative path.
    pub fn resolve(&self, relative_path: &str) -> Option<&Arc<PageComponent>> {
        self.pages.get(relative_path)
    }

    /// Check if a page is registered.
    pub fn contains(&self, relative_path: &str) -> bool {
        self.pages.contains_key(relative_path)
    }

    /// Get all registered page names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate over registered components in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PageComponent>> {
        self.pages.values()
    }
}

/// Errors that can occur with the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate page: {0} is already registered")]
    Duplicate(String),

    #[error("Component export {name} does not match page data {relative_path}")]
    ExportMismatch { name: String, relative_path: String },
}
