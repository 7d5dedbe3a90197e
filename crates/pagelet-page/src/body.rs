//! Pre-rendered page body.

use std::collections::BTreeMap;

/// Index of the slot holding the page's own content.
pub const PRIMARY_SLOT: u32 = 0;

/// Trusted markup produced by the build step.
///
/// The content was sanitized when it was rendered and is never
/// re-validated by the consumers of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Raw HTML fragment.
    Raw(String),
}

impl Markup {
    /// Wrap an already rendered HTML fragment.
    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    /// The markup text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Raw(html) => html,
        }
    }

    /// True when there is nothing to render.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Default for Markup {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

/// Page content plus optional per-slot overrides.
///
/// Slot indices are sparse and unbounded. Any index without an override
/// resolves to the primary markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBody {
    markup: Markup,
    slots: BTreeMap<u32, Markup>,
}

impl PageBody {
    /// Create a body from its primary markup.
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            slots: BTreeMap::new(),
        }
    }

    /// Add an override for a slot index, replacing any previous one.
    pub fn with_slot(mut self, index: u32, markup: Markup) -> Self {
        self.slots.insert(index, markup);
        self
    }

    /// The primary markup.
    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// All explicit overrides, ordered by index.
    pub fn slots(&self) -> &BTreeMap<u32, Markup> {
        &self.slots
    }

    /// Markup for a slot, falling back to the primary markup.
    pub fn resolve_slot(&self, index: u32) -> &Markup {
        self.slots.get(&index).unwrap_or(&self.markup)
    }
}
