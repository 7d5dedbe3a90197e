//! The mountable page unit.

use std::sync::{Arc, OnceLock};

use pagelet_page::{PageBody, PageData};

use crate::materialize::materialize;
use crate::node::Fragment;
use crate::parser::{FragmentParser, MarkupParser};

/// Lifecycle of a component's rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    /// Render has not been called yet.
    Uninitialized,
    /// The body has been materialized and cached.
    Materialized,
}

/// A page bound to its metadata and pre-rendered body.
///
/// The body is materialized on the first call to [`render`](Self::render)
/// and cached for the lifetime of the component. Concurrent first renders
/// initialize the cache once; every caller sees the same fragment.
pub struct PageComponent<P = MarkupParser> {
    name: String,
    data: Arc<PageData>,
    body: PageBody,
    parser: P,
    rendered: OnceLock<Fragment>,
}

impl PageComponent<MarkupParser> {
    /// Create a component using the default markup parser.
    pub fn new(data: impl Into<Arc<PageData>>, body: PageBody) -> Self {
        Self::with_parser(data, body, MarkupParser)
    }
}

impl<P: FragmentParser> PageComponent<P> {
    /// Create a component with a custom parser.
    pub fn with_parser(data: impl Into<Arc<PageData>>, body: PageBody, parser: P) -> Self {
        let data = data.into();
        Self {
            name: data.relative_path.clone(),
            data,
            body,
            parser,
            rendered: OnceLock::new(),
        }
    }

    /// Component identifier, the page's relative path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The data export.
    pub fn data(&self) -> &PageData {
        &self.data
    }

    /// Shared handle to the data export.
    pub fn data_arc(&self) -> Arc<PageData> {
        Arc::clone(&self.data)
    }

    pub fn body(&self) -> &PageBody {
        &self.body
    }

    pub fn state(&self) -> MountState {
        if self.rendered.get().is_some() {
            MountState::Materialized
        } else {
            MountState::Uninitialized
        }
    }

    /// Render entry point.
    pub fn render(&self) -> &Fragment {
        self.rendered.get_or_init(|| {
            tracing::debug!("Materializing {}", self.name);
            materialize(&self.parser, &self.body)
        })
    }
}

impl<P> std::fmt::Debug for PageComponent<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageComponent")
            .field("name", &self.name)
            .field("materialized", &self.rendered.get().is_some())
            .finish()
    }
}
