//! Page components that materialize pre-rendered markup into node trees.
//!
//! A [`PageComponent`] binds page data to its trusted body and exposes a
//! single memoized render entry point. The [`PageRegistry`] resolves
//! components by relative path the way a page router would.

pub mod component;
pub mod materialize;
pub mod node;
pub mod parser;
pub mod registry;

pub use component::{MountState, PageComponent};
pub use materialize::{materialize, validate_markup};
pub use node::{Element, Fragment, Node};
pub use parser::{parse_fragment, FragmentParser, MarkupError, MarkupParser};
pub use registry::{PageRegistry, RegistryError};
