//! Turning a page body into nodes.

use pagelet_page::{PageBody, PRIMARY_SLOT};

use crate::node::{Fragment, Node};
use crate::parser::{parse_fragment, FragmentParser, MarkupError};

/// Materialize the primary slot of a page body.
///
/// Blank markup yields an empty fragment without touching the parser.
/// Markup is trusted, so a parse failure is not surfaced as an error: the
/// payload is passed through verbatim as a single raw node.
pub fn materialize<P: FragmentParser + ?Sized>(parser: &P, body: &PageBody) -> Fragment {
    let markup = body.resolve_slot(PRIMARY_SLOT);
    if markup.is_blank() {
        return Fragment::default();
    }

    match parser.parse(markup.as_str()) {
        Ok(fragment) => fragment,
        Err(e) => {
            tracing::warn!("Passing page markup through unparsed: {}", e);
            Fragment::new(vec![Node::Raw(markup.as_str().to_string())])
        }
    }
}

/// Check that markup parses. Used by the build step, where a failure is a
/// build integrity violation.
pub fn validate_markup(markup: &str) -> Result<(), MarkupError> {
    parse_fragment(markup).map(|_| ())
}
