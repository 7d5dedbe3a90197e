//! Heading anchor slugs.

use std::collections::{HashMap, HashSet};

/// Punctuation that separates words in a slug.
const SEPARATORS: &str = "~`!@#$%^&*()-_+=[]{}|\\;:\"'\u{201c}\u{201d}\u{2018}\u{2019}<>,.?/";

/// Convert heading text to an anchor slug.
///
/// Whitespace and punctuation collapse into single dashes, control
/// characters are dropped, and a leading digit gets an underscore prefix
/// so the result is a valid fragment identifier.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_control() {
            continue;
        }
        if c.is_whitespace() || SEPARATORS.contains(c) {
            pending_dash = !slug.is_empty();
            continue;
        }
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.extend(c.to_lowercase());
    }

    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        slug.insert(0, '_');
    }

    slug
}

/// Ensures slugs are unique within one document.
///
/// Repeated slugs get a numeric suffix: `usage`, `usage-1`, `usage-2`.
/// Suffixed results are reserved too, so a later heading that asks for
/// `usage-1` explicitly moves on to the next free variant.
#[derive(Debug, Default)]
pub struct SlugCounter {
    next_suffix: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slug, returning a unique variant of it.
    pub fn unique(&mut self, slug: String) -> String {
        let next = self.next_suffix.entry(slug.clone()).or_insert(0);
        let mut candidate = if *next == 0 {
            slug.clone()
        } else {
            format!("{}-{}", slug, next)
        };
        while self.taken.contains(&candidate) {
            *next += 1;
            candidate = format!("{}-{}", slug, next);
        }
        *next += 1;

        self.taken.insert(candidate.clone());
        candidate
    }
}
