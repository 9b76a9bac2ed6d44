//! URL slug generation.

use crate::error::DomainError;

/// Derive a URL-safe slug from a title or name.
///
/// The input is lowercased, every run of characters outside `[a-z0-9]`
/// collapses into a single hyphen, and hyphens at either end are dropped.
/// Input without any letter or digit yields an empty string.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Like [`slugify`], but an empty result is a validation failure on `field`.
pub fn require_slug(field: &'static str, input: &str) -> Result<String, DomainError> {
    let slug = slugify(input);
    if slug.is_empty() {
        return Err(DomainError::validation(
            field,
            "must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}
