//! File-name slugs

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, strip diacritics, turn whitespace into hyphens, drop non-word characters,
/// then collapse and trim hyphens.
///
/// Word characters are ASCII letters, digits and `_`, so identifiers such as
/// `REACT_CODING_STANDARDS` keep their underscores.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    for c in lowered.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_whitespace() || c == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
