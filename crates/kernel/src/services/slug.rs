//! Slug and machine-key normalization.
//!
//! Term filters are matched by slug, while content types, taxonomies and
//! order fields are addressed by machine key. Both normalizers are total:
//! any input maps to a (possibly empty) normalized string.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Maximum slug length in bytes.
const MAX_SLUG_LEN: usize = 200;

/// Latin letters that do not decompose into a base letter plus marks.
fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'đ' | 'ð' => "d",
        'ł' => "l",
        'þ' => "th",
        'ı' => "i",
        _ => return None,
    })
}

/// Strip accents: `"Médico"` becomes `"medico"`.
fn remove_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

/// Convert text into a URL-safe term slug.
///
/// Strips accents, transforms to lowercase, replaces non-alphanumeric
/// characters with hyphens, collapses consecutive hyphens, and trims
/// leading/trailing hyphens. Letters without an accent-free form are kept.
pub fn slugify(text: &str) -> String {
    let slug: String = remove_accents(&text.to_lowercase())
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    // Collapse consecutive hyphens and trim
    let mut result = String::with_capacity(slug.len());
    let mut prev_was_hyphen = true; // Start true to skip leading hyphens
    for c in slug.chars() {
        if c == '-' {
            if !prev_was_hyphen {
                result.push('-');
            }
            prev_was_hyphen = true;
        } else {
            result.push(c);
            prev_was_hyphen = false;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.len() > MAX_SLUG_LEN {
        let mut end = MAX_SLUG_LEN;
        while !result.is_char_boundary(end) {
            end -= 1;
        }
        result.truncate(end);
        while result.ends_with('-') {
            result.pop();
        }
    }

    result
}

/// Normalize a machine key (content type, taxonomy, order field).
///
/// Lowercases and drops every character outside `[a-z0-9_-]`. Unlike
/// [`slugify`], separators are removed rather than replaced, so
/// `"Practice Area"` becomes `"practicearea"`.
pub fn sanitize_key(key: &str) -> String {
    key.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}
