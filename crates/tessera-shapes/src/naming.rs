//! Shape-name derivation from stylesheet file names.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A stylesheet shape's type is `"Style__" + name`, where the name comes
//! from the file name with every unsafe character stripped and the rest
//! lower-cased. Same-named `.css` and `.less` siblings therefore derive the
//! same name and can alternate for one another.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped from derived shape names: path separators,
/// query/fragment punctuation, whitespace, quotes, angle brackets, dot,
/// hyphen, underscore.
static UNSAFE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/:?#\[\]@!&'()*+,;=\s"<>.\-_]+"#).unwrap());

/// An absolute URI split into the parts that contribute to a shape name.
#[derive(Debug, PartialEq, Eq)]
struct AbsoluteUri {
    authority: String,
    path: String,
    query: String,
}

/// Derive the shape-name fragment for a stylesheet file name.
///
/// A well-formed absolute URI contributes `authority $ path $ query`;
/// anything else contributes its file stem. The result is sanitized and
/// lower-cased; whitespace-only input yields the empty string.
pub fn shape_name_from_file_name(file_name: &str) -> String {
    let name = match parse_absolute_uri(file_name) {
        Some(uri) => format!("{}${}${}", uri.authority, uri.path, uri.query),
        None => Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    safe_name(&name)
}

fn safe_name(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }
    UNSAFE_NAME.replace_all(name, "").to_lowercase()
}

/// Parse `scheme://authority[/path][?query][#fragment]`, rejecting anything
/// with whitespace, a malformed scheme, or an empty authority.
fn parse_absolute_uri(input: &str) -> Option<AbsoluteUri> {
    if input.chars().any(char::is_whitespace) {
        return None;
    }
    let (scheme, rest) = input.split_once("://")?;
    let mut scheme_chars = scheme.chars();
    let head = scheme_chars.next()?;
    if !head.is_ascii_alphabetic()
        || !scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }

    let (authority, tail) = match rest.find(['/', '?', '#']) {
        Some(split) => (&rest[..split], &rest[split..]),
        None => (rest, ""),
    };
    if authority.is_empty() {
        return None;
    }

    let tail = tail.split('#').next().unwrap_or_default();
    let (path, query) = match tail.split_once('?') {
        Some((path, query)) => (path, query),
        None => (tail, ""),
    };
    let path = if path.is_empty() { "/" } else { path };

    Some(AbsoluteUri {
        authority: authority.to_string(),
        path: path.to_string(),
        query: query.to_string(),
    })
}
