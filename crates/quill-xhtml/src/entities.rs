//! HTML entity handling.
//!
//! XHTML written by hand or exported from HTML editors uses HTML named
//! entities that an XML tokenizer rejects. They are turned into characters
//! before tokenizing; the five XML entities are left for the tokenizer.

use std::sync::LazyLock;

use regex::Regex;

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Replace HTML named entities with the characters they stand for.
///
/// Unknown names and the XML entities (`amp`, `lt`, `gt`, `quot`, `apos`) are kept.
pub fn convert_named_entities(source: &str) -> String {
    if !source.contains('&') {
        return source.to_owned();
    }
    NAMED_ENTITY
        .replace_all(source, |caps: &regex::Captures| {
            html_entity(&caps[1]).map_or_else(|| caps[0].to_owned(), |ch| ch.to_string())
        })
        .into_owned()
}

/// Resolve the body of an entity reference the tokenizer reported (`amp`, `#123`, `#x7b`).
///
/// Unresolvable references are returned verbatim, ampersand and semicolon included.
pub fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => match name.strip_prefix('#') {
            Some(code) => {
                let value = match code.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => code.parse::<u32>().ok(),
                };
                value.and_then(char::from_u32)
            }
            None => html_entity(name),
        },
    };
    resolved.map_or_else(|| format!("&{name};"), |ch| ch.to_string())
}

fn html_entity(name: &str) -> Option<char> {
    Some(match name {
        "nbsp" => '\u{00a0}',
        "iexcl" => '\u{00a1}',
        "cent" => '\u{00a2}',
        "pound" => '\u{00a3}',
        "yen" => '\u{00a5}',
        "sect" => '\u{00a7}',
        "copy" => '\u{00a9}',
        "laquo" => '\u{00ab}',
        "reg" => '\u{00ae}',
        "deg" => '\u{00b0}',
        "plusmn" => '\u{00b1}',
        "para" => '\u{00b6}',
        "middot" => '\u{00b7}',
        "raquo" => '\u{00bb}',
        "iquest" => '\u{00bf}',
        "times" => '\u{00d7}',
        "divide" => '\u{00f7}',
        "eacute" => '\u{00e9}',
        "egrave" => '\u{00e8}',
        "agrave" => '\u{00e0}',
        "ccedil" => '\u{00e7}',
        "uuml" => '\u{00fc}',
        "ouml" => '\u{00f6}',
        "auml" => '\u{00e4}',
        "szlig" => '\u{00df}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bull" => '\u{2022}',
        "hellip" => '\u{2026}',
        "dagger" => '\u{2020}',
        "Dagger" => '\u{2021}',
        "euro" => '\u{20ac}',
        "trade" => '\u{2122}',
        "larr" => '\u{2190}',
        "uarr" => '\u{2191}',
        "rarr" => '\u{2192}',
        "darr" => '\u{2193}',
        "harr" => '\u{2194}',
        "ne" => '\u{2260}',
        "le" => '\u{2264}',
        "ge" => '\u{2265}',
        _ => return None,
    })
}
