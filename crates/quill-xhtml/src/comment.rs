//! Macro call markers stored in XHTML comments.
//!
//! A rendered macro is wrapped as
//! `<!--startmacro:id|-|name="value"|-|content-->output<!--stopmacro-->`.
//! The content part is absent for macros called without content. Inside
//! parameter values `~` escapes the next character.

use quill_xdom::Parameters;

const START: &str = "startmacro:";
const STOP: &str = "stopmacro";
const SEPARATOR: &str = "|-|";

/// A comment recognized as a macro marker.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MacroComment {
    Start {
        id: String,
        parameters: Parameters,
        content: Option<String>,
    },
    Stop,
}

impl MacroComment {
    /// Parse comment text; `None` for ordinary comments.
    pub(crate) fn parse(text: &str) -> Option<Self> {
        if text.trim() == STOP {
            return Some(Self::Stop);
        }
        let rest = text.strip_prefix(START)?;
        let mut parts = rest.splitn(3, SEPARATOR);
        let id = parts.next()?.trim();
        if id.is_empty() {
            return None;
        }
        let parameters = parts.next().map(parse_parameters).unwrap_or_default();
        let content = parts.next().map(str::to_owned);
        Some(Self::Start {
            id: id.to_owned(),
            parameters,
            content,
        })
    }
}

/// Parse `name="value"` pairs separated by whitespace.
fn parse_parameters(text: &str) -> Parameters {
    let mut parameters = Parameters::new();
    let mut remaining = text.trim_start();

    while !remaining.is_empty() {
        let end = remaining
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(remaining.len());
        let name = &remaining[..end];
        remaining = &remaining[end..];

        let value = if let Some(rest) = remaining.strip_prefix("=\"") {
            let (value, rest) = read_quoted(rest);
            remaining = rest;
            value
        } else {
            String::new()
        };
        if !name.is_empty() {
            parameters.insert(name.to_owned(), value);
        }
        // Stray `=` without a quoted value.
        if remaining.starts_with('=') {
            remaining = &remaining[1..];
        }
        remaining = remaining.trim_start();
    }

    parameters
}

/// Read up to the closing quote; returns the unescaped value and the rest.
fn read_quoted(text: &str) -> (String, &str) {
    let mut value = String::new();
    let mut chars = text.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '~' => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            '"' => return (value, &text[i + 1..]),
            _ => value.push(ch),
        }
    }
    (value, "")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_start_with_content() {
        let comment = MacroComment::parse("startmacro:footnote|-||-|Source").unwrap();

        assert_eq!(
            comment,
            MacroComment::Start {
                id: "footnote".to_owned(),
                parameters: Parameters::new(),
                content: Some("Source".to_owned()),
            }
        );
    }

    #[test]
    fn test_parse_start_without_content() {
        let comment = MacroComment::parse("startmacro:putfootnotes|-|").unwrap();

        assert_eq!(
            comment,
            MacroComment::Start {
                id: "putfootnotes".to_owned(),
                parameters: Parameters::new(),
                content: None,
            }
        );
    }

    #[test]
    fn test_parse_parameters_with_escapes() {
        let Some(MacroComment::Start { parameters, .. }) =
            MacroComment::parse(r#"startmacro:box|-|title="say ~"hi~"" width="50~~" flag|-|x"#)
        else {
            panic!("expected start marker");
        };

        assert_eq!(parameters.get("title").map(String::as_str), Some(r#"say "hi""#));
        assert_eq!(parameters.get("width").map(String::as_str), Some("50~"));
        assert_eq!(parameters.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn test_content_keeps_separator() {
        let Some(MacroComment::Start { content, .. }) =
            MacroComment::parse("startmacro:code|-||-|a |-| b")
        else {
            panic!("expected start marker");
        };

        assert_eq!(content.as_deref(), Some("a |-| b"));
    }

    #[test]
    fn test_stop_and_ordinary_comments() {
        assert_eq!(MacroComment::parse("stopmacro"), Some(MacroComment::Stop));
        assert_eq!(MacroComment::parse(" note "), None);
        assert_eq!(MacroComment::parse("startmacro:|-|"), None);
    }
}
