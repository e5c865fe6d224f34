//! Tag-stream writer with pluggable escaping.

use std::borrow::Cow;

/// Per-character escaping decision.
pub trait EscapePolicy: Send + Sync {
    /// Replacement for `ch`, or `None` to write it unchanged.
    fn escape(&self, ch: char, in_attribute: bool) -> Option<Cow<'static, str>>;
}

/// Plain XML escaping.
///
/// Text escapes `&`, `<` and `>`; attribute values additionally escape both
/// quote characters. Characters outside US-ASCII become numeric references
/// when `escape_non_ascii` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlEscaping {
    pub escape_non_ascii: bool,
}

impl EscapePolicy for XmlEscaping {
    fn escape(&self, ch: char, in_attribute: bool) -> Option<Cow<'static, str>> {
        match ch {
            '&' => Some(Cow::Borrowed("&amp;")),
            '<' => Some(Cow::Borrowed("&lt;")),
            '>' => Some(Cow::Borrowed("&gt;")),
            '"' if in_attribute => Some(Cow::Borrowed("&quot;")),
            '\'' if in_attribute => Some(Cow::Borrowed("&apos;")),
            c if self.escape_non_ascii && !c.is_ascii() => {
                Some(Cow::Owned(format!("&#{};", u32::from(c))))
            }
            _ => None,
        }
    }
}

/// XHTML escaping on top of [`XmlEscaping`].
///
/// `&apos;` is not an HTML entity, so apostrophes in attribute values are
/// written as the numeric reference `&#38;`. Left braces are always escaped so
/// the output can sit inside wiki markup where `{{` opens a macro.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhtmlEscaping {
    pub base: XmlEscaping,
}

impl XhtmlEscaping {
    /// XHTML escaping, optionally escaping non-ASCII characters as well.
    #[must_use]
    pub fn new(escape_non_ascii: bool) -> Self {
        Self {
            base: XmlEscaping { escape_non_ascii },
        }
    }
}

impl EscapePolicy for XhtmlEscaping {
    fn escape(&self, ch: char, in_attribute: bool) -> Option<Cow<'static, str>> {
        match ch {
            '\'' if in_attribute => Some(Cow::Borrowed("&#38;")),
            '{' => Some(Cow::Borrowed("&#123;")),
            _ => self.base.escape(ch, in_attribute),
        }
    }
}

/// Writes tags and text to a string, escaping through an [`EscapePolicy`].
pub struct TagWriter<P> {
    out: String,
    policy: P,
    open: Vec<String>,
}

impl<P: EscapePolicy> TagWriter<P> {
    /// Create an empty writer.
    pub fn new(policy: P) -> Self {
        Self {
            out: String::with_capacity(4096),
            policy,
            open: Vec::new(),
        }
    }

    /// Write `<name attr="value"...>`.
    pub fn start_element<'a, I>(&mut self, name: &str, attributes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.write_tag(name, attributes);
        self.out.push('>');
        self.open.push(name.to_owned());
    }

    /// Write `<name attr="value".../>`.
    pub fn empty_element<'a, I>(&mut self, name: &str, attributes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.write_tag(name, attributes);
        self.out.push_str("/>");
    }

    /// Close the innermost open element; does nothing when none is open.
    pub fn end_element(&mut self) {
        if let Some(name) = self.open.pop() {
            self.out.push_str("</");
            self.out.push_str(&name);
            self.out.push('>');
        }
    }

    /// Write escaped text.
    pub fn characters(&mut self, text: &str) {
        self.write_escaped(text, false);
    }

    /// Number of open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Close everything still open and return the output.
    #[must_use]
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.end_element();
        }
        self.out
    }

    fn write_tag<'a, I>(&mut self, name: &str, attributes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attributes {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.write_escaped(value, true);
            self.out.push('"');
        }
    }

    fn write_escaped(&mut self, text: &str, in_attribute: bool) {
        for ch in text.chars() {
            match self.policy.escape(ch, in_attribute) {
                Some(escaped) => self.out.push_str(&escaped),
                None => self.out.push(ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn xhtml() -> TagWriter<XhtmlEscaping> {
        TagWriter::new(XhtmlEscaping::default())
    }

    #[test]
    fn test_apostrophe_in_attribute() {
        let mut writer = xhtml();
        writer.empty_element("img", [("alt", "it's")]);

        assert_eq!(writer.finish(), r#"<img alt="it&#38;s"/>"#);
    }

    #[test]
    fn test_apostrophe_in_text_unchanged() {
        let mut writer = xhtml();
        writer.characters("it's");

        assert_eq!(writer.finish(), "it's");
    }

    #[test]
    fn test_left_brace_always_escaped() {
        let mut writer = xhtml();
        writer.start_element("p", [("title", "{{html}}")]);
        writer.characters("{{/html}}");
        writer.end_element();

        assert_eq!(
            writer.finish(),
            r#"<p title="&#123;&#123;html}}">&#123;&#123;/html}}</p>"#
        );
    }

    #[test]
    fn test_base_escaping_kept() {
        let mut writer = xhtml();
        writer.start_element("a", [("title", "\"a\" & <b>")]);
        writer.characters("1 < 2 & 3 > 2");

        assert_eq!(
            writer.finish(),
            r#"<a title="&quot;a&quot; &amp; &lt;b&gt;">1 &lt; 2 &amp; 3 &gt; 2</a>"#
        );
    }

    #[test]
    fn test_plain_xml_uses_named_apostrophe() {
        let mut writer = TagWriter::new(XmlEscaping::default());
        writer.empty_element("x", [("v", "'{")]);

        assert_eq!(writer.finish(), r#"<x v="&apos;{"/>"#);
    }

    #[test]
    fn test_non_ascii_escaping() {
        let mut writer = TagWriter::new(XhtmlEscaping::new(true));
        writer.characters("café");

        assert_eq!(writer.finish(), "caf&#233;");
    }

    #[test]
    fn test_finish_closes_open_elements() {
        let mut writer = xhtml();
        writer.start_element("div", []);
        writer.start_element("p", []);
        assert_eq!(writer.depth(), 2);

        assert_eq!(writer.finish(), "<div><p></p></div>");
    }
}
