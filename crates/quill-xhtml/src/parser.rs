//! XHTML parser: quick-xml events fed through a [`TagStack`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quill_syntax::Syntax;
use quill_xdom::{Block, Parser, ParserError};
use regex::Regex;

use crate::XHTML;
use crate::comment::MacroComment;
use crate::entities::{convert_named_entities, resolve_reference};
use crate::error::XhtmlParseError;
use crate::stack::TagStack;
use crate::tag::IgnoreElementRule;

/// XML declaration and doctype, which cannot appear inside the wrapper element.
static PROLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:<\?xml[^>]*\?>)?\s*(?:<!DOCTYPE[^>]*>)?").expect("invalid prolog regex")
});

/// Wrapper making fragments with several top-level elements well-formed.
const WRAPPER: &str = "quill-fragment";

/// Parser for `xhtml/1.0`.
///
/// Accepts whole documents and fragments. `startmacro` / `stopmacro` comment
/// pairs become pending macro calls, dropping the output between them.
/// Elements carrying one of the ignore classes are left out of the tree with
/// everything inside them; two empty elements carrying the class leave out
/// everything between them.
#[derive(Debug, Clone, Default)]
pub struct XhtmlParser {
    ignore_classes: Vec<String>,
}

impl XhtmlParser {
    /// Create a parser without ignore classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore elements with CSS class `class`.
    #[must_use]
    pub fn with_ignore_class(mut self, class: impl Into<String>) -> Self {
        self.ignore_classes.push(class.into());
        self
    }

    /// Ignore elements with any of `classes`.
    #[must_use]
    pub fn with_ignore_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_classes
            .extend(classes.into_iter().map(Into::into));
        self
    }

    /// Classes whose elements are ignored.
    #[must_use]
    pub fn ignore_classes(&self) -> &[String] {
        &self.ignore_classes
    }

    /// A tag stack with one ignore rule per ignore class.
    #[must_use]
    pub fn tag_stack(&self) -> TagStack {
        self.ignore_classes
            .iter()
            .fold(TagStack::new(), |stack, class| {
                stack.with_rule(IgnoreElementRule::for_class(class.clone()))
            })
    }

    /// Parse XHTML into a document tree.
    ///
    /// # Errors
    ///
    /// Returns [`XhtmlParseError`] for malformed XML, undecodable names or
    /// attributes, and close tags that do not match the open tag.
    pub fn parse_document(&self, source: &str) -> Result<Block, XhtmlParseError> {
        let source = convert_named_entities(source);
        let body = PROLOG.replace(&source, "");
        let wrapped = format!("<{WRAPPER}>{body}</{WRAPPER}>");

        let mut reader = Reader::from_str(&wrapped);
        reader.config_mut().trim_text(false);

        let mut stack = self.tag_stack();
        let mut buf = Vec::new();
        let mut depth = 0_usize;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    depth += 1;
                    if depth > 1 {
                        let name = decode_name(&reader, e.name().as_ref())?;
                        let attributes = decode_attributes(&reader, &e)?;
                        stack.begin_element(&name, attributes);
                    }
                }
                Event::End(e) => {
                    if depth > 1 {
                        let name = decode_name(&reader, e.name().as_ref())?;
                        stack.end_element(&name)?;
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Empty(e) => {
                    let name = decode_name(&reader, e.name().as_ref())?;
                    let attributes = decode_attributes(&reader, &e)?;
                    stack.empty_element(&name, attributes);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    stack.characters(&text);
                }
                Event::GeneralRef(e) => {
                    let name = reader.decoder().decode(&e)?;
                    stack.characters(&resolve_reference(&name));
                }
                Event::CData(e) => {
                    stack.characters(&String::from_utf8_lossy(&e));
                }
                Event::Comment(e) => {
                    let text = reader.decoder().decode(&e)?;
                    match MacroComment::parse(&text) {
                        Some(MacroComment::Start {
                            id,
                            parameters,
                            content,
                        }) => stack.begin_macro(&id, parameters, content),
                        Some(MacroComment::Stop) => stack.end_macro(),
                        None => {}
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }

        Ok(stack.finish())
    }
}

impl Parser for XhtmlParser {
    fn syntax(&self) -> &Syntax {
        &XHTML
    }

    fn parse(&self, source: &str) -> Result<Block, ParserError> {
        self.parse_document(source)
            .map_err(|err| ParserError::new(XHTML.to_id_string(), err))
    }
}

fn decode_name<R>(reader: &Reader<R>, name: &[u8]) -> Result<String, XhtmlParseError> {
    Ok(reader.decoder().decode(name)?.into_owned())
}

fn decode_attributes<R>(
    reader: &Reader<R>,
    e: &BytesStart,
) -> Result<BTreeMap<String, String>, XhtmlParseError> {
    let mut attributes = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        if key.starts_with("xmlns") {
            continue;
        }
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}
