//! XHTML support.
//!
//! Parsing runs quick-xml events through a [`TagStack`], a state machine that
//! turns tags into blocks through [`TagHandler`]s and hides content matched
//! by [`IgnoreElementRule`]s. Rendering writes blocks through a [`TagWriter`]
//! with [`XhtmlEscaping`].
//!
//! # Example
//!
//! ```
//! use quill_xhtml::{XhtmlParser, XhtmlRenderer};
//!
//! let parser = XhtmlParser::new().with_ignore_class("wikigeneratedlinkcontent");
//! let xdom = parser.parse_document("<p>Price: {{cost}}</p>").unwrap();
//!
//! let html = XhtmlRenderer::new().render_document(&xdom);
//! assert_eq!(html, "<p>Price: &#123;&#123;cost}}</p>");
//! ```

use quill_syntax::Syntax;

mod comment;
mod entities;
mod error;
mod handler;
mod parser;
mod renderer;
mod stack;
mod tag;
mod writer;

pub use entities::{convert_named_entities, resolve_reference};
pub use error::XhtmlParseError;
pub use handler::{
    ElementHandler, GroupHandler, ImageHandler, LinkHandler, ListHandler, NewLineHandler,
    ParagraphHandler, TagHandler, TransparentHandler, default_handlers,
};
pub use parser::XhtmlParser;
pub use renderer::XhtmlRenderer;
pub use stack::TagStack;
pub use tag::{IgnoreElementRule, TagContext};
pub use writer::{EscapePolicy, TagWriter, XhtmlEscaping, XmlEscaping};

static XHTML: Syntax = Syntax::XHTML_1_0;
