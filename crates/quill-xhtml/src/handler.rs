//! Tag handlers: how each XHTML tag becomes a block.

use quill_xdom::{
    Block, BlockKind, PageResourceReference, Parameters, ResourceReference, ResourceType,
};

use crate::tag::TagContext;

/// Classes of the wrappers the renderer puts around links.
const LINK_WRAPPER_CLASSES: &[&str] = &["wikilink", "wikicreatelink", "wikiexternallink"];

/// Turns an open tag into the block that will hold its content.
pub trait TagHandler: Send + Sync {
    /// Tag names handled, lowercase.
    fn names(&self) -> &[&str];

    /// Block opened for `context`, or `None` when the tag is transparent and
    /// its content belongs to the enclosing block.
    fn open(&self, context: &TagContext) -> Option<Block>;
}

fn parameters_except(context: &TagContext, skip: &[&str]) -> Parameters {
    context
        .attributes()
        .iter()
        .filter(|(name, _)| !skip.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// `<p>`
pub struct ParagraphHandler;

impl TagHandler for ParagraphHandler {
    fn names(&self) -> &[&str] {
        &["p"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        Some(Block::new(BlockKind::Paragraph).with_parameters(parameters_except(context, &[])))
    }
}

/// `<div>`
pub struct GroupHandler;

impl TagHandler for GroupHandler {
    fn names(&self) -> &[&str] {
        &["div"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        Some(Block::new(BlockKind::Group).with_parameters(parameters_except(context, &[])))
    }
}

/// `<br>`
pub struct NewLineHandler;

impl TagHandler for NewLineHandler {
    fn names(&self) -> &[&str] {
        &["br"]
    }

    fn open(&self, _context: &TagContext) -> Option<Block> {
        Some(Block::new(BlockKind::NewLine))
    }
}

/// `<a href>`; anchors without `href` stay generic elements.
pub struct LinkHandler;

impl TagHandler for LinkHandler {
    fn names(&self) -> &[&str] {
        &["a"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        let Some(href) = context.attribute("href") else {
            return ElementHandler.open(context);
        };
        let freestanding = context.has_class("wikimodel-freestanding");
        Some(
            Block::new(BlockKind::Link {
                reference: link_reference(href),
                freestanding,
            })
            .with_parameters(parameters_except(context, &["href"])),
        )
    }
}

/// In-page anchors (`#name`) point to no document, only to an anchor.
fn link_reference(href: &str) -> ResourceReference {
    match href.strip_prefix('#') {
        Some(anchor) => {
            let mut reference = ResourceReference::new("", ResourceType::Document);
            reference.set_parameter(PageResourceReference::ANCHOR, anchor);
            reference
        }
        None => ResourceReference::parse(href),
    }
}

/// `<img src>`
pub struct ImageHandler;

impl TagHandler for ImageHandler {
    fn names(&self) -> &[&str] {
        &["img"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        let Some(src) = context.attribute("src") else {
            return ElementHandler.open(context);
        };
        Some(
            Block::new(BlockKind::Image {
                reference: ResourceReference::parse(src),
            })
            .with_parameters(parameters_except(context, &["src"])),
        )
    }
}

/// `<ul>`, `<ol>` and `<li>`
pub struct ListHandler;

impl TagHandler for ListHandler {
    fn names(&self) -> &[&str] {
        &["ul", "ol", "li"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        let kind = match context.name() {
            "li" => BlockKind::ListItem,
            name => BlockKind::List {
                ordered: name == "ol",
            },
        };
        Some(Block::new(kind).with_parameters(parameters_except(context, &[])))
    }
}

/// Document scaffolding and link wrappers, whose content goes to the parent.
pub struct TransparentHandler;

impl TagHandler for TransparentHandler {
    fn names(&self) -> &[&str] {
        &["html", "body", "span"]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        if context.name() == "span"
            && !LINK_WRAPPER_CLASSES
                .iter()
                .any(|class| context.has_class(class))
        {
            return ElementHandler.open(context);
        }
        None
    }
}

/// Any other tag, kept as a generic element.
pub struct ElementHandler;

impl TagHandler for ElementHandler {
    fn names(&self) -> &[&str] {
        &[]
    }

    fn open(&self, context: &TagContext) -> Option<Block> {
        Some(
            Block::new(BlockKind::Element {
                name: context.name().to_owned(),
            })
            .with_parameters(parameters_except(context, &[])),
        )
    }
}

/// Handlers for the tags with a dedicated block kind.
#[must_use]
pub fn default_handlers() -> Vec<Box<dyn TagHandler>> {
    vec![
        Box::new(ParagraphHandler),
        Box::new(GroupHandler),
        Box::new(NewLineHandler),
        Box::new(LinkHandler),
        Box::new(ImageHandler),
        Box::new(ListHandler),
        Box::new(TransparentHandler),
    ]
}
