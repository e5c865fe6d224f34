//! XHTML renderer.

use std::sync::Arc;

use quill_syntax::Syntax;
use quill_xdom::{
    Block, BlockKind, PageResourceReference, Parameters, Renderer, ResourceReference,
    ResourceType, WikiModel,
};

use crate::XHTML;
use crate::writer::{TagWriter, XhtmlEscaping};

type Attributes<'a> = Vec<(&'a str, &'a str)>;

/// Renderer for `xhtml/1.0`.
///
/// Link and image URLs come from the [`WikiModel`] when one is set; without
/// one, references are written as they are.
#[derive(Clone, Default)]
pub struct XhtmlRenderer {
    wiki: Option<Arc<dyn WikiModel>>,
    escaping: XhtmlEscaping,
}

impl XhtmlRenderer {
    /// Create a renderer without wiki model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve links and images through `wiki`.
    #[must_use]
    pub fn with_wiki_model(mut self, wiki: Arc<dyn WikiModel>) -> Self {
        self.wiki = Some(wiki);
        self
    }

    /// Escape characters outside US-ASCII as numeric references.
    #[must_use]
    pub fn with_escape_non_ascii(mut self, escape_non_ascii: bool) -> Self {
        self.escaping = XhtmlEscaping::new(escape_non_ascii);
        self
    }

    /// Render the tree rooted at `xdom`.
    #[must_use]
    pub fn render_document(&self, xdom: &Block) -> String {
        let mut writer = TagWriter::new(self.escaping);
        self.render_block(xdom, &mut writer, false);
        writer.finish()
    }

    fn render_children(&self, block: &Block, writer: &mut TagWriter<XhtmlEscaping>, inline: bool) {
        for child in block.children() {
            self.render_block(child, writer, inline);
        }
    }

    fn render_container(
        &self,
        name: &str,
        block: &Block,
        writer: &mut TagWriter<XhtmlEscaping>,
        inline: bool,
    ) {
        writer.start_element(name, attributes(block.parameters()));
        self.render_children(block, writer, inline);
        writer.end_element();
    }

    fn render_block(&self, block: &Block, writer: &mut TagWriter<XhtmlEscaping>, inline: bool) {
        match block.kind() {
            BlockKind::Xdom => self.render_children(block, writer, false),
            BlockKind::Group => self.render_container("div", block, writer, false),
            BlockKind::Paragraph => self.render_container("p", block, writer, true),
            BlockKind::Word(word) => writer.characters(word),
            BlockKind::Space => writer.characters(" "),
            BlockKind::SpecialSymbol(symbol) => writer.characters(symbol.encode_utf8(&mut [0; 4])),
            BlockKind::NewLine => writer.empty_element("br", []),
            BlockKind::Element { name } => {
                if block.children().is_empty() {
                    writer.empty_element(name, attributes(block.parameters()));
                } else {
                    self.render_container(name, block, writer, true);
                }
            }
            BlockKind::Link {
                reference,
                freestanding,
            } => self.render_link(block, reference, *freestanding, writer),
            BlockKind::Image { reference } => self.render_image(block, reference, writer),
            BlockKind::List { ordered } => {
                let name = if *ordered { "ol" } else { "ul" };
                self.render_container(name, block, writer, false);
            }
            BlockKind::ListItem => self.render_container("li", block, writer, true),
            // Not executed: macros were disabled or the tree was never transformed.
            BlockKind::Macro { .. } => {}
            BlockKind::MacroMarker { inline, .. } => self.render_children(block, writer, *inline),
            BlockKind::Error {
                message,
                description,
            } => render_error(message, description, writer, inline),
        }
    }

    fn render_link(
        &self,
        block: &Block,
        reference: &ResourceReference,
        freestanding: bool,
        writer: &mut TagWriter<XhtmlEscaping>,
    ) {
        if reference.reference().is_empty()
            && let Some(anchor) = reference.parameter(PageResourceReference::ANCHOR)
        {
            let href = format!("#{anchor}");
            let mut attrs = vec![("href", href.as_str())];
            attrs.extend(attributes(block.parameters()));
            writer.start_element("a", attrs);
            if block.children().is_empty() {
                writer.characters(anchor);
            } else {
                self.render_children(block, writer, true);
            }
            writer.end_element();
            return;
        }

        let (wrapper_class, href) = match reference.resource_type() {
            ResourceType::Url | ResourceType::Mailto | ResourceType::Path => {
                ("wikiexternallink", self.link_url(reference))
            }
            _ => match &self.wiki {
                Some(wiki) if wiki.is_document_available(reference) => {
                    ("wikilink", wiki.link_url(reference))
                }
                Some(wiki) => ("wikicreatelink", wiki.document_edit_url(reference)),
                None => ("wikilink", reference.reference().to_owned()),
            },
        };

        writer.start_element("span", [("class", wrapper_class)]);
        let mut attrs = vec![("href", href.as_str())];
        if freestanding && !block.parameters().contains_key("class") {
            attrs.push(("class", "wikimodel-freestanding"));
        }
        attrs.extend(attributes(block.parameters()));
        writer.start_element("a", attrs);
        if block.children().is_empty() {
            writer.start_element("span", [("class", "wikigeneratedlinkcontent")]);
            writer.characters(reference.reference());
            writer.end_element();
        } else {
            self.render_children(block, writer, true);
        }
        writer.end_element();
        writer.end_element();
    }

    fn render_image(
        &self,
        block: &Block,
        reference: &ResourceReference,
        writer: &mut TagWriter<XhtmlEscaping>,
    ) {
        let src = match &self.wiki {
            Some(wiki) => wiki.image_url(reference, block.parameters()),
            None => reference.reference().to_owned(),
        };
        let mut attrs = vec![("src", src.as_str())];
        if !block.parameters().contains_key("alt") {
            attrs.push(("alt", reference.reference()));
        }
        attrs.extend(attributes(block.parameters()));
        writer.empty_element("img", attrs);
    }

    fn link_url(&self, reference: &ResourceReference) -> String {
        if let Some(wiki) = &self.wiki {
            return wiki.link_url(reference);
        }
        match reference.resource_type() {
            ResourceType::Mailto => format!("mailto:{}", reference.reference()),
            _ => reference.reference().to_owned(),
        }
    }
}

impl Renderer for XhtmlRenderer {
    fn syntax(&self) -> &Syntax {
        &XHTML
    }

    fn render(&self, xdom: &Block) -> String {
        self.render_document(xdom)
    }
}

fn attributes(parameters: &Parameters) -> Attributes<'_> {
    parameters
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

fn render_error(
    message: &str,
    description: &str,
    writer: &mut TagWriter<XhtmlEscaping>,
    inline: bool,
) {
    let name = if inline { "span" } else { "div" };
    writer.start_element(name, [("class", "xwikirenderingerror")]);
    writer.characters(message);
    writer.end_element();
    writer.start_element(name, [("class", "xwikirenderingerrordescription hidden")]);
    writer.characters(description);
    writer.end_element();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_xdom::StaticWikiModel;

    use super::*;

    fn link(reference: ResourceReference, label: Vec<Block>) -> Block {
        Block::new(BlockKind::Link {
            reference,
            freestanding: false,
        })
        .with_children(label)
    }

    fn render(xdom: &Block) -> String {
        XhtmlRenderer::new().render_document(xdom)
    }

    #[test]
    fn test_render_paragraph() {
        let xdom = Block::xdom(vec![Block::paragraph(vec![
            Block::word("a"),
            Block::new(BlockKind::Space),
            Block::new(BlockKind::SpecialSymbol('<')),
            Block::new(BlockKind::NewLine),
            Block::word("b"),
        ])]);

        assert_eq!(render(&xdom), "<p>a &lt;<br/>b</p>");
    }

    #[test]
    fn test_render_brace_escaped_in_text() {
        let xdom = Block::xdom(vec![Block::paragraph(vec![
            Block::new(BlockKind::SpecialSymbol('{')),
            Block::new(BlockKind::SpecialSymbol('{')),
            Block::word("html"),
        ])]);

        assert_eq!(render(&xdom), "<p>&#123;&#123;html</p>");
    }

    #[test]
    fn test_render_external_link() {
        let xdom = Block::xdom(vec![link(
            ResourceReference::parse("https://example.com/?a=1&b=2"),
            vec![Block::word("Example")],
        )]);

        assert_eq!(
            render(&xdom),
            r#"<span class="wikiexternallink"><a href="https://example.com/?a=1&amp;b=2">Example</a></span>"#
        );
    }

    #[test]
    fn test_render_document_links_through_wiki_model() {
        let wiki = Arc::new(StaticWikiModel::new("/wiki").with_document("Main"));
        let renderer = XhtmlRenderer::new().with_wiki_model(wiki);
        let xdom = Block::xdom(vec![
            link(ResourceReference::parse("Main"), Vec::new()),
            link(ResourceReference::parse("Missing"), Vec::new()),
        ]);

        assert_eq!(
            renderer.render_document(&xdom),
            concat!(
                r#"<span class="wikilink"><a href="/wiki/view/Main"><span class="wikigeneratedlinkcontent">Main</span></a></span>"#,
                r#"<span class="wikicreatelink"><a href="/wiki/edit/Missing"><span class="wikigeneratedlinkcontent">Missing</span></a></span>"#,
            )
        );
    }

    #[test]
    fn test_render_anchor_link() {
        let mut reference = ResourceReference::new("", ResourceType::Document);
        reference.set_parameter(PageResourceReference::ANCHOR, "x_footnote_1");
        let xdom = Block::xdom(vec![
            link(reference, vec![Block::word("1")]).with_parameter("class", "footnoteRef"),
        ]);

        assert_eq!(
            render(&xdom),
            r##"<a href="#x_footnote_1" class="footnoteRef">1</a>"##
        );
    }

    #[test]
    fn test_render_image_apostrophe_alt() {
        let xdom = Block::xdom(vec![
            Block::new(BlockKind::Image {
                reference: ResourceReference::parse("https://example.com/a.png"),
            })
            .with_parameter("alt", "it's"),
        ]);

        assert_eq!(
            render(&xdom),
            r#"<img src="https://example.com/a.png" alt="it&#38;s"/>"#
        );
    }

    #[test]
    fn test_render_lists_and_markers() {
        let marker = Block::new(BlockKind::MacroMarker {
            id: "m".to_owned(),
            content: None,
            inline: false,
        })
        .with_children(vec![
            Block::new(BlockKind::List { ordered: true }).with_children(vec![
                Block::new(BlockKind::ListItem).with_children(vec![Block::word("x")]),
            ]),
        ]);
        let pending = Block::macro_call("other", Parameters::new(), None, false);

        assert_eq!(
            render(&Block::xdom(vec![marker, pending])),
            "<ol><li>x</li></ol>"
        );
    }

    #[test]
    fn test_render_error_inline_and_block() {
        let error = Block::new(BlockKind::Error {
            message: "failed".to_owned(),
            description: "why".to_owned(),
        });
        let inline_marker = Block::new(BlockKind::MacroMarker {
            id: "m".to_owned(),
            content: None,
            inline: true,
        })
        .with_children(vec![error.clone()]);

        assert_eq!(
            render(&Block::xdom(vec![error])),
            r#"<div class="xwikirenderingerror">failed</div><div class="xwikirenderingerrordescription hidden">why</div>"#
        );
        assert_eq!(
            render(&Block::xdom(vec![Block::paragraph(vec![inline_marker])])),
            r#"<p><span class="xwikirenderingerror">failed</span><span class="xwikirenderingerrordescription hidden">why</span></p>"#
        );
    }
}
