//! Plain text syntax.

use quill_syntax::Syntax;

use crate::block::{Block, BlockKind};
use crate::error::ParserError;
use crate::parser::{Parser, Renderer};

/// Characters parsed as special symbols rather than word characters.
const SPECIAL_SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

static PLAIN: Syntax = Syntax::PLAIN_1_0;

/// Parser for `plain/1.0`: paragraphs separated by blank lines, lines by newlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Create a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Split a run of text into word, space and special-symbol blocks.
    ///
    /// Shared with other parsers that receive raw text.
    #[must_use]
    pub fn inline_blocks(text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut word = String::new();

        for ch in text.chars() {
            if ch == ' ' || SPECIAL_SYMBOLS.contains(ch) {
                if !word.is_empty() {
                    blocks.push(Block::word(std::mem::take(&mut word)));
                }
                blocks.push(if ch == ' ' {
                    Block::new(BlockKind::Space)
                } else {
                    Block::new(BlockKind::SpecialSymbol(ch))
                });
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            blocks.push(Block::word(word));
        }
        blocks
    }
}

impl Parser for PlainTextParser {
    fn syntax(&self) -> &Syntax {
        &PLAIN
    }

    fn parse(&self, source: &str) -> Result<Block, ParserError> {
        let mut paragraphs = Vec::new();
        let mut lines: Vec<&str> = Vec::new();

        for line in source.lines().chain(std::iter::once("")) {
            if line.trim().is_empty() {
                if !lines.is_empty() {
                    paragraphs.push(paragraph(&lines));
                    lines.clear();
                }
            } else {
                lines.push(line);
            }
        }

        Ok(Block::xdom(paragraphs))
    }
}

fn paragraph(lines: &[&str]) -> Block {
    let mut children = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            children.push(Block::new(BlockKind::NewLine));
        }
        children.extend(PlainTextParser::inline_blocks(line));
    }
    Block::paragraph(children)
}

/// Renderer for `plain/1.0`: keeps the text, drops all markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for PlainTextRenderer {
    fn syntax(&self) -> &Syntax {
        &PLAIN
    }

    fn render(&self, xdom: &Block) -> String {
        let mut out = String::new();
        render_block(xdom, &mut out);
        out.trim_end_matches('\n').to_owned()
    }
}

fn render_block(block: &Block, out: &mut String) {
    match block.kind() {
        BlockKind::Word(word) => out.push_str(word),
        BlockKind::Space => out.push(' '),
        BlockKind::SpecialSymbol(symbol) => out.push(*symbol),
        BlockKind::NewLine => out.push('\n'),
        BlockKind::Error { message, .. } => out.push_str(message),
        BlockKind::Paragraph | BlockKind::List { .. } | BlockKind::ListItem => {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            render_children(block, out);
            out.push('\n');
            if block.kind() == &BlockKind::Paragraph {
                out.push('\n');
            }
        }
        _ => render_children(block, out),
    }
}

fn render_children(block: &Block, out: &mut String) {
    for child in block.children() {
        render_block(child, out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_inline_blocks() {
        let blocks = PlainTextParser::inline_blocks("Hi, you!");
        assert_eq!(
            blocks,
            [
                Block::word("Hi"),
                Block::new(BlockKind::SpecialSymbol(',')),
                Block::new(BlockKind::Space),
                Block::word("you"),
                Block::new(BlockKind::SpecialSymbol('!')),
            ]
        );
    }

    #[test]
    fn test_parse_paragraphs() {
        let xdom = PlainTextParser.parse("first line\nsecond\n\n\nnext").unwrap();
        assert_eq!(xdom.children().len(), 2);
        assert_eq!(xdom.children()[0].text_content(), "first line\nsecond");
        assert_eq!(xdom.children()[1].text_content(), "next");
    }

    #[test]
    fn test_parse_empty() {
        let xdom = PlainTextParser.parse("").unwrap();
        assert_eq!(xdom, Block::xdom(Vec::new()));
    }

    #[test]
    fn test_render_round_trip_text() {
        let source = "Hello world.\nSecond line\n\nNew paragraph";
        let xdom = PlainTextParser.parse(source).unwrap();
        assert_eq!(PlainTextRenderer.render(&xdom), source);
    }

    #[test]
    fn test_render_skips_markup() {
        let xdom = Block::xdom(vec![Block::new(BlockKind::Element {
            name: "span".to_owned(),
        })
        .with_children(vec![Block::word("inside")])]);
        assert_eq!(PlainTextRenderer.render(&xdom), "inside");
    }
}
