//! Seams syntaxes plug into.

use quill_syntax::Syntax;

use crate::block::Block;
use crate::error::ParserError;

/// Turns source text of one syntax into a document tree.
pub trait Parser: Send + Sync {
    /// Syntax this parser understands.
    fn syntax(&self) -> &Syntax;

    /// Parse `source` into a tree rooted at an [`Xdom`](crate::BlockKind::Xdom) block.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError`] when `source` is not valid in this syntax.
    fn parse(&self, source: &str) -> Result<Block, ParserError>;
}

/// Turns a document tree into text of one syntax.
pub trait Renderer: Send + Sync {
    /// Syntax this renderer produces.
    fn syntax(&self) -> &Syntax;

    /// Render the tree rooted at `xdom`.
    fn render(&self, xdom: &Block) -> String;
}
