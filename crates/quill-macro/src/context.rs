//! Per-call execution context.

use quill_syntax::Syntax;
use quill_xdom::{Block, BlockPath};

/// What a macro sees while it executes.
///
/// The context borrows the document exclusively for the duration of one call,
/// so no other macro can touch the tree at the same time.
pub struct MacroTransformationContext<'a> {
    xdom: &'a mut Block,
    current: BlockPath,
    inline: bool,
    syntax: Option<&'a Syntax>,
}

impl<'a> MacroTransformationContext<'a> {
    /// Create a context for the call at `current`.
    pub fn new(
        xdom: &'a mut Block,
        current: BlockPath,
        inline: bool,
        syntax: Option<&'a Syntax>,
    ) -> Self {
        Self {
            xdom,
            current,
            inline,
            syntax,
        }
    }

    /// The document root.
    #[must_use]
    pub fn xdom(&self) -> &Block {
        self.xdom
    }

    /// The document root, for macros that edit outside their own position.
    pub fn xdom_mut(&mut self) -> &mut Block {
        self.xdom
    }

    /// Path of the block standing for the executing call.
    #[must_use]
    pub fn current_path(&self) -> &BlockPath {
        &self.current
    }

    /// The block standing for the executing call.
    #[must_use]
    pub fn current_block(&self) -> Option<&Block> {
        self.xdom.get(&self.current)
    }

    /// Whether the call sits in inline content.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Syntax the document was parsed from, if known.
    #[must_use]
    pub fn syntax(&self) -> Option<&Syntax> {
        self.syntax
    }
}
