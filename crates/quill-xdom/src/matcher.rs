//! Composable predicates over single blocks.

use crate::block::{Block, BlockKind, BlockType};

/// Predicate deciding whether a block matches.
///
/// Matchers are stateless and reusable across trees. Closures taking a
/// `&Block` and returning `bool` are matchers too.
pub trait BlockMatcher: Send + Sync {
    /// Whether `block` matches.
    fn matches(&self, block: &Block) -> bool;
}

impl<F> BlockMatcher for F
where
    F: Fn(&Block) -> bool + Send + Sync,
{
    fn matches(&self, block: &Block) -> bool {
        self(block)
    }
}

/// Matches blocks of a given type.
#[derive(Debug, Clone, Copy)]
pub struct KindBlockMatcher {
    block_type: BlockType,
}

impl KindBlockMatcher {
    /// Match blocks whose kind has the given type.
    #[must_use]
    pub fn new(block_type: BlockType) -> Self {
        Self { block_type }
    }
}

impl BlockMatcher for KindBlockMatcher {
    fn matches(&self, block: &Block) -> bool {
        block.kind().block_type() == self.block_type
    }
}

/// Matches pending macro calls, optionally restricted to one macro id.
#[derive(Debug, Clone)]
pub struct MacroBlockMatcher {
    id: Option<String>,
}

impl MacroBlockMatcher {
    /// Match pending calls of the macro `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }

    /// Match any pending macro call.
    #[must_use]
    pub fn any() -> Self {
        Self { id: None }
    }
}

impl BlockMatcher for MacroBlockMatcher {
    fn matches(&self, block: &Block) -> bool {
        match block.kind() {
            BlockKind::Macro { id, .. } => self.id.as_deref().is_none_or(|wanted| wanted == id),
            _ => false,
        }
    }
}

/// Matches executed macros (macro markers), optionally restricted to one macro id.
#[derive(Debug, Clone)]
pub struct MacroMarkerBlockMatcher {
    id: Option<String>,
}

impl MacroMarkerBlockMatcher {
    /// Match executed calls of the macro `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }

    /// Match any executed macro.
    #[must_use]
    pub fn any() -> Self {
        Self { id: None }
    }
}

impl BlockMatcher for MacroMarkerBlockMatcher {
    fn matches(&self, block: &Block) -> bool {
        match block.kind() {
            BlockKind::MacroMarker { id, .. } => {
                self.id.as_deref().is_none_or(|wanted| wanted == id)
            }
            _ => false,
        }
    }
}

/// Matches one specific block instance (identity, not equality).
#[derive(Debug, Clone, Copy)]
pub struct SameBlockMatcher<'a> {
    target: &'a Block,
}

impl<'a> SameBlockMatcher<'a> {
    /// Match only `target` itself.
    #[must_use]
    pub fn new(target: &'a Block) -> Self {
        Self { target }
    }
}

impl BlockMatcher for SameBlockMatcher<'_> {
    fn matches(&self, block: &Block) -> bool {
        std::ptr::eq(self.target, block)
    }
}

/// Matches when any of its matchers matches.
#[derive(Default)]
pub struct OrBlockMatcher<'a> {
    matchers: Vec<Box<dyn BlockMatcher + 'a>>,
}

impl<'a> OrBlockMatcher<'a> {
    /// Combine two matchers.
    #[must_use]
    pub fn new(first: impl BlockMatcher + 'a, second: impl BlockMatcher + 'a) -> Self {
        Self::default().or(first).or(second)
    }

    /// Add another alternative.
    #[must_use]
    pub fn or(mut self, matcher: impl BlockMatcher + 'a) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }
}

impl BlockMatcher for OrBlockMatcher<'_> {
    fn matches(&self, block: &Block) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(block))
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::block::Parameters;

    assert_impl_all!(OrBlockMatcher<'static>: Send, Sync);

    fn pending(id: &str) -> Block {
        Block::macro_call(id, Parameters::new(), None, false)
    }

    fn executed(id: &str) -> Block {
        Block::new(BlockKind::MacroMarker {
            id: id.to_owned(),
            content: None,
            inline: false,
        })
    }

    #[test]
    fn test_macro_matcher() {
        let matcher = MacroBlockMatcher::new("toc");
        assert!(matcher.matches(&pending("toc")));
        assert!(!matcher.matches(&pending("footnote")));
        assert!(!matcher.matches(&executed("toc")));
        assert!(MacroBlockMatcher::any().matches(&pending("footnote")));
    }

    #[test]
    fn test_macro_marker_matcher() {
        let matcher = MacroMarkerBlockMatcher::new("toc");
        assert!(matcher.matches(&executed("toc")));
        assert!(!matcher.matches(&pending("toc")));
        assert!(MacroMarkerBlockMatcher::any().matches(&executed("x")));
    }

    #[test]
    fn test_or_matcher() {
        let matcher = OrBlockMatcher::new(
            MacroBlockMatcher::new("putfootnotes"),
            MacroMarkerBlockMatcher::new("putfootnotes"),
        );
        assert!(matcher.matches(&pending("putfootnotes")));
        assert!(matcher.matches(&executed("putfootnotes")));
        assert!(!matcher.matches(&pending("footnote")));
        assert!(!OrBlockMatcher::default().matches(&pending("x")));
    }

    #[test]
    fn test_kind_matcher() {
        let matcher = KindBlockMatcher::new(BlockType::Word);
        assert!(matcher.matches(&Block::word("w")));
        assert!(!matcher.matches(&Block::paragraph(Vec::new())));
    }

    #[test]
    fn test_same_block_matcher_uses_identity() {
        let xdom = Block::xdom(vec![Block::word("w"), Block::word("w")]);
        let second = &xdom.children()[1];
        let matcher = SameBlockMatcher::new(second);

        assert!(!matcher.matches(&xdom.children()[0]));
        assert!(matcher.matches(second));
    }

    #[test]
    fn test_closure_matcher() {
        let matcher = |block: &Block| block.parameter("class") == Some("note");
        assert!(matcher.matches(&Block::paragraph(Vec::new()).with_parameter("class", "note")));
    }
}
