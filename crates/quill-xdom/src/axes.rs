//! Traversal axes and searches over the tree.

use std::ops::ControlFlow;

use crate::block::{Block, BlockPath};
use crate::matcher::BlockMatcher;

/// Direction of a search relative to a starting block (XPath-style axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axes {
    /// The starting block itself.
    Current,
    /// The direct parent.
    Parent,
    /// All ancestors, nearest first.
    Ancestor,
    /// The starting block, then its ancestors nearest first.
    AncestorOrSelf,
    /// Direct children, left to right.
    Child,
    /// All descendants in pre-order.
    Descendant,
    /// The starting block, then its descendants in pre-order.
    DescendantOrSelf,
    /// Later siblings, nearest first.
    FollowingSibling,
    /// Earlier siblings, nearest first.
    PrecedingSibling,
}

impl Block {
    /// First block matching `matcher` along `axis`, starting at this block.
    ///
    /// Only axes that stay within this block's subtree can find anything
    /// (`Current`, `Child`, `Descendant`, `DescendantOrSelf`); the others need
    /// a position inside an enclosing tree, see [`find_first_from`](Self::find_first_from).
    /// For `Descendant`, "first" means earliest in document order.
    #[must_use]
    pub fn first_block(&self, matcher: &dyn BlockMatcher, axis: Axes) -> Option<&Block> {
        let path = self.find_first_from(&BlockPath::root(), matcher, axis)?;
        self.get(&path)
    }

    /// All blocks matching `matcher` along `axis` from this block, in axis order.
    #[must_use]
    pub fn blocks(&self, matcher: &dyn BlockMatcher, axis: Axes) -> Vec<&Block> {
        self.find_all_from(&BlockPath::root(), matcher, axis)
            .iter()
            .filter_map(|path| self.get(path))
            .collect()
    }

    /// Path of the first block matching `matcher` along `axis`, starting at the
    /// block at `from` (relative to this block, which acts as the root).
    #[must_use]
    pub fn find_first_from(
        &self,
        from: &BlockPath,
        matcher: &dyn BlockMatcher,
        axis: Axes,
    ) -> Option<BlockPath> {
        let mut found = None;
        let _ = self.walk_axis(from, axis, &mut |path, block| {
            if matcher.matches(block) {
                found = Some(path.clone());
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Paths of all blocks matching `matcher` along `axis` from `from`.
    #[must_use]
    pub fn find_all_from(
        &self,
        from: &BlockPath,
        matcher: &dyn BlockMatcher,
        axis: Axes,
    ) -> Vec<BlockPath> {
        let mut found = Vec::new();
        let _ = self.walk_axis(from, axis, &mut |path, block| {
            if matcher.matches(block) {
                found.push(path.clone());
            }
            ControlFlow::Continue(())
        });
        found
    }

    fn walk_axis<'a>(
        &'a self,
        from: &BlockPath,
        axis: Axes,
        visit: &mut dyn FnMut(&BlockPath, &'a Block) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some(start) = self.get(from) else {
            return ControlFlow::Continue(());
        };

        match axis {
            Axes::Current => visit(from, start),
            Axes::Parent => match from.parent() {
                Some(parent) => self.visit_at(&parent, visit),
                None => ControlFlow::Continue(()),
            },
            Axes::Ancestor | Axes::AncestorOrSelf => {
                if axis == Axes::AncestorOrSelf {
                    visit(from, start)?;
                }
                let mut current = from.parent();
                while let Some(path) = current {
                    self.visit_at(&path, visit)?;
                    current = path.parent();
                }
                ControlFlow::Continue(())
            }
            Axes::Child => {
                for (index, child) in start.children().iter().enumerate() {
                    visit(&from.child(index), child)?;
                }
                ControlFlow::Continue(())
            }
            Axes::Descendant => walk_descendants(start, from, visit),
            Axes::DescendantOrSelf => {
                visit(from, start)?;
                walk_descendants(start, from, visit)
            }
            Axes::FollowingSibling | Axes::PrecedingSibling => {
                let Some((parent_path, index)) = from.split_last() else {
                    return ControlFlow::Continue(());
                };
                let Some(parent) = self.get(&parent_path) else {
                    return ControlFlow::Continue(());
                };
                let siblings = parent.children();
                if axis == Axes::FollowingSibling {
                    for (i, sibling) in siblings.iter().enumerate().skip(index + 1) {
                        visit(&parent_path.child(i), sibling)?;
                    }
                } else {
                    for (i, sibling) in siblings.iter().enumerate().take(index).rev() {
                        visit(&parent_path.child(i), sibling)?;
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }

    fn visit_at<'a>(
        &'a self,
        path: &BlockPath,
        visit: &mut dyn FnMut(&BlockPath, &'a Block) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        match self.get(path) {
            Some(block) => visit(path, block),
            None => ControlFlow::Continue(()),
        }
    }
}

/// Pre-order walk: a block before its children, siblings left to right.
fn walk_descendants<'a>(
    block: &'a Block,
    path: &BlockPath,
    visit: &mut dyn FnMut(&BlockPath, &'a Block) -> ControlFlow<()>,
) -> ControlFlow<()> {
    for (index, child) in block.children().iter().enumerate() {
        let child_path = path.child(index);
        visit(&child_path, child)?;
        walk_descendants(child, &child_path, visit)?;
    }
    ControlFlow::Continue(())
}
