//! Syntax-neutral document tree (XDOM).
//!
//! Every syntax parses into a [`Block`] tree and every renderer reads one.
//! Parents own their children exclusively, so the tree is acyclic by
//! construction; locations inside a tree are addressed with [`BlockPath`].
//!
//! # Architecture
//!
//! - [`Block`] / [`BlockKind`]: the node type, a closed set of kinds plus a
//!   string parameter map
//! - [`Axes`]: traversal axes used by searches (`child`, `descendant`, ...)
//! - [`BlockMatcher`]: composable predicates over a single block
//! - [`Parser`] / [`Renderer`]: the seams syntaxes plug into
//! - [`WikiModel`]: bridge to the content store used to resolve references
//!
//! # Example
//!
//! ```
//! use quill_xdom::{Axes, Block, BlockKind, MacroBlockMatcher};
//!
//! let mut xdom = Block::xdom(vec![Block::paragraph(vec![Block::word("Hello")])]);
//! xdom.add_child(Block::macro_call("toc", Default::default(), None, false));
//!
//! let found = xdom.first_block(&MacroBlockMatcher::new("toc"), Axes::Descendant);
//! assert!(matches!(found.map(Block::kind), Some(BlockKind::Macro { .. })));
//! ```

mod axes;
mod block;
mod error;
mod matcher;
mod parser;
mod plain;
mod reference;
mod wiki;

pub use axes::Axes;
pub use block::{Block, BlockKind, BlockPath, BlockType, Parameters};
pub use error::{ParserError, WikiModelError};
pub use matcher::{
    BlockMatcher, KindBlockMatcher, MacroBlockMatcher, MacroMarkerBlockMatcher, OrBlockMatcher,
    SameBlockMatcher,
};
pub use parser::{Parser, Renderer};
pub use plain::{PlainTextParser, PlainTextRenderer};
pub use reference::{PageResourceReference, ResourceReference, ResourceType};
pub use wiki::{StaticWikiModel, WikiModel};
