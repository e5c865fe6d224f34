//! Macro transformation over the document tree.
//!
//! A macro is a named tree-rewriting unit. Parsers leave pending
//! [`Macro`](quill_xdom::BlockKind::Macro) placeholders in the tree; the
//! [`MacroTransformation`] executes them and puts each result in place of its
//! placeholder, wrapped in a [`MacroMarker`](quill_xdom::BlockKind::MacroMarker)
//! so later passes can tell an executed call from a pending one.
//!
//! # Ordering
//!
//! Pending calls run one at a time, lowest [`priority`](Macro::priority) first;
//! ties go to the call that comes first in document order. The tree is
//! rescanned after each execution, so placeholders produced by a macro are
//! picked up as well.
//!
//! # Example
//!
//! ```
//! use quill_macro::{FootnoteMacro, MacroTransformation, PutFootnotesMacro, TransformationConfig};
//! use quill_xdom::{Block, Parameters};
//!
//! let transformation = MacroTransformation::new(TransformationConfig::default())
//!     .with_macro(FootnoteMacro::new())
//!     .with_macro(PutFootnotesMacro::new());
//!
//! let mut xdom = Block::xdom(vec![Block::paragraph(vec![
//!     Block::word("Claim"),
//!     Block::macro_call("footnote", Parameters::new(), Some("Source".to_owned()), true),
//! ])]);
//!
//! let report = transformation.transform(&mut xdom, None).unwrap();
//! assert_eq!(report.executions, 2);
//! ```

mod context;
mod descriptor;
mod error;
mod footnote;
mod handler;
mod transformation;

pub use context::MacroTransformationContext;
pub use descriptor::{MacroCategory, MacroDescriptor};
pub use error::{MacroExecutionError, TransformationError};
pub use footnote::{FootnoteMacro, PutFootnotesMacro};
pub use handler::{DEFAULT_PRIORITY, Macro, MacroParameters};
pub use transformation::{
    ErrorPolicy, MacroTransformation, TransformationConfig, TransformationReport,
};
