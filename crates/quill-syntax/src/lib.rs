//! Syntax identifiers and the live syntax registry.
//!
//! A [`Syntax`] names a markup dialect and its version. It is identified
//! externally by the composite key `"<type-id>/<version>"` (e.g. `xwiki/2.1`),
//! which is the only durable identifier content may reference.
//!
//! # Architecture
//!
//! - [`SyntaxRegistry`]: shared, thread-safe map of composite key to [`Syntax`].
//!   Readers get point-in-time snapshots; batch writes are atomic.
//! - [`SyntaxContributor`]: the plugin entry point returning the syntaxes a
//!   plugin brings.
//! - [`ContributorBridge`]: reacts to plugin activation/deactivation, registers
//!   what a contributor returned and remembers it so removal is exact.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_syntax::{
//!     ContributorBridge, ContributorDescriptor, Syntax, SyntaxRegistry, SyntaxType,
//! };
//!
//! let registry = Arc::new(SyntaxRegistry::new());
//! let bridge = ContributorBridge::new(Arc::clone(&registry));
//!
//! let contributor = || vec![Syntax::new(SyntaxType::new("myid", "My Id"), "1.0")];
//! bridge.on_contributor_activated(&ContributorDescriptor::new("my"), &contributor);
//! assert!(registry.get_syntax("myid/1.0").is_some());
//!
//! bridge.on_contributor_deactivated(&ContributorDescriptor::new("my"));
//! assert!(registry.get_syntax("myid/1.0").is_none());
//! ```

mod bridge;
mod builtin;
mod contributor;
mod error;
mod registry;
mod syntax;

pub use bridge::ContributorBridge;
pub use builtin::{PlainSyntaxContributor, XWikiSyntaxContributor, XhtmlSyntaxContributor};
pub use contributor::{
    ContributorDescriptor, ContributorLookup, StaticContributors, SyntaxContributor,
};
pub use error::{ContributorLookupError, ParseError};
pub use registry::SyntaxRegistry;
pub use syntax::{Syntax, SyntaxType};
