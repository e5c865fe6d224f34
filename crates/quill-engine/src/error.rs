//! Error types for the rendering pipeline.

use quill_macro::TransformationError;
use quill_syntax::{ContributorLookupError, ParseError};
use quill_xdom::ParserError;

/// Error returned when a conversion fails.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Syntax id unknown or malformed.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// Syntax registered but no parser available for it.
    #[error("no parser for syntax [{0}]")]
    NoParser(String),

    /// Syntax registered but no renderer available for it.
    #[error("no renderer for syntax [{0}]")]
    NoRenderer(String),

    /// Source could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParserError),

    /// Macro transformation failed.
    #[error(transparent)]
    Transformation(#[from] TransformationError),

    /// A built-in syntax contributor could not be activated.
    #[error(transparent)]
    Contributor(#[from] ContributorLookupError),
}
