//! Error types for parsing and wiki model access.

/// Error returned by a [`Parser`](crate::Parser).
///
/// Wraps the syntax-specific failure unchanged.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse {syntax} content")]
pub struct ParserError {
    /// Composite key of the syntax being parsed.
    pub syntax: String,
    /// Underlying syntax-specific error.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ParserError {
    /// Wrap a syntax-specific error.
    pub fn new(
        syntax: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            syntax: syntax.into(),
            source: Box::new(source),
        }
    }
}

/// Error returned by a [`WikiModel`](crate::WikiModel).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum WikiModelError {
    /// The wiki model doesn't support the operation.
    #[error("not implemented")]
    NotImplemented,

    /// The referenced resource doesn't exist.
    #[error("resource not found: {0}")]
    NotFound(String),
}
