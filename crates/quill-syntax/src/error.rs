//! Error types for syntax resolution and contributor lookup.

/// Error raised when a syntax identifier cannot be resolved or parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// No syntax is registered under the given composite key.
    #[error("unknown syntax [{0}]")]
    UnknownSyntax(String),

    /// The identifier is not of the form `<type-id>/<version>`.
    #[error("invalid syntax id [{0}]: expected <type>/<version>")]
    InvalidSyntaxId(String),
}

/// Internal-consistency fault: the host reported a contributor as registered
/// but could not hand back a live instance for it.
///
/// This is not a data problem. It means the hosting container broke its
/// contract and should be surfaced loudly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to look up syntax contributor for role hint [{role_hint}]")]
pub struct ContributorLookupError {
    /// Role hint of the descriptor that could not be resolved.
    pub role_hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_syntax_message_carries_id() {
        let err = ParseError::UnknownSyntax("foo/1.0".to_owned());
        assert_eq!(err.to_string(), "unknown syntax [foo/1.0]");
    }

    #[test]
    fn test_lookup_error_message() {
        let err = ContributorLookupError {
            role_hint: "xwiki/2.1".to_owned(),
        };
        assert!(err.to_string().contains("[xwiki/2.1]"));
    }
}
