//! Error types for macro execution.

/// Failure of one macro call.
///
/// Aborts only that call's contribution. Whether the rest of the document is
/// still transformed is decided by the [`ErrorPolicy`](crate::ErrorPolicy).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MacroExecutionError {
    /// No macro is registered under the id.
    #[error("unknown macro [{0}]")]
    UnknownMacro(String),

    /// The macro was called inline but only supports standalone calls.
    #[error("the [{0}] macro is a standalone macro and it cannot be used inline")]
    InlineNotSupported(String),

    /// A parameter value is missing or invalid.
    #[error("invalid parameter [{name}] for macro [{macro_id}]: {message}")]
    InvalidParameter {
        /// Macro id.
        macro_id: String,
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// The macro failed while executing.
    #[error("failed to execute the [{macro_id}] macro: {message}")]
    Failed {
        /// Macro id.
        macro_id: String,
        /// Failure description.
        message: String,
    },
}

impl MacroExecutionError {
    /// Create an execution failure.
    pub fn failed(macro_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            macro_id: macro_id.into(),
            message: message.into(),
        }
    }
}

/// Failure of a whole transformation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransformationError {
    /// More macro executions than allowed; usually a macro producing itself.
    #[error("maximum number of macro executions ({0}) exceeded")]
    MaxExecutionsExceeded(usize),

    /// A macro failed and the policy is to abort.
    #[error("macro transformation aborted")]
    Macro(#[from] MacroExecutionError),
}
