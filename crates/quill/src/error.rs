//! CLI error types.

use quill_config::ConfigError;
use quill_engine::EngineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Document {
        path: String,
        #[source]
        source: EngineError,
    },

    #[error("{0}")]
    Validation(String),
}
