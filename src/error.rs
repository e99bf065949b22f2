use std::path::PathBuf;

use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Malformed or mismatched caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Composition operator preconditions were violated.
    #[error("composition error: {0}")]
    Composition(String),

    #[error("rendering gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("{operation} timed out after {timeout_ms} ms")]
    RenderTimeout { operation: String, timeout_ms: u128 },

    /// The external tool ran but did not produce a usable result.
    #[error("render failed: {0}")]
    RenderFailure(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("export failed writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChartError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn composition(message: impl Into<String>) -> Self {
        Self::Composition(message.into())
    }
}
