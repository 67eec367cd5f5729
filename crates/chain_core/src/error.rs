use std::path::PathBuf;

/// Errors raised while assembling a chain. Dispatch itself never fails: an
/// unresolved request is reported as `false`, not as an error.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("chain configuration has no tiers; at least one handler is required")]
    EmptyChain,
    #[error("failed to read chain configuration {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid chain configuration")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = ChainError> = std::result::Result<T, E>;
