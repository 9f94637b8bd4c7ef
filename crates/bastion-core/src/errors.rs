//! Error types for Bastion

use thiserror::Error;

/// Core errors that can occur in Bastion
#[derive(Debug, Error)]
pub enum Error {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Chain RPC transport and query errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Node unreachable at {url}")]
    Unreachable { url: String },

    #[error("Node returned error: {message}")]
    ApiError { message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Invalid signer seed: {0}")]
    InvalidSeed(String),
}

/// Result type alias for Bastion operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_wraps_into_core_error() {
        let err: Error = RpcError::Unreachable {
            url: "https://example.invalid".to_string(),
        }
        .into();
        assert!(err.to_string().contains("example.invalid"));
    }
}
