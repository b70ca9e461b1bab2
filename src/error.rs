//! Error types for the account inspector

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for decoding, curve evaluation and scanning
#[derive(Error, Debug)]
pub enum Error {
    // Decoding errors
    #[error("Malformed {layout} record: need at least {required} bytes, got {actual}")]
    MalformedRecord {
        layout: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    #[error("Invalid account data encoding: {0}")]
    InvalidEncoding(String),

    // Curve errors
    #[error("Curve domain error: {0}")]
    Domain(String),

    #[error("Curve arithmetic overflow")]
    MathOverflow,

    #[error("Token supply is not enough to fulfill the request")]
    InsufficientTokenSupply,

    // RPC errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("RPC timeout after {0}ms")]
    RpcTimeout(u64),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Output errors
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Check if this error is retryable (transient)
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Rpc(_) | Error::RpcTimeout(_))
    }

    /// Check if this error means the account data itself is unusable
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Error::MalformedRecord { .. } | Error::InvalidEncoding(_)
        )
    }
}

// Conversion from solana_client errors
impl From<solana_client::client_error::ClientError> for Error {
    fn from(e: solana_client::client_error::ClientError) -> Self {
        Error::Rpc(e.to_string())
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
