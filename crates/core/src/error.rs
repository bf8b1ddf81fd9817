//! Relay error model.

use thiserror::Error;

/// Result type used across the relay.
pub type RelayResult<T> = Result<T, RelayError>;

/// Failures the relay distinguishes between.
///
/// Store adapters produce the first four; the WebSocket layer reports
/// `UpgradeFailure` and `SubscriptionFailure` when a viewer connection ends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Connection or transport failure talking to either store.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The durable store rejected an insert.
    #[error("write rejected: {0}")]
    WriteError(String),

    /// A stored payload could not be decoded into a message.
    #[error("decode failed: {0}")]
    DecodeError(String),

    /// The push-connection handshake failed.
    #[error("upgrade failed: {0}")]
    UpgradeFailure(String),

    /// The push channel broke mid-stream.
    #[error("subscription broken: {0}")]
    SubscriptionFailure(String),
}

impl RelayError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    pub fn upgrade(msg: impl Into<String>) -> Self {
        Self::UpgradeFailure(msg.into())
    }

    pub fn subscription(msg: impl Into<String>) -> Self {
        Self::SubscriptionFailure(msg.into())
    }

    /// Stable machine-readable code, used in JSON error bodies and log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::WriteError(_) => "write_error",
            Self::DecodeError(_) => "decode_error",
            Self::UpgradeFailure(_) => "upgrade_failure",
            Self::SubscriptionFailure(_) => "subscription_failure",
        }
    }
}
