//! Classified error value and the raw failure shapes it is built from.

use thiserror::Error;

use crate::remote::TransportError;

/// Seconds a caller should wait after a rate-limit response.
pub const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 5;

/// Closed set of error kinds a remote failure can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Backend asked us to slow down (e.g. 429). The only retryable kind.
    RateLimit,
    /// AI credits or quota exhausted (e.g. 402). Needs billing/user action.
    UsageLimit,
    /// Anything else; message is surfaced as-is.
    Generic,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::RateLimit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::UsageLimit => "usage_limit",
            ErrorKind::Generic => "generic",
        }
    }
}

/// Normalized failure of a remote call.
///
/// Retryability is derived from `kind`, so a non-rate-limit error can never
/// be marked retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    retry_after_secs: Option<u64>,
}

impl ClassifiedError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RateLimit,
            message: message.into(),
            retry_after_secs: Some(RATE_LIMIT_RETRY_AFTER_SECS),
        }
    }

    pub fn usage_limited(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UsageLimit,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Generic,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Diagnostic message. For display use [`super::user_facing_message`].
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Present only for [`ErrorKind::RateLimit`].
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after_secs
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// The shapes a failed remote call can take before classification.
#[derive(Debug, Clone)]
pub enum RawFailure {
    /// Round-trip succeeded but the response body carried an `error` string.
    Payload(String),
    /// The call itself failed (connection, timeout, non-2xx status).
    Transport(TransportError),
    /// A failure with no usable text at all.
    Opaque,
}

impl From<TransportError> for RawFailure {
    fn from(e: TransportError) -> Self {
        RawFailure::Transport(e)
    }
}
