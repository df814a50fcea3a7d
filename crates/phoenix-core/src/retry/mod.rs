//! Error classification and backoff policy.
//!
//! Every failure of a remote call, whether the transport broke or the
//! response body carried an `error` string, is normalized into a
//! [`ClassifiedError`]. Only rate-limit errors are retried; the policy here
//! decides whether and after how long.

mod classify;
mod error;
mod policy;

pub use classify::{
    classify, user_facing_message, RATE_LIMIT_MESSAGE, UNEXPECTED_ERROR_MESSAGE,
    USAGE_LIMIT_MESSAGE,
};
pub use error::{ClassifiedError, ErrorKind, RawFailure};
pub use policy::{retry_delay, RetryDecision, RetryPolicy, MAX_RETRY_DELAY};
