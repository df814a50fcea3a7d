//! User-facing notification seam.
//!
//! The invoker decides *that* and *what* to tell the user; how it is shown
//! (toast, stderr line, log record) belongs to the [`Notifier`] implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::retry::{user_facing_message, ClassifiedError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    /// A rate-limited call is about to be retried.
    pub fn retrying(delay: Duration, attempt: u32, max_retries: u32) -> Self {
        Self {
            title: "Rate limited".to_string(),
            description: format!(
                "Retrying in {}... (Attempt {}/{})",
                DelaySecs(delay),
                attempt,
                max_retries
            ),
            severity: Severity::Default,
        }
    }

    pub fn usage_limit(err: &ClassifiedError) -> Self {
        Self {
            title: "Usage limit reached".to_string(),
            description: user_facing_message(err).to_string(),
            severity: Severity::Destructive,
        }
    }

    pub fn error(err: &ClassifiedError) -> Self {
        Self {
            title: "Error".to_string(),
            description: err.message().to_string(),
            severity: Severity::Default,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Whole seconds print as `2s`, anything else with one decimal (`0.5s`).
struct DelaySecs(Duration);

impl fmt::Display for DelaySecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.subsec_millis() == 0 {
            write!(f, "{}s", self.0.as_secs())
        } else {
            write!(f, "{:.1}s", self.0.as_secs_f64())
        }
    }
}

/// Fire-and-forget sink for notifications. Must tolerate concurrent callers.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Routes notifications into the log. Used when there is no interactive surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Default => tracing::info!(title = %n.title, "{}", n.description),
            Severity::Destructive => tracing::warn!(title = %n.title, "{}", n.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_text() {
        let n = Notification::retrying(Duration::from_millis(2000), 2, 3);
        assert_eq!(n.description, "Retrying in 2s... (Attempt 2/3)");
        assert_eq!(n.severity, Severity::Default);
    }

    #[test]
    fn retry_text_fractional_seconds() {
        let n = Notification::retrying(Duration::from_millis(500), 1, 5);
        assert_eq!(n.description, "Retrying in 0.5s... (Attempt 1/5)");
    }

    #[test]
    fn usage_limit_is_destructive() {
        let err = ClassifiedError::usage_limited("AI usage limit reached.");
        let n = Notification::usage_limit(&err);
        assert_eq!(n.title, "Usage limit reached");
        assert_eq!(n.severity, Severity::Destructive);
    }

    #[test]
    fn generic_error_carries_message() {
        let n = Notification::error(&ClassifiedError::generic("lesson not found"));
        assert_eq!(n.to_string(), "Error: lesson not found");
        assert_eq!(n.severity, Severity::Default);
    }
}
