//! Map raw remote failures into classified errors.

use super::error::{ClassifiedError, ErrorKind, RawFailure};

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment before trying again.";
pub const USAGE_LIMIT_MESSAGE: &str =
    "AI usage limit reached. Please try again later or contact support.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

const RATE_LIMIT_MARKERS: [&str; 2] = ["rate limit", "429"];
const USAGE_LIMIT_MARKERS: [&str; 3] = ["usage limit", "credits exhausted", "402"];

/// Classify a raw failure. Total and pure.
///
/// The descriptive string (payload `error`, or the transport error's detail)
/// is checked for rate-limit markers first, then usage-limit markers; anything
/// else is `Generic`. Matching is case-sensitive.
pub fn classify(raw: &RawFailure) -> ClassifiedError {
    if let Some(text) = descriptive_text(raw) {
        if contains_any(text, &RATE_LIMIT_MARKERS) {
            return ClassifiedError::rate_limited(RATE_LIMIT_MESSAGE);
        }
        if contains_any(text, &USAGE_LIMIT_MARKERS) {
            return ClassifiedError::usage_limited(USAGE_LIMIT_MESSAGE);
        }
        return ClassifiedError::generic(text);
    }

    match raw {
        RawFailure::Transport(e) if !e.message().trim().is_empty() => {
            ClassifiedError::generic(e.message())
        }
        _ => ClassifiedError::generic(UNEXPECTED_ERROR_MESSAGE),
    }
}

/// Softened phrasing for showing an error to a student. Display only.
pub fn user_facing_message(err: &ClassifiedError) -> &'static str {
    match err.kind() {
        ErrorKind::RateLimit => {
            "We're getting a lot of requests right now. Give it a few seconds and try again."
        }
        ErrorKind::UsageLimit => {
            "You've reached your AI usage limit for now. Please try again later or contact support."
        }
        ErrorKind::Generic => "Something went wrong. Please try again.",
    }
}

fn descriptive_text(raw: &RawFailure) -> Option<&str> {
    let text = match raw {
        RawFailure::Payload(s) => Some(s.as_str()),
        RawFailure::Transport(e) => e.detail(),
        RawFailure::Opaque => None,
    };
    text.filter(|s| !s.trim().is_empty())
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::TransportError;

    fn payload(s: &str) -> ClassifiedError {
        classify(&RawFailure::Payload(s.to_string()))
    }

    #[test]
    fn rate_limit_markers() {
        for s in ["rate limit exceeded", "HTTP 429: slow down"] {
            let e = payload(s);
            assert_eq!(e.kind(), ErrorKind::RateLimit, "{s}");
            assert!(e.is_retryable());
            assert_eq!(e.retry_after_secs(), Some(5));
            assert_eq!(e.message(), RATE_LIMIT_MESSAGE);
        }
    }

    #[test]
    fn usage_limit_markers() {
        for s in ["usage limit hit", "credits exhausted for workspace", "402 Payment Required"] {
            let e = payload(s);
            assert_eq!(e.kind(), ErrorKind::UsageLimit, "{s}");
            assert!(!e.is_retryable());
            assert!(e.retry_after_secs().is_none());
            assert_eq!(e.message(), USAGE_LIMIT_MESSAGE);
        }
    }

    #[test]
    fn rate_limit_takes_precedence_over_usage_limit() {
        let e = payload("upstream said 402 then 429");
        assert_eq!(e.kind(), ErrorKind::RateLimit);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let e = payload("Rate Limit reached");
        assert_eq!(e.kind(), ErrorKind::Generic);
        assert_eq!(e.message(), "Rate Limit reached");
    }

    #[test]
    fn unmatched_payload_is_generic_with_original_text() {
        let e = payload("lesson not found");
        assert_eq!(e.kind(), ErrorKind::Generic);
        assert_eq!(e.message(), "lesson not found");
        assert!(!e.is_retryable());
    }

    #[test]
    fn transport_detail_is_checked_for_markers() {
        let e = classify(&RawFailure::Transport(
            TransportError::new("Edge Function returned a non-2xx status code")
                .with_status(429)
                .with_detail("HTTP 429: Too Many Requests"),
        ));
        assert_eq!(e.kind(), ErrorKind::RateLimit);
    }

    #[test]
    fn transport_without_detail_uses_own_message() {
        let e = classify(&RawFailure::Transport(TransportError::new(
            "Couldn't connect to server",
        )));
        assert_eq!(e.kind(), ErrorKind::Generic);
        assert_eq!(e.message(), "Couldn't connect to server");
    }

    #[test]
    fn own_message_is_not_pattern_checked() {
        let e = classify(&RawFailure::Transport(TransportError::new("got 429")));
        assert_eq!(e.kind(), ErrorKind::Generic);
        assert_eq!(e.message(), "got 429");
    }

    #[test]
    fn no_text_falls_back_to_unexpected() {
        for raw in [
            RawFailure::Opaque,
            RawFailure::Payload("   ".to_string()),
            RawFailure::Transport(TransportError::new("")),
        ] {
            let e = classify(&raw);
            assert_eq!(e.kind(), ErrorKind::Generic);
            assert_eq!(e.message(), UNEXPECTED_ERROR_MESSAGE);
        }
    }

    #[test]
    fn only_rate_limit_is_ever_retryable() {
        let inputs = ["429", "402", "usage limit", "rate limit", "", "boom", "credits exhausted"];
        for s in inputs {
            let e = payload(s);
            assert_eq!(e.is_retryable(), e.kind() == ErrorKind::RateLimit, "{s}");
        }
    }

    #[test]
    fn user_facing_message_differs_from_diagnostic() {
        let e = payload("database exploded");
        assert_ne!(user_facing_message(&e), e.message());
        let usage = payload("credits exhausted");
        assert!(user_facing_message(&usage).contains("usage limit"));
    }
}
