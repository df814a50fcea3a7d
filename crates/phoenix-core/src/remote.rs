//! Remote procedure seam: the hosted backend's serverless functions.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Failure of the call itself (connection, timeout, non-2xx status).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    status: Option<u16>,
    detail: Option<String>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            detail: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Descriptive text used for classification (status line, body error).
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Body of a completed round-trip. May still encode an application error.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    body: Value,
}

impl RemoteResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Split into the payload or the embedded application error.
    ///
    /// A top-level `error` string is the error. A non-null `error` of any
    /// other JSON type is rendered as JSON text; `null` counts as absent.
    pub fn into_result(self) -> Result<Value, String> {
        match self.body.get("error") {
            None | Some(Value::Null) => Ok(self.body),
            Some(Value::String(s)) => Err(s.clone()),
            Some(other) => Err(other.to_string()),
        }
    }
}

/// Performs one call of a named remote operation.
///
/// Implementations must be safe to call from many in-flight invocations at once.
pub trait RemoteCaller: Send + Sync {
    fn call(
        &self,
        operation: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<RemoteResponse, TransportError>> + Send;
}

impl<T: RemoteCaller> RemoteCaller for Arc<T> {
    fn call(
        &self,
        operation: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<RemoteResponse, TransportError>> + Send {
        (**self).call(operation, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_body_is_success() {
        let r = RemoteResponse::new(json!({"lesson": {"title": "Cells"}}));
        assert_eq!(r.into_result().unwrap()["lesson"]["title"], "Cells");
    }

    #[test]
    fn error_string_is_application_failure() {
        let r = RemoteResponse::new(json!({"error": "rate limit exceeded"}));
        assert_eq!(r.into_result().unwrap_err(), "rate limit exceeded");
    }

    #[test]
    fn null_error_is_ignored() {
        let r = RemoteResponse::new(json!({"error": null, "cards": []}));
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn structured_error_rendered_as_json() {
        let r = RemoteResponse::new(json!({"error": {"code": 402}}));
        assert_eq!(r.into_result().unwrap_err(), r#"{"code":402}"#);
    }

    #[test]
    fn non_object_body_is_success() {
        let r = RemoteResponse::new(json!(["a", "b"]));
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn transport_error_builders() {
        let e = TransportError::new("Edge Function returned a non-2xx status code")
            .with_status(402)
            .with_detail("HTTP 402: credits exhausted");
        assert_eq!(e.status(), Some(402));
        assert_eq!(e.detail(), Some("HTTP 402: credits exhausted"));
        assert_eq!(e.to_string(), "Edge Function returned a non-2xx status code");
    }
}
