//! Interpret raw HTTP replies from edge functions.

use serde_json::Value;

use crate::remote::{RemoteResponse, TransportError};

pub const NON_2XX_MESSAGE: &str = "Edge Function returned a non-2xx status code";

/// Status and body of a finished HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u32,
    pub body: Vec<u8>,
}

/// 2xx replies become a [`RemoteResponse`] (which may still carry an
/// `error` field); anything else is a [`TransportError`] whose detail holds
/// the status and the body's error text for classification.
pub fn interpret_reply(reply: HttpReply) -> Result<RemoteResponse, TransportError> {
    let text = String::from_utf8_lossy(&reply.body);
    let text = text.trim();

    if (200..300).contains(&reply.status) {
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };
        return Ok(RemoteResponse::new(body));
    }

    let reason = error_text(text);
    let detail = if reason.is_empty() {
        format!("HTTP {}", reply.status)
    } else {
        format!("HTTP {}: {}", reply.status, reason)
    };
    let mut err = TransportError::new(NON_2XX_MESSAGE).with_detail(detail);
    if let Ok(status) = u16::try_from(reply.status) {
        err = err.with_status(status);
    }
    Err(err)
}

/// `error` or `message` string from a JSON body, else the raw text.
fn error_text(text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        for key in ["error", "message"] {
            if let Some(Value::String(s)) = map.get(key) {
                return s.clone();
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u32, body: &str) -> HttpReply {
        HttpReply {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn ok_json_body() {
        let r = interpret_reply(reply(200, r#"{"cards":[1,2]}"#)).unwrap();
        assert_eq!(r.into_result().unwrap(), json!({"cards": [1, 2]}));
    }

    #[test]
    fn ok_body_with_error_field_stays_a_response() {
        let r = interpret_reply(reply(200, r#"{"error":"usage limit"}"#)).unwrap();
        assert_eq!(r.into_result().unwrap_err(), "usage limit");
    }

    #[test]
    fn ok_empty_and_text_bodies() {
        let empty = interpret_reply(reply(204, "")).unwrap();
        assert_eq!(empty.into_result().unwrap(), Value::Null);
        let text = interpret_reply(reply(200, "done")).unwrap();
        assert_eq!(text.into_result().unwrap(), json!("done"));
    }

    #[test]
    fn non_2xx_uses_json_error_text() {
        let e = interpret_reply(reply(429, r#"{"error":"Rate limits exceeded"}"#)).unwrap_err();
        assert_eq!(e.status(), Some(429));
        assert_eq!(e.message(), NON_2XX_MESSAGE);
        assert_eq!(e.detail(), Some("HTTP 429: Rate limits exceeded"));
    }

    #[test]
    fn non_2xx_message_field_and_raw_text() {
        let e = interpret_reply(reply(500, r#"{"message":"boom"}"#)).unwrap_err();
        assert_eq!(e.detail(), Some("HTTP 500: boom"));
        let e = interpret_reply(reply(502, "Bad Gateway")).unwrap_err();
        assert_eq!(e.detail(), Some("HTTP 502: Bad Gateway"));
        let e = interpret_reply(reply(402, "")).unwrap_err();
        assert_eq!(e.detail(), Some("HTTP 402"));
    }
}
