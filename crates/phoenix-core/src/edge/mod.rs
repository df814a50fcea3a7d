//! Edge function calls over HTTP.
//!
//! Uses the curl crate (libcurl) to `POST` a JSON payload to
//! `{backend}/functions/v1/{operation}`. The blocking transfer runs in
//! `spawn_blocking` so a slow function never stalls other invocations.

mod parse;

use std::time::Duration;

use serde_json::Value;

use crate::config::BackendConfig;
use crate::remote::{RemoteCaller, RemoteResponse, TransportError};

pub use parse::{interpret_reply, HttpReply};

const FUNCTIONS_PATH: &str = "functions/v1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// [`RemoteCaller`] for the hosted backend's serverless functions.
#[derive(Debug, Clone)]
pub struct EdgeFunctionCaller {
    base_url: String,
    anon_key: String,
    timeout: Duration,
}

impl EdgeFunctionCaller {
    pub fn new(cfg: &BackendConfig) -> Self {
        Self {
            base_url: cfg.url.trim_end_matches('/').to_string(),
            anon_key: cfg.anon_key.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    /// Endpoint for `operation`. Names are restricted to `[A-Za-z0-9_-]+`.
    pub fn function_url(&self, operation: &str) -> Result<String, TransportError> {
        let valid = !operation.is_empty()
            && operation
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(TransportError::new(format!(
                "invalid edge function name: {:?}",
                operation
            )));
        }
        Ok(format!("{}/{}/{}", self.base_url, FUNCTIONS_PATH, operation))
    }

    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["Content-Type: application/json".to_string()];
        if !self.anon_key.is_empty() {
            headers.push(format!("Authorization: Bearer {}", self.anon_key));
            headers.push(format!("apikey: {}", self.anon_key));
        }
        headers
    }
}

impl RemoteCaller for EdgeFunctionCaller {
    async fn call(
        &self,
        operation: &str,
        payload: &Value,
    ) -> Result<RemoteResponse, TransportError> {
        let url = self.function_url(operation)?;
        let body = serde_json::to_vec(payload)
            .map_err(|e| TransportError::new(format!("could not encode payload: {}", e)))?;
        let headers = self.headers();
        let timeout = self.timeout;

        let reply = tokio::task::spawn_blocking(move || post_json(&url, &headers, &body, timeout))
            .await
            .map_err(|e| TransportError::new(format!("edge function task failed: {}", e)))??;

        tracing::debug!(operation, status = reply.status, "edge function replied");
        interpret_reply(reply)
    }
}

/// Performs the POST on the current thread.
fn post_json(
    url: &str,
    headers: &[String],
    body: &[u8],
    timeout: Duration,
) -> Result<HttpReply, TransportError> {
    let curl_err = |e: curl::Error| TransportError::new(e.description());
    let mut response = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.post(true).map_err(curl_err)?;
    easy.post_fields_copy(body).map_err(curl_err)?;
    easy.connect_timeout(CONNECT_TIMEOUT).map_err(curl_err)?;
    easy.timeout(timeout).map_err(curl_err)?;

    let mut list = curl::easy::List::new();
    for h in headers {
        list.append(h).map_err(curl_err)?;
    }
    easy.http_headers(list).map_err(curl_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let status = easy.response_code().map_err(curl_err)?;
    Ok(HttpReply {
        status,
        body: response,
    })
}
