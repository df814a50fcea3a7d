//! Retrying invoker for named remote operations.
//!
//! One call to [`RetryingInvoker::invoke`] drives a single logical remote call
//! to a terminal result. Rate-limit failures are retried with capped
//! exponential backoff; usage-limit and generic failures surface immediately.
//! Each invocation owns its own [`InvocationState`], so concurrent invocations
//! never touch each other's counters.

mod state;
mod status;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::notify::{Notification, Notifier};
use crate::remote::RemoteCaller;
use crate::retry::{classify, ClassifiedError, ErrorKind, RawFailure, RetryDecision, RetryPolicy};

pub use state::{InvocationState, Outcome, Phase};
use status::InvokerStatus;

type RetryObserver = Arc<dyn Fn(u32, Duration) + Send + Sync>;

/// Per-call settings. Defaults: 3 retries, 1000 ms base delay, no observer.
#[derive(Clone, Default)]
pub struct InvokeOptions {
    pub policy: RetryPolicy,
    on_retry: Option<RetryObserver>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.policy.max_retries = n;
        self
    }

    pub fn base_delay(mut self, d: Duration) -> Self {
        self.policy.base_delay = d;
        self
    }

    /// Called with `(attempt_number, delay)` once per retry, before the wait.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for InvokeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeOptions")
            .field("policy", &self.policy)
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

/// Calls remote operations through `C`, reporting to the user through `N`.
pub struct RetryingInvoker<C, N> {
    caller: C,
    notifier: N,
    status: InvokerStatus,
}

impl<C: RemoteCaller, N: Notifier> RetryingInvoker<C, N> {
    pub fn new(caller: C, notifier: N) -> Self {
        Self {
            caller,
            notifier,
            status: InvokerStatus::default(),
        }
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// True while any attempt of an invocation is outstanding.
    pub fn loading(&self) -> bool {
        self.status.loading()
    }

    /// Retries taken by the current or last invocation.
    pub fn retry_count(&self) -> u32 {
        self.status.retry_count()
    }

    /// Terminal error of the last invocation, if it failed.
    pub fn error(&self) -> Option<ClassifiedError> {
        self.status.error()
    }

    /// Clear `error` and `retry_count` so the invoker can be reused.
    pub fn reset(&self) {
        self.status.reset();
    }

    /// Run `operation` to a terminal result.
    ///
    /// Dropping the returned future cancels the invocation: no further
    /// retries are made and a pending backoff timer is released. A remote
    /// call already sent is not rolled back.
    pub async fn invoke(
        &self,
        operation: &str,
        payload: &Value,
        options: &InvokeOptions,
    ) -> Result<Value, ClassifiedError> {
        let _loading = self.status.begin();
        let mut state = InvocationState::new(options.policy);
        let max_retries = state.policy().max_retries;

        while state.has_budget() {
            state.begin_call();
            tracing::debug!(operation, attempt = state.attempt(), "calling remote operation");

            let raw = match self.caller.call(operation, payload).await {
                Ok(response) => match response.into_result() {
                    Ok(body) => {
                        if state.attempt() > 0 {
                            tracing::info!(
                                operation,
                                retries = state.attempt(),
                                "remote operation succeeded after retry"
                            );
                        }
                        state.record_success(body);
                        break;
                    }
                    Err(message) => RawFailure::Payload(message),
                },
                Err(e) => {
                    tracing::debug!(
                        operation,
                        status = e.status(),
                        error = %e,
                        "remote call failed in transport"
                    );
                    RawFailure::Transport(e)
                }
            };

            let err = classify(&raw);
            match state.record_failure(err.clone()) {
                RetryDecision::RetryAfter(delay) => {
                    let next = state.attempt() + 1;
                    tracing::warn!(
                        operation,
                        attempt = next,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited; retrying"
                    );
                    if let Some(observer) = &options.on_retry {
                        observer(next, delay);
                    }
                    self.notifier
                        .notify(Notification::retrying(delay, next, max_retries));
                    self.status.set_retry_count(next);
                    tokio::time::sleep(delay).await;
                    state.retry_elapsed();
                }
                RetryDecision::NoRetry => {
                    self.report_terminal(operation, &err, state.attempt());
                    break;
                }
            }
        }

        tracing::debug!(
            operation,
            phase = ?state.phase(),
            settled = !matches!(state.outcome(), Outcome::Pending),
            "invocation finished"
        );
        let result = state.into_result();
        if let Err(ref e) = result {
            self.status.set_error(Some(e.clone()));
        }
        result
    }

    /// Like [`invoke`](Self::invoke), but resolves to `None` as soon as
    /// `cancel` fires.
    pub async fn invoke_cancellable(
        &self,
        operation: &str,
        payload: &Value,
        options: &InvokeOptions,
        cancel: &CancellationToken,
    ) -> Option<Result<Value, ClassifiedError>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(operation, "invocation cancelled");
                None
            }
            result = self.invoke(operation, payload, options) => Some(result),
        }
    }

    fn report_terminal(&self, operation: &str, err: &ClassifiedError, retries: u32) {
        match err.kind() {
            ErrorKind::UsageLimit => {
                tracing::warn!(operation, "usage limit reached");
                self.notifier.notify(Notification::usage_limit(err));
            }
            ErrorKind::Generic => {
                tracing::warn!(operation, error = %err, "remote operation failed");
                self.notifier.notify(Notification::error(err));
            }
            // Exhausted rate-limit budget: every retry was already announced.
            ErrorKind::RateLimit => {
                tracing::warn!(operation, retries, "rate limit persisted after all retries");
            }
        }
    }
}
