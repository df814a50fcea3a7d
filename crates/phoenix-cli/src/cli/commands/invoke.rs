//! `phoenix invoke` – call an edge function through the retrying invoker.

use anyhow::{Context, Result};
use phoenix_core::config::PhoenixConfig;
use phoenix_core::edge::EdgeFunctionCaller;
use phoenix_core::invoker::{InvokeOptions, RetryingInvoker};
use phoenix_core::notify::{Notifier, TracingNotifier};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::cli::console::ConsoleNotifier;

#[derive(Debug, Clone)]
pub struct InvokeArgs {
    pub function: String,
    pub payload: String,
    pub max_retries: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub quiet: bool,
}

impl InvokeArgs {
    /// Configured retry options with command-line overrides applied.
    pub fn options(&self, cfg: &PhoenixConfig) -> InvokeOptions {
        let mut options = cfg.retry_options();
        if let Some(n) = self.max_retries {
            options = options.max_retries(n);
        }
        if let Some(ms) = self.base_delay_ms {
            options = options.base_delay(Duration::from_millis(ms));
        }
        options
    }

    pub fn notifier(&self) -> Box<dyn Notifier> {
        if self.quiet {
            Box::new(TracingNotifier)
        } else {
            Box::new(ConsoleNotifier)
        }
    }

    pub fn payload(&self) -> Result<Value> {
        serde_json::from_str(&self.payload).context("--payload is not valid JSON")
    }
}

pub async fn run_invoke(cfg: &PhoenixConfig, args: &InvokeArgs) -> Result<()> {
    let payload = args.payload()?;
    let options = args.options(cfg);
    let invoker = RetryingInvoker::new(EdgeFunctionCaller::new(&cfg.backend), args.notifier());

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    tracing::info!(function = %args.function, policy = ?options.policy, "invoking edge function");
    let outcome = invoker
        .invoke_cancellable(&args.function, &payload, &options, &cancel)
        .await;
    ctrl_c.abort();

    match outcome {
        None => anyhow::bail!("{} cancelled", args.function),
        Some(Ok(body)) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Some(Err(e)) => {
            let kind = e.kind().as_str();
            let retries = invoker.retry_count();
            Err(anyhow::Error::new(e).context(format!(
                "{} failed ({}, {} retries)",
                args.function, kind, retries
            )))
        }
    }
}
