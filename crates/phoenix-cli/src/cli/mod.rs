//! CLI for invoking Phoenix edge functions.

mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phoenix_core::config;

use commands::{run_backoff, run_classify, run_config, run_invoke, InvokeArgs};

/// Top-level CLI for the Phoenix edge-function invoker.
#[derive(Debug, Parser)]
#[command(name = "phoenix")]
#[command(about = "Phoenix: call backend edge functions with rate-limit aware retries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Invoke an edge function, retrying while it is rate limited.
    Invoke {
        /// Edge function name (e.g. generate-lesson).
        function: String,
        /// JSON payload sent as the request body.
        #[arg(long, default_value = "{}")]
        payload: String,
        /// Retries allowed after the first failure (overrides config).
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
        /// Base backoff delay in milliseconds (overrides config).
        #[arg(long, value_name = "MS")]
        base_delay_ms: Option<u64>,
        /// Send retry/error notifications to the log instead of stderr.
        #[arg(long)]
        quiet: bool,
    },

    /// Classify an error string the way a failed invocation would be.
    Classify {
        /// Error text, e.g. the `error` field of a response.
        text: String,
    },

    /// Print the retry schedule for the given (or configured) settings.
    Backoff {
        /// Retries allowed after the first failure (overrides config).
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
        /// Base backoff delay in milliseconds (overrides config).
        #[arg(long, value_name = "MS")]
        base_delay_ms: Option<u64>,
    },

    /// Show the config file path and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!(backend = %cfg.backend.url, retry = ?cfg.retry, "loaded config");

        match cli.command {
            CliCommand::Invoke {
                function,
                payload,
                max_retries,
                base_delay_ms,
                quiet,
            } => {
                let args = InvokeArgs {
                    function,
                    payload,
                    max_retries,
                    base_delay_ms,
                    quiet,
                };
                run_invoke(&cfg, &args).await?;
            }
            CliCommand::Classify { text } => run_classify(&text),
            CliCommand::Backoff {
                max_retries,
                base_delay_ms,
            } => run_backoff(&cfg, max_retries, base_delay_ms),
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
