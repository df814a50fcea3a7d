//! CLI command handlers, one per file.

pub(crate) mod backoff;
pub(crate) mod classify;
mod config;
pub(crate) mod invoke;

pub use backoff::run_backoff;
pub use classify::run_classify;
pub use config::run_config;
pub use invoke::{run_invoke, InvokeArgs};
