//! `phoenix backoff` – print the retry schedule.

use phoenix_core::config::PhoenixConfig;
use phoenix_core::retry::RetryPolicy;
use std::time::Duration;

pub fn schedule_lines(policy: &RetryPolicy) -> Vec<String> {
    if policy.max_retries == 0 {
        return vec!["retries disabled".to_string()];
    }
    let mut total = Duration::ZERO;
    policy
        .schedule()
        .enumerate()
        .map(|(i, delay)| {
            total += delay;
            format!(
                "retry {}/{}: wait {} ms (total {} ms)",
                i + 1,
                policy.max_retries,
                delay.as_millis(),
                total.as_millis()
            )
        })
        .collect()
}

pub fn run_backoff(cfg: &PhoenixConfig, max_retries: Option<u32>, base_delay_ms: Option<u64>) {
    let mut policy = cfg.retry_options().policy;
    if let Some(n) = max_retries {
        policy.max_retries = n;
    }
    if let Some(ms) = base_delay_ms {
        policy.base_delay = Duration::from_millis(ms);
    }
    for line in schedule_lines(&policy) {
        println!("{}", line);
    }
}
