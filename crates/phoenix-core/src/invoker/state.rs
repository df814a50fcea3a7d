//! Per-invocation bookkeeping and its state machine.

use serde_json::Value;

use crate::retry::{ClassifiedError, RetryDecision, RetryPolicy, UNEXPECTED_ERROR_MESSAGE};

/// Where an invocation is in its lifecycle.
///
/// `Idle -> Calling -> {Success, Classifying}`,
/// `Classifying -> {RetryScheduled, Terminal}`, `RetryScheduled -> Calling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Calling,
    Classifying,
    RetryScheduled,
    Success,
    Terminal,
}

impl Phase {
    pub fn is_absorbing(self) -> bool {
        matches!(self, Phase::Success | Phase::Terminal)
    }

    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Calling)
                | (Calling, Success)
                | (Calling, Classifying)
                | (Classifying, RetryScheduled)
                | (Classifying, Terminal)
                | (RetryScheduled, Calling)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pending,
    Success(Value),
    Failed(ClassifiedError),
}

/// Mutable state of exactly one in-flight invocation. Never shared.
#[derive(Debug)]
pub struct InvocationState {
    attempt: u32,
    policy: RetryPolicy,
    last_error: Option<ClassifiedError>,
    outcome: Outcome,
    phase: Phase,
}

impl InvocationState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            attempt: 0,
            policy,
            last_error: None,
            outcome: Outcome::Pending,
            phase: Phase::Idle,
        }
    }

    /// Retries taken so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&ClassifiedError> {
        self.last_error.as_ref()
    }

    pub(crate) fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// True while the retry budget still admits another call.
    pub fn has_budget(&self) -> bool {
        self.attempt <= self.policy.max_retries
    }

    pub fn begin_call(&mut self) {
        self.transition(Phase::Calling);
    }

    pub fn record_success(&mut self, payload: Value) {
        self.transition(Phase::Success);
        self.outcome = Outcome::Success(payload);
    }

    /// Record a classified failure and decide whether to retry it.
    pub fn record_failure(&mut self, err: ClassifiedError) -> RetryDecision {
        self.transition(Phase::Classifying);
        let decision = self.policy.decide(self.attempt, err.kind());
        match decision {
            RetryDecision::RetryAfter(_) => self.transition(Phase::RetryScheduled),
            RetryDecision::NoRetry => {
                self.transition(Phase::Terminal);
                self.outcome = Outcome::Failed(err.clone());
            }
        }
        self.last_error = Some(err);
        decision
    }

    /// The backoff wait is over; count the retry.
    pub fn retry_elapsed(&mut self) {
        self.attempt += 1;
    }

    /// Terminal result. A still-pending state resolves to the last error seen.
    pub fn into_result(self) -> Result<Value, ClassifiedError> {
        match self.outcome {
            Outcome::Success(v) => Ok(v),
            Outcome::Failed(e) => Err(e),
            Outcome::Pending => Err(self
                .last_error
                .unwrap_or_else(|| ClassifiedError::generic(UNEXPECTED_ERROR_MESSAGE))),
        }
    }

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid invocation transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }
}
