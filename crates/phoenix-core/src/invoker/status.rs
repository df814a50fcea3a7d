//! Observable status of an invoker: loading flag, retry count, last error.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::retry::ClassifiedError;

#[derive(Debug, Default)]
pub(crate) struct InvokerStatus {
    in_flight: AtomicUsize,
    retry_count: AtomicU32,
    error: RwLock<Option<ClassifiedError>>,
}

impl InvokerStatus {
    /// Start tracking a new invocation. Loading stays set until the guard drops,
    /// including when the invocation future is dropped mid-wait.
    pub(crate) fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.retry_count.store(0, Ordering::SeqCst);
        self.set_error(None);
        LoadingGuard(self)
    }

    pub(crate) fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn retry_count(&self) -> u32 {
        self.retry_count.load(Ordering::SeqCst)
    }

    pub(crate) fn set_retry_count(&self, n: u32) {
        self.retry_count.store(n, Ordering::SeqCst);
    }

    pub(crate) fn error(&self) -> Option<ClassifiedError> {
        self.error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_error(&self, err: Option<ClassifiedError>) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = err;
    }

    pub(crate) fn reset(&self) {
        self.retry_count.store(0, Ordering::SeqCst);
        self.set_error(None);
    }
}

pub(crate) struct LoadingGuard<'a>(&'a InvokerStatus);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
