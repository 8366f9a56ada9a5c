//! The latched last exception.
//!
//! Failures are returned as typed errors and also recorded here, so callers
//! written against the two-step protocol (call, then ask for details) keep
//! working. The latch belongs to one engine instance.

use std::sync::{Mutex, MutexGuard};

use crate::error::EngineError;

/// Details of the most recent failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastException {
    /// Numeric code, 0 when nothing is latched.
    pub code: i64,
    /// Message, empty when nothing is latched.
    pub message: String,
}

impl LastException {
    pub fn is_empty(&self) -> bool {
        self.code == 0
    }
}

#[derive(Default)]
pub(crate) struct ExceptionLatch {
    inner: Mutex<LastException>,
}

impl ExceptionLatch {
    fn lock(&self) -> MutexGuard<'_, LastException> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Overwrite the latch with `err`.
    pub(crate) fn record(&self, err: &EngineError) {
        *self.lock() = LastException {
            code: err.code(),
            message: err.latched_message(),
        };
    }

    pub(crate) fn get(&self) -> LastException {
        self.lock().clone()
    }

    pub(crate) fn clear(&self) {
        *self.lock() = LastException::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_record_and_clear() {
        let latch = ExceptionLatch::default();
        assert!(latch.get().is_empty());

        latch.record(&EngineError::NotInitialized);
        let latched = latch.get();
        assert_eq!(latched.code, 49);
        assert_eq!(latched.message, "0049E|engine is not initialized");

        latch.clear();
        assert_eq!(latch.get(), LastException::default());
    }

    #[test]
    fn test_latest_failure_wins() {
        let latch = ExceptionLatch::default();
        latch.record(&EngineError::NotInitialized);
        latch.record(&EngineError::Destroyed);
        assert_eq!(latch.get().code, EngineError::Destroyed.code());
    }
}
