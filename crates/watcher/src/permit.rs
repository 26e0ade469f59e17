//! Exclusive permit gating entry into a rename pass
//!
//! Acquisition is a compare-and-set, never a wait: a caller that loses the
//! race gets `None` and abandons its attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// At most one holder at any instant
#[derive(Debug, Default)]
pub struct RenamePermit {
    held: AtomicBool,
}

impl RenamePermit {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the permit if it is free
    pub fn try_acquire(self: &Arc<Self>) -> Option<PermitGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PermitGuard {
                permit: Arc::clone(self),
            })
    }

    /// Whether some pass currently holds the permit
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the permit when dropped, including during a panic unwind
#[derive(Debug)]
pub struct PermitGuard {
    permit: Arc<RenamePermit>,
}

impl Drop for PermitGuard {
    fn drop(&mut self) {
        self.permit.held.store(false, Ordering::Release);
    }
}
