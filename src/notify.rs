use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// One-shot broadcast: `wait` blocks until `notify` fires, then every waiter
/// is released exactly once. Waiters arriving after the event has already
/// fired are released immediately. Notifying twice is a no-op.
///
/// Not used by the pagination state machine itself; a building block for
/// "wait until first load" style synchronization around it.
#[derive(Debug, Default)]
pub struct Notify {
    notified: Mutex<bool>,
    cvar: Condvar,
}

impl Notify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the event, waking all current waiters.
    pub fn notify(&self) {
        let mut notified = self
            .notified
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *notified {
            return;
        }
        *notified = true;
        self.cvar.notify_all();
    }

    /// Blocks until the event has fired. Returns immediately if it already has.
    pub fn wait(&self) {
        let mut notified = self
            .notified
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while !*notified {
            notified = self
                .cvar
                .wait(notified)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
    }

    /// Like `wait`, bounded by a timeout. Returns whether the event fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut notified = self
            .notified
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let deadline = std::time::Instant::now() + timeout;
        while !*notified {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return false;
            }
            let (guard, result) = self
                .cvar
                .wait_timeout(notified, remaining)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            notified = guard;
            if result.timed_out() && !*notified {
                return false;
            }
        }
        true
    }

    /// Whether the event has fired, without blocking.
    pub fn has_fired(&self) -> bool {
        *self
            .notified
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
