//! Background scroll suspension.
//!
//! While any modal overlay is open, scrolling of the page behind it must
//! stop. [`ScrollLock`] is a reference count shared between the app and its
//! overlays: each open overlay holds a [`ScrollLockGuard`], and the page is
//! locked while at least one guard is alive. Stacked overlays therefore
//! release the lock only when the last of them closes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ScrollLock {
    depth: AtomicUsize,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the lock. Dropping the guard releases it exactly once.
    #[must_use]
    pub fn acquire(self: &Arc<Self>) -> ScrollLockGuard {
        self.depth.fetch_add(1, Ordering::SeqCst);
        ScrollLockGuard {
            lock: Arc::clone(self),
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }

    /// Saturating decrement; releasing at zero depth stays at zero.
    fn release(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
                depth.checked_sub(1)
            });
    }
}

/// RAII handle for one overlay's hold on the scroll lock.
#[derive(Debug)]
pub struct ScrollLockGuard {
    lock: Arc<ScrollLock>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_scopes_the_lock() {
        let lock = ScrollLock::new();
        assert!(!lock.is_locked());

        let guard = lock.acquire();
        assert!(lock.is_locked());

        drop(guard);
        assert!(!lock.is_locked());
    }

    #[test]
    fn nested_guards_release_in_any_order() {
        let lock = ScrollLock::new();
        let first = lock.acquire();
        let second = lock.acquire();

        drop(first);
        assert!(lock.is_locked(), "one guard still alive");
        drop(second);
        assert!(!lock.is_locked());
    }

    #[test]
    fn release_at_zero_does_not_underflow() {
        let lock = ScrollLock::new();
        lock.release();
        assert!(!lock.is_locked());

        let guard = lock.acquire();
        assert!(lock.is_locked());
        drop(guard);
        assert!(!lock.is_locked());
    }
}
