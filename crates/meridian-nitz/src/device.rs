//! Device state and wake lock collaborators

/// Read access to device clocks and detection configuration.
///
/// Supplied by the host platform; the detection machine never reads clocks or
/// system properties directly.
pub trait DeviceState: Send + Sync {
    /// Monotonic milliseconds since boot, including deep sleep.
    fn elapsed_realtime_millis(&self) -> i64;

    /// Current wall-clock UTC milliseconds.
    fn current_time_millis(&self) -> i64;

    /// Device-level flag disabling all network time signal processing.
    fn ignore_time_signals(&self) -> bool;

    /// Minimum spacing between acted-on signals before rate limiting kicks
    /// in, milliseconds.
    fn update_spacing_millis(&self) -> i64;

    /// UTC drift between consecutive signals that forces processing even
    /// within the spacing window, milliseconds.
    fn update_diff_millis(&self) -> i64;
}

/// A host wake lock. Reading the monotonic clock for rate-limit math must
/// happen with the device held awake, otherwise the reading can be stale.
pub trait WakeLock: Send + Sync {
    fn acquire(&self);
    fn release(&self);
}

/// RAII holder for a [`WakeLock`]. Releases on drop, on every exit path.
pub struct WakeGuard<'a> {
    lock: &'a dyn WakeLock,
}

impl<'a> WakeGuard<'a> {
    pub fn hold(lock: &'a dyn WakeLock) -> Self {
        lock.acquire();
        WakeGuard { lock }
    }
}

impl Drop for WakeGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// Wake lock for hosts that do not need one.
#[derive(Debug, Default)]
pub struct NoOpWakeLock;

impl WakeLock for NoOpWakeLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    struct Counting {
        held: AtomicI32,
    }

    impl WakeLock for Counting {
        fn acquire(&self) {
            self.held.fetch_add(1, Ordering::SeqCst);
        }
        fn release(&self) {
            self.held.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_wake_guard_releases_on_drop() {
        let lock = Counting {
            held: AtomicI32::new(0),
        };
        {
            let _guard = WakeGuard::hold(&lock);
            assert_eq!(lock.held.load(Ordering::SeqCst), 1);
        }
        assert_eq!(lock.held.load(Ordering::SeqCst), 0);
    }
}
