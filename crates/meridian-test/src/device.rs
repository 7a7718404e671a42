//! Controllable device fakes

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};

use meridian_nitz::{DeviceState, WakeLock};

/// A device whose clocks and policy knobs tests drive directly.
pub struct FakeDevice {
    elapsed: AtomicI64,
    current: AtomicI64,
    ignore: AtomicBool,
    spacing: AtomicI64,
    diff: AtomicI64,
}

impl FakeDevice {
    pub fn new(elapsed_millis: i64) -> Self {
        FakeDevice {
            elapsed: AtomicI64::new(elapsed_millis),
            current: AtomicI64::new(0),
            ignore: AtomicBool::new(false),
            spacing: AtomicI64::new(600_000),
            diff: AtomicI64::new(2_000),
        }
    }

    pub fn set_elapsed(&self, millis: i64) {
        self.elapsed.store(millis, Ordering::SeqCst);
    }

    /// Moves the monotonic clock forward.
    pub fn advance(&self, millis: i64) {
        self.elapsed.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set_current_time(&self, millis: i64) {
        self.current.store(millis, Ordering::SeqCst);
    }

    pub fn set_ignore_time_signals(&self, ignore: bool) {
        self.ignore.store(ignore, Ordering::SeqCst);
    }

    pub fn set_update_spacing(&self, millis: i64) {
        self.spacing.store(millis, Ordering::SeqCst);
    }

    pub fn set_update_diff(&self, millis: i64) {
        self.diff.store(millis, Ordering::SeqCst);
    }
}

impl DeviceState for FakeDevice {
    fn elapsed_realtime_millis(&self) -> i64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    fn current_time_millis(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }

    fn ignore_time_signals(&self) -> bool {
        self.ignore.load(Ordering::SeqCst)
    }

    fn update_spacing_millis(&self) -> i64 {
        self.spacing.load(Ordering::SeqCst)
    }

    fn update_diff_millis(&self) -> i64 {
        self.diff.load(Ordering::SeqCst)
    }
}

/// Counts acquire/release pairs so tests can assert the guard discipline.
#[derive(Default)]
pub struct FakeWakeLock {
    acquires: AtomicU32,
    releases: AtomicU32,
}

impl FakeWakeLock {
    pub fn balanced(&self) -> bool {
        self.acquires.load(Ordering::SeqCst) == self.releases.load(Ordering::SeqCst)
    }

    pub fn acquire_count(&self) -> u32 {
        self.acquires.load(Ordering::SeqCst)
    }
}

impl WakeLock for FakeWakeLock {
    fn acquire(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
