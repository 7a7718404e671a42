//! Crate-internal fakes for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};

use meridian_core::{
    CountryResult, NitzData, OffsetResult, TimeSuggestion, ZoneId, ZoneQuality,
};
use parking_lot::Mutex;

use crate::{DeviceState, TimeService, WakeLock, ZoneLookup};

pub(crate) struct FakeDevice {
    elapsed: AtomicI64,
    current: AtomicI64,
    ignore: AtomicBool,
    spacing: AtomicI64,
    diff: AtomicI64,
}

impl FakeDevice {
    pub(crate) fn new(elapsed_millis: i64) -> Self {
        FakeDevice {
            elapsed: AtomicI64::new(elapsed_millis),
            current: AtomicI64::new(0),
            ignore: AtomicBool::new(false),
            spacing: AtomicI64::new(600_000),
            diff: AtomicI64::new(2_000),
        }
    }

    pub(crate) fn set_elapsed(&self, millis: i64) {
        self.elapsed.store(millis, Ordering::SeqCst);
    }

    pub(crate) fn set_current_time(&self, millis: i64) {
        self.current.store(millis, Ordering::SeqCst);
    }

    pub(crate) fn set_ignore_time_signals(&self, ignore: bool) {
        self.ignore.store(ignore, Ordering::SeqCst);
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

#[derive(Default)]
pub(crate) struct FakeWakeLock {
    acquires: AtomicU32,
    releases: AtomicU32,
}

impl FakeWakeLock {
    pub(crate) fn balanced(&self) -> bool {
        self.acquires.load(Ordering::SeqCst) == self.releases.load(Ordering::SeqCst)
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

#[derive(Default)]
pub(crate) struct FakeLookup {
    by_offset: Mutex<HashMap<i32, OffsetResult>>,
    by_offset_and_country: Mutex<HashMap<(String, i32), OffsetResult>>,
    by_country: Mutex<HashMap<String, CountryResult>>,
    uses_utc: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub(crate) fn add_offset_zone(&self, offset_millis: i32, zone: &str, only_match: bool) {
        self.by_offset.lock().insert(
            offset_millis,
            OffsetResult::new(ZoneId::new(zone), only_match),
        );
    }

    pub(crate) fn add_offset_country_zone(&self, iso: &str, offset_millis: i32, zone: &str) {
        self.by_offset_and_country.lock().insert(
            (iso.to_string(), offset_millis),
            OffsetResult::new(ZoneId::new(zone), false),
        );
    }

    pub(crate) fn add_country_zone(&self, iso: &str, zone: &str, quality: ZoneQuality) {
        self.by_country.lock().insert(
            iso.to_string(),
            CountryResult::new(ZoneId::new(zone), quality),
        );
    }

    pub(crate) fn mark_uses_utc(&self, iso: &str) {
        self.uses_utc.lock().push(iso.to_string());
    }
}

impl ZoneLookup for FakeLookup {
    fn lookup_by_offset(&self, data: &NitzData) -> Option<OffsetResult> {
        self.by_offset.lock().get(&data.local_offset_millis).cloned()
    }

    fn lookup_by_offset_and_country(&self, data: &NitzData, iso: &str) -> Option<OffsetResult> {
        self.by_offset_and_country
            .lock()
            .get(&(iso.to_string(), data.local_offset_millis))
            .cloned()
    }

    fn lookup_by_country(&self, iso: &str, _when_millis: i64) -> Option<CountryResult> {
        self.by_country.lock().get(iso).cloned()
    }

    fn country_uses_utc(&self, iso: &str, _when_millis: i64) -> bool {
        self.uses_utc.lock().iter().any(|c| c == iso)
    }
}

pub(crate) struct RecordingService {
    time_suggestions: Mutex<Vec<TimeSuggestion>>,
    zones_set: Mutex<Vec<ZoneId>>,
    auto_zone: AtomicBool,
    initialized: AtomicBool,
}

impl Default for RecordingService {
    fn default() -> Self {
        RecordingService {
            time_suggestions: Mutex::new(Vec::new()),
            zones_set: Mutex::new(Vec::new()),
            auto_zone: AtomicBool::new(true),
            initialized: AtomicBool::new(false),
        }
    }
}

impl RecordingService {
    pub(crate) fn time_suggestions(&self) -> Vec<TimeSuggestion> {
        self.time_suggestions.lock().clone()
    }

    pub(crate) fn zones_set(&self) -> Vec<ZoneId> {
        self.zones_set.lock().clone()
    }

    pub(crate) fn set_auto_zone_enabled(&self, enabled: bool) {
        self.auto_zone.store(enabled, Ordering::SeqCst);
    }

    pub(crate) fn set_zone_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::SeqCst);
    }
}

impl TimeService for RecordingService {
    fn suggest_time(&self, suggestion: TimeSuggestion) {
        self.time_suggestions.lock().push(suggestion);
    }

    fn set_zone(&self, zone: &ZoneId) {
        self.zones_set.lock().push(zone.clone());
    }

    fn auto_zone_detection_enabled(&self) -> bool {
        self.auto_zone.load(Ordering::SeqCst)
    }

    fn zone_setting_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}
