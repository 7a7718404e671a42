//! Recording time service fake

use std::sync::atomic::{AtomicBool, Ordering};

use meridian_core::{TimeSuggestion, ZoneId};
use meridian_nitz::TimeService;
use parking_lot::Mutex;

/// Records every suggestion and zone set; the detection settings are
/// test-controlled.
pub struct RecordingService {
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
    pub fn time_suggestions(&self) -> Vec<TimeSuggestion> {
        self.time_suggestions.lock().clone()
    }

    pub fn zones_set(&self) -> Vec<ZoneId> {
        self.zones_set.lock().clone()
    }

    pub fn last_zone(&self) -> Option<ZoneId> {
        self.zones_set.lock().last().cloned()
    }

    pub fn set_auto_zone_enabled(&self, enabled: bool) {
        self.auto_zone.store(enabled, Ordering::SeqCst);
    }

    pub fn set_zone_initialized(&self, initialized: bool) {
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
