//! Scriptable zone lookup tables

use std::collections::HashMap;

use meridian_core::{CountryResult, NitzData, OffsetResult, ZoneId, ZoneQuality};
use meridian_nitz::ZoneLookup;
use parking_lot::Mutex;

/// An in-memory zone database. Tests register exactly the mappings a
/// scenario needs; everything else resolves to nothing.
#[derive(Default)]
pub struct FakeLookup {
    by_offset: Mutex<HashMap<i32, OffsetResult>>,
    by_offset_and_country: Mutex<HashMap<(String, i32), OffsetResult>>,
    by_country: Mutex<HashMap<String, CountryResult>>,
    uses_utc: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn add_offset_zone(&self, offset_millis: i32, zone: &str, only_match: bool) {
        self.by_offset.lock().insert(
            offset_millis,
            OffsetResult::new(ZoneId::new(zone), only_match),
        );
    }

    pub fn add_offset_country_zone(&self, iso: &str, offset_millis: i32, zone: &str) {
        self.by_offset_and_country.lock().insert(
            (iso.to_string(), offset_millis),
            OffsetResult::new(ZoneId::new(zone), false),
        );
    }

    pub fn add_country_zone(&self, iso: &str, zone: &str, quality: ZoneQuality) {
        self.by_country.lock().insert(
            iso.to_string(),
            CountryResult::new(ZoneId::new(zone), quality),
        );
    }

    pub fn mark_uses_utc(&self, iso: &str) {
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
