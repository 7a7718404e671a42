//! Time zone resolver
//!
//! Maps a NITZ signal plus country knowledge to a zone id through a
//! prioritized lookup cascade. Resolution itself is pure; applying the
//! result is the state machine's job.

use std::sync::Arc;

use meridian_core::{CountryCode, NitzSignal, ZoneId};
use tracing::debug;

use crate::{TimeService, ZoneLookup};

pub struct ZoneResolver {
    lookup: Arc<dyn ZoneLookup>,
    service: Arc<dyn TimeService>,
}

impl ZoneResolver {
    pub fn new(lookup: Arc<dyn ZoneLookup>, service: Arc<dyn TimeService>) -> Self {
        ZoneResolver { lookup, service }
    }

    /// The full cascade. First match wins; `None` means no zone could be
    /// determined, which is a normal outcome, not an error.
    pub fn resolve(&self, signal: &NitzSignal, country: &CountryCode) -> Option<ZoneId> {
        // Test-only escape hatch used by emulated networks.
        if let Some(zone) = &signal.data.emulator_host_zone {
            return Some(zone.clone());
        }

        let iso = match country {
            // No country, no lookup.
            CountryCode::Unknown => return None,
            CountryCode::TestNetwork => {
                // Test network with a bogus MCC: an offset-only lookup is
                // correct in only a few cases but at least has the right
                // offset. An ambiguous offset is worth knowing about when
                // reading logs later.
                return match self.lookup.lookup_by_offset(&signal.data) {
                    Some(result) => {
                        if !result.is_only_match {
                            debug!(
                                zone = %result.zone,
                                "offset matched several zones on a test network, using the first"
                            );
                        }
                        Some(result.zone)
                    }
                    None => {
                        debug!("no offset-only match for test network");
                        None
                    }
                };
            }
            CountryCode::Known(iso) => iso,
        };

        if self.service.zone_setting_initialized() && self.offset_is_bogus(signal, iso) {
            // A known class of corrupted NITZ messages carries offset zero.
            // Once a real zone has ever been set, refuse to act on them for
            // countries that don't use UTC.
            debug!(iso, "zero-offset signal looks bogus, not resolving");
            return None;
        }

        if let Some(result) = self.lookup.lookup_by_offset_and_country(&signal.data, iso) {
            return Some(result.zone);
        }

        // The country + offset gave no match; see if the country alone is
        // decisive enough.
        let country_result = self.lookup.lookup_by_country(iso, signal.data.utc_millis)?;
        if country_result.quality.is_high_confidence() {
            Some(country_result.zone)
        } else {
            debug!(iso, quality = ?country_result.quality, "country-only result not confident enough");
            None
        }
    }

    /// Standalone country-only pass, used when no usable signal exists. The
    /// result is accepted when the device zone has never been initialized
    /// (any plausible zone beats none) or when the lookup is high confidence.
    pub fn resolve_from_country_only(&self, iso: &str, when_millis: i64) -> Option<ZoneId> {
        let result = self.lookup.lookup_by_country(iso, when_millis)?;
        if !self.service.zone_setting_initialized() || result.quality.is_high_confidence() {
            Some(result.zone)
        } else {
            debug!(iso, quality = ?result.quality, "country-only pass rejected");
            None
        }
    }

    fn offset_is_bogus(&self, signal: &NitzSignal, iso: &str) -> bool {
        signal.data.local_offset_millis == 0
            && !self.lookup.country_uses_utc(iso, signal.data.utc_millis)
    }
}
