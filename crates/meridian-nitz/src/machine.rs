//! NITZ detection state machine
//!
//! Event-driven orchestration of the filter and resolvers. Single-writer:
//! every event takes `&mut self` and callers serialize externally. No event
//! handler panics across the public boundary; a failed resolution leaves
//! prior state untouched because state is only mutated after the cascade has
//! produced its answer.

use std::fmt;
use std::sync::Arc;

use meridian_core::{CountryCode, NitzSignal, SlotId, TimeSuggestion, ZoneId};
use tracing::{debug, warn};

use crate::{
    DetectionLog, DeviceState, SignalFilter, TimeResolver, TimeService, WakeLock, ZoneLookup,
    ZoneResolver,
};

pub struct NitzMachine {
    slot: SlotId,
    device: Arc<dyn DeviceState>,
    service: Arc<dyn TimeService>,
    filter: SignalFilter,
    time: TimeResolver,
    zones: ZoneResolver,

    /// The most recent accepted signal.
    latest_signal: Option<NitzSignal>,
    country: CountryCode,
    /// The last zone resolved, whether or not it was applied. Replayed when
    /// automatic detection is enabled later.
    saved_zone: Option<ZoneId>,
    /// Last zone actually pushed to the service; dedups log entries only.
    last_set_zone: Option<ZoneId>,
    /// True while a NITZ-based zone resolution stands. While set, the weaker
    /// country-only detection stays out of the way.
    zone_detection_successful: bool,

    zone_log: DetectionLog,
}

impl NitzMachine {
    pub fn new(
        slot: SlotId,
        device: Arc<dyn DeviceState>,
        wake_lock: Arc<dyn WakeLock>,
        lookup: Arc<dyn ZoneLookup>,
        service: Arc<dyn TimeService>,
    ) -> Self {
        NitzMachine {
            slot,
            filter: SignalFilter::standard(device.clone(), wake_lock.clone()),
            time: TimeResolver::new(slot, device.clone(), wake_lock, service.clone()),
            zones: ZoneResolver::new(lookup, service.clone()),
            device,
            service,
            latest_signal: None,
            country: CountryCode::Unknown,
            saved_zone: None,
            last_set_zone: None,
            zone_detection_successful: false,
            zone_log: DetectionLog::default(),
        }
    }

    /// The network reported a country (possibly empty, meaning a test
    /// network).
    pub fn handle_country_detected(&mut self, iso: &str) {
        let old = std::mem::replace(&mut self.country, CountryCode::from_network(iso));
        debug!(%old, new = %self.country, "country detected");

        if !self.zone_detection_successful {
            if let Some(iso) = self.country.known_iso().map(str::to_owned) {
                self.update_zone_from_country_only(&iso);
            }
        }

        let country_changed = old != self.country;
        if self.latest_signal.is_some() && (country_changed || old.is_unknown()) {
            self.update_zone_from_country_and_signal();
        }
    }

    /// A NITZ signal arrived. The input filter decides whether it is worth
    /// processing at all; accepted signals update the zone, then the clock.
    pub fn handle_nitz_received(&mut self, signal: NitzSignal) {
        if !self.filter.must_process(self.latest_signal.as_ref(), &signal) {
            debug!("nitz signal dropped by input filter");
            return;
        }

        self.latest_signal = Some(signal.clone());
        self.update_zone_from_country_and_signal();
        self.time.suggest_from_signal(&signal);
    }

    /// Network service came (back) up. Any historic NITZ success no longer
    /// says anything about the current network.
    pub fn handle_network_available(&mut self) {
        debug!(
            was_successful = self.zone_detection_successful,
            "network available, resetting zone detection success"
        );
        self.zone_detection_successful = false;
    }

    /// Network service lost. NITZ-derived state is no longer trustworthy.
    pub fn handle_network_unavailable(&mut self) {
        self.time.clear();
        self.time.log_mut().log("network unavailable: time state cleared");

        let old_signal = self.latest_signal.take();
        self.zone_detection_successful = false;
        self.saved_zone = None;
        self.zone_log.log("network unavailable: zone state cleared");

        // If the previous signal was already gone this was all done the last
        // time around.
        if old_signal.is_none() {
            return;
        }

        // Country information survives network loss and may be enough by
        // itself.
        if let Some(iso) = self.country.known_iso().map(str::to_owned) {
            self.update_zone_from_country_only(&iso);
        }
        self.service.suggest_time(TimeSuggestion::withdrawal(
            self.slot,
            "network unavailable",
        ));
    }

    /// Country information lost. NITZ time state is unaffected.
    pub fn handle_country_unavailable(&mut self) {
        debug!("country unavailable");
        self.saved_zone = None;
        self.country = CountryCode::Unknown;
        self.zone_detection_successful = false;
    }

    /// Airplane mode toggled, either direction. Both transitions clear all
    /// cached state: detection should work everything out from first
    /// principles once connectivity returns.
    pub fn handle_airplane_mode_changed(&mut self, on: bool) {
        self.time.clear();
        self.time
            .log_mut()
            .log(format!("airplane mode {on}: time state cleared"));

        self.country = CountryCode::Unknown;
        let old_signal = self.latest_signal.take();
        self.zone_detection_successful = false;
        self.saved_zone = None;

        if old_signal.is_none() {
            return;
        }

        self.zone_log
            .log(format!("airplane mode {on}: zone state cleared"));
        self.service.suggest_time(TimeSuggestion::withdrawal(
            self.slot,
            format!("airplane mode changed: on={on}"),
        ));
    }

    /// Automatic time zone detection was switched on. A zone resolved while
    /// detection was off can be applied now without re-deriving it.
    pub fn handle_auto_zone_enabled(&mut self) {
        if let Some(zone) = self.saved_zone.clone() {
            self.set_zone(&zone, "auto zone detection enabled");
        } else {
            debug!("auto zone detection enabled but no saved zone to apply");
        }
    }

    /// Full cascade over the latest signal and current country, then commit
    /// the outcome.
    fn update_zone_from_country_and_signal(&mut self) {
        let Some(signal) = self.latest_signal.clone() else {
            // Callers check; nothing to resolve without a signal.
            warn!("zone update requested without a signal");
            return;
        };

        let resolved = self.zones.resolve(&signal, &self.country);
        match resolved {
            Some(zone) => {
                if self.service.auto_zone_detection_enabled() {
                    self.set_zone(&zone, "resolved from country and nitz");
                } else {
                    debug!(%zone, "zone resolved but auto detection is off");
                }
                self.saved_zone = Some(zone);
                self.zone_detection_successful = true;
            }
            None => {
                debug!(country = %self.country, "cascade produced no zone");
                self.saved_zone = None;
                self.zone_detection_successful = false;
            }
        }
    }

    /// Low-confidence standalone pass using only the country. Does not touch
    /// the NITZ success flag; it is not a NITZ-based detection.
    fn update_zone_from_country_only(&mut self, iso: &str) {
        let when = self.device.current_time_millis();
        match self.zones.resolve_from_country_only(iso, when) {
            Some(zone) => {
                if self.service.auto_zone_detection_enabled() {
                    self.set_zone(&zone, "resolved from country code");
                } else {
                    debug!(%zone, "country zone resolved but auto detection is off");
                }
                self.saved_zone = Some(zone);
            }
            None => {
                self.saved_zone = None;
            }
        }
    }

    fn set_zone(&mut self, zone: &ZoneId, why: &str) {
        // The set itself is idempotent and always issued; only the log entry
        // is deduplicated, because repeated NITZ signals would otherwise
        // obliterate the useful history.
        if self.last_set_zone.as_ref() != Some(zone) {
            self.zone_log.log(format!("set zone {zone}: {why}"));
            self.last_set_zone = Some(zone.clone());
        }
        debug!(%zone, why, "setting device time zone");
        self.service.set_zone(zone);
    }

    /// Writes current detection state for bug reports.
    pub fn dump_state(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(w, " saved_time={:?}", self.time.saved_time())?;
        writeln!(w, " latest_signal={:?}", self.latest_signal)?;
        writeln!(w, " country={}", self.country)?;
        writeln!(w, " saved_zone={:?}", self.saved_zone)?;
        writeln!(
            w,
            " zone_detection_successful={}",
            self.zone_detection_successful
        )?;
        writeln!(w, " time log:")?;
        self.time.log().dump(w)?;
        writeln!(w, " zone log:")?;
        self.zone_log.dump(w)
    }

    pub fn latest_signal(&self) -> Option<&NitzSignal> {
        self.latest_signal.as_ref()
    }

    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn saved_zone(&self) -> Option<&ZoneId> {
        self.saved_zone.as_ref()
    }

    pub fn zone_detection_successful(&self) -> bool {
        self.zone_detection_successful
    }
}
