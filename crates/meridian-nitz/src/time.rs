//! Time resolver
//!
//! Converts an accepted NITZ signal into a clock suggestion for the time
//! detection service, rate-limited against the last suggestion actually
//! emitted. The anchor here is separate from the filter's signal history: it
//! only moves when a suggestion goes out.

use std::sync::Arc;

use meridian_core::{NitzSignal, SlotId, TimeSuggestion, TimestampedUtc};
use tracing::debug;

use crate::{DetectionLog, DeviceState, TimeService, WakeGuard, WakeLock};

pub struct TimeResolver {
    slot: SlotId,
    device: Arc<dyn DeviceState>,
    wake_lock: Arc<dyn WakeLock>,
    service: Arc<dyn TimeService>,
    /// Last suggestion emitted, the rate-limiting anchor.
    saved_time: Option<TimestampedUtc>,
    log: DetectionLog,
}

impl TimeResolver {
    pub fn new(
        slot: SlotId,
        device: Arc<dyn DeviceState>,
        wake_lock: Arc<dyn WakeLock>,
        service: Arc<dyn TimeService>,
    ) -> Self {
        TimeResolver {
            slot,
            device,
            wake_lock,
            service,
            saved_time: None,
            log: DetectionLog::default(),
        }
    }

    /// Considers a time suggestion for an accepted signal. Emits to the time
    /// service and advances the anchor, or does nothing if suppressed.
    pub fn suggest_from_signal(&mut self, signal: &NitzSignal) {
        if self.device.ignore_time_signals() {
            debug!("time suggestion skipped: time signals ignored on this device");
            return;
        }

        // The filter already screened the reference time, but the state
        // machine can be driven directly; re-check before doing clock math.
        let age = {
            let _guard = WakeGuard::hold(&*self.wake_lock);
            self.device
                .elapsed_realtime_millis()
                .saturating_sub(signal.reference_millis)
        };
        if age < 0 || age > i32::MAX as i64 {
            debug!(age, "time suggestion skipped: bogus reference time");
            return;
        }

        let new_time = TimestampedUtc::from(signal);

        if let Some(saved) = self.saved_time {
            let spacing = self.device.update_spacing_millis();
            let diff = self.device.update_diff_millis();
            let elapsed = new_time.elapsed_since(&saved);
            let drift = new_time.drift_since(&saved).saturating_abs();

            if elapsed <= spacing && drift <= diff {
                self.log.log(format!(
                    "suppressed suggestion: elapsed={elapsed}ms drift={drift}ms"
                ));
                debug!(elapsed, drift, "time suggestion suppressed by rate limit");
                return;
            }
        }

        let why = format!(
            "nitz signal: utc={} reference={}",
            new_time.utc_millis, new_time.reference_millis
        );
        self.log.log(why.clone());
        debug!(utc = new_time.utc_millis, "suggesting clock update");
        self.service
            .suggest_time(TimeSuggestion::new(self.slot, new_time, why));
        self.saved_time = Some(new_time);
    }

    /// Drops the rate-limiting anchor. The next accepted signal will always
    /// produce a suggestion.
    pub fn clear(&mut self) {
        self.saved_time = None;
    }

    pub fn saved_time(&self) -> Option<TimestampedUtc> {
        self.saved_time
    }

    pub fn log(&self) -> &DetectionLog {
        &self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut DetectionLog {
        &mut self.log
    }
}
