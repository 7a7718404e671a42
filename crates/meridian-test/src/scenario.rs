//! End-to-end detection and dispatch scenarios
//!
//! These drive the public surface of the detection machine and the SMS
//! dispatcher through realistic event sequences: boot, roaming, flights,
//! network loss, and degraded delivery paths.

use std::sync::Arc;

use meridian_core::SlotId;
use meridian_nitz::NitzMachine;
use meridian_sms::{DispatcherConfig, ImsSmsDispatcher};

use crate::{
    CollectingInbound, FakeDevice, FakeLookup, FakeSmsNetwork, FakeWakeLock, RecordingFallback,
    RecordingObserver, RecordingService, ScriptedReports,
};

/// A detection machine wired to fakes, ready for scenario scripting.
pub struct DetectionHarness {
    pub machine: NitzMachine,
    pub device: Arc<FakeDevice>,
    pub wake_lock: Arc<FakeWakeLock>,
    pub lookup: Arc<FakeLookup>,
    pub service: Arc<RecordingService>,
}

impl DetectionHarness {
    pub fn new() -> Self {
        let device = Arc::new(FakeDevice::new(100_000));
        let wake_lock = Arc::new(FakeWakeLock::default());
        let lookup = Arc::new(FakeLookup::default());
        let service = Arc::new(RecordingService::default());
        let machine = NitzMachine::new(
            SlotId::new(0),
            device.clone(),
            wake_lock.clone(),
            lookup.clone(),
            service.clone(),
        );
        DetectionHarness {
            machine,
            device,
            wake_lock,
            lookup,
            service,
        }
    }
}

impl Default for DetectionHarness {
    fn default() -> Self {
        DetectionHarness::new()
    }
}

/// A dispatcher wired to fakes.
pub struct DispatchHarness {
    pub dispatcher: Arc<ImsSmsDispatcher>,
    pub network: Arc<FakeSmsNetwork>,
    pub fallback: Arc<RecordingFallback>,
    pub reports: Arc<ScriptedReports>,
    pub inbound: Arc<CollectingInbound>,
    pub observer: Arc<RecordingObserver>,
}

impl DispatchHarness {
    pub fn new(config: DispatcherConfig) -> Self {
        let network = Arc::new(FakeSmsNetwork::default());
        let fallback = Arc::new(RecordingFallback::default());
        let reports = Arc::new(ScriptedReports::default());
        let inbound = Arc::new(CollectingInbound::default());
        let observer = Arc::new(RecordingObserver::default());
        let dispatcher = Arc::new(ImsSmsDispatcher::new(
            config,
            network.clone(),
            fallback.clone(),
            reports.clone(),
            inbound.clone(),
            observer.clone(),
        ));
        DispatchHarness {
            dispatcher,
            network,
            fallback,
            reports,
            inbound,
            observer,
        }
    }
}

impl Default for DispatchHarness {
    fn default() -> Self {
        DispatchHarness::new(DispatcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{NitzData, NitzSignal, ZoneId, ZoneQuality};
    use meridian_sms::{SendStatus, SmsFormat, SmsTracker, StatusReport};
    use proptest::prelude::*;

    const PST_OFFSET: i32 = -28_800_000;
    const EST_OFFSET: i32 = -18_000_000;
    const UTC_2020: i64 = 1_600_000_000_000;

    fn signal(reference: i64, utc: i64, offset: i32) -> NitzSignal {
        NitzSignal::new(reference, NitzData::new(utc, offset).with_dst(0))
    }

    #[test]
    fn test_boot_resolves_zone_and_time() {
        let mut h = DetectionHarness::new();
        h.lookup
            .add_offset_country_zone("us", PST_OFFSET, "America/Los_Angeles");

        h.machine.handle_network_available();
        h.machine.handle_country_detected("us");
        h.machine
            .handle_nitz_received(signal(50_000, UTC_2020, PST_OFFSET));

        assert_eq!(
            h.service.last_zone(),
            Some(ZoneId::new("America/Los_Angeles"))
        );
        assert!(h.machine.zone_detection_successful());

        let suggestions = h.service.time_suggestions();
        assert_eq!(suggestions.len(), 1);
        let utc = suggestions[0].utc.unwrap();
        assert_eq!(utc.utc_millis, UTC_2020);
        assert_eq!(utc.reference_millis, 50_000);
        assert!(h.wake_lock.balanced());
    }

    #[test]
    fn test_flight_clears_then_reattach_resolves_again() {
        let mut h = DetectionHarness::new();
        h.lookup
            .add_offset_country_zone("us", PST_OFFSET, "America/Los_Angeles");
        h.lookup
            .add_offset_country_zone("nl", 3_600_000, "Europe/Amsterdam");

        h.machine.handle_country_detected("us");
        h.machine
            .handle_nitz_received(signal(50_000, UTC_2020, PST_OFFSET));

        // Takeoff.
        h.machine.handle_airplane_mode_changed(true);
        let suggestions = h.service.time_suggestions();
        assert!(suggestions.last().unwrap().is_withdrawal());

        // Landing in a new country; everything is re-derived from scratch.
        h.machine.handle_airplane_mode_changed(false);
        h.device.set_elapsed(9_000_000);
        h.machine.handle_network_available();
        h.machine.handle_country_detected("nl");
        h.machine
            .handle_nitz_received(signal(8_950_000, UTC_2020 + 39_600_000, 3_600_000));

        assert_eq!(h.service.last_zone(), Some(ZoneId::new("Europe/Amsterdam")));
        assert!(h.machine.zone_detection_successful());
        assert!(h.wake_lock.balanced());
    }

    #[test]
    fn test_roaming_country_change_rederives_zone() {
        let mut h = DetectionHarness::new();
        h.lookup
            .add_offset_country_zone("us", EST_OFFSET, "America/New_York");
        h.lookup
            .add_offset_country_zone("ca", EST_OFFSET, "America/Toronto");

        h.machine.handle_country_detected("us");
        h.machine
            .handle_nitz_received(signal(50_000, UTC_2020, EST_OFFSET));
        assert_eq!(h.service.last_zone(), Some(ZoneId::new("America/New_York")));

        // Crossing the border: the retained signal pairs with the new
        // country.
        h.machine.handle_country_detected("ca");
        assert_eq!(h.service.last_zone(), Some(ZoneId::new("America/Toronto")));
    }

    #[test]
    fn test_repeat_suppressed_but_drift_resuggested() {
        let mut h = DetectionHarness::new();

        h.machine
            .handle_nitz_received(signal(50_000, UTC_2020, PST_OFFSET));
        assert_eq!(h.service.time_suggestions().len(), 1);

        // Consistent repeat shortly after: rate limited.
        h.device.set_elapsed(110_000);
        h.machine
            .handle_nitz_received(signal(60_000, UTC_2020 + 10_000, PST_OFFSET));
        assert_eq!(h.service.time_suggestions().len(), 1);

        // Same cadence but the clock jumped well past the drift threshold.
        h.device.set_elapsed(120_000);
        h.machine
            .handle_nitz_received(signal(70_000, UTC_2020 + 3_620_000, PST_OFFSET));
        assert_eq!(h.service.time_suggestions().len(), 2);
    }

    #[test]
    fn test_network_loss_degrades_to_country_only() {
        let mut h = DetectionHarness::new();
        h.lookup
            .add_offset_country_zone("nl", 3_600_000, "Europe/Amsterdam");
        h.lookup
            .add_country_zone("nl", "Europe/Amsterdam", ZoneQuality::SingleZone);

        h.machine.handle_country_detected("nl");
        h.machine
            .handle_nitz_received(signal(50_000, UTC_2020, 3_600_000));
        h.machine.handle_network_unavailable();

        // The country alone still supports the single-zone answer.
        assert_eq!(
            h.machine.saved_zone(),
            Some(&ZoneId::new("Europe/Amsterdam"))
        );
        assert!(!h.machine.zone_detection_successful());
        assert!(h.service.time_suggestions().last().unwrap().is_withdrawal());
    }

    #[test]
    fn test_send_retry_then_delivery_report() {
        let h = DispatchHarness::default();
        let token = h.dispatcher.send(
            SmsTracker::new("+15550001", vec![0x01, 0x00, 0x0b])
                .with_status_report(),
        );

        // Transient network failure, then acceptance on the retry.
        h.dispatcher
            .on_send_result(token, 0x21, SendStatus::ErrorRetry, 0, 0)
            .unwrap();
        let retry_token = h.network.last_token().unwrap();
        assert_ne!(retry_token, token);
        h.dispatcher
            .on_send_result(retry_token, 0x21, SendStatus::Ok, 0, 0)
            .unwrap();

        assert_eq!(h.observer.sent(), ["+15550001"]);
        assert_eq!(h.dispatcher.in_flight(), 1);

        // Delivery confirmed end to end.
        h.reports.push(true, true);
        h.dispatcher
            .on_status_report(
                900,
                &StatusReport {
                    message_ref: 0x21,
                    format: SmsFormat::ThreeGpp,
                    pdu: vec![0x06, 0x21],
                },
            )
            .unwrap();

        assert_eq!(h.dispatcher.in_flight(), 0);
        assert_eq!(h.network.report_acks(), [(900, 0x21, true)]);
    }

    #[test]
    fn test_degraded_network_hands_off_to_fallback() {
        let h = DispatchHarness::default();
        let token = h
            .dispatcher
            .send(SmsTracker::new("+15550002", vec![0x01, 0x00]));
        h.dispatcher
            .on_send_result(token, 0x22, SendStatus::ErrorFallback, 0, 0)
            .unwrap();

        let handed_off = h.fallback.resubmitted();
        assert_eq!(handed_off.len(), 1);
        assert_eq!(handed_off[0].dest_addr, "+15550002");
        assert_eq!(handed_off[0].retry_count, 1);
        assert_eq!(h.dispatcher.in_flight(), 0);
        assert!(h.observer.sent().is_empty());
    }

    proptest! {
        /// A burst of consistent repeats inside the rate-limit window never
        /// produces more than the initial clock suggestion, no matter the
        /// cadence.
        #[test]
        fn prop_consistent_burst_suggests_once(
            // Cumulative gap stays inside the 600s spacing window.
            gaps in proptest::collection::vec(1i64..100_000, 1..6),
        ) {
            let mut h = DetectionHarness::new();
            let mut reference = 50_000i64;
            let mut utc = UTC_2020;
            h.machine.handle_nitz_received(signal(reference, utc, PST_OFFSET));

            for gap in gaps {
                reference += gap;
                utc += gap;
                h.device.set_elapsed(reference + 1_000);
                h.machine.handle_nitz_received(signal(reference, utc, PST_OFFSET));
            }

            prop_assert_eq!(h.service.time_suggestions().len(), 1);
            prop_assert!(h.wake_lock.balanced());
        }
    }

    #[test]
    fn test_inbound_collected_and_acked() {
        let h = DispatchHarness::default();
        h.dispatcher.on_inbound(
            77,
            &meridian_sms::InboundSms {
                message_ref: 0x30,
                format: SmsFormat::ThreeGpp,
                pdu: vec![0x04, 0x0b],
            },
        );

        assert_eq!(h.inbound.delivered().len(), 1);
        assert_eq!(h.network.inbound_acks().len(), 1);
    }
}
