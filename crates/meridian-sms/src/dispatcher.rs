//! SMS-over-IMS dispatcher
//!
//! Tracks outbound messages by token, applies the bounded retry / fallback
//! policy, and reconciles asynchronous send results and status reports.
//! Unlike the detection machine, this type is built for concurrent access:
//! submissions and network callbacks arrive on independent threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use meridian_core::{MeridianError, MeridianResult};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    DeliverStatus, FailureCause, FallbackTransport, InboundHandler, InboundSms, ReportHandler,
    SendObserver, SendStatus, SmsFormat, SmsTracker, SmsTransport, StatusReport,
};

/// Dispatcher policy knobs.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Maximum same-path retries per message. Exhaustion is a terminal
    /// failure; the network's retry verdict alone never loops forever.
    pub max_send_retries: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            max_send_retries: 3,
        }
    }
}

/// The three independently updated availability inputs. Kept behind one lock
/// so `is_available` never observes a torn combination.
#[derive(Clone, Copy, Debug, Default)]
struct Availability {
    service_up: bool,
    registered: bool,
    sms_capable: bool,
}

/// What a send-result callback decided, computed under the tracker lock and
/// acted on outside it.
enum Action {
    Sent { tracker: SmsTracker },
    Failed { tracker: SmsTracker, cause: FailureCause },
    Resend(SmsTracker),
    Fallback(SmsTracker),
}

pub struct ImsSmsDispatcher {
    config: DispatcherConfig,
    transport: Arc<dyn SmsTransport>,
    fallback: Arc<dyn FallbackTransport>,
    reports: Arc<dyn ReportHandler>,
    inbound: Arc<dyn InboundHandler>,
    observer: Arc<dyn SendObserver>,

    trackers: Mutex<HashMap<u32, SmsTracker>>,
    next_token: AtomicU32,
    availability: Mutex<Availability>,
}

impl ImsSmsDispatcher {
    pub fn new(
        config: DispatcherConfig,
        transport: Arc<dyn SmsTransport>,
        fallback: Arc<dyn FallbackTransport>,
        reports: Arc<dyn ReportHandler>,
        inbound: Arc<dyn InboundHandler>,
        observer: Arc<dyn SendObserver>,
    ) -> Self {
        ImsSmsDispatcher {
            config,
            transport,
            fallback,
            reports,
            inbound,
            observer,
            trackers: Mutex::new(HashMap::new()),
            next_token: AtomicU32::new(0),
            availability: Mutex::new(Availability::default()),
        }
    }

    /// Whether this path can currently carry messages: service connection
    /// up, registration active, and the SMS capability advertised, read as
    /// one atomic combination.
    pub fn is_available(&self) -> bool {
        let a = *self.availability.lock();
        debug!(
            service_up = a.service_up,
            registered = a.registered,
            sms_capable = a.sms_capable,
            "availability check"
        );
        a.service_up && a.registered && a.sms_capable
    }

    pub fn on_service_state(&self, up: bool) {
        self.availability.lock().service_up = up;
    }

    pub fn on_registration_state(&self, registered: bool) {
        self.availability.lock().registered = registered;
    }

    pub fn on_capabilities(&self, sms_capable: bool) {
        self.availability.lock().sms_capable = sms_capable;
    }

    /// Outgoing messages over IMS are never held back in emergency callback
    /// mode; that restriction applies only to the circuit-switched CDMA
    /// path.
    pub fn blocks_sends_in_emergency_callback(&self) -> bool {
        false
    }

    /// Submits a message and starts tracking it. Returns the token the
    /// network callbacks will use. A transport-level submit failure does not
    /// surface to the caller; the message falls back immediately.
    pub fn send(&self, mut tracker: SmsTracker) -> u32 {
        let format = self.transport.format();
        let is_retry = tracker.retry_count > 0;

        if format == SmsFormat::ThreeGpp && is_retry {
            restamp_retry_pdu(&mut tracker);
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            token,
            retry_count = tracker.retry_count,
            message_ref = ?tracker.message_ref,
            "sending over ims"
        );

        let message_ref = tracker.message_ref;
        let smsc = tracker.smsc.clone();
        let pdu = tracker.pdu.clone();
        self.trackers.lock().insert(token, tracker);

        if let Err(e) =
            self.transport
                .submit(token, message_ref, format, smsc.as_deref(), is_retry, &pdu)
        {
            warn!(token, error = %e, "submit failed, falling back");
            self.fall_back(token);
        }
        token
    }

    /// Network verdict on a send attempt.
    pub fn on_send_result(
        &self,
        token: u32,
        message_ref: u8,
        status: SendStatus,
        reason: i32,
        network_code: i32,
    ) -> MeridianResult<()> {
        let action = {
            let mut trackers = self.trackers.lock();
            let Some(mut tracker) = trackers.remove(&token) else {
                return Err(MeridianError::UnknownToken(token));
            };
            tracker.message_ref = Some(message_ref);

            match status {
                SendStatus::Ok => {
                    if tracker.wants_status_report {
                        // Stay tracked until the report sequence completes.
                        trackers.insert(token, tracker.clone());
                    }
                    Action::Sent { tracker }
                }
                SendStatus::Error => Action::Failed {
                    tracker,
                    cause: FailureCause::Network {
                        reason,
                        network_code,
                    },
                },
                SendStatus::ErrorRetry => {
                    if tracker.retry_count >= self.config.max_send_retries {
                        Action::Failed {
                            tracker,
                            cause: FailureCause::RetriesExhausted,
                        }
                    } else {
                        tracker.retry_count += 1;
                        Action::Resend(tracker)
                    }
                }
                SendStatus::ErrorFallback => {
                    tracker.retry_count += 1;
                    Action::Fallback(tracker)
                }
            }
        };

        match action {
            Action::Sent { tracker } => {
                debug!(token, dest = %tracker.dest_addr, "message sent");
                self.observer.on_sent(&tracker);
            }
            Action::Failed { tracker, cause } => {
                warn!(token, ?cause, "message failed");
                self.observer.on_failed(&tracker, &cause);
            }
            Action::Resend(tracker) => {
                debug!(token, retry_count = tracker.retry_count, "retrying send");
                self.send(tracker);
            }
            Action::Fallback(tracker) => {
                debug!(token, "falling back to circuit-switched path");
                self.fallback.resubmit(tracker);
            }
        }
        Ok(())
    }

    /// A delivery status report arrived. Reports are correlated by the
    /// protocol message reference, not the token, so this scans the
    /// in-flight map.
    pub fn on_status_report(&self, token: u32, report: &StatusReport) -> MeridianResult<()> {
        let matched = {
            let trackers = self.trackers.lock();
            trackers
                .iter()
                .find(|(_, t)| t.message_ref == Some(report.message_ref))
                .map(|(key, t)| (*key, t.clone()))
        };
        let Some((key, tracker)) = matched else {
            // A report for a message this dispatcher never sent, or one it
            // already finished: a protocol error, not something to drop
            // silently.
            return Err(MeridianError::UnknownMessageRef(report.message_ref));
        };

        let disposition = self.reports.handle_status_report(&tracker, report);
        debug!(
            token,
            message_ref = report.message_ref,
            success = disposition.success,
            complete = disposition.complete,
            "status report handled"
        );

        if let Err(e) = self
            .transport
            .ack_report(token, report.message_ref, disposition.success)
        {
            // The report was processed; a failed ack must not disturb other
            // in-flight trackers.
            warn!(token, error = %e, "failed to acknowledge status report");
        }

        if disposition.complete {
            self.trackers.lock().remove(&key);
        }
        Ok(())
    }

    /// An inbound message arrived; deliver it and acknowledge the result.
    pub fn on_inbound(&self, token: u32, sms: &InboundSms) {
        let status = self.inbound.deliver(sms);
        debug!(token, ?status, "inbound message delivered");
        if let Err(e) = self.transport.ack_inbound(token, sms.message_ref, status) {
            warn!(token, error = %e, "failed to acknowledge inbound message");
        }
    }

    /// Number of messages currently tracked.
    pub fn in_flight(&self) -> usize {
        self.trackers.lock().len()
    }

    /// Snapshot of one in-flight tracker.
    pub fn tracker(&self, token: u32) -> Option<SmsTracker> {
        self.trackers.lock().get(&token).cloned()
    }

    fn fall_back(&self, token: u32) {
        let removed = self.trackers.lock().remove(&token);
        if let Some(tracker) = removed {
            self.fallback.resubmit(tracker);
        }
    }
}

/// Per TS 23.040 9.2.3.6, a resubmitted SMS-SUBMIT carries TP-RD set and
/// TP-MR equal to the previously failed attempt's reference.
fn restamp_retry_pdu(tracker: &mut SmsTracker) {
    let Some(message_ref) = tracker.message_ref else {
        return;
    };
    if tracker.pdu.len() > 1 && tracker.pdu[0] & 0x01 == 0x01 {
        tracker.pdu[0] |= 0x04;
        tracker.pdu[1] = message_ref;
    }
}
