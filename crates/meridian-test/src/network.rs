//! SMS network and host fakes

use std::collections::VecDeque;

use meridian_core::{MeridianError, MeridianResult};
use meridian_sms::{
    DeliverStatus, FailureCause, FallbackTransport, InboundHandler, InboundSms, ReportDisposition,
    ReportHandler, SendObserver, SmsFormat, SmsTracker, SmsTransport, StatusReport,
};
use parking_lot::Mutex;

/// One recorded submission.
#[derive(Clone, Debug)]
pub struct SubmitRecord {
    pub token: u32,
    pub message_ref: Option<u8>,
    pub is_retry: bool,
    pub pdu: Vec<u8>,
}

/// An IMS network fake. Records everything handed to it; tests can script
/// submit failures ahead of time.
pub struct FakeSmsNetwork {
    format: SmsFormat,
    submits: Mutex<Vec<SubmitRecord>>,
    submit_script: Mutex<VecDeque<MeridianResult<()>>>,
    report_acks: Mutex<Vec<(u32, u8, bool)>>,
    inbound_acks: Mutex<Vec<(u32, u8, DeliverStatus)>>,
}

impl FakeSmsNetwork {
    pub fn new(format: SmsFormat) -> Self {
        FakeSmsNetwork {
            format,
            submits: Mutex::new(Vec::new()),
            submit_script: Mutex::new(VecDeque::new()),
            report_acks: Mutex::new(Vec::new()),
            inbound_acks: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next_submit(&self) {
        self.submit_script
            .lock()
            .push_back(Err(MeridianError::TransportUnavailable));
    }

    pub fn submits(&self) -> Vec<SubmitRecord> {
        self.submits.lock().clone()
    }

    pub fn last_token(&self) -> Option<u32> {
        self.submits.lock().last().map(|s| s.token)
    }

    pub fn report_acks(&self) -> Vec<(u32, u8, bool)> {
        self.report_acks.lock().clone()
    }

    pub fn inbound_acks(&self) -> Vec<(u32, u8, DeliverStatus)> {
        self.inbound_acks.lock().clone()
    }
}

impl Default for FakeSmsNetwork {
    fn default() -> Self {
        FakeSmsNetwork::new(SmsFormat::ThreeGpp)
    }
}

impl SmsTransport for FakeSmsNetwork {
    fn format(&self) -> SmsFormat {
        self.format
    }

    fn submit(
        &self,
        token: u32,
        message_ref: Option<u8>,
        _format: SmsFormat,
        _smsc: Option<&[u8]>,
        is_retry: bool,
        pdu: &[u8],
    ) -> MeridianResult<()> {
        self.submits.lock().push(SubmitRecord {
            token,
            message_ref,
            is_retry,
            pdu: pdu.to_vec(),
        });
        self.submit_script.lock().pop_front().unwrap_or(Ok(()))
    }

    fn ack_report(&self, token: u32, message_ref: u8, success: bool) -> MeridianResult<()> {
        self.report_acks.lock().push((token, message_ref, success));
        Ok(())
    }

    fn ack_inbound(
        &self,
        token: u32,
        message_ref: u8,
        status: DeliverStatus,
    ) -> MeridianResult<()> {
        self.inbound_acks.lock().push((token, message_ref, status));
        Ok(())
    }
}

/// Records messages handed off to the circuit-switched path.
#[derive(Default)]
pub struct RecordingFallback {
    resubmitted: Mutex<Vec<SmsTracker>>,
}

impl RecordingFallback {
    pub fn resubmitted(&self) -> Vec<SmsTracker> {
        self.resubmitted.lock().clone()
    }
}

impl FallbackTransport for RecordingFallback {
    fn resubmit(&self, tracker: SmsTracker) {
        self.resubmitted.lock().push(tracker);
    }
}

/// Report handler answering from a script; defaults to success/complete.
#[derive(Default)]
pub struct ScriptedReports {
    script: Mutex<VecDeque<ReportDisposition>>,
}

impl ScriptedReports {
    pub fn push(&self, success: bool, complete: bool) {
        self.script
            .lock()
            .push_back(ReportDisposition { success, complete });
    }
}

impl ReportHandler for ScriptedReports {
    fn handle_status_report(
        &self,
        _tracker: &SmsTracker,
        _report: &StatusReport,
    ) -> ReportDisposition {
        self.script.lock().pop_front().unwrap_or(ReportDisposition {
            success: true,
            complete: true,
        })
    }
}

/// Collects inbound messages and acknowledges them all as delivered.
#[derive(Default)]
pub struct CollectingInbound {
    delivered: Mutex<Vec<InboundSms>>,
}

impl CollectingInbound {
    pub fn delivered(&self) -> Vec<InboundSms> {
        self.delivered.lock().clone()
    }
}

impl InboundHandler for CollectingInbound {
    fn deliver(&self, sms: &InboundSms) -> DeliverStatus {
        self.delivered.lock().push(sms.clone());
        DeliverStatus::Ok
    }
}

/// Records terminal send outcomes by destination address.
#[derive(Default)]
pub struct RecordingObserver {
    sent: Mutex<Vec<String>>,
    failed: Mutex<Vec<(String, FailureCause)>>,
}

impl RecordingObserver {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn failed(&self) -> Vec<(String, FailureCause)> {
        self.failed.lock().clone()
    }
}

impl SendObserver for RecordingObserver {
    fn on_sent(&self, tracker: &SmsTracker) {
        self.sent.lock().push(tracker.dest_addr.clone());
    }

    fn on_failed(&self, tracker: &SmsTracker, cause: &FailureCause) {
        self.failed.lock().push((tracker.dest_addr.clone(), *cause));
    }
}
