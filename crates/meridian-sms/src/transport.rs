//! Transport and host collaborator traits

use meridian_core::MeridianResult;

use crate::{
    DeliverStatus, InboundSms, ReportDisposition, SmsFormat, SmsTracker, StatusReport,
};

/// The IMS transport. Submission is asynchronous: a successful `submit` only
/// means the request was handed to the service; the verdict arrives later via
/// the dispatcher's `on_send_result`.
pub trait SmsTransport: Send + Sync {
    fn format(&self) -> SmsFormat;

    /// Hand one message to the network. `is_retry` marks resubmission of a
    /// previously failed message.
    fn submit(
        &self,
        token: u32,
        message_ref: Option<u8>,
        format: SmsFormat,
        smsc: Option<&[u8]>,
        is_retry: bool,
        pdu: &[u8],
    ) -> MeridianResult<()>;

    /// Acknowledge a delivery status report back to the network.
    fn ack_report(&self, token: u32, message_ref: u8, success: bool) -> MeridianResult<()>;

    /// Acknowledge an inbound message.
    fn ack_inbound(
        &self,
        token: u32,
        message_ref: u8,
        status: DeliverStatus,
    ) -> MeridianResult<()>;
}

/// The circuit-switched path a message falls back to when IMS gives up on it.
pub trait FallbackTransport: Send + Sync {
    fn resubmit(&self, tracker: SmsTracker);
}

/// Interprets delivery status reports. A single message can receive several
/// partial reports; the handler says when the sequence is done.
pub trait ReportHandler: Send + Sync {
    fn handle_status_report(&self, tracker: &SmsTracker, report: &StatusReport)
        -> ReportDisposition;
}

/// Receives inbound messages.
pub trait InboundHandler: Send + Sync {
    fn deliver(&self, sms: &InboundSms) -> DeliverStatus;
}

/// Observes terminal outcomes of tracked sends.
pub trait SendObserver: Send + Sync {
    fn on_sent(&self, tracker: &SmsTracker);
    fn on_failed(&self, tracker: &SmsTracker, cause: &crate::FailureCause);
}
