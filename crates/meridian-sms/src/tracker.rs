//! In-flight message tracking types

/// Encoding family of an SMS payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmsFormat {
    /// GSM / TS 23.040.
    ThreeGpp,
    /// CDMA / 3GPP2.
    ThreeGpp2,
    Unknown,
}

impl SmsFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SmsFormat::ThreeGpp => "3gpp",
            SmsFormat::ThreeGpp2 => "3gpp2",
            SmsFormat::Unknown => "unknown",
        }
    }
}

/// One outbound message while in flight. Owned exclusively by the
/// dispatcher's tracking map between submission and terminal outcome.
#[derive(Clone, Debug)]
pub struct SmsTracker {
    /// Protocol-level message reference (TP-MR); assigned asynchronously by
    /// the network on the first send result.
    pub message_ref: Option<u8>,
    pub retry_count: u32,
    pub dest_addr: String,
    /// Encoded submit PDU. The dispatcher treats it as opaque except for the
    /// retry re-stamp on 3GPP resubmission.
    pub pdu: Vec<u8>,
    /// Service-center address, when the payload carries one.
    pub smsc: Option<Vec<u8>>,
    /// Whether the sender asked for a delivery status report. Trackers that
    /// did stay alive until the report sequence completes.
    pub wants_status_report: bool,
    /// Caller-supplied correlation id for diagnostics.
    pub message_id: u64,
}

impl SmsTracker {
    pub fn new(dest_addr: impl Into<String>, pdu: Vec<u8>) -> Self {
        SmsTracker {
            message_ref: None,
            retry_count: 0,
            dest_addr: dest_addr.into(),
            pdu,
            smsc: None,
            wants_status_report: false,
            message_id: 0,
        }
    }

    pub fn with_status_report(mut self) -> Self {
        self.wants_status_report = true;
        self
    }

    pub fn with_smsc(mut self, smsc: Vec<u8>) -> Self {
        self.smsc = Some(smsc);
        self
    }

    pub fn with_message_id(mut self, id: u64) -> Self {
        self.message_id = id;
        self
    }
}

/// Network verdict on a send attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendStatus {
    /// Delivered to the network.
    Ok,
    /// Terminal failure; do not retry on any path.
    Error,
    /// Transient failure; retry over the same path.
    ErrorRetry,
    /// This path cannot deliver; hand off to the fallback transport.
    ErrorFallback,
}

/// Why a message terminally failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCause {
    /// The network rejected the message.
    Network { reason: i32, network_code: i32 },
    /// The retry budget ran out.
    RetriesExhausted,
}

/// A decoded delivery status report. Multiple partial reports may arrive for
/// one message before the sequence completes.
#[derive(Clone, Debug)]
pub struct StatusReport {
    pub message_ref: u8,
    pub format: SmsFormat,
    pub pdu: Vec<u8>,
}

/// A decoded inbound message.
#[derive(Clone, Debug)]
pub struct InboundSms {
    pub message_ref: u8,
    pub format: SmsFormat,
    pub pdu: Vec<u8>,
}

/// Outcome of handing a status report to the report handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportDisposition {
    /// Whether the report was understood; drives the network ack.
    pub success: bool,
    /// Whether the report sequence for this message is finished and the
    /// tracker can be dropped.
    pub complete: bool,
}

/// Result of delivering an inbound message to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliverStatus {
    Ok,
    ErrorNoMemory,
    ErrorNotSupported,
    ErrorGeneric,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_builder() {
        let tracker = SmsTracker::new("+15551234567", vec![0x01, 0x00])
            .with_status_report()
            .with_message_id(42);
        assert!(tracker.wants_status_report);
        assert_eq!(tracker.message_id, 42);
        assert_eq!(tracker.retry_count, 0);
        assert_eq!(tracker.message_ref, None);
    }

    #[test]
    fn test_format_strings() {
        assert_eq!(SmsFormat::ThreeGpp.as_str(), "3gpp");
        assert_eq!(SmsFormat::ThreeGpp2.as_str(), "3gpp2");
    }
}
