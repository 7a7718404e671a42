//! Network time signal types
//!
//! A NITZ signal carries the network's guess at the current UTC time plus
//! local offset information. Signals arrive already decoded; Meridian never
//! touches the wire encoding.

use crate::ZoneId;

/// Decoded contents of a single NITZ message.
///
/// Immutable once constructed. The emulator host zone is a test-only escape
/// hatch: when present it overrides all zone lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NitzData {
    /// The network's UTC epoch time guess, in milliseconds.
    pub utc_millis: i64,
    /// Total local offset from UTC in milliseconds (including any DST).
    pub local_offset_millis: i32,
    /// DST component of the offset, if the network reported one.
    pub dst_adjustment_millis: Option<i32>,
    /// Host zone override supplied by emulated networks only.
    pub emulator_host_zone: Option<ZoneId>,
}

impl NitzData {
    pub fn new(utc_millis: i64, local_offset_millis: i32) -> Self {
        NitzData {
            utc_millis,
            local_offset_millis,
            dst_adjustment_millis: None,
            emulator_host_zone: None,
        }
    }

    pub fn with_dst(mut self, dst_millis: i32) -> Self {
        self.dst_adjustment_millis = Some(dst_millis);
        self
    }

    pub fn with_emulator_zone(mut self, zone: ZoneId) -> Self {
        self.emulator_host_zone = Some(zone);
        self
    }

    /// Compares the discrete offset fields, ignoring the continuous UTC time.
    /// Any difference here means a signal must be processed regardless of how
    /// recently the previous one arrived.
    pub fn offset_info_eq(&self, other: &NitzData) -> bool {
        self.local_offset_millis == other.local_offset_millis
            && self.dst_adjustment_millis == other.dst_adjustment_millis
            && self.emulator_host_zone == other.emulator_host_zone
    }
}

/// A NITZ signal stamped with the monotonic clock reading at receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NitzSignal {
    /// Monotonic (elapsed realtime) timestamp at receipt, milliseconds.
    pub reference_millis: i64,
    pub data: NitzData,
}

impl NitzSignal {
    pub fn new(reference_millis: i64, data: NitzData) -> Self {
        NitzSignal {
            reference_millis,
            data,
        }
    }
}

/// A UTC time paired with the monotonic reference it was captured against.
/// Used both as the time-suggestion payload and as the rate-limiting anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimestampedUtc {
    pub reference_millis: i64,
    pub utc_millis: i64,
}

impl TimestampedUtc {
    pub fn new(reference_millis: i64, utc_millis: i64) -> Self {
        TimestampedUtc {
            reference_millis,
            utc_millis,
        }
    }

    /// Monotonic time elapsed from `earlier` to `self`. Saturates at the
    /// i64 bounds; both stamps can be network-influenced.
    #[inline]
    pub fn elapsed_since(&self, earlier: &TimestampedUtc) -> i64 {
        self.reference_millis.saturating_sub(earlier.reference_millis)
    }

    /// How many milliseconds the UTC guess gained (or lost, negative)
    /// relative to the monotonic clock since `earlier`. Zero for a pair of
    /// perfectly consistent signals; saturates for extreme UTC guesses.
    #[inline]
    pub fn drift_since(&self, earlier: &TimestampedUtc) -> i64 {
        self.utc_millis
            .saturating_sub(earlier.utc_millis)
            .saturating_sub(self.elapsed_since(earlier))
    }
}

impl From<&NitzSignal> for TimestampedUtc {
    fn from(signal: &NitzSignal) -> Self {
        TimestampedUtc::new(signal.reference_millis, signal.data.utc_millis)
    }
}
