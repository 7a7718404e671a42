//! Suggestions pushed to the time / time zone detection services

use crate::{SlotId, TimestampedUtc};

/// A time suggestion for one slot. A `None` payload withdraws any previous
/// suggestion from the same slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSuggestion {
    pub slot: SlotId,
    pub utc: Option<TimestampedUtc>,
    /// Free-form reason recorded for diagnostics.
    pub why: String,
}

impl TimeSuggestion {
    pub fn new(slot: SlotId, utc: TimestampedUtc, why: impl Into<String>) -> Self {
        TimeSuggestion {
            slot,
            utc: Some(utc),
            why: why.into(),
        }
    }

    /// An explicit empty suggestion: "this slot no longer has an opinion".
    pub fn withdrawal(slot: SlotId, why: impl Into<String>) -> Self {
        TimeSuggestion {
            slot,
            utc: None,
            why: why.into(),
        }
    }

    #[inline]
    pub fn is_withdrawal(&self) -> bool {
        self.utc.is_none()
    }
}
