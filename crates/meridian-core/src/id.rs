//! Identifier types

use std::fmt;

/// Identifies the signal source (phone slot) behind a suggestion.
/// Multi-SIM devices run one detection machine per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub fn new(id: u32) -> Self {
        SlotId(id)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot{}", self.0)
    }
}

/// An IANA time zone identifier, e.g. "America/Los_Angeles".
///
/// Meridian never interprets the id itself; it is an opaque key produced by
/// the zone lookup collaborator and consumed by the time service.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        ZoneId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneId({})", self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(s: &str) -> Self {
        ZoneId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id_display() {
        let zone = ZoneId::new("Europe/London");
        assert_eq!(zone.as_str(), "Europe/London");
        assert_eq!(zone.to_string(), "Europe/London");
    }
}
