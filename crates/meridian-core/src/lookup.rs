//! Zone lookup result types

use crate::ZoneId;

/// Result of an offset-based lookup (offset-only or offset+country).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetResult {
    pub zone: ZoneId,
    /// True when the offset matched exactly one candidate zone.
    pub is_only_match: bool,
}

impl OffsetResult {
    pub fn new(zone: ZoneId, is_only_match: bool) -> Self {
        OffsetResult {
            zone,
            is_only_match,
        }
    }
}

/// Confidence classification of a country-only lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneQuality {
    /// The country has exactly one time zone.
    SingleZone,
    /// Multiple zones, but the default is considered a good answer in most
    /// cases.
    DefaultBoosted,
    /// Multiple zones with an ordinary default.
    DefaultNotBoosted,
    /// Multiple zones and no basis to prefer any of them.
    MultipleZonesLowConfidence,
}

impl ZoneQuality {
    /// Whether a country-only result is trustworthy enough to act on when
    /// prior zone state already exists.
    #[inline]
    pub fn is_high_confidence(self) -> bool {
        matches!(self, ZoneQuality::SingleZone | ZoneQuality::DefaultBoosted)
    }
}

/// Result of a country-only lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryResult {
    pub zone: ZoneId,
    pub quality: ZoneQuality,
}

impl CountryResult {
    pub fn new(zone: ZoneId, quality: ZoneQuality) -> Self {
        CountryResult { zone, quality }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_confidence_gate() {
        assert!(ZoneQuality::SingleZone.is_high_confidence());
        assert!(ZoneQuality::DefaultBoosted.is_high_confidence());
        assert!(!ZoneQuality::DefaultNotBoosted.is_high_confidence());
        assert!(!ZoneQuality::MultipleZonesLowConfidence.is_high_confidence());
    }
}
