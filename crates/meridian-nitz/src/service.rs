//! Zone lookup and time service collaborators

use meridian_core::{CountryResult, NitzData, OffsetResult, TimeSuggestion, ZoneId};

/// Time zone database queries. Backed by the platform zone tables; Meridian
/// only interprets the results.
pub trait ZoneLookup: Send + Sync {
    /// Look up a zone from the signal's offset information alone. Used on
    /// test networks where no country is available; correct only in a few
    /// cases but at least the offset will match.
    fn lookup_by_offset(&self, data: &NitzData) -> Option<OffsetResult>;

    /// Combined offset + country lookup.
    fn lookup_by_offset_and_country(&self, data: &NitzData, iso: &str) -> Option<OffsetResult>;

    /// Country-only lookup, qualified by a confidence classification.
    /// `when_millis` matters because zone membership changes over time.
    fn lookup_by_country(&self, iso: &str, when_millis: i64) -> Option<CountryResult>;

    /// Whether the country observes UTC (offset zero) at the given time.
    fn country_uses_utc(&self, iso: &str, when_millis: i64) -> bool;
}

/// The device's time and time zone detection services.
pub trait TimeService: Send + Sync {
    /// Push a time suggestion (or withdrawal) for this slot.
    fn suggest_time(&self, suggestion: TimeSuggestion);

    /// Set the device time zone. Idempotent; callers may repeat the same id.
    fn set_zone(&self, zone: &ZoneId);

    /// Whether automatic time zone detection is currently enabled. When off,
    /// resolved zones are remembered but not applied.
    fn auto_zone_detection_enabled(&self) -> bool;

    /// Whether the device time zone has ever been explicitly set, by the
    /// user or by detection. A default zone reported before initialization
    /// is meaningless.
    fn zone_setting_initialized(&self) -> bool;
}
