//! Network country code tri-state

use std::fmt;

/// The country associated with the serving network.
///
/// Three logical states, all of which detection logic must distinguish:
/// no information at all, a test network that cannot infer a country
/// (bogus MCC such as "001"), and a known ISO 3166 alpha-2 code.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CountryCode {
    /// No country information has been received.
    #[default]
    Unknown,
    /// A network was seen but no country can be inferred from it.
    TestNetwork,
    /// A known country, lower-case ISO 3166 alpha-2.
    Known(String),
}

impl CountryCode {
    /// Builds a country code from a raw network-reported string. Empty input
    /// means a test network; anything else is normalized to lower case.
    pub fn from_network(iso: &str) -> Self {
        if iso.is_empty() {
            CountryCode::TestNetwork
        } else {
            CountryCode::Known(iso.to_ascii_lowercase())
        }
    }

    /// The ISO code when the country is actually known.
    pub fn known_iso(&self) -> Option<&str> {
        match self {
            CountryCode::Known(iso) => Some(iso),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, CountryCode::Unknown)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryCode::Unknown => f.write_str("<unknown>"),
            CountryCode::TestNetwork => f.write_str("<test-network>"),
            CountryCode::Known(iso) => f.write_str(iso),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_network_empty_is_test_network() {
        assert_eq!(CountryCode::from_network(""), CountryCode::TestNetwork);
    }

    #[test]
    fn test_from_network_lower_cases() {
        assert_eq!(
            CountryCode::from_network("US"),
            CountryCode::Known("us".to_string())
        );
    }

    #[test]
    fn test_known_iso() {
        assert_eq!(CountryCode::from_network("gb").known_iso(), Some("gb"));
        assert_eq!(CountryCode::Unknown.known_iso(), None);
        assert_eq!(CountryCode::TestNetwork.known_iso(), None);
    }
}
