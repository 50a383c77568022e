//! Weather descriptor classification
//!
//! Maps the forecast provider's textual descriptors onto the three
//! suitability tiers using a fixed taxonomy, with substring fallback for
//! descriptors the table does not list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Exposure;

/// Day suitability tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherTier {
    /// All POIs reachable
    Outdoor,
    /// Indoor and mixed POIs only
    Indoor,
    /// No POIs; travel not recommended
    Blocked,
}

impl WeatherTier {
    /// Whether a POI with this exposure can be visited under the tier
    pub fn admits(&self, exposure: Exposure) -> bool {
        match self {
            Self::Outdoor => true,
            Self::Indoor => matches!(exposure, Exposure::Indoor | Exposure::Mixed),
            Self::Blocked => false,
        }
    }
}

impl std::fmt::Display for WeatherTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outdoor => write!(f, "outdoor-suitable"),
            Self::Indoor => write!(f, "indoor-suitable"),
            Self::Blocked => write!(f, "not-recommended"),
        }
    }
}

/// Clear or mild conditions: everything is reachable
const OUTDOOR_DESCRIPTORS: &[&str] = &[
    "sunny",
    "clear",
    "mostly clear",
    "fair",
    "partly cloudy",
    "mostly cloudy",
    "cloudy",
    "overcast",
    "haze",
    "hazy",
    "mist",
    "breezy",
];

/// Precipitation that pushes the day indoors
const INDOOR_DESCRIPTORS: &[&str] = &[
    "drizzle",
    "light rain",
    "moderate rain",
    "showers",
    "scattered showers",
    "rain showers",
    "light snow",
    "moderate snow",
    "snow showers",
    "sleet",
    "freezing rain",
    "fog",
];

/// Severe conditions: the day is written off entirely
const BLOCKED_DESCRIPTORS: &[&str] = &[
    "heavy rain",
    "rainstorm",
    "torrential rain",
    "downpour",
    "thunderstorm",
    "severe thunderstorm",
    "heavy snow",
    "snowstorm",
    "blizzard",
    "hail",
    "gale",
    "strong wind",
    "typhoon",
    "hurricane",
    "tropical storm",
    "tornado",
    "sandstorm",
    "dust storm",
    "ice storm",
    "extreme heat",
    "extreme cold",
];

/// Substring fallback, checked in order: severe first, then precipitation
const BLOCKED_KEYWORDS: &[&str] = &["storm", "typhoon", "hurricane", "tornado", "gale", "blizzard", "extreme"];
const PRECIPITATION_KEYWORDS: &[&str] = &["rain", "snow", "sleet", "hail", "drizzle", "shower", "thunder"];

/// Descriptor-to-tier classifier
#[derive(Debug, Clone)]
pub struct WeatherClassifier {
    table: HashMap<&'static str, WeatherTier>,
}

impl Default for WeatherClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClassifier {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        for descriptor in OUTDOOR_DESCRIPTORS {
            table.insert(*descriptor, WeatherTier::Outdoor);
        }
        for descriptor in INDOOR_DESCRIPTORS {
            table.insert(*descriptor, WeatherTier::Indoor);
        }
        for descriptor in BLOCKED_DESCRIPTORS {
            table.insert(*descriptor, WeatherTier::Blocked);
        }
        Self { table }
    }

    /// Classify a forecast descriptor
    ///
    /// Exact table match first; unseen descriptors fall back to keyword
    /// matching, and anything unrecognized defaults to outdoor-suitable.
    pub fn classify(&self, descriptor: &str) -> WeatherTier {
        let normalized = descriptor.trim().to_lowercase();

        if let Some(tier) = self.table.get(normalized.as_str()) {
            return *tier;
        }

        if BLOCKED_KEYWORDS.iter().any(|k| normalized.contains(k)) {
            return WeatherTier::Blocked;
        }
        if PRECIPITATION_KEYWORDS.iter().any(|k| normalized.contains(k)) {
            return WeatherTier::Indoor;
        }

        WeatherTier::Outdoor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_table_matches() {
        let classifier = WeatherClassifier::new();

        assert_eq!(classifier.classify("clear"), WeatherTier::Outdoor);
        assert_eq!(classifier.classify("Cloudy"), WeatherTier::Outdoor);
        assert_eq!(classifier.classify("light rain"), WeatherTier::Indoor);
        assert_eq!(classifier.classify("light snow"), WeatherTier::Indoor);
        assert_eq!(classifier.classify("typhoon"), WeatherTier::Blocked);
        assert_eq!(classifier.classify("gale"), WeatherTier::Blocked);
    }

    #[test]
    fn test_substring_fallback() {
        let classifier = WeatherClassifier::new();

        // Unseen severe descriptors hit the keyword pass
        assert_eq!(classifier.classify("super typhoon approaching"), WeatherTier::Blocked);
        assert_eq!(classifier.classify("afternoon thunderstorms"), WeatherTier::Blocked);

        // Unseen precipitation falls back to indoor
        assert_eq!(classifier.classify("patchy rain nearby"), WeatherTier::Indoor);
        assert_eq!(classifier.classify("wintry snow flurries"), WeatherTier::Indoor);

        // Anything else defaults to outdoor
        assert_eq!(classifier.classify("smoke"), WeatherTier::Outdoor);
    }

    #[test]
    fn test_severe_beats_precipitation_keywords() {
        let classifier = WeatherClassifier::new();
        // Contains both "rain" and "storm"; severe wins
        assert_eq!(classifier.classify("rainstorms likely"), WeatherTier::Blocked);
    }

    #[test]
    fn test_tier_admits() {
        use crate::domain::Exposure;

        assert!(WeatherTier::Outdoor.admits(Exposure::Outdoor));
        assert!(WeatherTier::Outdoor.admits(Exposure::Indoor));

        assert!(WeatherTier::Indoor.admits(Exposure::Indoor));
        assert!(WeatherTier::Indoor.admits(Exposure::Mixed));
        assert!(!WeatherTier::Indoor.admits(Exposure::Outdoor));

        assert!(!WeatherTier::Blocked.admits(Exposure::Indoor));
        assert!(!WeatherTier::Blocked.admits(Exposure::Mixed));
    }
}
