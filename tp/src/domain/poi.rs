//! Candidate point-of-interest types
//!
//! A `CandidatePoi` is read-only catalog data. The planner works on
//! run-scoped [`ScoredPoi`] copies that carry the derived score and, once
//! allocated, the day index.

use serde::{Deserialize, Serialize};

/// Geographic coordinate (decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Whether a POI is visited indoors, outdoors, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exposure {
    Indoor,
    Outdoor,
    Mixed,
}

impl std::fmt::Display for Exposure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indoor => write!(f, "indoor"),
            Self::Outdoor => write!(f, "outdoor"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// One attraction candidate from the catalog
///
/// `name` is the unique key within a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePoi {
    /// Unique name within a run
    pub name: String,

    /// Suggested visit duration in hours
    pub duration_hours: f64,

    /// Ticket price per person
    pub ticket_price: f64,

    /// Popularity score, typically in 0.0..=1.0
    pub popularity: f64,

    /// Free-form tags ("history", "theme-park", ...)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Suitable for groups that include children
    #[serde(default)]
    pub child_friendly: bool,

    /// Suitable for groups that include elderly travelers
    #[serde(default)]
    pub elderly_friendly: bool,

    /// Indoor/outdoor/mixed classification
    pub exposure: Exposure,

    /// Location
    pub coordinate: Coordinate,
}

impl CandidatePoi {
    /// Check whether any tag matches a name in `names` (case-insensitive)
    pub fn has_tag_in(&self, names: &[String]) -> bool {
        self.tags
            .iter()
            .any(|t| names.iter().any(|n| t.eq_ignore_ascii_case(n.trim())))
    }
}

/// Run-scoped copy of a catalog POI with its derived score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoi {
    /// The underlying catalog entry
    pub poi: CandidatePoi,

    /// Desirability score assigned by the scorer
    pub score: f64,

    /// Day index (0-based) once allocated, None while in the pool
    pub day: Option<usize>,
}

impl ScoredPoi {
    pub fn new(poi: CandidatePoi, score: f64) -> Self {
        Self { poi, score, day: None }
    }

    pub fn name(&self) -> &str {
        &self.poi.name
    }

    pub fn duration_hours(&self) -> f64 {
        self.poi.duration_hours
    }
}
