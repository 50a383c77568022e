//! Daily plan types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::poi::ScoredPoi;
use crate::weather::WeatherTier;

/// Time-utilization band for one day
///
/// Utilization is allocated POI hours over the day's POI-time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Under 50% utilized
    TooLittle,
    /// 50-60%
    Light,
    /// 60-90%, the target band
    Reasonable,
    /// 90-110%
    Tight,
    /// Over 110%
    TooMuch,
}

impl BalanceStatus {
    /// Whether the day sits in the target band
    pub fn is_reasonable(&self) -> bool {
        matches!(self, Self::Reasonable)
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLittle => write!(f, "too little"),
            Self::Light => write!(f, "light"),
            Self::Reasonable => write!(f, "reasonable"),
            Self::Tight => write!(f, "tight"),
            Self::TooMuch => write!(f, "too much"),
        }
    }
}

/// One day's visit plan
///
/// Invariant: `allocated_hours` never exceeds `poi_budget_hours` at the
/// moment allocation closes, and `remaining_hours` is a decreasing counter
/// that never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,

    /// Weather tier the gate assigned to this date
    pub tier: WeatherTier,

    /// Allocated POIs, in visit order
    pub pois: Vec<ScoredPoi>,

    /// Sum of allocated POI durations
    pub allocated_hours: f64,

    /// POI-time budget left on this day
    pub remaining_hours: f64,

    /// POI-time budget the day started with (daily cap minus reserve)
    pub poi_budget_hours: f64,

    /// Hours held back for transport
    pub transport_reserve_hours: f64,

    /// Allocated POI hours plus the transport reserve
    pub estimated_total_hours: f64,

    /// allocated_hours / poi_budget_hours
    pub utilization: f64,

    pub status: BalanceStatus,

    /// Human-readable adjustment hint for days outside the target band
    pub suggestion: Option<String>,
}

impl DailyPlan {
    /// Sum of POI durations currently assigned
    pub fn poi_hours(&self) -> f64 {
        self.pois.iter().map(|p| p.duration_hours()).sum()
    }

    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pois.iter().any(|p| p.name() == name)
    }
}

/// Non-fatal condition surfaced to the caller; planning continues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AllocationWarning {
    /// A must-visit POI fit on no day
    MustVisitUnplaced { name: String, duration_hours: f64 },

    /// More than one high-duration POI landed on the same day
    MultipleLongVisits { date: NaiveDate, count: usize },

    /// A day ended far outside the target utilization band
    Unbalanced {
        date: NaiveDate,
        status: BalanceStatus,
        utilization: f64,
    },
}

impl std::fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MustVisitUnplaced { name, duration_hours } => {
                write!(f, "must-visit {name} ({duration_hours}h) fits on no day")
            }
            Self::MultipleLongVisits { date, count } => {
                write!(f, "{date} holds {count} high-duration visits")
            }
            Self::Unbalanced { date, status, utilization } => {
                write!(f, "{date} is {status} ({:.0}% utilized)", utilization * 100.0)
            }
        }
    }
}
