//! Trip request types
//!
//! A `TripRequest` is the validated output of the (external) intent
//! extraction layer. It is immutable once planning begins; a date change
//! restarts the pipeline from the weather gate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::poi::Coordinate;
use crate::error::PlanError;

/// Travel party composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub adults: u32,
    pub children: u32,
    pub elderly: u32,
}

impl Group {
    pub fn new(adults: u32, children: u32, elderly: u32) -> Self {
        Self { adults, children, elderly }
    }

    /// Total traveler count
    pub fn travelers(&self) -> u32 {
        self.adults + self.children + self.elderly
    }

    /// Whether the group includes children or elderly travelers
    pub fn has_children_or_elderly(&self) -> bool {
        self.children > 0 || self.elderly > 0
    }

    /// Lodging rooms required: adults and elderly count as one person,
    /// children as half, truncated; then two people per room, rounded up
    /// via quotient plus remainder.
    pub fn rooms(&self) -> u32 {
        let weighted = (self.adults + self.elderly) as f64 + 0.5 * self.children as f64;
        let people = weighted as u32;
        people / 2 + people % 2
    }
}

/// Monetary budget, either for the whole trip or per day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Total(f64),
    PerDay(f64),
}

impl Budget {
    /// Spending limit for a trip of `trip_days` days
    pub fn limit(&self, trip_days: u32) -> f64 {
        match self {
            Self::Total(total) => *total,
            Self::PerDay(per_day) => per_day * trip_days as f64,
        }
    }
}

/// POI and dining preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Preferred attraction types, matched against POI tags
    pub attraction_types: Vec<String>,

    /// Names of POIs that must be in the itinerary
    pub must_visit: Vec<String>,

    /// Cuisine preferences (drives the initial dining tier)
    pub cuisine: Vec<String>,

    /// Names or tags to exclude
    pub avoid: Vec<String>,
}

/// A validated request for one multi-day city visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city name
    pub destination: String,

    /// Default coordinate for the destination (cluster seed for empty days)
    pub city_center: Coordinate,

    /// First trip day (inclusive)
    pub start_date: Option<NaiveDate>,

    /// Last trip day (inclusive)
    pub end_date: Option<NaiveDate>,

    pub group: Group,
    pub budget: Budget,
    pub preferences: Preferences,
}

impl TripRequest {
    /// Validate the request before the pipeline starts
    ///
    /// Rejections here are input errors: the caller must re-supply the
    /// request, nothing downstream has run.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.destination.trim().is_empty() {
            return Err(PlanError::InvalidRequest("destination is empty".to_string()));
        }
        let start = self
            .start_date
            .ok_or_else(|| PlanError::InvalidRequest("start date is required".to_string()))?;
        if let Some(end) = self.end_date
            && end < start
        {
            return Err(PlanError::InvalidRequest(format!(
                "end date {end} is before start date {start}"
            )));
        }
        if self.group.travelers() == 0 {
            return Err(PlanError::InvalidRequest("group has no travelers".to_string()));
        }
        let amount = match self.budget {
            Budget::Total(v) | Budget::PerDay(v) => v,
        };
        if amount <= 0.0 {
            return Err(PlanError::InvalidRequest("budget must be positive".to_string()));
        }
        Ok(())
    }

    /// Number of trip days, inclusive of both ends; 1 when either date is
    /// missing
    pub fn trip_days(&self) -> u32 {
        trip_days(self.start_date, self.end_date)
    }

    /// All dates in the trip window, in order
    pub fn trip_dates(&self) -> Vec<NaiveDate> {
        let Some(start) = self.start_date else {
            return Vec::new();
        };
        (0..self.trip_days())
            .map(|i| start + chrono::Days::new(i as u64))
            .collect()
    }

    /// Parse a `YYYY-MM-DD` date string
    pub fn parse_date(s: &str) -> Result<NaiveDate, PlanError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| PlanError::InvalidRequest(format!("bad date {s:?}: {e}")))
    }
}

/// Inclusive day count between two dates, minimum 1; 1 when either is
/// missing or the range is inverted
pub fn trip_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
    match (start, end) {
        (Some(s), Some(e)) => (e - s).num_days().max(0) as u32 + 1,
        _ => 1,
    }
}
