//! External collaborator interfaces
//!
//! The core consumes three lookups it does not implement: weather
//! forecasts, per-leg routing, and lodging search. Each is a blocking call
//! with no internal retry; callers own timeouts. A routing failure is
//! recovered with the deterministic estimate in [`routing`]; weather and
//! lodging failures abort the session.

pub mod routing;

use chrono::NaiveDate;

use crate::domain::{Coordinate, LegQuote, LodgingOption};
use crate::error::ProviderError;

pub use routing::HaversineEstimator;

/// A named location, the unit routing lookups work in
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Place {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// One day of forecast for the destination
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Textual weather descriptor ("clear", "light rain", "typhoon", ...)
    pub descriptor: String,
}

/// Per-day weather descriptors for a city and date range
pub trait WeatherProvider {
    fn daily_forecast(&self, city: &str, dates: &[NaiveDate]) -> Result<Vec<DailyForecast>, ProviderError>;
}

/// Transit and taxi time/cost for the fastest option of each mode
pub trait RoutingProvider {
    fn leg_quote(&self, origin: &Place, destination: &Place) -> Result<LegQuote, ProviderError>;
}

/// Lodging search parameters
#[derive(Debug, Clone)]
pub struct LodgingQuery<'a> {
    pub area: &'a str,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: u32,
    pub occupants: u32,
}

/// Ranked lodging options for an area and date range
///
/// Issued at most once per planning session; budget repairs reuse the
/// returned list.
pub trait LodgingProvider {
    fn search(&self, query: &LodgingQuery<'_>) -> Result<Vec<LodgingOption>, ProviderError>;
}
