//! Domain types for the planning pipeline
//!
//! - [`request`] - Validated trip request and derived figures
//! - [`poi`] - Catalog POIs and run-scoped scored copies
//! - [`plan`] - Daily plans and allocation warnings
//! - [`transport`] - Legs, modes, and whole-trip strategies
//! - [`cost`] - Lodging, dining, and cost breakdowns

pub mod cost;
pub mod plan;
pub mod poi;
pub mod request;
pub mod transport;

pub use cost::{CostBreakdown, DiningTier, LodgingOption};
pub use plan::{AllocationWarning, BalanceStatus, DailyPlan};
pub use poi::{CandidatePoi, Coordinate, Exposure, ScoredPoi};
pub use request::{Budget, Group, Preferences, TripRequest, trip_days};
pub use transport::{ChosenLeg, DayRoute, LegQuote, ModeQuote, StrategyKind, TransportMode, TransportStrategy};
