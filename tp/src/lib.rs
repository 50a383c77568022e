//! tripplan - itinerary scheduling and optimization core
//!
//! Turns a pool of scored candidate POIs into day-by-day visit plans,
//! validates them against time, weather, and intensity constraints, prices
//! them under three transport strategies, and repairs infeasible plans by
//! adjusting lodging, transport mode, or dining before giving up.
//!
//! # Core Concepts
//!
//! - **Staged, not optimal**: a greedy heuristic planner with bounded
//!   retries, never an exact solver
//! - **Infeasibility is data**: weather blocks and budget exhaustion are
//!   structured outcomes with reason codes, not errors
//! - **One session per attempt**: a single [`PlanningSession`] aggregate
//!   is mutated stage by stage and carries the audit trail
//! - **Collaborators at the boundary**: weather, routing, and lodging are
//!   traits the caller implements; routing failures fall back to a
//!   deterministic estimate
//!
//! # Modules
//!
//! - [`domain`] - Requests, POIs, plans, strategies, and costs
//! - [`scoring`] - POI desirability scoring
//! - [`weather`] - Descriptor classification and the feasibility gate
//! - [`allocator`] - Staged greedy bin-packing across trip days
//! - [`pricing`] - Leg quoting and the three transport strategies
//! - [`intensity`] - Daily time-cap validation
//! - [`optimizer`] - Budget selection and the bounded repair loop
//! - [`controller`] - The stage state machine
//! - [`config`] - Configuration types and loading

pub mod allocator;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod intensity;
pub mod optimizer;
pub mod pricing;
pub mod providers;
pub mod scoring;
pub mod session;
pub mod weather;

// Re-export commonly used types
pub use allocator::{AllocationResult, DailyAllocator};
pub use config::PlannerConfig;
pub use controller::{PlanStage, Planner};
pub use domain::{
    AllocationWarning, BalanceStatus, Budget, CandidatePoi, Coordinate, CostBreakdown, DailyPlan, DiningTier,
    Exposure, Group, LegQuote, LodgingOption, ModeQuote, Preferences, ScoredPoi, StrategyKind, TransportMode,
    TransportStrategy, TripRequest, trip_days,
};
pub use error::{PlanError, ProviderError};
pub use intensity::{DayLoad, IntensityValidator, ValidatedStrategy};
pub use optimizer::BudgetOptimizer;
pub use pricing::TransportPricer;
pub use providers::{
    DailyForecast, HaversineEstimator, LodgingProvider, LodgingQuery, Place, RoutingProvider, WeatherProvider,
};
pub use session::{
    AxisState, AxisStates, GateRejection, Infeasibility, PlanOutcome, PlanningSession, ReasonCode, RepairAxis,
    StageAudit, TripPlan,
};
pub use weather::{DayOutlook, WeatherClassifier, WeatherGate, WeatherTier};
