//! Planning session aggregate
//!
//! One `PlanningSession` per planning attempt: created from the validated
//! request, mutated in place by each pipeline stage, discarded (or
//! persisted by the caller) at terminal outcome. Observability is
//! data-only: every stage appends a [`StageAudit`] record instead of
//! logging text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::controller::PlanStage;
use crate::domain::{
    AllocationWarning, CostBreakdown, DailyPlan, DiningTier, LodgingOption, ScoredPoi, TransportStrategy, TripRequest,
};
use crate::intensity::ValidatedStrategy;
use crate::weather::DayOutlook;

/// Machine-readable reason for a terminal non-success outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    ExtremeWeather,
    MustVisitConflict,
    SparseItinerary,
    IntensityExceeded,
    OverBudget,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtremeWeather => write!(f, "extreme_weather"),
            Self::MustVisitConflict => write!(f, "must_visit_conflict"),
            Self::SparseItinerary => write!(f, "sparse_itinerary"),
            Self::IntensityExceeded => write!(f, "intensity_exceeded"),
            Self::OverBudget => write!(f, "over_budget"),
        }
    }
}

/// Weather gate abort: the caller should obtain new trip dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRejection {
    pub code: ReasonCode,
    pub message: String,
    /// The dates responsible, where applicable
    pub dates: Vec<NaiveDate>,
}

/// Terminal infeasibility after the gate: no plan under the constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infeasibility {
    pub code: ReasonCode,
    pub message: String,
    /// Currency units over budget, for [`ReasonCode::OverBudget`]
    pub overage: Option<f64>,
}

/// One budget-repair direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairAxis {
    Lodging,
    Transport,
    Dining,
}

impl RepairAxis {
    /// Repair priority order
    pub const PRIORITY: [RepairAxis; 3] = [Self::Lodging, Self::Transport, Self::Dining];
}

impl std::fmt::Display for RepairAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lodging => write!(f, "lodging"),
            Self::Transport => write!(f, "transport"),
            Self::Dining => write!(f, "dining"),
        }
    }
}

/// Attempt counter and blocked flag for one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisState {
    pub attempts: u32,
    pub blocked: bool,
}

/// Repair state across the three axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisStates {
    pub lodging: AxisState,
    pub transport: AxisState,
    pub dining: AxisState,
}

impl AxisStates {
    pub fn get(&self, axis: RepairAxis) -> &AxisState {
        match axis {
            RepairAxis::Lodging => &self.lodging,
            RepairAxis::Transport => &self.transport,
            RepairAxis::Dining => &self.dining,
        }
    }

    pub fn get_mut(&mut self, axis: RepairAxis) -> &mut AxisState {
        match axis {
            RepairAxis::Lodging => &mut self.lodging,
            RepairAxis::Transport => &mut self.transport,
            RepairAxis::Dining => &mut self.dining,
        }
    }

    /// First axis still open for repair, in priority order
    pub fn first_open(&self) -> Option<RepairAxis> {
        RepairAxis::PRIORITY.into_iter().find(|axis| !self.get(*axis).blocked)
    }

    pub fn all_blocked(&self) -> bool {
        self.first_open().is_none()
    }
}

/// Data-only record of one stage execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAudit {
    pub stage: PlanStage,
    pub outcome: String,
}

/// Figures derived from the request once, before the pipeline starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionDerived {
    pub trip_days: u32,
    pub travelers: u32,
    pub rooms: u32,
    pub daily_cap_hours: f64,
    pub poi_budget_hours: f64,
    pub budget_limit: f64,
}

/// The finished plan carried by a successful outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: String,
    pub days: Vec<DailyPlan>,
    pub strategy: ValidatedStrategy,
    pub lodging: LodgingOption,
    pub dining: DiningTier,
    pub cost: CostBreakdown,
}

/// Terminal outcome of a planning session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum PlanOutcome {
    /// A feasible, priced plan
    Complete(Box<TripPlan>),
    /// The weather gate aborted; planning needs new trip dates
    NeedsNewDates(GateRejection),
    /// No plan exists under the current constraints
    Infeasible(Infeasibility),
}

impl PlanOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Run-scoped aggregate for one planning attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningSession {
    pub id: Uuid,

    pub request: TripRequest,
    pub derived: SessionDerived,

    /// Scored pool after group filtering and preference scoring
    pub scored: Vec<ScoredPoi>,

    /// Per-day weather tiers from the gate
    pub outlooks: Vec<DayOutlook>,

    /// Allocated daily plans; POI selection is fixed once these exist
    pub plans: Vec<DailyPlan>,

    /// The three derived strategies for the current lodging
    pub strategies: Vec<TransportStrategy>,

    /// Strategies that passed intensity validation
    pub validated: Vec<ValidatedStrategy>,

    /// The single lodging search result, fetched once
    pub lodging_candidates: Vec<LodgingOption>,

    /// Currently selected lodging
    pub lodging: Option<LodgingOption>,

    /// Names of lodging options already tried by repair
    pub tried_lodging: Vec<String>,

    pub dining: DiningTier,

    /// Breakdown of the currently selected strategy
    pub selected: Option<CostBreakdown>,

    pub axes: AxisStates,

    pub warnings: Vec<AllocationWarning>,

    pub audit: Vec<StageAudit>,

    pub stage: PlanStage,

    /// Set exactly once, when the session reaches a terminal stage
    pub outcome: Option<PlanOutcome>,
}

impl PlanningSession {
    pub fn new(request: TripRequest, config: &PlannerConfig) -> Self {
        let derived = SessionDerived {
            trip_days: request.trip_days(),
            travelers: request.group.travelers(),
            rooms: request.group.rooms(),
            daily_cap_hours: config.time.daily_cap(&request.group),
            poi_budget_hours: config.time.poi_budget(&request.group),
            budget_limit: request.budget.limit(request.trip_days()),
        };
        let dining = if request.preferences.cuisine.is_empty() {
            DiningTier::Standard
        } else {
            DiningTier::Comfort
        };

        Self {
            id: Uuid::now_v7(),
            request,
            derived,
            scored: Vec::new(),
            outlooks: Vec::new(),
            plans: Vec::new(),
            strategies: Vec::new(),
            validated: Vec::new(),
            lodging_candidates: Vec::new(),
            lodging: None,
            tried_lodging: Vec::new(),
            dining,
            selected: None,
            axes: AxisStates::default(),
            warnings: Vec::new(),
            audit: Vec::new(),
            stage: PlanStage::Scoring,
            outcome: None,
        }
    }

    /// Move to a stage and append its audit record
    pub fn record(&mut self, stage: PlanStage, outcome: impl Into<String>) {
        let outcome = outcome.into();
        debug!(session = %self.id, %stage, %outcome, "stage recorded");
        self.stage = stage;
        self.audit.push(StageAudit { stage, outcome });
    }

    /// Mark the terminal outcome
    pub fn finish(&mut self, stage: PlanStage, outcome: PlanOutcome) {
        self.stage = stage;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Budget, Coordinate, Group, Preferences};

    fn request() -> TripRequest {
        TripRequest {
            destination: "Beijing".to_string(),
            city_center: Coordinate::new(39.9042, 116.4074),
            start_date: Some(NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2025, 8, 12).unwrap()),
            group: Group::new(2, 1, 1),
            budget: Budget::PerDay(1000.0),
            preferences: Preferences::default(),
        }
    }

    #[test]
    fn test_session_derived_figures() {
        let session = PlanningSession::new(request(), &PlannerConfig::default());

        assert_eq!(session.derived.trip_days, 3);
        assert_eq!(session.derived.travelers, 4);
        assert_eq!(session.derived.rooms, 2);
        assert_eq!(session.derived.daily_cap_hours, 9.0);
        assert_eq!(session.derived.poi_budget_hours, 6.5);
        assert_eq!(session.derived.budget_limit, 3000.0);
        assert_eq!(session.dining, DiningTier::Standard);
        assert!(session.outcome.is_none());
    }

    #[test]
    fn test_cuisine_preference_raises_dining_tier() {
        let mut req = request();
        req.preferences.cuisine = vec!["roast duck".to_string()];
        let session = PlanningSession::new(req, &PlannerConfig::default());
        assert_eq!(session.dining, DiningTier::Comfort);
    }

    #[test]
    fn test_axis_priority_order() {
        let mut axes = AxisStates::default();
        assert_eq!(axes.first_open(), Some(RepairAxis::Lodging));

        axes.lodging.blocked = true;
        assert_eq!(axes.first_open(), Some(RepairAxis::Transport));

        axes.transport.blocked = true;
        assert_eq!(axes.first_open(), Some(RepairAxis::Dining));

        axes.dining.blocked = true;
        assert!(axes.all_blocked());
    }

    #[test]
    fn test_record_appends_audit() {
        let mut session = PlanningSession::new(request(), &PlannerConfig::default());
        session.record(PlanStage::Scoring, "12 candidates");
        session.record(PlanStage::Gating, "3 days classified");

        assert_eq!(session.audit.len(), 2);
        assert_eq!(session.audit[0].stage, PlanStage::Scoring);
        assert_eq!(session.stage, PlanStage::Gating);
    }
}
