//! Planning session controller
//!
//! The state machine gluing the pipeline into one run:
//! scoring -> gating -> allocating -> pricing -> validating -> optimizing
//! -> done | infeasible. Gating can instead exit to an external
//! "needs new dates" outcome, and optimizing loops back through pricing
//! and validating after a lodging repair. The controller never re-enters
//! scoring or gating on its own; those require new external input.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocator::DailyAllocator;
use crate::config::PlannerConfig;
use crate::domain::{CandidatePoi, TripRequest};
use crate::error::PlanError;
use crate::intensity::IntensityValidator;
use crate::optimizer::BudgetOptimizer;
use crate::pricing::TransportPricer;
use crate::providers::{LodgingProvider, LodgingQuery, RoutingProvider, WeatherProvider};
use crate::scoring::score_pool;
use crate::session::{Infeasibility, PlanOutcome, PlanningSession, ReasonCode};
use crate::weather::WeatherGate;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStage {
    Scoring,
    Gating,
    Allocating,
    Pricing,
    Validating,
    Optimizing,
    Done,
    Infeasible,
}

impl std::fmt::Display for PlanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scoring => write!(f, "scoring"),
            Self::Gating => write!(f, "gating"),
            Self::Allocating => write!(f, "allocating"),
            Self::Pricing => write!(f, "pricing"),
            Self::Validating => write!(f, "validating"),
            Self::Optimizing => write!(f, "optimizing"),
            Self::Done => write!(f, "done"),
            Self::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// One-shot planner over a catalog and the external collaborators
pub struct Planner<'a> {
    config: &'a PlannerConfig,
    weather: &'a dyn WeatherProvider,
    routing: &'a dyn RoutingProvider,
    lodging: &'a dyn LodgingProvider,
}

impl<'a> Planner<'a> {
    pub fn new(
        config: &'a PlannerConfig,
        weather: &'a dyn WeatherProvider,
        routing: &'a dyn RoutingProvider,
        lodging: &'a dyn LodgingProvider,
    ) -> Self {
        Self {
            config,
            weather,
            routing,
            lodging,
        }
    }

    /// Run one planning session to its terminal outcome
    ///
    /// Returns the session with `outcome` set; `Err` means the request
    /// was malformed or a collaborator the pipeline cannot work without
    /// failed.
    pub fn plan(&self, request: TripRequest, catalog: &[CandidatePoi]) -> Result<PlanningSession, PlanError> {
        request.validate()?;

        let mut session = PlanningSession::new(request, self.config);
        info!(session = %session.id, destination = %session.request.destination, "planning session started");

        // scoring
        let scored = score_pool(catalog, &session.request.group, &session.request.preferences);
        session.record(PlanStage::Scoring, format!("{} candidates scored", scored.len()));
        session.scored = scored;

        // gating
        let dates = session.request.trip_dates();
        let forecasts = self
            .weather
            .daily_forecast(&session.request.destination, &dates)
            .map_err(|e| PlanError::Weather(e.to_string()))?;

        let gate = WeatherGate::new(self.config);
        match gate.assess(&session.request, &session.scored, &forecasts) {
            Ok(outlooks) => {
                session.record(PlanStage::Gating, format!("{} days classified", outlooks.len()));
                session.outlooks = outlooks;
            }
            Err(rejection) => {
                info!(code = %rejection.code, "weather gate abort, new dates required");
                session.record(PlanStage::Gating, rejection.message.clone());
                session.finish(PlanStage::Gating, PlanOutcome::NeedsNewDates(rejection));
                return Ok(session);
            }
        }

        // allocating
        let allocator = DailyAllocator::new(self.config);
        let allocation = allocator.allocate(&session.request, &session.scored, &session.outlooks);
        let allocated: usize = allocation.plans.iter().map(|p| p.poi_count()).sum();
        session.record(
            PlanStage::Allocating,
            format!(
                "{} POIs over {} days, {} warnings",
                allocated,
                allocation.plans.len(),
                allocation.warnings.len()
            ),
        );
        session.plans = allocation.plans;
        session.warnings = allocation.warnings;

        // One lodging search per session; repairs reuse this list
        let query = LodgingQuery {
            area: &session.request.destination,
            check_in: dates.first().copied().unwrap_or_default(),
            check_out: dates.last().copied().unwrap_or_default(),
            rooms: session.derived.rooms,
            occupants: session.derived.travelers,
        };
        let candidates = self
            .lodging
            .search(&query)
            .map_err(|e| PlanError::Lodging(e.to_string()))?;
        let Some(initial) = candidates.first().cloned() else {
            return Err(PlanError::Lodging(format!(
                "no lodging options for {}",
                session.request.destination
            )));
        };
        session.lodging_candidates = candidates;
        session.tried_lodging.push(initial.name.clone());
        session.lodging = Some(initial.clone());

        // pricing
        let pricer = TransportPricer::new(self.config, self.routing);
        session.strategies = pricer.price(&initial, &session.plans);
        session.record(
            PlanStage::Pricing,
            format!("{} strategies priced from {}", session.strategies.len(), initial.name),
        );

        // validating
        let validator = IntensityValidator::new(self.config);
        let validated = validator.validate(&session.request.group, &session.plans, &session.strategies);
        session.record(PlanStage::Validating, format!("{} strategies pass intensity", validated.len()));

        if validated.is_empty() {
            let infeasibility = Infeasibility {
                code: ReasonCode::IntensityExceeded,
                message: "no transport strategy fits the daily time cap; shorten the itinerary or pick different POIs"
                    .to_string(),
                overage: None,
            };
            info!("no strategy passes intensity, session infeasible");
            session.finish(PlanStage::Infeasible, PlanOutcome::Infeasible(infeasibility));
            return Ok(session);
        }
        session.validated = validated;

        // optimizing, looping back through pricing/validating on repair
        let optimizer = BudgetOptimizer::new(self.config);
        let outcome = optimizer.optimize(&mut session, &pricer, &validator);
        let terminal = if outcome.is_complete() { PlanStage::Done } else { PlanStage::Infeasible };
        info!(session = %session.id, stage = %terminal, "planning session finished");
        session.finish(terminal, outcome);
        Ok(session)
    }
}
