//! Budget optimization and repair
//!
//! Prices each intensity-valid strategy (tickets, lodging, transport,
//! dining), selects the cheapest one within budget, and otherwise runs the
//! bounded repair loop over the lodging, transport, and dining axes until
//! a plan fits or every axis is blocked.

use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::controller::PlanStage;
use crate::domain::{CostBreakdown, LodgingOption, TransportMode};
use crate::intensity::{IntensityValidator, ValidatedStrategy};
use crate::pricing::TransportPricer;
use crate::session::{Infeasibility, PlanOutcome, PlanningSession, ReasonCode, RepairAxis, TripPlan};

/// Strategy pricing and the bounded repair loop
pub struct BudgetOptimizer<'a> {
    config: &'a PlannerConfig,
}

impl<'a> BudgetOptimizer<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Price one validated strategy against the session
    ///
    /// Transit legs are per person and scale by travelers; taxi legs are
    /// per vehicle and do not.
    pub fn breakdown(&self, session: &PlanningSession, validated: &ValidatedStrategy) -> CostBreakdown {
        let travelers = session.derived.travelers as f64;
        let trip_days = session.derived.trip_days as f64;

        let tickets: f64 = session
            .plans
            .iter()
            .flat_map(|plan| plan.pois.iter())
            .map(|poi| poi.poi.ticket_price * travelers)
            .sum();

        debug_assert!(session.lodging.is_some(), "lodging selected before pricing");
        let lodging = session
            .lodging
            .as_ref()
            .map_or(0.0, |l| l.price_per_night * session.derived.rooms as f64 * trip_days);

        let transport: f64 = validated
            .strategy
            .days
            .iter()
            .flat_map(|day| day.legs.iter())
            .map(|leg| match leg.mode {
                TransportMode::Transit => leg.cost * travelers,
                TransportMode::Taxi => leg.cost,
            })
            .sum();

        let dining = self.config.dining.daily_rate(session.dining) * travelers * trip_days;

        let grand_total = tickets + lodging + transport + dining;
        CostBreakdown {
            strategy: validated.strategy.kind,
            tickets,
            lodging,
            transport,
            dining,
            grand_total,
            within_budget: grand_total <= session.derived.budget_limit,
        }
    }

    /// Drive selection and repair to a terminal outcome
    pub fn optimize(
        &self,
        session: &mut PlanningSession,
        pricer: &TransportPricer<'_>,
        validator: &IntensityValidator<'_>,
    ) -> PlanOutcome {
        let limit = session.derived.budget_limit;

        loop {
            if session.validated.is_empty() {
                return PlanOutcome::Infeasible(Infeasibility {
                    code: ReasonCode::IntensityExceeded,
                    message: "no transport strategy fits the daily time cap".to_string(),
                    overage: None,
                });
            }

            let breakdowns: Vec<CostBreakdown> = session
                .validated
                .iter()
                .map(|v| self.breakdown(session, v))
                .collect();
            let idx = select(&breakdowns, limit);
            let chosen = breakdowns[idx].clone();
            session.selected = Some(chosen.clone());

            if chosen.within_budget {
                info!(strategy = %chosen.strategy, total = chosen.grand_total, "plan within budget");
                session.record(
                    PlanStage::Optimizing,
                    format!("selected {} at {:.0} within {:.0}", chosen.strategy, chosen.grand_total, limit),
                );
                let plan = TripPlan {
                    destination: session.request.destination.clone(),
                    days: session.plans.clone(),
                    strategy: session.validated[idx].clone(),
                    lodging: session.lodging.clone().unwrap_or_else(|| LodgingOption {
                        name: String::new(),
                        rating: 0.0,
                        room_type: String::new(),
                        price_per_night: 0.0,
                        location: session.request.city_center,
                    }),
                    dining: session.dining,
                    cost: chosen,
                };
                return PlanOutcome::Complete(Box::new(plan));
            }

            let overage = chosen.overage(limit);
            let Some(axis) = session.axes.first_open() else {
                warn!(overage, "all repair axes blocked");
                session.record(PlanStage::Optimizing, format!("all axes blocked, over by {overage:.0}"));
                return PlanOutcome::Infeasible(Infeasibility {
                    code: ReasonCode::OverBudget,
                    message: format!("over budget by {overage:.0} currency units"),
                    overage: Some(overage),
                });
            };

            debug!(%axis, overage, "over budget, repairing");
            match axis {
                RepairAxis::Lodging => self.repair_lodging(session, pricer, validator),
                RepairAxis::Transport => self.repair_transport(session, &breakdowns, idx),
                RepairAxis::Dining => self.repair_dining(session),
            }
        }
    }

    /// Swap to a cheaper lodging from the already-fetched list and re-derive
    /// the legs that depend on its position
    fn repair_lodging(
        &self,
        session: &mut PlanningSession,
        pricer: &TransportPricer<'_>,
        validator: &IntensityValidator<'_>,
    ) {
        let current_price = session.lodging.as_ref().map_or(f64::INFINITY, |l| l.price_per_night);

        let Some(next) = next_lodging(&session.lodging_candidates, &session.tried_lodging, current_price) else {
            session.axes.lodging.blocked = true;
            session.record(PlanStage::Optimizing, "lodging repair: candidates exhausted");
            return;
        };

        session.axes.lodging.attempts += 1;
        info!(
            name = %next.name,
            price = next.price_per_night,
            attempt = session.axes.lodging.attempts,
            "lodging repair"
        );
        session.tried_lodging.push(next.name.clone());

        // The fallback pick is not cheaper than the current lodging; it can
        // only pay off through its position, so the axis ends here either way
        if next.price_per_night >= current_price {
            session.axes.lodging.blocked = true;
            session.record(PlanStage::Optimizing, "lodging repair: no cheaper option left, axis blocked");
        }

        let previous_lodging = session.lodging.replace(next.clone());
        let previous_strategies = std::mem::take(&mut session.strategies);
        let previous_validated = std::mem::take(&mut session.validated);

        // Legs depend on the lodging position: re-price and re-validate
        session.record(PlanStage::Pricing, format!("re-priced legs from {}", next.name));
        session.strategies = pricer.price(&next, &session.plans);
        let validated = validator.validate(&session.request.group, &session.plans, &session.strategies);
        session.record(PlanStage::Validating, format!("{} strategies pass intensity", validated.len()));

        if validated.is_empty() {
            // The new location breaks the time cap: keep the old plan and
            // stop trying lodging swaps
            warn!(name = %next.name, "repaired lodging fails intensity, reverting");
            session.lodging = previous_lodging;
            session.strategies = previous_strategies;
            session.validated = previous_validated;
            session.axes.lodging.blocked = true;
            session.record(PlanStage::Optimizing, "lodging repair: intensity failed, axis blocked");
        } else {
            session.validated = validated;
        }

        if session.axes.lodging.attempts >= self.config.repair.max_lodging_attempts {
            session.axes.lodging.blocked = true;
            session.record(PlanStage::Optimizing, "lodging repair: attempt limit reached");
        }
    }

    /// Re-evaluate the strategy preference; selection already takes the
    /// cheapest candidate, so this blocks unless a cheaper one appeared
    fn repair_transport(&self, session: &mut PlanningSession, breakdowns: &[CostBreakdown], selected: usize) {
        session.axes.transport.attempts += 1;

        let cheapest = breakdowns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.grand_total.partial_cmp(&b.grand_total).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);

        match cheapest {
            Some(i) if breakdowns[i].grand_total < breakdowns[selected].grand_total => {
                session.selected = Some(breakdowns[i].clone());
                session.record(
                    PlanStage::Optimizing,
                    format!("transport repair: switched to {}", breakdowns[i].strategy),
                );
            }
            _ => {
                session.axes.transport.blocked = true;
                session.record(PlanStage::Optimizing, "transport repair: no cheaper strategy, axis blocked");
            }
        }
    }

    /// Step the dining tier down one level
    fn repair_dining(&self, session: &mut PlanningSession) {
        match session.dining.next_cheaper() {
            Some(cheaper) => {
                session.axes.dining.attempts += 1;
                info!(from = %session.dining, to = %cheaper, "dining repair");
                session.record(PlanStage::Optimizing, format!("dining repair: {} -> {}", session.dining, cheaper));
                session.dining = cheaper;
            }
            None => {
                session.axes.dining.blocked = true;
                session.record(PlanStage::Optimizing, "dining repair: already at the floor, axis blocked");
            }
        }
    }
}

/// Index of the cheapest within-budget breakdown, or the one with the
/// smallest overage when none fit
pub fn select(breakdowns: &[CostBreakdown], limit: f64) -> usize {
    let within = breakdowns
        .iter()
        .enumerate()
        .filter(|(_, b)| b.grand_total <= limit)
        .min_by(|(_, a), (_, b)| a.grand_total.partial_cmp(&b.grand_total).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((i, _)) = within {
        return i;
    }

    breakdowns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.grand_total.partial_cmp(&b.grand_total).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Next lodging for repair: cheapest untried option strictly cheaper than
/// the current price, else the cheapest untried option at all
fn next_lodging(candidates: &[LodgingOption], tried: &[String], current_price: f64) -> Option<LodgingOption> {
    fn cheapest<'a>(items: impl Iterator<Item = &'a LodgingOption>) -> Option<&'a LodgingOption> {
        items.min_by(|a, b| {
            a.price_per_night
                .partial_cmp(&b.price_per_night)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    let untried: Vec<&LodgingOption> = candidates
        .iter()
        .filter(|c| !tried.iter().any(|t| t == &c.name))
        .collect();

    cheapest(untried.iter().copied().filter(|c| c.price_per_night < current_price))
        .or_else(|| cheapest(untried.iter().copied()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, StrategyKind};

    fn breakdown(strategy: StrategyKind, grand_total: f64, limit: f64) -> CostBreakdown {
        CostBreakdown {
            strategy,
            tickets: 0.0,
            lodging: 0.0,
            transport: grand_total,
            dining: 0.0,
            grand_total,
            within_budget: grand_total <= limit,
        }
    }

    fn option(name: &str, price: f64) -> LodgingOption {
        LodgingOption {
            name: name.to_string(),
            rating: 4.0,
            room_type: "double".to_string(),
            price_per_night: price,
            location: Coordinate::new(39.9, 116.4),
        }
    }

    #[test]
    fn test_select_cheapest_within_budget() {
        // fastest 1200, cheapest 950, comfort 1800 against a limit of 1000:
        // cheapest wins without any repair
        let breakdowns = vec![
            breakdown(StrategyKind::Fastest, 1200.0, 1000.0),
            breakdown(StrategyKind::Cheapest, 950.0, 1000.0),
            breakdown(StrategyKind::Comfort, 1800.0, 1000.0),
        ];

        let idx = select(&breakdowns, 1000.0);
        assert_eq!(breakdowns[idx].strategy, StrategyKind::Cheapest);
        assert!(breakdowns[idx].within_budget);
    }

    #[test]
    fn test_select_smallest_overage_when_none_fit() {
        let breakdowns = vec![
            breakdown(StrategyKind::Fastest, 1200.0, 800.0),
            breakdown(StrategyKind::Cheapest, 950.0, 800.0),
            breakdown(StrategyKind::Comfort, 1800.0, 800.0),
        ];

        let idx = select(&breakdowns, 800.0);
        assert_eq!(breakdowns[idx].strategy, StrategyKind::Cheapest);
        assert_eq!(breakdowns[idx].overage(800.0), 150.0);
    }

    #[test]
    fn test_next_lodging_prefers_strictly_cheaper() {
        let candidates = vec![option("a", 800.0), option("b", 500.0), option("c", 650.0)];
        let tried = vec!["a".to_string()];

        let next = next_lodging(&candidates, &tried, 800.0).unwrap();
        assert_eq!(next.name, "b");
    }

    #[test]
    fn test_next_lodging_falls_back_to_cheapest_untried() {
        // Nothing cheaper than 400 remains; take the cheapest untried
        let candidates = vec![option("a", 800.0), option("b", 500.0)];
        let tried = vec![];

        let next = next_lodging(&candidates, &tried, 400.0).unwrap();
        assert_eq!(next.name, "b");
    }

    #[test]
    fn test_next_lodging_exhausted() {
        let candidates = vec![option("a", 800.0)];
        let tried = vec!["a".to_string()];

        assert!(next_lodging(&candidates, &tried, 800.0).is_none());
    }
}
