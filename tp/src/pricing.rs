//! Transport pricing
//!
//! For a fixed lodging location and the allocator's daily plans, builds
//! each day's leg chain (lodging through the POIs and back), quotes every
//! leg in both modes, and derives the three whole-trip strategies. Leg
//! lookups are issued strictly sequentially; rate-limited deployments set
//! a per-call delay in config.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::domain::{
    ChosenLeg, DailyPlan, DayRoute, LegQuote, LodgingOption, StrategyKind, TransportMode, TransportStrategy,
};
use crate::providers::{HaversineEstimator, Place, RoutingProvider};

struct QuotedLeg {
    origin: String,
    destination: String,
    quote: LegQuote,
}

/// Per-leg quoting and strategy derivation
pub struct TransportPricer<'a> {
    config: &'a PlannerConfig,
    routing: &'a dyn RoutingProvider,
    fallback: HaversineEstimator,
}

impl<'a> TransportPricer<'a> {
    pub fn new(config: &'a PlannerConfig, routing: &'a dyn RoutingProvider) -> Self {
        Self {
            config,
            routing,
            fallback: HaversineEstimator::default(),
        }
    }

    /// Quote all legs and derive the fastest, cheapest, and comfort
    /// strategies
    pub fn price(&self, lodging: &LodgingOption, plans: &[DailyPlan]) -> Vec<TransportStrategy> {
        let quoted: Vec<Vec<QuotedLeg>> = plans.iter().map(|plan| self.quote_day(lodging, plan)).collect();

        StrategyKind::ALL
            .iter()
            .map(|kind| self.derive_strategy(*kind, plans, &quoted))
            .collect()
    }

    fn quote_day(&self, lodging: &LodgingOption, plan: &DailyPlan) -> Vec<QuotedLeg> {
        if plan.pois.is_empty() {
            return Vec::new();
        }

        let base = Place::new(lodging.name.clone(), lodging.location);
        let mut chain = vec![base.clone()];
        chain.extend(plan.pois.iter().map(|p| Place::new(p.name(), p.poi.coordinate)));
        chain.push(base);

        let delay = Duration::from_millis(self.config.routing.call_delay_ms);

        chain
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (origin, destination) = (&pair[0], &pair[1]);
                if i > 0 && !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                let quote = match self.routing.leg_quote(origin, destination) {
                    Ok(quote) => quote,
                    Err(e) => {
                        warn!(
                            origin = %origin.name,
                            destination = %destination.name,
                            %e,
                            "routing lookup failed, using distance estimate"
                        );
                        self.fallback.estimate(origin, destination)
                    }
                };
                QuotedLeg {
                    origin: origin.name.clone(),
                    destination: destination.name.clone(),
                    quote,
                }
            })
            .collect()
    }

    fn derive_strategy(&self, kind: StrategyKind, plans: &[DailyPlan], quoted: &[Vec<QuotedLeg>]) -> TransportStrategy {
        let days: Vec<DayRoute> = plans
            .iter()
            .zip(quoted)
            .map(|(plan, legs)| {
                let legs: Vec<ChosenLeg> = legs.iter().map(|leg| choose_mode(kind, leg)).collect();
                DayRoute {
                    date: plan.date,
                    minutes: legs.iter().map(|l| l.minutes).sum(),
                    raw_cost: legs.iter().map(|l| l.cost).sum(),
                    legs,
                }
            })
            .collect();

        let strategy = TransportStrategy {
            kind,
            total_minutes: days.iter().map(|d| d.minutes).sum(),
            total_raw_cost: days.iter().map(|d| d.raw_cost).sum(),
            days,
        };
        debug!(
            %kind,
            minutes = strategy.total_minutes,
            raw_cost = strategy.total_raw_cost,
            "derived strategy"
        );
        strategy
    }
}

fn choose_mode(kind: StrategyKind, leg: &QuotedLeg) -> ChosenLeg {
    let (mode, pick) = match kind {
        StrategyKind::Fastest => {
            if leg.quote.transit.minutes <= leg.quote.taxi.minutes {
                (TransportMode::Transit, leg.quote.transit)
            } else {
                (TransportMode::Taxi, leg.quote.taxi)
            }
        }
        StrategyKind::Cheapest => {
            if leg.quote.transit.cost <= leg.quote.taxi.cost {
                (TransportMode::Transit, leg.quote.transit)
            } else {
                (TransportMode::Taxi, leg.quote.taxi)
            }
        }
        StrategyKind::Comfort => (TransportMode::Taxi, leg.quote.taxi),
    };
    ChosenLeg {
        origin: leg.origin.clone(),
        destination: leg.destination.clone(),
        mode,
        minutes: pick.minutes,
        cost: pick.cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::BalanceStatus;
    use crate::domain::poi::{CandidatePoi, Coordinate, Exposure, ScoredPoi};
    use crate::domain::transport::ModeQuote;
    use crate::error::ProviderError;
    use crate::weather::WeatherTier;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn plan(d: &str, names: &[(&str, f64, f64)]) -> DailyPlan {
        let pois: Vec<ScoredPoi> = names
            .iter()
            .map(|(name, lat, lon)| {
                ScoredPoi::new(
                    CandidatePoi {
                        name: name.to_string(),
                        duration_hours: 2.0,
                        ticket_price: 0.0,
                        popularity: 0.5,
                        tags: vec![],
                        child_friendly: true,
                        elderly_friendly: true,
                        exposure: Exposure::Mixed,
                        coordinate: Coordinate::new(*lat, *lon),
                    },
                    0.5,
                )
            })
            .collect();
        let hours: f64 = pois.iter().map(|p| p.duration_hours()).sum();
        DailyPlan {
            date: date(d),
            tier: WeatherTier::Outdoor,
            allocated_hours: hours,
            remaining_hours: 9.5 - hours,
            poi_budget_hours: 9.5,
            transport_reserve_hours: 2.5,
            estimated_total_hours: hours + 2.5,
            utilization: hours / 9.5,
            status: BalanceStatus::Reasonable,
            suggestion: None,
            pois,
        }
    }

    fn lodging() -> LodgingOption {
        LodgingOption {
            name: "Downtown Hotel".to_string(),
            rating: 4.3,
            room_type: "double".to_string(),
            price_per_night: 600.0,
            location: Coordinate::new(39.9042, 116.4074),
        }
    }

    struct FailingRouter;
    impl RoutingProvider for FailingRouter {
        fn leg_quote(&self, _: &Place, _: &Place) -> Result<LegQuote, ProviderError> {
            Err(ProviderError::new("unreachable"))
        }
    }

    /// Transit slower but cheaper; taxi fast and expensive
    struct FixedRouter;
    impl RoutingProvider for FixedRouter {
        fn leg_quote(&self, _: &Place, _: &Place) -> Result<LegQuote, ProviderError> {
            Ok(LegQuote {
                transit: ModeQuote { minutes: 40.0, cost: 5.0 },
                taxi: ModeQuote { minutes: 20.0, cost: 30.0 },
            })
        }
    }

    #[test]
    fn test_leg_chain_shape() {
        let config = PlannerConfig::default();
        let router = FixedRouter;
        let pricer = TransportPricer::new(&config, &router);

        let plans = vec![plan("2025-08-10", &[("a", 39.92, 116.41), ("b", 39.93, 116.42)])];
        let strategies = pricer.price(&lodging(), &plans);

        assert_eq!(strategies.len(), 3);
        for strategy in &strategies {
            // lodging -> a -> b -> lodging
            let legs = &strategy.days[0].legs;
            assert_eq!(legs.len(), 3);
            assert_eq!(legs[0].origin, "Downtown Hotel");
            assert_eq!(legs[0].destination, "a");
            assert_eq!(legs[2].destination, "Downtown Hotel");
        }
    }

    #[test]
    fn test_strategy_mode_choices() {
        let config = PlannerConfig::default();
        let router = FixedRouter;
        let pricer = TransportPricer::new(&config, &router);

        let plans = vec![plan("2025-08-10", &[("a", 39.92, 116.41)])];
        let strategies = pricer.price(&lodging(), &plans);

        let by_kind = |kind: StrategyKind| strategies.iter().find(|s| s.kind == kind).unwrap();

        // Taxi is faster, transit cheaper, comfort always taxi
        assert!(by_kind(StrategyKind::Fastest).days[0].legs.iter().all(|l| l.mode == TransportMode::Taxi));
        assert!(
            by_kind(StrategyKind::Cheapest).days[0]
                .legs
                .iter()
                .all(|l| l.mode == TransportMode::Transit)
        );
        assert!(by_kind(StrategyKind::Comfort).days[0].legs.iter().all(|l| l.mode == TransportMode::Taxi));

        assert_eq!(by_kind(StrategyKind::Fastest).total_minutes, 40.0);
        assert_eq!(by_kind(StrategyKind::Cheapest).total_raw_cost, 10.0);
        assert_eq!(by_kind(StrategyKind::Comfort).total_raw_cost, 60.0);
    }

    #[test]
    fn test_routing_failure_falls_back_to_estimate() {
        let config = PlannerConfig::default();
        let router = FailingRouter;
        let pricer = TransportPricer::new(&config, &router);

        let plans = vec![plan("2025-08-10", &[("a", 39.99, 116.27)])];
        let strategies = pricer.price(&lodging(), &plans);

        // Estimates are nonzero for a ~15km leg
        let comfort = strategies.iter().find(|s| s.kind == StrategyKind::Comfort).unwrap();
        assert!(comfort.total_minutes > 0.0);
        assert!(comfort.total_raw_cost > 13.0 * 2.0);
    }

    #[test]
    fn test_empty_day_has_no_legs() {
        let config = PlannerConfig::default();
        let router = FixedRouter;
        let pricer = TransportPricer::new(&config, &router);

        let plans = vec![plan("2025-08-10", &[])];
        let strategies = pricer.price(&lodging(), &plans);

        for strategy in &strategies {
            assert!(strategy.days[0].legs.is_empty());
            assert_eq!(strategy.total_minutes, 0.0);
        }
    }
}
