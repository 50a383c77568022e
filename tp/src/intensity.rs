//! Intensity validation
//!
//! A transport strategy is only usable if, on every day, visit time plus
//! travel time stays under the group's daily cap. The cap is the full
//! daily figure, not the POI-only budget: the reserve the allocator held
//! back is replaced here by the strategy's actual leg times.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::domain::{DailyPlan, Group, TransportStrategy};

/// One day's time load under a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLoad {
    pub date: NaiveDate,
    pub poi_hours: f64,
    pub transport_hours: f64,
    pub total_hours: f64,
}

/// A strategy that passed the daily-cap check, with its per-day totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedStrategy {
    pub strategy: TransportStrategy,
    pub days: Vec<DayLoad>,
    pub avg_daily_hours: f64,
}

/// Daily-cap check over the candidate strategies
pub struct IntensityValidator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> IntensityValidator<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Keep the strategies whose every day fits under the cap
    ///
    /// An empty result is terminal: no plan exists without shortening the
    /// itinerary or picking different POIs, which is outside this core's
    /// authority.
    pub fn validate(&self, group: &Group, plans: &[DailyPlan], strategies: &[TransportStrategy]) -> Vec<ValidatedStrategy> {
        let cap = self.config.time.daily_cap(group);

        strategies
            .iter()
            .filter_map(|strategy| {
                let days: Vec<DayLoad> = plans
                    .iter()
                    .enumerate()
                    .map(|(idx, plan)| {
                        let poi_hours = plan.poi_hours();
                        let transport_hours = strategy.day_minutes(idx) / 60.0;
                        DayLoad {
                            date: plan.date,
                            poi_hours,
                            transport_hours,
                            total_hours: poi_hours + transport_hours,
                        }
                    })
                    .collect();

                let worst = days.iter().map(|d| d.total_hours).fold(0.0, f64::max);
                if worst > cap {
                    debug!(kind = %strategy.kind, worst, cap, "strategy exceeds daily cap");
                    return None;
                }

                let avg_daily_hours = if days.is_empty() {
                    0.0
                } else {
                    days.iter().map(|d| d.total_hours).sum::<f64>() / days.len() as f64
                };

                debug!(kind = %strategy.kind, avg_daily_hours, "strategy fits the daily cap");
                Some(ValidatedStrategy {
                    strategy: strategy.clone(),
                    days,
                    avg_daily_hours,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::plan::BalanceStatus;
    use crate::domain::poi::{CandidatePoi, Coordinate, Exposure, ScoredPoi};
    use crate::domain::transport::{DayRoute, StrategyKind};
    use crate::weather::WeatherTier;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn plan_with_hours(d: &str, hours: f64) -> DailyPlan {
        let poi = ScoredPoi::new(
            CandidatePoi {
                name: format!("poi-{d}"),
                duration_hours: hours,
                ticket_price: 0.0,
                popularity: 0.5,
                tags: vec![],
                child_friendly: true,
                elderly_friendly: true,
                exposure: Exposure::Mixed,
                coordinate: Coordinate::new(39.9, 116.4),
            },
            0.5,
        );
        DailyPlan {
            date: date(d),
            tier: WeatherTier::Outdoor,
            pois: vec![poi],
            allocated_hours: hours,
            remaining_hours: 9.5 - hours,
            poi_budget_hours: 9.5,
            transport_reserve_hours: 2.5,
            estimated_total_hours: hours + 2.5,
            utilization: hours / 9.5,
            status: BalanceStatus::Reasonable,
            suggestion: None,
        }
    }

    fn strategy(kind: StrategyKind, day_minutes: &[f64]) -> TransportStrategy {
        let days: Vec<DayRoute> = day_minutes
            .iter()
            .enumerate()
            .map(|(i, m)| DayRoute {
                date: date(&format!("2025-08-1{i}")),
                legs: vec![],
                minutes: *m,
                raw_cost: 0.0,
            })
            .collect();
        TransportStrategy {
            kind,
            total_minutes: day_minutes.iter().sum(),
            total_raw_cost: 0.0,
            days,
        }
    }

    #[test]
    fn test_strategy_within_cap_passes() {
        let config = PlannerConfig::default();
        let validator = IntensityValidator::new(&config);
        let plans = vec![plan_with_hours("2025-08-10", 8.0), plan_with_hours("2025-08-11", 6.0)];

        // Adult-only cap is 12h; 8h + 90min and 6h + 60min both fit
        let passing = validator.validate(
            &Group::new(2, 0, 0),
            &plans,
            &[strategy(StrategyKind::Cheapest, &[90.0, 60.0])],
        );

        assert_eq!(passing.len(), 1);
        let v = &passing[0];
        assert_eq!(v.days[0].total_hours, 9.5);
        assert_eq!(v.days[1].total_hours, 7.0);
        assert_eq!(v.avg_daily_hours, 8.25);
    }

    #[test]
    fn test_strategy_over_cap_is_dropped() {
        let config = PlannerConfig::default();
        let validator = IntensityValidator::new(&config);
        let plans = vec![plan_with_hours("2025-08-10", 8.0)];

        // Mixed-group cap is 9h; 8h POIs + 2h transport busts it
        let passing = validator.validate(
            &Group::new(2, 1, 0),
            &plans,
            &[strategy(StrategyKind::Comfort, &[120.0])],
        );

        assert!(passing.is_empty());
    }

    #[test]
    fn test_mixed_group_cap_is_lower() {
        let config = PlannerConfig::default();
        let validator = IntensityValidator::new(&config);
        let plans = vec![plan_with_hours("2025-08-10", 8.0)];
        let strategies = [strategy(StrategyKind::Fastest, &[90.0])];

        // 9.5h total: fine for adults (12h), over the 9h mixed cap
        assert_eq!(validator.validate(&Group::new(2, 0, 0), &plans, &strategies).len(), 1);
        assert!(validator.validate(&Group::new(2, 0, 1), &plans, &strategies).is_empty());
    }

    #[test]
    fn test_partial_pass_keeps_survivors() {
        let config = PlannerConfig::default();
        let validator = IntensityValidator::new(&config);
        let plans = vec![plan_with_hours("2025-08-10", 10.0)];

        let passing = validator.validate(
            &Group::new(2, 0, 0),
            &plans,
            &[
                strategy(StrategyKind::Fastest, &[60.0]),
                strategy(StrategyKind::Cheapest, &[180.0]),
            ],
        );

        assert_eq!(passing.len(), 1);
        assert_eq!(passing[0].strategy.kind, StrategyKind::Fastest);
    }
}
