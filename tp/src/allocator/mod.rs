//! Daily allocator
//!
//! Staged greedy bin-packing of the scored, weather-filtered pool into the
//! trip days. Each day packs against its POI-time budget (daily cap minus
//! the transport reserve). POI selection is fixed once allocation closes:
//! later stages attach suggestions and warnings, they never reopen a day.

pub mod geo;

use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::domain::{AllocationWarning, BalanceStatus, Coordinate, DailyPlan, ScoredPoi, TripRequest};
use crate::scoring::name_matches_any;
use crate::weather::DayOutlook;

use geo::{centroid, haversine_km};

/// Allocation output: one plan per trip date plus non-fatal warnings
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub plans: Vec<DailyPlan>,
    pub warnings: Vec<AllocationWarning>,
}

struct DayState<'a> {
    outlook: &'a DayOutlook,
    pois: Vec<ScoredPoi>,
    allocated_hours: f64,
    remaining_hours: f64,
}

impl DayState<'_> {
    fn assign(&mut self, mut poi: ScoredPoi, day_index: usize) {
        let hours = poi.duration_hours();
        poi.day = Some(day_index);
        self.allocated_hours += hours;
        self.remaining_hours -= hours;
        self.pois.push(poi);
    }

    fn coordinates(&self) -> Vec<Coordinate> {
        self.pois.iter().map(|p| p.poi.coordinate).collect()
    }
}

/// Staged greedy allocator
pub struct DailyAllocator<'a> {
    config: &'a PlannerConfig,
}

impl<'a> DailyAllocator<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Allocate the pool across the trip days
    pub fn allocate(&self, request: &TripRequest, pool: &[ScoredPoi], outlooks: &[DayOutlook]) -> AllocationResult {
        let poi_budget = self.config.time.poi_budget(&request.group);
        let mut warnings = Vec::new();

        let mut days: Vec<DayState<'_>> = outlooks
            .iter()
            .map(|outlook| DayState {
                outlook,
                pois: Vec::new(),
                allocated_hours: 0.0,
                remaining_hours: poi_budget,
            })
            .collect();

        let mut used: Vec<String> = Vec::new();

        self.place_must_visits(request, pool, &mut days, &mut used, &mut warnings);
        self.flag_long_visits(poi_budget, &days, &mut warnings);
        self.cluster_fill(request, pool, &mut days, &mut used);
        self.revalidate_weather(&days);
        let plans = self.balance(poi_budget, days, &mut warnings);

        AllocationResult { plans, warnings }
    }

    /// Stage 1: must-visit POIs first, longest first, minimal-waste day
    fn place_must_visits(
        &self,
        request: &TripRequest,
        pool: &[ScoredPoi],
        days: &mut [DayState<'_>],
        used: &mut Vec<String>,
        warnings: &mut Vec<AllocationWarning>,
    ) {
        let must_visit = &request.preferences.must_visit;
        if must_visit.is_empty() {
            return;
        }

        let mut targets: Vec<&ScoredPoi> = Vec::new();
        for entry in must_visit {
            let matched = pool
                .iter()
                .find(|p| name_matches_any(p.name(), std::slice::from_ref(entry)));
            match matched {
                Some(poi) if !targets.iter().any(|t| t.name() == poi.name()) => targets.push(poi),
                Some(_) => {}
                None => warn!(%entry, "must-visit entry matches no catalog POI"),
            }
        }

        // Longest first so the big blocks claim whole days before the
        // remainder fragments capacity
        targets.sort_by(|a, b| {
            b.duration_hours()
                .partial_cmp(&a.duration_hours())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for target in targets {
            let hours = target.duration_hours();

            let mut best: Option<(usize, f64)> = None;
            for (idx, day) in days.iter().enumerate() {
                if !day.outlook.admits(&target.poi) || day.remaining_hours < hours {
                    continue;
                }
                let waste = day.remaining_hours - hours;
                if best.map(|(_, w)| waste < w).unwrap_or(true) {
                    best = Some((idx, waste));
                }
            }

            match best {
                Some((idx, _)) => {
                    debug!(name = %target.name(), day = idx, hours, "placed must-visit");
                    days[idx].assign(target.clone(), idx);
                    used.push(target.name().to_string());
                }
                None => {
                    warn!(name = %target.name(), hours, "must-visit fits on no day");
                    warnings.push(AllocationWarning::MustVisitUnplaced {
                        name: target.name().to_string(),
                        duration_hours: hours,
                    });
                }
            }
        }
    }

    /// Stage 2: flag high-duration POIs; two on one day is worth a warning
    fn flag_long_visits(&self, poi_budget: f64, days: &[DayState<'_>], warnings: &mut Vec<AllocationWarning>) {
        let threshold = poi_budget * self.config.allocation.high_duration_ratio;

        for day in days {
            let long: Vec<&ScoredPoi> = day
                .pois
                .iter()
                .filter(|p| p.duration_hours() >= threshold)
                .collect();

            if let Some(first) = long.first() {
                debug!(
                    date = %day.outlook.date,
                    name = %first.name(),
                    "high-duration visit, best kept on its own day"
                );
            }
            if long.len() > 1 {
                warn!(date = %day.outlook.date, count = long.len(), "multiple high-duration visits on one day");
                warnings.push(AllocationWarning::MultipleLongVisits {
                    date: day.outlook.date,
                    count: long.len(),
                });
            }
        }
    }

    /// Stage 3: fill remaining capacity, preferring POIs near each day's
    /// geographic center
    fn cluster_fill(&self, request: &TripRequest, pool: &[ScoredPoi], days: &mut [DayState<'_>], used: &mut Vec<String>) {
        let radius = self.config.allocation.cluster_radius_km;
        let fill_stop = self.config.allocation.fill_stop_hours;

        for idx in 0..days.len() {
            if days[idx].remaining_hours <= fill_stop {
                continue;
            }

            let center = centroid(&days[idx].coordinates()).unwrap_or(request.city_center);

            // Pool is score-ordered; partition keeps that order within
            // each half, so near POIs win at equal desirability
            let available: Vec<&ScoredPoi> = pool
                .iter()
                .filter(|p| !used.iter().any(|u| u == p.name()) && days[idx].outlook.admits(&p.poi))
                .collect();
            let (near, far): (Vec<&ScoredPoi>, Vec<&ScoredPoi>) = available
                .into_iter()
                .partition(|p| haversine_km(center, p.poi.coordinate) <= radius);

            for poi in near.into_iter().chain(far) {
                let hours = poi.duration_hours();
                if days[idx].remaining_hours < hours {
                    continue;
                }
                debug!(name = %poi.name(), day = idx, hours, "filled day");
                days[idx].assign(poi.clone(), idx);
                used.push(poi.name().to_string());

                if days[idx].remaining_hours < fill_stop {
                    break;
                }
            }
        }
    }

    /// Stage 4: weather re-validation
    ///
    /// Per-day eligibility is already enforced at every assignment, so
    /// this pass has nothing to move; it stays as the hook for allocators
    /// that relax the eligibility rule during packing.
    fn revalidate_weather(&self, days: &[DayState<'_>]) {
        for day in days {
            debug_assert!(day.pois.iter().all(|p| day.outlook.admits(&p.poi)));
        }
    }

    /// Stage 5: classify utilization and attach suggestions; never moves a
    /// POI
    fn balance(
        &self,
        poi_budget: f64,
        days: Vec<DayState<'_>>,
        warnings: &mut Vec<AllocationWarning>,
    ) -> Vec<DailyPlan> {
        let bands = &self.config.allocation.bands;
        let reserve = self.config.time.transport_reserve_hours;

        days.into_iter()
            .map(|day| {
                let utilization = if poi_budget > 0.0 { day.allocated_hours / poi_budget } else { 0.0 };
                let status = bands.classify(utilization);

                let suggestion = if utilization > bands.reasonable {
                    Some("consider trimming a visit or moving one to a lighter day".to_string())
                } else if utilization < bands.light {
                    Some("capacity for another POI or longer visits".to_string())
                } else {
                    None
                };

                if matches!(status, BalanceStatus::TooLittle | BalanceStatus::TooMuch) {
                    warnings.push(AllocationWarning::Unbalanced {
                        date: day.outlook.date,
                        status,
                        utilization,
                    });
                }

                debug!(
                    date = %day.outlook.date,
                    pois = day.pois.len(),
                    hours = day.allocated_hours,
                    %status,
                    "closed day"
                );

                DailyPlan {
                    date: day.outlook.date,
                    tier: day.outlook.tier,
                    pois: day.pois,
                    allocated_hours: day.allocated_hours,
                    remaining_hours: day.remaining_hours,
                    poi_budget_hours: poi_budget,
                    transport_reserve_hours: reserve,
                    estimated_total_hours: day.allocated_hours + reserve,
                    utilization,
                    status,
                    suggestion,
                }
            })
            .collect()
    }
}
