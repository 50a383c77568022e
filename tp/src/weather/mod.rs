//! Weather gate
//!
//! Classifies each trip date into a suitability tier and enforces the hard
//! feasibility checks that must pass before allocation: whole-trip extreme
//! weather, must-visit reachability, per-day POI compatibility, and
//! per-day fullness. Any failed check ends the session with a request for
//! new dates; the gate never proceeds partially.

pub mod classifier;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::domain::{CandidatePoi, Exposure, ScoredPoi, TripRequest};
use crate::providers::DailyForecast;
use crate::scoring::name_matches_any;
use crate::session::{GateRejection, ReasonCode};

pub use classifier::{WeatherClassifier, WeatherTier};

/// One trip date with its classified tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOutlook {
    pub date: NaiveDate,
    pub descriptor: String,
    pub tier: WeatherTier,
}

impl DayOutlook {
    /// Whether this day's weather admits the POI
    pub fn admits(&self, poi: &CandidatePoi) -> bool {
        self.tier.admits(poi.exposure)
    }
}

/// The four ordered feasibility checks over the forecast
pub struct WeatherGate<'a> {
    classifier: WeatherClassifier,
    config: &'a PlannerConfig,
}

impl<'a> WeatherGate<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self {
            classifier: WeatherClassifier::new(),
            config,
        }
    }

    /// Run all checks; on success return one outlook per trip date
    pub fn assess(
        &self,
        request: &TripRequest,
        pool: &[ScoredPoi],
        forecasts: &[DailyForecast],
    ) -> Result<Vec<DayOutlook>, GateRejection> {
        let outlooks = self.classify_days(request, forecasts);

        self.check_extreme_weather(request, &outlooks)?;
        self.check_must_visit_conflict(request, pool, &outlooks)?;
        // Per-day POI compatibility is a function of tier and exposure
        // (DayOutlook::admits); the fullness check consumes it directly.
        self.check_fullness(request, pool, &outlooks)?;

        Ok(outlooks)
    }

    fn classify_days(&self, request: &TripRequest, forecasts: &[DailyForecast]) -> Vec<DayOutlook> {
        request
            .trip_dates()
            .into_iter()
            .map(|date| {
                let descriptor = forecasts
                    .iter()
                    .find(|f| f.date == date)
                    .map(|f| f.descriptor.clone())
                    .unwrap_or_else(|| {
                        warn!(%date, "no forecast for trip date, assuming fair weather");
                        "unknown".to_string()
                    });
                let tier = self.classifier.classify(&descriptor);
                debug!(%date, %descriptor, %tier, "classified trip date");
                DayOutlook { date, descriptor, tier }
            })
            .collect()
    }

    /// Check A: the whole window is lost to severe weather
    fn check_extreme_weather(&self, request: &TripRequest, outlooks: &[DayOutlook]) -> Result<(), GateRejection> {
        let blocked: Vec<NaiveDate> = outlooks
            .iter()
            .filter(|o| o.tier == WeatherTier::Blocked)
            .map(|o| o.date)
            .collect();

        if blocked.len() as u32 >= request.trip_days() {
            return Err(GateRejection {
                code: ReasonCode::ExtremeWeather,
                message: "extreme weather blocks the whole trip".to_string(),
                dates: blocked,
            });
        }
        Ok(())
    }

    /// Check B: an outdoor-only must-visit has no outdoor-suitable day
    fn check_must_visit_conflict(
        &self,
        request: &TripRequest,
        pool: &[ScoredPoi],
        outlooks: &[DayOutlook],
    ) -> Result<(), GateRejection> {
        let must_visit = &request.preferences.must_visit;
        if must_visit.is_empty() {
            return Ok(());
        }

        let outdoor_only: Vec<&str> = pool
            .iter()
            .filter(|p| p.poi.exposure == Exposure::Outdoor && name_matches_any(p.name(), must_visit))
            .map(|p| p.name())
            .collect();

        if outdoor_only.is_empty() {
            return Ok(());
        }

        let has_outdoor_day = outlooks.iter().any(|o| o.tier == WeatherTier::Outdoor);
        if !has_outdoor_day {
            return Err(GateRejection {
                code: ReasonCode::MustVisitConflict,
                message: format!(
                    "must-visit POI unreachable under forecast weather: {}",
                    outdoor_only.join(", ")
                ),
                dates: outlooks.iter().map(|o| o.date).collect(),
            });
        }
        Ok(())
    }

    /// Check D: a day's compatible POIs cannot come close to filling it
    fn check_fullness(
        &self,
        request: &TripRequest,
        pool: &[ScoredPoi],
        outlooks: &[DayOutlook],
    ) -> Result<(), GateRejection> {
        let poi_budget = self.config.time.poi_budget(&request.group);
        let slack = self.config.allocation.slack_threshold_hours;

        for outlook in outlooks {
            let available: f64 = pool
                .iter()
                .filter(|p| outlook.admits(&p.poi))
                .map(|p| p.duration_hours())
                .sum();

            if poi_budget - available > slack {
                return Err(GateRejection {
                    code: ReasonCode::SparseItinerary,
                    message: format!("itinerary would be too sparse on {}", outlook.date),
                    dates: vec![outlook.date],
                });
            }
        }
        Ok(())
    }
}
