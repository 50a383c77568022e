//! Deterministic routing fallback
//!
//! When the routing lookup is unavailable, legs are estimated from
//! great-circle distance: taxi at 30 km/h costing 13 + 2.6 per km, transit
//! at 20 km/h costing 2 + 0.5 per km.

use crate::allocator::geo::haversine_km;
use crate::domain::{LegQuote, ModeQuote};
use crate::error::ProviderError;

use super::{Place, RoutingProvider};

/// Distance-based leg estimator
///
/// Also usable as a standalone [`RoutingProvider`] when no live routing
/// service is wired in.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    pub taxi_speed_kmh: f64,
    pub taxi_base_fare: f64,
    pub taxi_per_km: f64,
    pub transit_speed_kmh: f64,
    pub transit_base_fare: f64,
    pub transit_per_km: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            taxi_speed_kmh: 30.0,
            taxi_base_fare: 13.0,
            taxi_per_km: 2.6,
            transit_speed_kmh: 20.0,
            transit_base_fare: 2.0,
            transit_per_km: 0.5,
        }
    }
}

impl HaversineEstimator {
    /// Estimate both mode quotes for a leg
    pub fn estimate(&self, origin: &Place, destination: &Place) -> LegQuote {
        let km = haversine_km(origin.coordinate, destination.coordinate);
        LegQuote {
            taxi: ModeQuote {
                minutes: km / self.taxi_speed_kmh * 60.0,
                cost: self.taxi_base_fare + self.taxi_per_km * km,
            },
            transit: ModeQuote {
                minutes: km / self.transit_speed_kmh * 60.0,
                cost: self.transit_base_fare + self.transit_per_km * km,
            },
        }
    }
}

impl RoutingProvider for HaversineEstimator {
    fn leg_quote(&self, origin: &Place, destination: &Place) -> Result<LegQuote, ProviderError> {
        Ok(self.estimate(origin, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    #[test]
    fn test_zero_distance_leg() {
        let estimator = HaversineEstimator::default();
        let here = Place::new("hotel", Coordinate::new(39.9042, 116.4074));

        let quote = estimator.estimate(&here, &here);
        assert_eq!(quote.taxi.minutes, 0.0);
        assert_eq!(quote.taxi.cost, 13.0);
        assert_eq!(quote.transit.cost, 2.0);
    }

    #[test]
    fn test_taxi_faster_transit_cheaper() {
        let estimator = HaversineEstimator::default();
        let a = Place::new("a", Coordinate::new(39.9042, 116.4074));
        let b = Place::new("b", Coordinate::new(39.9990, 116.2754));

        let quote = estimator.estimate(&a, &b);
        assert!(quote.taxi.minutes < quote.transit.minutes);
        assert!(quote.transit.cost < quote.taxi.cost);
    }

    #[test]
    fn test_estimate_scales_with_distance() {
        let estimator = HaversineEstimator::default();
        let a = Place::new("a", Coordinate::new(39.90, 116.40));
        let near = Place::new("near", Coordinate::new(39.95, 116.40));
        let far = Place::new("far", Coordinate::new(40.10, 116.40));

        let q_near = estimator.estimate(&a, &near);
        let q_far = estimator.estimate(&a, &far);
        assert!(q_far.taxi.cost > q_near.taxi.cost);
        assert!(q_far.transit.minutes > q_near.transit.minutes);
    }
}
