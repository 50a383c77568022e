//! Great-circle distance and centroid helpers

use crate::domain::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates in kilometers
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_KM
}

/// Arithmetic centroid of a set of coordinates, None when empty
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    Some(Coordinate {
        lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
        lon: points.iter().map(|p| p.lon).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero() {
        let p = Coordinate::new(39.9042, 116.4074);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Tiananmen Square to the Summer Palace, roughly 15 km
        let tiananmen = Coordinate::new(39.9055, 116.3976);
        let summer_palace = Coordinate::new(39.9990, 116.2754);

        let km = haversine_km(tiananmen, summer_palace);
        assert!((km - 15.0).abs() < 2.0, "got {km}");
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(39.9, 116.4);
        let b = Coordinate::new(40.0, 116.3);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());

        let c = centroid(&[Coordinate::new(39.0, 116.0), Coordinate::new(41.0, 118.0)]).unwrap();
        assert_eq!(c.lat, 40.0);
        assert_eq!(c.lon, 117.0);
    }
}
