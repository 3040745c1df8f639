use serde::{Deserialize, Serialize};

use crate::{
    emission::{TransportMode, co2_savings_g, co2_savings_kg, round_2},
    geo::Path,
    points::points_for_distance,
};

/// Every number a route or trip shows, derived from one distance.
///
/// Emissions and points are computed from the rounded meter value so they
/// agree with what gets persisted alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub mode: TransportMode,
    pub distance_m: u64,
    pub distance_km: f64,
    pub co2_saved_kg: f64,
    pub co2_saved_g: u64,
    pub points: u32,
}

impl TripMetrics {
    pub fn for_distance(distance_m: f64, mode: TransportMode) -> Self {
        let distance_m = if distance_m.is_finite() && distance_m > 0.0 {
            distance_m.round() as u64
        } else {
            0
        };
        let meters = distance_m as f64;

        Self {
            mode,
            distance_m,
            distance_km: round_2(meters / 1000.0),
            co2_saved_kg: co2_savings_kg(meters, mode),
            co2_saved_g: co2_savings_g(meters, mode),
            points: points_for_distance(meters),
        }
    }

    pub fn for_path(path: &Path, mode: TransportMode) -> Self {
        Self::for_distance(path.length_m(), mode)
    }
}

/// Picks the backend's recorded distance when it is usable, otherwise the
/// measured fallback.
pub fn preferred_distance_m(recorded: Option<f64>, measure: impl FnOnce() -> f64) -> f64 {
    match recorded {
        Some(meters) if meters.is_finite() && meters > 0.0 => meters,
        _ => measure(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn metrics_for_a_bike_ride() {
        let metrics = TripMetrics::for_distance(7018.53, TransportMode::Bicycle);
        assert_eq!(metrics.distance_m, 7019);
        assert_eq!(metrics.distance_km, 7.02);
        assert_eq!(metrics.co2_saved_kg, 1.47);
        assert_eq!(metrics.co2_saved_g, 1474);
        assert_eq!(metrics.points, 15);
    }

    #[test]
    fn metrics_for_nothing() {
        for mode in TransportMode::ALL {
            let metrics = TripMetrics::for_distance(f64::NAN, mode);
            assert_eq!(metrics.distance_m, 0);
            assert_eq!(metrics.co2_saved_g, 0);
            assert_eq!(metrics.points, 0);
        }
    }

    #[test]
    fn metrics_for_path_uses_haversine_length() {
        let path = Path::new(vec![
            GeoPoint::new(0.0, 0.0).unwrap(),
            GeoPoint::new(0.0, 0.05).unwrap(),
        ]);
        let metrics = TripMetrics::for_path(&path, TransportMode::OnFoot);
        assert_eq!(metrics.distance_m, path.length_m_rounded());
        // ~5.56 km
        assert_eq!(metrics.points, 10);
    }

    #[test]
    fn recorded_distance_wins_when_usable() {
        assert_eq!(preferred_distance_m(Some(4200.0), || 10.0), 4200.0);
        assert_eq!(preferred_distance_m(Some(0.0), || 10.0), 10.0);
        assert_eq!(preferred_distance_m(Some(f64::NAN), || 10.0), 10.0);
        assert_eq!(preferred_distance_m(None, || 10.0), 10.0);
    }
}
