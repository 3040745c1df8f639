/// Points granted per completed 2 km.
pub const POINTS_PER_STEP: u32 = 5;

/// Points earned for a registered trip: 5 for every full 2 km, nothing for a
/// partial increment.
pub fn points_for_distance(distance_m: f64) -> u32 {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return 0;
    }
    ((distance_m / 1000.0 / 2.0).floor() as u32).saturating_mul(POINTS_PER_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_function() {
        assert_eq!(points_for_distance(0.0), 0);
        assert_eq!(points_for_distance(1999.0), 0);
        assert_eq!(points_for_distance(2000.0), 5);
        assert_eq!(points_for_distance(3999.0), 5);
        assert_eq!(points_for_distance(4000.0), 10);
        assert_eq!(points_for_distance(7018.5), 15);
    }

    #[test]
    fn nonsense_distances_earn_nothing() {
        assert_eq!(points_for_distance(-4000.0), 0);
        assert_eq!(points_for_distance(f64::NAN), 0);
        assert_eq!(points_for_distance(f64::INFINITY), 0);
    }
}
