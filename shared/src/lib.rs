//! Trip metrics shared by every EcoRutas screen: path normalization,
//! haversine distance, CO2 savings, points accrual and reward tiers.
//!
//! Everything here is pure and synchronous.

pub mod emission;
pub mod geo;
pub mod metrics;
pub mod normalize;
pub mod points;
pub mod rewards;

pub use emission::{
    CAR_EMISSION_KG_PER_KM, TransportMode, UnknownTransportMode, co2_savings_g, co2_savings_kg,
    savings_kg_for_factor,
};
pub use geo::{
    CoordinateError, EARTH_RADIUS_M, GeoPoint, Path, display_km, haversine_m, path_length_m,
};
pub use metrics::{TripMetrics, preferred_distance_m};
pub use normalize::{PathError, normalize, normalize_str, try_normalize};
pub use points::points_for_distance;
pub use rewards::{NextTier, RewardTier, TierProgress};
