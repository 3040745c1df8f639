use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Private-car baseline every saving is measured against, kg CO2 per km.
pub const CAR_EMISSION_KG_PER_KM: f64 = 0.21;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode {0:?}")]
pub struct UnknownTransportMode(pub String);

/// Means of travel for a route or trip.
///
/// The canonical identifiers are the ones the backend persists
/// (`"a pie"`, `"bicicleta"`, `"colectivo"`); English aliases are accepted
/// when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    #[serde(rename = "a pie", alias = "on-foot")]
    OnFoot,
    #[serde(rename = "bicicleta", alias = "bicycle")]
    Bicycle,
    #[serde(rename = "colectivo", alias = "transit")]
    Transit,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [Self::OnFoot, Self::Bicycle, Self::Transit];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnFoot => "a pie",
            Self::Bicycle => "bicicleta",
            Self::Transit => "colectivo",
        }
    }

    /// kg CO2 emitted per km travelled.
    pub fn emission_factor(self) -> f64 {
        match self {
            Self::OnFoot | Self::Bicycle => 0.0,
            Self::Transit => 0.089,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = UnknownTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a pie" | "on-foot" => Ok(Self::OnFoot),
            "bicicleta" | "bicycle" => Ok(Self::Bicycle),
            "colectivo" | "transit" => Ok(Self::Transit),
            _ => Err(UnknownTransportMode(s.to_string())),
        }
    }
}

/// Unrounded kg of CO2 avoided versus the car baseline, never negative.
pub fn savings_kg_for_factor(distance_m: f64, factor_kg_per_km: f64) -> f64 {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return 0.0;
    }
    (CAR_EMISSION_KG_PER_KM - factor_kg_per_km).max(0.0) * (distance_m / 1000.0)
}

/// Savings in kilograms, rounded to two decimals for display.
pub fn co2_savings_kg(distance_m: f64, mode: TransportMode) -> f64 {
    round_2(savings_kg_for_factor(distance_m, mode.emission_factor()))
}

/// Savings in whole grams, the granularity trip records persist.
pub fn co2_savings_g(distance_m: f64, mode: TransportMode) -> u64 {
    (savings_kg_for_factor(distance_m, mode.emission_factor()) * 1000.0).round() as u64
}

pub(crate) fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names_and_aliases() {
        assert_eq!("a pie".parse::<TransportMode>(), Ok(TransportMode::OnFoot));
        assert_eq!("Bicycle".parse::<TransportMode>(), Ok(TransportMode::Bicycle));
        assert_eq!(" colectivo ".parse::<TransportMode>(), Ok(TransportMode::Transit));
        assert_eq!("transit".parse::<TransportMode>(), Ok(TransportMode::Transit));
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let err = "auto".parse::<TransportMode>().unwrap_err();
        assert_eq!(err, UnknownTransportMode("auto".to_string()));
    }

    #[test]
    fn serde_uses_backend_identifiers() {
        assert_eq!(
            serde_json::to_string(&TransportMode::OnFoot).unwrap(),
            "\"a pie\""
        );
        let mode: TransportMode = serde_json::from_str("\"bicycle\"").unwrap();
        assert_eq!(mode, TransportMode::Bicycle);
    }

    #[test]
    fn bicycle_saves_full_car_baseline() {
        // 10 km * 0.21
        assert_eq!(co2_savings_kg(10_000.0, TransportMode::Bicycle), 2.1);
        assert_eq!(co2_savings_g(10_000.0, TransportMode::Bicycle), 2100);
    }

    #[test]
    fn transit_saves_the_difference() {
        // (0.21 - 0.089) * 10 km = 1.21 kg
        assert!((co2_savings_kg(10_000.0, TransportMode::Transit) - 1.21).abs() < 1e-9);
        assert_eq!(co2_savings_g(5_000.0, TransportMode::Transit), 605);
    }

    #[test]
    fn dirtier_than_car_clamps_to_zero() {
        assert_eq!(savings_kg_for_factor(12_000.0, 0.35), 0.0);
        assert_eq!(savings_kg_for_factor(12_000.0, CAR_EMISSION_KG_PER_KM), 0.0);
    }

    #[test]
    fn degenerate_distances_save_nothing() {
        assert_eq!(savings_kg_for_factor(0.0, 0.0), 0.0);
        assert_eq!(savings_kg_for_factor(-50.0, 0.0), 0.0);
        assert_eq!(savings_kg_for_factor(f64::NAN, 0.0), 0.0);
    }
}
