use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared::{GeoPoint, Path, TierProgress, TransportMode, TripMetrics};

// Records of the EcoRutas REST backend. Field names on the wire are the
// backend's own.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "modo")]
    pub mode: String,
    /// JSON text or array; run it through `shared::normalize` before use.
    #[serde(default)]
    pub path: Value,
    #[serde(rename = "distancia_m", default, deserialize_with = "lenient_f64")]
    pub distance_m: Option<f64>,
    #[serde(
        rename = "co2_ahorrado_estimado",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub co2_saved_kg: Option<f64>,
    #[serde(rename = "creado_por", default)]
    pub created_by: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoute {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "modo")]
    pub mode: TransportMode,
    /// The backend expects JSON text here, not an array.
    pub path: String,
    #[serde(rename = "distancia_m")]
    pub distance_m: u64,
    #[serde(rename = "co2_ahorrado_estimado")]
    pub co2_saved_kg: f64,
    #[serde(rename = "creado_por")]
    pub created_by: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "puntos", default, deserialize_with = "lenient_f64")]
    pub points: Option<f64>,
}

impl UserRecord {
    pub fn points_total(&self) -> u64 {
        match self.points {
            Some(points) if points.is_finite() && points > 0.0 => points.round() as u64,
            _ => 0,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsUpdate {
    #[serde(rename = "puntos")]
    pub points: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripHistory {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_u64"
    )]
    pub id: Option<u64>,
    #[serde(rename = "ruta_id", deserialize_with = "lenient_u64")]
    pub route_id: u64,
    #[serde(rename = "modo")]
    pub mode: TransportMode,
    #[serde(rename = "iniciado_en")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "terminado_en", default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(rename = "distancia_m", deserialize_with = "lenient_u64")]
    pub distance_m: u64,
    #[serde(rename = "co2_ahorrado_g", deserialize_with = "lenient_u64")]
    pub co2_saved_g: u64,
    /// JSON text of `[start, end]`.
    #[serde(rename = "path_registrado")]
    pub recorded_path: String,
}

/// Accepts numbers, numeric strings (decimal columns) and null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Whole, non-negative counterpart of [`lenient_f64`]; `"7018.00"` reads as 7018.
fn lenient_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_u64(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a non-negative number or numeric string"))
}

// Gateway API payloads.

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub path: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub path: Path,
}

#[derive(Debug, Deserialize)]
pub struct TripMetricsRequest {
    #[serde(default)]
    pub path: Value,
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripMetricsResponse {
    pub path: Path,
    #[serde(flatten)]
    pub metrics: TripMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TierProgressView {
    #[serde(flatten)]
    pub progress: TierProgress,
    pub next_label: String,
}

impl From<TierProgress> for TierProgressView {
    fn from(progress: TierProgress) -> Self {
        Self {
            next_label: progress.next_label(),
            progress,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RewardsSummary {
    pub user_id: u64,
    pub name: String,
    pub rewards: TierProgressView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteSummary {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub mode: String,
    pub path: Path,
    pub distance_km: Option<f64>,
}

impl From<RouteRecord> for RouteSummary {
    fn from(record: RouteRecord) -> Self {
        let path = shared::normalize(&record.path);
        let distance_km = record
            .distance_m
            .filter(|m| m.is_finite() && *m > 0.0)
            .map(shared::display_km);
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            mode: record.mode,
            path,
            distance_km,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveRouteRequest {
    pub name: String,
    pub mode: String,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedRouteResponse {
    pub route: RouteRecord,
    pub road_path: Path,
    pub metrics: TripMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoutePreview {
    pub route_id: u64,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Road geometry between the endpoints; empty when routing failed.
    pub road_path: Path,
    pub distance_km: f64,
    /// What starting this route would record, when its mode is known.
    pub trip_metrics: Option<TripMetrics>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsAward {
    pub awarded: u32,
    /// Total re-read from the backend after the update; absent when nothing was awarded.
    pub total: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TripReceipt {
    pub trip: TripHistory,
    pub metrics: TripMetrics,
    pub points: PointsAward,
}
