use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance in the application.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("coordinate is not a finite number")]
    NonFinite,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated `(latitude, longitude)` pair in degrees.
///
/// On the wire a point is the two-element array `[lat, lon]`, the shape the
/// backend stores and the map widget consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lon(self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(self, other: Self) -> f64 {
        haversine_m(self, other)
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = CoordinateError;

    fn try_from([lat, lon]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lat, point.lon]
    }
}

pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = ((dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2))
        .min(1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Unrounded length of a polyline; zero for fewer than two points.
pub fn path_length_m(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

/// Meters as kilometers rounded to two decimals, the precision screens show.
pub fn display_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

/// Ordered travel path. An empty path means "nothing to show or measure".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<GeoPoint>);

impl Path {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.0.first().copied()
    }

    /// First and last point, only for paths that actually go somewhere.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match self.0.as_slice() {
            [first, .., last] => Some((*first, *last)),
            _ => None,
        }
    }

    pub fn length_m(&self) -> f64 {
        path_length_m(&self.0)
    }

    pub fn length_m_rounded(&self) -> u64 {
        self.length_m().round() as u64
    }

    /// JSON text form (`"[[lat,lon],...]"`) the backend stores in its `path` columns.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromIterator<GeoPoint> for Path {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = GeoPoint;
    type IntoIter = std::vec::IntoIter<GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
