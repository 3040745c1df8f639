//! Reconciles the path payloads the application receives into one canonical
//! `[lat, lon]` ordering.
//!
//! Sources disagree: saved routes store JSON text, the road router returns
//! GeoJSON `[lon, lat]` arrays, and hand-entered data may be either. The axis
//! order is guessed once, from the first usable pair: if its first component
//! cannot be a latitude (`|x| > 90`) while its second can, every pair is
//! swapped. When both components of that pair fit in `[-90, 90]` the input is
//! taken as `[lat, lon]`; there is no way to tell without metadata from the
//! source.

use serde_json::Value;

use crate::geo::{CoordinateError, GeoPoint, Path};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("path text is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("path is not an array of coordinate pairs")]
    NotASequence,
    #[error("path has no points")]
    Empty,
    #[error("element {index} is not a numeric [a, b] pair")]
    MalformedElement { index: usize },
    #[error("element {index}: {source}")]
    InvalidCoordinate {
        index: usize,
        #[source]
        source: CoordinateError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisOrder {
    LatLon,
    LonLat,
}

impl AxisOrder {
    fn detect((first, second): (f64, f64)) -> Self {
        if first.abs() > 90.0 && second.abs() <= 90.0 {
            Self::LonLat
        } else {
            Self::LatLon
        }
    }

    fn to_point(self, (a, b): (f64, f64)) -> Result<GeoPoint, CoordinateError> {
        match self {
            Self::LatLon => GeoPoint::new(a, b),
            Self::LonLat => GeoPoint::new(b, a),
        }
    }
}

/// Best-effort normalization: anything unusable yields an empty path and
/// unusable elements are dropped.
pub fn normalize(raw: &Value) -> Path {
    let Ok(elements) = elements(raw) else {
        return Path::empty();
    };
    let pairs: Vec<(f64, f64)> = elements.iter().filter_map(numeric_pair).collect();
    let Some(order) = pairs.first().copied().map(AxisOrder::detect) else {
        return Path::empty();
    };

    pairs
        .into_iter()
        .filter_map(|pair| order.to_point(pair).ok())
        .collect()
}

/// [`normalize`] for JSON text.
pub fn normalize_str(text: &str) -> Path {
    normalize(&Value::String(text.to_string()))
}

/// Strict normalization: same rules, but every element must be a valid pair.
pub fn try_normalize(raw: &Value) -> Result<Path, PathError> {
    let elements = elements(raw)?;

    let mut pairs = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let pair = numeric_pair(element).ok_or(PathError::MalformedElement { index })?;
        pairs.push(pair);
    }

    let order = AxisOrder::detect(pairs[0]);
    pairs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| {
            order
                .to_point(pair)
                .map_err(|source| PathError::InvalidCoordinate { index, source })
        })
        .collect()
}

/// Decodes text payloads and returns the non-empty element list.
fn elements(raw: &Value) -> Result<Vec<Value>, PathError> {
    let document = match raw {
        Value::String(text) => serde_json::from_str::<Value>(text)?,
        other => other.clone(),
    };
    match document {
        Value::Array(items) if items.is_empty() => Err(PathError::Empty),
        Value::Array(items) => Ok(items),
        _ => Err(PathError::NotASequence),
    }
}

fn numeric_pair(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [a, b] => Some((a.as_f64()?, b.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn keeps_lat_lon_input() {
        let path = normalize(&json!([[2.4412293, -76.6116028], [2.480555, -76.562186]]));
        assert_eq!(
            path.points(),
            &[pt(2.4412293, -76.6116028), pt(2.480555, -76.562186)]
        );
    }

    #[test]
    fn swaps_lon_lat_input() {
        let path = normalize(&json!([[151.2093, -33.8688], [151.2153, -33.8568]]));
        assert_eq!(
            path.points(),
            &[pt(-33.8688, 151.2093), pt(-33.8568, 151.2153)]
        );
    }

    #[test]
    fn ambiguous_first_pair_is_read_as_lat_lon() {
        // Both components fit a latitude, so nothing can be swapped.
        let path = normalize(&json!([[-76.6116028, 2.4412293]]));
        assert_eq!(path.points(), &[pt(-76.6116028, 2.4412293)]);
    }

    #[test]
    fn parses_json_text() {
        let path = normalize_str("[[2.44,-76.61],[2.48,-76.56]]");
        assert_eq!(path.len(), 2);
        assert_eq!(path.first(), Some(pt(2.44, -76.61)));
    }

    #[test]
    fn unparseable_text_is_empty() {
        assert!(normalize_str("[[2.44,-76.61],").is_empty());
        assert!(normalize_str("not json").is_empty());
    }

    #[test]
    fn wrong_shapes_are_empty() {
        assert!(normalize(&json!({"lat": 1.0, "lon": 2.0})).is_empty());
        assert!(normalize(&json!([])).is_empty());
        assert!(normalize(&json!("[]")).is_empty());
        assert!(normalize(&json!(42)).is_empty());
        assert!(normalize(&Value::Null).is_empty());
        assert!(normalize(&json!([["a", "b"], [1.0]])).is_empty());
    }

    #[test]
    fn drops_invalid_elements_and_keeps_order() {
        let path = normalize(&json!([
            [1.0, 10.0],
            "junk",
            [2.0, 20.0, 5.0],
            [3.0, null],
            [4.0, 40.0]
        ]));
        assert_eq!(path.points(), &[pt(1.0, 10.0), pt(4.0, 40.0)]);
    }

    #[test]
    fn axis_order_is_decided_once_from_first_valid_pair() {
        // Second pair alone would look like [lat, lon] but is swapped with the rest.
        let path = normalize(&json!([null, [150.0, -30.0], [10.0, 20.0]]));
        assert_eq!(path.points(), &[pt(-30.0, 150.0), pt(20.0, 10.0)]);
    }

    #[test]
    fn out_of_range_points_are_dropped() {
        let path = normalize(&json!([[10.0, 20.0], [95.0, 200.0], [11.0, 21.0]]));
        assert_eq!(path.points(), &[pt(10.0, 20.0), pt(11.0, 21.0)]);
    }

    #[test]
    fn single_point_is_kept() {
        let path = normalize(&json!([[45.0, 5.0]]));
        assert_eq!(path.len(), 1);
        assert_eq!(path.length_m(), 0.0);
    }

    #[test]
    fn strict_reports_offending_element() {
        let err = try_normalize(&json!([[1.0, 2.0], [3.0]])).unwrap_err();
        assert!(matches!(err, PathError::MalformedElement { index: 1 }));

        let err = try_normalize(&json!([[1.0, 2.0], [95.0, 2.0]])).unwrap_err();
        assert!(matches!(
            err,
            PathError::InvalidCoordinate {
                index: 1,
                source: CoordinateError::LatitudeOutOfRange(_)
            }
        ));
    }

    #[test]
    fn strict_reports_structural_errors() {
        assert!(matches!(try_normalize(&json!("{")), Err(PathError::Parse(_))));
        assert!(matches!(try_normalize(&json!({})), Err(PathError::NotASequence)));
        assert!(matches!(try_normalize(&json!([])), Err(PathError::Empty)));
    }

    #[test]
    fn strict_accepts_lon_lat_text() {
        let path = try_normalize(&json!("[[-122.42,37.77],[-122.27,37.80]]")).unwrap();
        assert_eq!(path.points(), &[pt(37.77, -122.42), pt(37.80, -122.27)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn as_value(pairs: &[(f64, f64)]) -> Value {
            Value::Array(pairs.iter().map(|(a, b)| json!([a, b])).collect())
        }

        proptest! {
            #[test]
            fn prop_canonical_input_is_unchanged(
                pairs in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 1..10)
            ) {
                let path = normalize(&as_value(&pairs));
                let expected: Vec<GeoPoint> = pairs.iter().map(|&(lat, lon)| pt(lat, lon)).collect();
                prop_assert_eq!(path.points(), expected.as_slice());
            }

            #[test]
            fn prop_swapped_input_normalizes_to_canonical(
                first in (-90.0f64..=90.0, prop_oneof![-180.0f64..-90.5, 90.5f64..=180.0]),
                rest in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..8)
            ) {
                let mut pairs = vec![first];
                pairs.extend(rest);
                let swapped: Vec<(f64, f64)> = pairs.iter().map(|&(lat, lon)| (lon, lat)).collect();
                prop_assert_eq!(normalize(&as_value(&swapped)), normalize(&as_value(&pairs)));
            }
        }
    }
}
