use crate::error::{Axis, CoordinateError};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A validated latitude/longitude pair in degrees.
///
/// The only way to build one is through [`validate_point`] (or
/// [`parse_point`]), so every `GeoPoint` in circulation is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other`, in kilometres.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(*self, *other)
    }
}

fn check_axis(value: f64, axis: Axis) -> Result<f64, CoordinateError> {
    let (min, max) = axis.bounds();
    // NaN fails the range test too.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CoordinateError::Range { axis, value })
    }
}

/// Checks both axes against their inclusive bounds. Latitude is checked first.
pub fn validate_point(latitude: f64, longitude: f64) -> Result<GeoPoint, CoordinateError> {
    Ok(GeoPoint {
        latitude: check_axis(latitude, Axis::Latitude)?,
        longitude: check_axis(longitude, Axis::Longitude)?,
    })
}

/// Reads one raw coordinate. Surrounding whitespace is ignored; anything
/// that is not a finite number is a parse error.
pub fn parse_coordinate(raw: &str, axis: Axis) -> Result<f64, CoordinateError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoordinateError::Parse {
            axis,
            raw: raw.to_string(),
        }),
    }
}

/// Parses and validates a raw latitude/longitude pair.
pub fn parse_point(raw_latitude: &str, raw_longitude: &str) -> Result<GeoPoint, CoordinateError> {
    let latitude = parse_coordinate(raw_latitude, Axis::Latitude)?;
    let longitude = parse_coordinate(raw_longitude, Axis::Longitude)?;
    validate_point(latitude, longitude)
}

/// Great-circle distance using the haversine formula.
/// Output in kilometres.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        a.latitude.to_radians(),
        a.longitude.to_radians(),
        b.latitude.to_radians(),
        b.longitude.to_radians(),
    );
    // abs() keeps the result bit-for-bit symmetric in its arguments.
    let dlat = (lat2 - lat1).abs();
    let dlon = (lon2 - lon1).abs();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push sqrt(h) just past 1 near antipodes.
    let c = h.sqrt().min(1.0).asin();
    2.0 * EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        validate_point(lat, lon).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs() * 1e-3;
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} not within 0.1% of {}",
            actual,
            expected
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_point(90.0, 180.0).is_ok());
        assert!(validate_point(-90.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(
            validate_point(91.0, 0.0),
            Err(CoordinateError::Range { axis: Axis::Latitude, value: 91.0 })
        );
        assert_eq!(
            validate_point(0.0, 181.0),
            Err(CoordinateError::Range { axis: Axis::Longitude, value: 181.0 })
        );
        // Latitude is reported first when both are bad.
        assert_eq!(validate_point(-100.0, 200.0).unwrap_err().axis(), Axis::Latitude);
    }

    #[test]
    fn nan_is_never_a_valid_point() {
        assert!(validate_point(f64::NAN, 0.0).is_err());
        assert!(validate_point(0.0, f64::NAN).is_err());
    }

    #[test]
    fn parse_rejects_non_numbers() {
        for raw in ["", "  ", "north", "12,5", "NaN", "inf", "-infinity"] {
            assert_eq!(
                parse_coordinate(raw, Axis::Latitude),
                Err(CoordinateError::Parse { axis: Axis::Latitude, raw: raw.to_string() }),
                "{:?} should not parse",
                raw
            );
        }
        assert_eq!(parse_coordinate(" 48.85 ", Axis::Latitude), Ok(48.85));
        assert_eq!(parse_coordinate("-3", Axis::Longitude), Ok(-3.0));
    }

    #[test]
    fn parse_point_reports_parse_before_range() {
        let err = parse_point("abc", "500").unwrap_err();
        assert!(matches!(err, CoordinateError::Parse { axis: Axis::Latitude, .. }));
        let err = parse_point("10", "500").unwrap_err();
        assert!(matches!(err, CoordinateError::Range { axis: Axis::Longitude, .. }));
        assert_eq!(parse_point("10", "20").unwrap(), point(10.0, 20.0));
    }

    #[test]
    fn one_degree_at_the_equator() {
        let origin = point(0.0, 0.0);
        let one_degree = 111.19;
        assert_close(distance(origin, point(0.0, 1.0)), one_degree);
        assert_close(distance(origin, point(0.0, -1.0)), one_degree);
        assert_close(distance(origin, point(1.0, 0.0)), one_degree);
    }

    #[test]
    fn known_city_pair() {
        // Paris to London, roughly 343.5 km.
        let paris = point(48.8566, 2.3522);
        let london = point(51.5074, -0.1278);
        assert_close(distance(paris, london), 343.5);
    }

    #[test]
    fn antipodes_hit_the_upper_bound() {
        let d = distance(point(0.0, 0.0), point(0.0, 180.0));
        assert_close(d, PI * EARTH_RADIUS_KM);
        let poles = distance(point(90.0, 0.0), point(-90.0, 0.0));
        assert_close(poles, PI * EARTH_RADIUS_KM);
    }

    #[test]
    fn distance_to_matches_free_function() {
        let a = point(35.6762, 139.6503);
        let b = point(-33.8688, 151.2093);
        assert_eq!(a.distance_to(&b), distance(a, b));
    }

    fn any_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| point(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(p in any_point()) {
            prop_assert_eq!(distance(p, p), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(a in any_point(), b in any_point()) {
            prop_assert_eq!(distance(a, b), distance(b, a));
        }

        #[test]
        fn prop_distance_is_bounded(a in any_point(), b in any_point()) {
            let d = distance(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= PI * EARTH_RADIUS_KM + 1e-9, "{} exceeds half circumference", d);
        }
    }
}
