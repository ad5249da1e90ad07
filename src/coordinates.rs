//! # Spherical coordinates in the three supported frames
//!
//! Each type is an (angle, angle, optional distance) triple. A missing distance means the
//! body is effectively at infinity; the frame pipeline substitutes a finite default
//! (see [`crate::constants::DEFAULT_TARGET_DISTANCE`]) whenever a geometric step needs one.
//!
//! | Type                       | Longitude-like          | Latitude-like        |
//! |----------------------------|-------------------------|----------------------|
//! | [`EquatorialCoordinates`]  | right ascension, hours  | declination, degrees |
//! | [`EclipticCoordinates`]    | longitude, degrees      | latitude, degrees    |
//! | [`HorizontalCoordinates`]  | azimuth, degrees (N→E)  | altitude, degrees    |
//!
//! Conversions to and from [`Vector3D`] go through the polar form of the vector.

use serde::{Deserialize, Serialize};

use crate::angle::{normalize_degrees, normalize_hours};
use crate::constants::{AstronomicalUnit, Degree, Hour, RADEG, RADH};
use crate::ref_system::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinates {
    pub right_ascension: Hour,
    pub declination: Degree,
    pub distance: Option<AstronomicalUnit>,
}

impl EquatorialCoordinates {
    pub fn new(right_ascension: Hour, declination: Degree, distance: Option<AstronomicalUnit>) -> Self {
        EquatorialCoordinates {
            right_ascension,
            declination,
            distance,
        }
    }

    /// Cartesian vector, using `default_distance` when no distance is known.
    pub fn to_vector(&self, default_distance: AstronomicalUnit) -> Vector3D {
        Vector3D::from_polar(
            self.right_ascension * RADH,
            self.declination * RADEG,
            self.distance.unwrap_or(default_distance),
        )
    }

    /// Spherical form of `v`; right ascension is reduced into `[0, 24)`.
    ///
    /// The vector radius is reported as distance only when `with_distance` is set.
    pub fn from_vector(v: &Vector3D, with_distance: bool) -> Self {
        let p = v.to_polar();
        EquatorialCoordinates {
            right_ascension: normalize_hours(p.phi / RADH),
            declination: p.theta / RADEG,
            distance: with_distance.then_some(p.radius),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticCoordinates {
    pub longitude: Degree,
    pub latitude: Degree,
    pub distance: Option<AstronomicalUnit>,
}

impl EclipticCoordinates {
    pub fn to_vector(&self, default_distance: AstronomicalUnit) -> Vector3D {
        Vector3D::from_polar(
            self.longitude * RADEG,
            self.latitude * RADEG,
            self.distance.unwrap_or(default_distance),
        )
    }

    /// Spherical form of `v`; longitude is reduced into `[0, 360)`.
    pub fn from_vector(v: &Vector3D, with_distance: bool) -> Self {
        let p = v.to_polar();
        EclipticCoordinates {
            longitude: normalize_degrees(p.phi / RADEG),
            latitude: p.theta / RADEG,
            distance: with_distance.then_some(p.radius),
        }
    }
}

/// Local horizontal coordinates.
///
/// The horizontal frame built by the observatory matrices has +X toward the south point,
/// so azimuth measured from north through east is `180° − φ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinates {
    pub azimuth: Degree,
    pub altitude: Degree,
    pub distance: Option<AstronomicalUnit>,
}

impl HorizontalCoordinates {
    pub fn to_vector(&self, default_distance: AstronomicalUnit) -> Vector3D {
        Vector3D::from_polar(
            (180.0 - self.azimuth) * RADEG,
            self.altitude * RADEG,
            self.distance.unwrap_or(default_distance),
        )
    }

    pub fn from_vector(v: &Vector3D, with_distance: bool) -> Self {
        let p = v.to_polar();
        HorizontalCoordinates {
            azimuth: normalize_degrees(180.0 - p.phi / RADEG),
            altitude: p.theta / RADEG,
            distance: with_distance.then_some(p.radius),
        }
    }
}

#[cfg(test)]
mod coordinates_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equatorial_vector_round_trip() {
        let c = EquatorialCoordinates::new(18.5, -23.25, Some(2.5));
        let back = EquatorialCoordinates::from_vector(&c.to_vector(1000.0), true);
        assert_abs_diff_eq!(back.right_ascension, 18.5, epsilon = 1e-12);
        assert_abs_diff_eq!(back.declination, -23.25, epsilon = 1e-12);
        assert_abs_diff_eq!(back.distance.unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_default_distance() {
        let c = EquatorialCoordinates::new(1.0, 10.0, None);
        assert_abs_diff_eq!(c.to_vector(1000.0).radius(), 1000.0, epsilon = 1e-9);
        assert_eq!(EquatorialCoordinates::from_vector(&c.to_vector(1000.0), false).distance, None);
    }

    #[test]
    fn test_ecliptic_longitude_range() {
        let v = Vector3D::new(0.0, -1.0, 0.0);
        let c = EclipticCoordinates::from_vector(&v, false);
        assert_abs_diff_eq!(c.longitude, 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.latitude, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_azimuth_convention() {
        // +X of the horizontal frame is the south point
        let south = HorizontalCoordinates::from_vector(&Vector3D::new(1.0, 0.0, 0.0), false);
        assert_abs_diff_eq!(south.azimuth, 180.0, epsilon = 1e-12);

        let north = HorizontalCoordinates::from_vector(&Vector3D::new(-1.0, 0.0, 0.0), false);
        assert_abs_diff_eq!(north.azimuth, 0.0, epsilon = 1e-12);

        let h = HorizontalCoordinates {
            azimuth: 75.0,
            altitude: 30.0,
            distance: None,
        };
        let back = HorizontalCoordinates::from_vector(&h.to_vector(1.0), false);
        assert_abs_diff_eq!(back.azimuth, 75.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.altitude, 30.0, epsilon = 1e-12);
    }
}
