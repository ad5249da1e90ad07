//! # Observing conditions
//!
//! Airmass from the apparent altitude, and the linear RGB extinction factors fitted to Al
//! Kelly's white-balancing table (altitudes 30° to 90°; the fit degrades below 30°).

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, RADEG};

/// Secant of the zenith angle.
///
/// `None` at or below the horizon; altitudes above 90° are treated as the zenith.
pub fn airmass(altitude: Degree) -> Option<f64> {
    if altitude <= 0.0 {
        return None;
    }
    let zenith_angle = 90.0 - altitude.min(90.0);
    Some(1.0 / (zenith_angle * RADEG).cos())
}

/// Multiplicative extinction factors per color channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extinction {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Extinction {
    pub fn from_airmass(airmass: f64) -> Self {
        Extinction {
            red: 0.9155 + 0.0845 * airmass,
            green: 0.8303 + 0.1697 * airmass,
            blue: 0.7554 + 0.2446 * airmass,
        }
    }

    /// Factors for a body at `altitude`, `None` below the horizon.
    pub fn from_altitude(altitude: Degree) -> Option<Self> {
        airmass(altitude).map(Extinction::from_airmass)
    }
}

#[cfg(test)]
mod observing_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_airmass() {
        assert_eq!(airmass(0.0), None);
        assert_eq!(airmass(-5.0), None);
        assert_abs_diff_eq!(airmass(90.0).unwrap(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(airmass(95.0).unwrap(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(airmass(30.0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extinction() {
        // at the zenith every channel is close to unity
        let zenith = Extinction::from_airmass(1.0);
        assert_abs_diff_eq!(zenith.red, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(zenith.green, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(zenith.blue, 1.0, epsilon = 1e-12);

        let low = Extinction::from_altitude(30.0).unwrap();
        assert_abs_diff_eq!(low.blue, 0.7554 + 0.4892, epsilon = 1e-9);
        assert!(low.blue > low.green && low.green > low.red);
        assert_eq!(Extinction::from_altitude(-1.0), None);
    }
}
