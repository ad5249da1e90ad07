//! # Angles: sexagesimal codec, parsing and wrapping
//!
//! Angles travel through the crate as signed decimals (degrees or hours). Display layers
//! consume them in a sign / unit / minutes / seconds / microseconds form, described by
//! [`DecodedAngle`]. The two forms are linked by an **exact** codec working on an integer
//! count of microseconds of arc (or of time):
//!
//! ```text
//! decimal = sign · (µs + (s + (m + d·60)·60)·10⁶) / (3600·10⁶)
//! ```
//!
//! [`DecodedAngle::decode`] inverts [`DecodedAngle::encode`] bit for bit for every valid
//! decoded angle, including a negative zero (`-00 00 00.000000`).
//!
//! Sign conventions carried by the decimals are fixed: longitude is positive toward East,
//! hour angle is positive toward West.
//!
//! The module also provides the range helpers used by the sidereal-time and frame code:
//! [`normalize_hours`], [`normalize_degrees`] and [`wrap_hour_angle`].

use serde::{Deserialize, Serialize};

use crate::astro_errors::AstroError;
use crate::constants::{Degree, Hour};

const MICROS_PER_SECOND: u64 = 1_000_000;
const MICROS_PER_UNIT: f64 = 3_600.0 * 1_000_000.0;

/// Sign / unit / minutes / seconds / microseconds form of an angle.
///
/// `units` is degrees or hours depending on what the decimal value represents; the codec
/// itself is unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedAngle {
    pub negative: bool,
    pub units: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub microseconds: u32,
}

impl DecodedAngle {
    /// Build a decoded angle, checking the sexagesimal ranges.
    ///
    /// Arguments
    /// ---------
    /// * `sign`: `-1` or `1`.
    /// * `units`: whole degrees or hours.
    /// * `minutes`: in `0..60`.
    /// * `seconds`: in `0..60`.
    /// * `microseconds`: in `0..1_000_000`.
    ///
    /// Return
    /// ------
    /// * The decoded angle, or [`AstroError::InvalidAngle`] if a field is out of range.
    pub fn new(
        sign: i8,
        units: u32,
        minutes: u32,
        seconds: u32,
        microseconds: u32,
    ) -> Result<Self, AstroError> {
        if sign != 1 && sign != -1 {
            return Err(AstroError::InvalidAngle(format!("sign must be -1 or 1, got {sign}")));
        }
        if minutes >= 60 {
            return Err(AstroError::InvalidAngle(format!("minutes out of range: {minutes}")));
        }
        if seconds >= 60 {
            return Err(AstroError::InvalidAngle(format!("seconds out of range: {seconds}")));
        }
        if u64::from(microseconds) >= MICROS_PER_SECOND {
            return Err(AstroError::InvalidAngle(format!(
                "microseconds out of range: {microseconds}"
            )));
        }

        Ok(DecodedAngle {
            negative: sign < 0,
            units,
            minutes,
            seconds,
            microseconds,
        })
    }

    pub fn sign(&self) -> i8 {
        if self.negative {
            -1
        } else {
            1
        }
    }

    fn total_micros(&self) -> u64 {
        let whole_seconds = (u64::from(self.units) * 60 + u64::from(self.minutes)) * 60
            + u64::from(self.seconds);
        whole_seconds * MICROS_PER_SECOND + u64::from(self.microseconds)
    }

    /// Decimal value (degrees or hours) of this angle.
    pub fn encode(&self) -> f64 {
        let magnitude = self.total_micros() as f64 / MICROS_PER_UNIT;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Split a decimal angle into its sexagesimal form.
    ///
    /// The magnitude is rounded to the nearest microsecond, so that `decode(encode(a)) == a`
    /// holds exactly even though the decimal carries a representation error.
    /// The sign is read from the sign bit: `-0.0` decodes as a negative zero.
    pub fn decode(value: f64) -> Self {
        let total = (value.abs() * MICROS_PER_UNIT).round() as u64;

        let microseconds = (total % MICROS_PER_SECOND) as u32;
        let whole_seconds = total / MICROS_PER_SECOND;
        let seconds = (whole_seconds % 60) as u32;
        let whole_minutes = whole_seconds / 60;
        let minutes = (whole_minutes % 60) as u32;
        let units = (whole_minutes / 60) as u32;

        DecodedAngle {
            negative: value.is_sign_negative(),
            units,
            minutes,
            seconds,
            microseconds,
        }
    }
}

/// Parse the three whitespace separated fields of a sexagesimal string.
///
/// The leading field may carry a `+` or `-` sign. Fractional seconds are rounded to the
/// microsecond.
fn parse_sexagesimal(text: &str) -> Result<DecodedAngle, AstroError> {
    let invalid = || AstroError::InvalidAngle(format!("malformed sexagesimal value: {text:?}"));

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let (sign, digits) = match parts[0].strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, parts[0].strip_prefix('+').unwrap_or(parts[0])),
    };
    // `u32::from_str` would take one more `+`
    if digits.starts_with(['-', '+']) {
        return Err(invalid());
    }
    let units: u32 = digits.parse().map_err(|_| invalid())?;
    let minutes: u32 = parts[1].parse().map_err(|_| invalid())?;
    let seconds: f64 = parts[2].parse().map_err(|_| invalid())?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }

    let micros = (seconds * MICROS_PER_SECOND as f64).round() as u64;
    let whole_seconds = micros / MICROS_PER_SECOND;
    if whole_seconds >= 60 {
        return Err(invalid());
    }

    DecodedAngle::new(
        sign,
        units,
        minutes,
        whole_seconds as u32,
        (micros % MICROS_PER_SECOND) as u32,
    )
}

/// Parse a right ascension string `HH MM SS.ss` into hours.
///
/// Arguments
/// ---------
/// * `ra`: right ascension, e.g. `"05 34 31.94"`.
///
/// Return
/// ------
/// * The right ascension in decimal hours, or [`AstroError::InvalidAngle`] if the string is malformed.
pub fn parse_ra_to_hours(ra: &str) -> Result<Hour, AstroError> {
    parse_sexagesimal(ra).map(|angle| angle.encode())
}

/// Parse a declination (or latitude) string `±DD MM SS.ss` into degrees.
///
/// Arguments
/// ---------
/// * `dec`: declination, e.g. `"-05 23 28.0"`.
///
/// Return
/// ------
/// * The declination in decimal degrees, or [`AstroError::InvalidAngle`] if the string is malformed.
pub fn parse_dec_to_deg(dec: &str) -> Result<Degree, AstroError> {
    parse_sexagesimal(dec).map(|angle| angle.encode())
}

/// Reduce an hour value into `[0, 24)`.
pub fn normalize_hours(hours: Hour) -> Hour {
    let h = hours.rem_euclid(24.0);
    // rem_euclid rounds tiny negative inputs up to exactly 24.0
    if h >= 24.0 {
        0.0
    } else {
        h
    }
}

/// Reduce a degree value into `[0, 360)`.
pub fn normalize_degrees(degrees: Degree) -> Degree {
    let d = degrees.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Reduce a degree value into `(-180, 180]`.
pub fn reduce_degrees(degrees: Degree) -> Degree {
    let d = normalize_degrees(degrees);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Wrap an hour angle into `(-12, 12]`.
///
/// A target one hour east of the meridian yields `-1`, never `23`.
pub fn wrap_hour_angle(hours: Hour) -> Hour {
    let h = normalize_hours(hours);
    if h > 12.0 {
        h - 24.0
    } else {
        h
    }
}

#[cfg(test)]
mod angle_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use itertools::iproduct;

    #[test]
    fn test_encode() {
        let a = DecodedAngle::new(1, 12, 30, 0, 0).unwrap();
        assert_eq!(a.encode(), 12.5);

        let b = DecodedAngle::new(-1, 0, 0, 36, 0).unwrap();
        assert_eq!(b.encode(), -0.01);

        let zero = DecodedAngle::new(-1, 0, 0, 0, 0).unwrap();
        assert!(zero.encode().is_sign_negative());
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            DecodedAngle::decode(-23.5),
            DecodedAngle {
                negative: true,
                units: 23,
                minutes: 30,
                seconds: 0,
                microseconds: 0
            }
        );
        assert_eq!(
            DecodedAngle::decode(1.0 / 3600.0 / 1e6),
            DecodedAngle::new(1, 0, 0, 0, 1).unwrap()
        );
    }

    #[test]
    fn test_codec_round_trip() {
        let signs = [-1i8, 1];
        let units = [0u32, 1, 17, 89, 180, 359];
        let minutes = [0u32, 1, 30, 59];
        let seconds = [0u32, 7, 59];
        let micros = [0u32, 1, 499_999, 500_000, 999_999];

        for (s, d, m, sec, us) in iproduct!(signs, units, minutes, seconds, micros) {
            let angle = DecodedAngle::new(s, d, m, sec, us).unwrap();
            assert_eq!(DecodedAngle::decode(angle.encode()), angle);
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(DecodedAngle::new(0, 1, 0, 0, 0).is_err());
        assert!(DecodedAngle::new(1, 1, 60, 0, 0).is_err());
        assert!(DecodedAngle::new(1, 1, 0, 60, 0).is_err());
        assert!(DecodedAngle::new(1, 1, 0, 0, 1_000_000).is_err());
    }

    #[test]
    fn test_parse_ra() {
        assert_abs_diff_eq!(
            parse_ra_to_hours("22 52 23.37").unwrap(),
            343.097375 / 15.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            parse_ra_to_hours("06 45 08.917").unwrap(),
            6.752476944444444,
            epsilon = 1e-12
        );
        assert!(parse_ra_to_hours("1 2").is_err());
        assert!(parse_ra_to_hours("1 2 3.4.5").is_err());
        assert!(parse_ra_to_hours("1 2 60").is_err());
    }

    #[test]
    fn test_parse_dec() {
        assert_abs_diff_eq!(
            parse_dec_to_deg("-00 30 14.2").unwrap(),
            -0.5039444444444444,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            parse_dec_to_deg("+13 55 42.7").unwrap(),
            13.928527777777777,
            epsilon = 1e-12
        );
        assert!(parse_dec_to_deg("89 15").is_err());
        assert!(parse_dec_to_deg("89 75 00").is_err());
    }

    #[test]
    fn test_parse_rejects_repeated_sign() {
        for text in ["--5 00 00", "+-5 00 00", "-+05 10 00", "++05 10 00"] {
            assert!(matches!(
                parse_dec_to_deg(text),
                Err(AstroError::InvalidAngle(_))
            ));
        }
        assert_eq!(parse_dec_to_deg("-05 30 00").unwrap(), -5.5);
        assert_eq!(parse_dec_to_deg("+05 30 00").unwrap(), 5.5);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_hours(25.5), 1.5);
        assert_eq!(normalize_hours(-1.0), 23.0);
        assert_eq!(normalize_hours(-1e-18), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(reduce_degrees(190.0), -170.0);
        assert_eq!(reduce_degrees(180.0), 180.0);
        assert_eq!(reduce_degrees(-180.0), 180.0);
    }

    #[test]
    fn test_wrap_hour_angle() {
        assert_eq!(wrap_hour_angle(0.0), 0.0);
        assert_eq!(wrap_hour_angle(-1.0), -1.0);
        assert_eq!(wrap_hour_angle(23.0), -1.0);
        assert_eq!(wrap_hour_angle(12.0), 12.0);
        assert_eq!(wrap_hour_angle(-12.0), 12.0);
        assert_eq!(wrap_hour_angle(13.5), -10.5);
    }
}
