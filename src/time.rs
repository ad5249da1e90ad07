//! # Time system
//!
//! Converts a civil UTC instant into every time quantity the frame pipeline needs:
//! day fraction, Julian Date (at 0h UT and exact), Greenwich mean sidereal time, the
//! obliquity of the ecliptic, the general precession since J2000, and the rotation
//! matrices built from the last two.
//!
//! All of it is bundled into an immutable [`ClockTick`]. A [`Clock`] hands out ticks as
//! `Arc`s and keeps the last one so that asking twice for the same instant does not
//! recompute anything.
//!
//! ## Models
//!
//! - JD0 uses the integer Gregorian calendar formula (month/year pivot at March).
//! - GMST0 is the IAU 1982 cubic polynomial evaluated at 0h UT; the day fraction is
//!   scaled by [`SIDEREAL_RATE`].
//! - Obliquity and precession are linear in days since 2000 January 0.0 UT.
//!
//! See also
//! --------
//! * [`calculate_date`] – inverse conversion, Julian Date back to a civil instant.

use std::sync::Arc;

use hifitime::{Epoch, Unit};
use tracing::debug;

use crate::angle::normalize_hours;
use crate::astro_errors::AstroError;
use crate::constants::{
    Degree, Hour, JulianDate, DAYS_PER_JULIAN_CENTURY, JD_2000_JAN_0, JD_J2000, RADEG,
    SIDEREAL_RATE,
};
use crate::ref_system::Matrix3D;

/// Fraction of the UTC day elapsed at `epoch`, in `[0, 1)`.
pub fn calculate_day_fraction(epoch: &Epoch) -> f64 {
    let (_, _, _, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    (f64::from(hour)
        + (f64::from(minute) + (f64::from(second) + f64::from(nanos) / 1e9) / 60.0) / 60.0)
        / 24.0
}

/// Julian Date at 0h UT of the civil date of `epoch`.
///
/// Integer Gregorian formula: January and February are counted as months 13 and 14 of
/// the previous year, every division truncates toward zero.
pub fn calculate_jd0(epoch: &Epoch) -> JulianDate {
    let (year, month, day, _, _, _, _) = epoch.to_gregorian_utc();
    jd0_from_calendar(i64::from(year), i64::from(month), i64::from(day))
}

fn jd0_from_calendar(year: i64, month: i64, day: i64) -> JulianDate {
    let (mut yp, mut mp) = (year, month);
    if mp <= 2 {
        mp += 12;
        yp -= 1;
    }

    let days = 36525 * yp / 100 + 306001 * (1 + mp) / 10000 + day + 2 + yp / 400 - yp / 100;
    days as f64 + 1_720_994.5
}

pub fn calculate_jd(day_fraction: f64, jd0: JulianDate) -> JulianDate {
    jd0 + day_fraction
}

/// Greenwich mean sidereal time at 0h UT, in hours in `[0, 24)`.
///
/// Arguments
/// ---------
/// * `jd0`: Julian Date at 0h UT of the day.
///
/// Return
/// ------
/// * GMST0 in hours.
pub fn calculate_gmst0(jd0: JulianDate) -> Hour {
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 0.093104;
    const C3: f64 = -6.2e-6;

    let tu = (jd0 - JD_J2000) / DAYS_PER_JULIAN_CENTURY;
    let seconds = C0 + tu * (C1 + tu * (C2 + tu * C3));
    normalize_hours(seconds / 3600.0)
}

/// Greenwich mean sidereal time, in hours in `[0, 24)`.
pub fn calculate_gmst(day_fraction: f64, gmst0: Hour) -> Hour {
    normalize_hours(gmst0 + day_fraction * 24.0 * SIDEREAL_RATE)
}

/// Mean obliquity of the ecliptic at `jd`, in degrees.
pub fn calculate_obliquity_of_ecliptic(jd: JulianDate) -> Degree {
    23.4393 - 3.563e-7 * (jd - JD_2000_JAN_0)
}

/// General precession in longitude accumulated since J2000, in degrees.
pub fn calculate_precession_since_j2000(jd: JulianDate) -> Degree {
    3.82394e-5 * (jd - JD_2000_JAN_0)
}

/// Civil UTC instant of a Julian Date.
///
/// Inverse of [`calculate_jd0`] + [`calculate_day_fraction`], following Meeus
/// (Astronomical Algorithms, ch. 7). The Gregorian correction is always applied, so dates
/// before 1582-10-15 come out in the proleptic Gregorian calendar, like every [`Epoch`].
///
/// Return
/// ------
/// * The instant, or [`AstroError::InvalidCalendarDate`] if the resulting date cannot be
///   represented.
pub fn calculate_date(jd: JulianDate) -> Result<Epoch, AstroError> {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let fraction = shifted - z;

    let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
    let a = z + 1.0 + alpha - (alpha / 4.0).floor();
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor();
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    let midnight =
        Epoch::maybe_from_gregorian_utc(year as i32, month as u8, day as u8, 0, 0, 0, 0)
            .map_err(|e| AstroError::InvalidCalendarDate(e.to_string()))?;

    Ok(midnight + fraction * Unit::Day)
}

/// Time-system state for one instant.
///
/// Built once per instant and never mutated afterwards; every downstream component reads
/// the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockTick {
    pub epoch: Epoch,
    pub day_fraction: f64,
    pub jd0: JulianDate,
    pub jd: JulianDate,
    pub gmst0: Hour,
    pub gmst: Hour,
    pub obliquity_of_ecliptic: Degree,
    pub precession_since_j2000: Degree,
    /// Equatorial of date → ecliptic of date, `Rx(+ε)`.
    pub mat_equ_to_ecl: Matrix3D,
    /// Ecliptic of date → equatorial of date, `Rx(−ε)`.
    pub mat_ecl_to_equ: Matrix3D,
    /// Ecliptic J2000 → ecliptic of date, `Rz(−p)`.
    pub mat_precess_to_date: Matrix3D,
    /// Ecliptic of date → ecliptic J2000, `Rz(+p)`.
    pub mat_precess_from_date: Matrix3D,
}

impl ClockTick {
    pub fn from_epoch(epoch: Epoch) -> Self {
        let day_fraction = calculate_day_fraction(&epoch);
        let jd0 = calculate_jd0(&epoch);
        let jd = calculate_jd(day_fraction, jd0);
        let gmst0 = calculate_gmst0(jd0);
        let gmst = calculate_gmst(day_fraction, gmst0);
        let obliquity = calculate_obliquity_of_ecliptic(jd);
        let precession = calculate_precession_since_j2000(jd);

        ClockTick {
            epoch,
            day_fraction,
            jd0,
            jd,
            gmst0,
            gmst,
            obliquity_of_ecliptic: obliquity,
            precession_since_j2000: precession,
            mat_equ_to_ecl: Matrix3D::rotate_x(obliquity * RADEG),
            mat_ecl_to_equ: Matrix3D::rotate_x(-obliquity * RADEG),
            mat_precess_to_date: Matrix3D::rotate_z(-precession * RADEG),
            mat_precess_from_date: Matrix3D::rotate_z(precession * RADEG),
        }
    }
}

/// Root time source of the pipeline.
///
/// Keeps the last tick it produced; [`Clock::tick`] with an unchanged instant returns the
/// very same `Arc`.
#[derive(Debug, Default)]
pub struct Clock {
    last: Option<Arc<ClockTick>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, epoch: Epoch) -> Arc<ClockTick> {
        if let Some(last) = &self.last {
            if last.epoch == epoch {
                return Arc::clone(last);
            }
        }

        let tick = Arc::new(ClockTick::from_epoch(epoch));
        debug!(jd = tick.jd, gmst = tick.gmst, "clock tick");
        self.last = Some(Arc::clone(&tick));
        tick
    }

    pub fn last_tick(&self) -> Option<Arc<ClockTick>> {
        self.last.clone()
    }
}
