//! # Moon: position and phase
//!
//! ## Position
//!
//! [`LunarPosition`] implements Paul Schlyter's low-precision lunar theory ("How to compute
//! planetary positions"): mean elements of the Sun and Moon as linear functions of the days
//! since 2000 January 0.0 UT, a Kepler solution for the Moon's orbit, then twelve longitude,
//! five latitude and two distance perturbation terms. Accuracy is a few arcminutes.
//!
//! The theory yields ecliptic coordinates of date; [`LunarPosition::geo_ecl_2000`] removes
//! the precession and [`LunarPosition::geo_equ_2000`] rotates into the equatorial frame with
//! the tick's ecliptic→equatorial matrix.
//!
//! ## Phase
//!
//! [`MoonPhase`] derives the illuminated fraction and a signed phase percentage from the
//! geocentric ecliptic J2000 vectors of the Moon and the Sun, and names the phase with the
//! breakpoint table of [`MoonPhaseName::from_phase_pct`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{Degree, JulianDate, EARTH_RADIUS_KM, JD_2000_JAN_0, KM_PER_AU, RADEG};
use crate::coordinates::EquatorialCoordinates;
use crate::ref_system::{Matrix3D, Vector3D};
use crate::time::ClockTick;

/// Default cap on the Moon's Kepler iteration.
pub const DEFAULT_LUNAR_MAX_ITERATIONS: usize = 50;

/// Stop the Kepler iteration when the step is below this many degrees.
const LUNAR_KEPLER_TOLERANCE: Degree = 0.001;

const MOON_INCLINATION: Degree = 5.1454;
const MOON_SEMI_MAJOR_AXIS: f64 = 60.2666;
const MOON_ECCENTRICITY: f64 = 0.0549;

/// Geocentric ecliptic coordinates of date, distance in Earth radii.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LunarEcliptic {
    longitude: Degree,
    latitude: Degree,
    distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarPosition {
    max_iterations: usize,
}

impl Default for LunarPosition {
    fn default() -> Self {
        LunarPosition::new(DEFAULT_LUNAR_MAX_ITERATIONS)
    }
}

impl LunarPosition {
    pub fn new(max_iterations: usize) -> Self {
        LunarPosition {
            max_iterations: max_iterations.max(1),
        }
    }

    // Newton iteration on E − e·sin E = M; the orbit is nearly circular so it converges in
    // two or three steps. The last iterate is used if the cap is hit.
    fn eccentric_anomaly(&self, mean_anomaly: f64) -> f64 {
        let e = MOON_ECCENTRICITY;
        let mut next = mean_anomaly + e * mean_anomaly.sin() * (1.0 + e * mean_anomaly.cos());

        for _ in 0..self.max_iterations {
            let current = next;
            next = current - (current - e * current.sin() - mean_anomaly) / (1.0 - e * current.cos());
            if ((next - current) / RADEG).abs() <= LUNAR_KEPLER_TOLERANCE {
                return next;
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            mean_anomaly, "lunar Kepler iteration hit its cap, using last iterate"
        );
        next
    }

    fn ecliptic_terms(&self, jd: JulianDate) -> LunarEcliptic {
        let d = jd - JD_2000_JAN_0;

        let ms = (356.0470 + 0.985_600_258_5 * d) * RADEG;
        let mm = (115.3654 + 13.064_992_950_9 * d) * RADEG;
        let nm = (125.1228 - 0.052_953_808_3 * d) * RADEG;
        let ws = (282.9404 + 4.70935e-5 * d) * RADEG;
        let wm = (318.0634 + 0.164_357_322_3 * d) * RADEG;
        let im = MOON_INCLINATION * RADEG;
        let am = MOON_SEMI_MAJOR_AXIS;
        let em = MOON_ECCENTRICITY;

        // mean longitudes, elongation, argument of latitude
        let ls = ms + ws;
        let lm = mm + wm + nm;
        let dd = lm - ls;
        let f = lm - nm;

        let ecc = self.eccentric_anomaly(mm);
        let xv = am * (ecc.cos() - em);
        let yv = am * (1.0 - em * em).sqrt() * ecc.sin();
        let v = yv.atan2(xv);
        let mut r = xv.hypot(yv);

        let (sin_n, cos_n) = nm.sin_cos();
        let (sin_vw, cos_vw) = (v + wm).sin_cos();
        let xh = r * (cos_n * cos_vw - sin_n * sin_vw * im.cos());
        let yh = r * (sin_n * cos_vw + cos_n * sin_vw * im.cos());
        let zh = r * sin_vw * im.sin();

        let mut longitude = yh.atan2(xh) / RADEG;
        let mut latitude = zh.atan2(xh.hypot(yh)) / RADEG;

        longitude += -1.274 * (mm - 2.0 * dd).sin() // evection
            + 0.658 * (2.0 * dd).sin() // variation
            - 0.186 * ms.sin() // yearly equation
            - 0.059 * (2.0 * mm - 2.0 * dd).sin()
            - 0.057 * (mm - 2.0 * dd + ms).sin()
            + 0.053 * (mm + 2.0 * dd).sin()
            + 0.046 * (2.0 * dd - ms).sin()
            + 0.041 * (mm - ms).sin()
            - 0.035 * dd.sin() // parallactic equation
            - 0.031 * (mm + ms).sin()
            - 0.015 * (2.0 * f - 2.0 * dd).sin()
            + 0.011 * (mm - 4.0 * dd).sin();

        latitude += -0.173 * (f - 2.0 * dd).sin()
            - 0.055 * (mm - f - 2.0 * dd).sin()
            - 0.046 * (mm + f - 2.0 * dd).sin()
            + 0.033 * (f + 2.0 * dd).sin()
            + 0.017 * (2.0 * mm + f).sin();

        r += -0.58 * (mm - 2.0 * dd).cos() - 0.46 * (2.0 * dd).cos();

        LunarEcliptic {
            longitude,
            latitude,
            distance: r,
        }
    }

    /// Geocentric ecliptic position of date, in AU.
    pub fn geo_ecl_of_date(&self, jd: JulianDate) -> Vector3D {
        let ecl = self.ecliptic_terms(jd);
        let scale = EARTH_RADIUS_KM / KM_PER_AU;
        Vector3D::from_polar(
            ecl.longitude * RADEG,
            ecl.latitude * RADEG,
            ecl.distance * scale,
        )
    }

    /// Geocentric ecliptic J2000 position, in AU.
    pub fn geo_ecl_2000(&self, tick: &ClockTick) -> Vector3D {
        tick.mat_precess_from_date * self.geo_ecl_of_date(tick.jd)
    }

    /// Geocentric equatorial J2000 position, in AU.
    pub fn geo_equ_2000(&self, tick: &ClockTick) -> Vector3D {
        tick.mat_ecl_to_equ * self.geo_ecl_2000(tick)
    }

    /// Geocentric equatorial J2000 coordinates, with the distance in AU.
    pub fn equ_2000(&self, tick: &ClockTick) -> EquatorialCoordinates {
        EquatorialCoordinates::from_vector(&self.geo_equ_2000(tick), true)
    }
}

/// Phase names, ordered through one lunation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

const PHASE_BREAKPOINTS: [(f64, MoonPhaseName); 8] = [
    (0.975, MoonPhaseName::FullMoon),
    (0.575, MoonPhaseName::WaxingGibbous),
    (0.525, MoonPhaseName::FirstQuarter),
    (0.025, MoonPhaseName::WaxingCrescent),
    (-0.025, MoonPhaseName::NewMoon),
    (-0.475, MoonPhaseName::WaningCrescent),
    (-0.525, MoonPhaseName::LastQuarter),
    (-0.975, MoonPhaseName::WaningGibbous),
];

impl MoonPhaseName {
    /// Name of the first breakpoint not above `phase_pct`.
    ///
    /// Values below the last breakpoint wrap around to [`MoonPhaseName::FullMoon`].
    pub fn from_phase_pct(phase_pct: f64) -> Self {
        PHASE_BREAKPOINTS
            .iter()
            .find(|(breakpoint, _)| phase_pct >= *breakpoint)
            .map_or(MoonPhaseName::FullMoon, |(_, name)| *name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhaseName::NewMoon => "New Moon",
            MoonPhaseName::WaxingCrescent => "Waxing Crescent",
            MoonPhaseName::FirstQuarter => "First Quarter",
            MoonPhaseName::WaxingGibbous => "Waxing Gibbous",
            MoonPhaseName::FullMoon => "Full Moon",
            MoonPhaseName::WaningGibbous => "Waning Gibbous",
            MoonPhaseName::LastQuarter => "Last Quarter",
            MoonPhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase statistics of the Moon.
///
/// * `phase_pct`: in `[−1, 1]`; positive while waxing, `0` at new moon, `±1` at full moon.
/// * `illumination_pct`: illuminated fraction of the disk, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    pub name: MoonPhaseName,
    pub phase_pct: f64,
    pub illumination_pct: f64,
}

impl MoonPhase {
    /// Compute the phase from geocentric ecliptic J2000 vectors of the Moon and the Sun.
    pub fn from_ecliptic(moon: &Vector3D, sun: &Vector3D) -> Self {
        let separation = moon.angular_separation(sun);
        let illumination_pct = ((1.0 - separation.cos()) * 0.5).clamp(0.0, 1.0);

        let moon_longitude = moon.to_polar().phi;
        let sun_from_moon = Matrix3D::rotate_z(moon_longitude) * *sun;
        let phase_pct = (-sun_from_moon.to_polar().phi / std::f64::consts::PI).clamp(-1.0, 1.0);

        MoonPhase {
            name: MoonPhaseName::from_phase_pct(phase_pct),
            phase_pct,
            illumination_pct,
        }
    }
}
