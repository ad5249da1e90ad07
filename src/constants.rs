//! # Constants and type definitions for skyframes
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (AU, Earth radius, J2000 obliquity)
//! - Unit conversions (degrees ↔ radians, hours ↔ radians)
//! - Reference epochs expressed as Julian Dates
//! - Type aliases documenting the unit carried by a bare `f64`
//!
//! Values are the ones the ephemeris tables and the lunar theory were fitted with:
//! the kilometre length of the AU is the DE-series value `149 597 870.691`, not the
//! IAU 2012 exact definition.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Degrees of arc per hour of right ascension
pub const DEG_PER_HOUR: f64 = 15.0;

/// Astronomical Unit in kilometers
pub const KM_PER_AU: f64 = 149_597_870.691;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Earth equatorial radius expressed in astronomical units
pub const ERAU: f64 = EARTH_RADIUS_KM / KM_PER_AU;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00)
pub const JD_J2000: f64 = 2_451_545.0;

/// Julian Date of 2000 January 0.0 UT, origin of the linear obliquity/precession models
pub const JD_2000_JAN_0: f64 = 2_451_543.5;

/// Days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Fixed obliquity of the ecliptic at J2000, in degrees
pub const OBLIQUITY_J2000: f64 = 23.43928;

/// Ratio of the sidereal rotation rate to the solar day
pub const SIDEREAL_RATE: f64 = 1.002_737_909_34;

/// Distance substituted for targets without a catalogued distance, in AU
pub const DEFAULT_TARGET_DISTANCE: f64 = 1000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in hours (1h = 15°)
pub type Hour = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Date (days)
pub type JulianDate = f64;
