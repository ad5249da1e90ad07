//! Ephemeris and reference-frame engine.
//!
//! A [`time::Clock`] tick drives the Keplerian planets ([`solar_system`]), the Moon
//! ([`moon`]) and an observer ([`observatory`]); every body is then carried through the
//! geocentric/topocentric, equatorial/ecliptic/horizontal and J2000/of-date frames by
//! [`target`]. [`sky::Sky`] wires all of it for a single instant.

pub mod angle;
pub mod astro_errors;
pub mod constants;
pub mod coordinates;
pub mod elliptical_orbit;
pub mod kepler;
pub mod moon;
pub mod observatory;
pub mod observing;
pub mod orb_elem;
pub mod ref_system;
pub mod root;
pub mod sky;
pub mod solar_system;
pub mod target;
pub mod time;
