//! # Solar system aggregator
//!
//! One [`EllipticalOrbit`] per planet, all from the same [`StandishTable`], plus Earth's own
//! orbit. For each clock tick Earth is propagated once; every other body's heliocentric
//! ecliptic position is then shifted to the geocenter by subtracting Earth's position, and
//! rotated into the equatorial frame with the tick's ecliptic→equatorial matrix.
//!
//! The Sun sits at the heliocentric origin, so its geocentric position is the opposite of
//! Earth's.
//!
//! Results for one tick are gathered in an immutable [`SolarSystemPositions`] snapshot.
//! [`SolarSystem::update`] keeps the last snapshot and hands it out again when the Julian
//! Date has not changed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::astro_errors::AstroError;
use crate::constants::JulianDate;
use crate::coordinates::EquatorialCoordinates;
use crate::elliptical_orbit::EllipticalOrbit;
use crate::orb_elem::{Planet, StandishTable};
use crate::ref_system::{Matrix3D, Vector3D};
use crate::time::ClockTick;

/// Bodies whose geocentric position is produced by [`SolarSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Orbit table entry, `None` for the Sun.
    pub fn planet(self) -> Option<Planet> {
        match self {
            Body::Sun => None,
            Body::Mercury => Some(Planet::Mercury),
            Body::Venus => Some(Planet::Venus),
            Body::Mars => Some(Planet::Mars),
            Body::Jupiter => Some(Planet::Jupiter),
            Body::Saturn => Some(Planet::Saturn),
            Body::Uranus => Some(Planet::Uranus),
            Body::Neptune => Some(Planet::Neptune),
            Body::Pluto => Some(Planet::Pluto),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

/// Position of one body for one tick. Vectors are in AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub hel_ecl_2000: Vector3D,
    pub geo_ecl_2000: Vector3D,
    pub geo_equ_2000: Vector3D,
    /// Right ascension in `[0, 24)` h, declination in degrees, distance in AU.
    pub equ_2000: EquatorialCoordinates,
}

impl BodyPosition {
    fn from_heliocentric(hel_ecl_2000: Vector3D, earth: Vector3D, ecl_to_equ: &Matrix3D) -> Self {
        let geo_ecl_2000 = hel_ecl_2000 - earth;
        let geo_equ_2000 = ecl_to_equ * geo_ecl_2000;
        BodyPosition {
            hel_ecl_2000,
            geo_ecl_2000,
            geo_equ_2000,
            equ_2000: EquatorialCoordinates::from_vector(&geo_equ_2000, true),
        }
    }
}

/// Positions of every [`Body`] at one Julian Date.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystemPositions {
    pub jd: JulianDate,
    pub earth_hel_ecl_2000: Vector3D,
    bodies: Vec<BodyPosition>,
}

impl SolarSystemPositions {
    pub fn get(&self, body: Body) -> &BodyPosition {
        &self.bodies[body as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Body, &BodyPosition)> {
        Body::ALL.into_iter().zip(self.bodies.iter())
    }
}

#[derive(Debug, Clone)]
pub struct SolarSystem {
    table: StandishTable,
    earth: EllipticalOrbit,
    planets: Vec<(Body, EllipticalOrbit)>,
    last: Option<Arc<SolarSystemPositions>>,
}

impl SolarSystem {
    pub fn new(table: StandishTable) -> Result<Self, AstroError> {
        let earth = EllipticalOrbit::new(table.elements(Planet::Earth))?;
        let planets = Body::ALL
            .iter()
            .filter_map(|body| body.planet().map(|planet| (*body, planet)))
            .map(|(body, planet)| -> Result<_, AstroError> {
                Ok((body, EllipticalOrbit::new(table.elements(planet))?))
            })
            .collect::<Result<Vec<_>, AstroError>>()?;

        Ok(SolarSystem {
            table,
            earth,
            planets,
            last: None,
        })
    }

    pub fn table(&self) -> StandishTable {
        self.table
    }

    /// Propagate every orbit to the tick's Julian Date.
    ///
    /// Return
    /// ------
    /// * The shared snapshot; the previous one when `tick.jd` is unchanged.
    /// * [`AstroError::KeplerNonConvergence`] if one of the orbits cannot be solved; no
    ///   partial snapshot is produced.
    pub fn update(&mut self, tick: &ClockTick) -> Result<Arc<SolarSystemPositions>, AstroError> {
        if let Some(last) = &self.last {
            if last.jd == tick.jd {
                return Ok(Arc::clone(last));
            }
        }

        self.earth.set_julian_date(tick.jd)?;
        let earth = self.earth.ecliptic_position();

        let mut bodies = Vec::with_capacity(Body::ALL.len());
        bodies.push(BodyPosition::from_heliocentric(
            Vector3D::zeros(),
            earth,
            &tick.mat_ecl_to_equ,
        ));
        for (_, orbit) in self.planets.iter_mut() {
            orbit.set_julian_date(tick.jd)?;
            bodies.push(BodyPosition::from_heliocentric(
                orbit.ecliptic_position(),
                earth,
                &tick.mat_ecl_to_equ,
            ));
        }

        debug!(jd = tick.jd, bodies = bodies.len(), "solar system updated");
        let positions = Arc::new(SolarSystemPositions {
            jd: tick.jd,
            earth_hel_ecl_2000: earth,
            bodies,
        });
        self.last = Some(Arc::clone(&positions));
        Ok(positions)
    }
}
