//! # Elliptical orbit propagation
//!
//! [`EllipticalOrbit`] turns a set of [`OrbitalElements`] into heliocentric positions at a
//! given Julian Date:
//!
//! 1. interpolate the elements at `T` Julian centuries since J2000 (with the periodic mean
//!    anomaly correction when the table carries one),
//! 2. reduce the mean anomaly into `(−180°, 180°]` and solve Kepler's equation
//!    ([`solve_kepler_danby`]),
//! 3. place the body in its orbital plane, perihelion along +X,
//! 4. rotate into the ecliptic J2000 frame: `Rz(−Ω) · Rx(−i) · Rz(Ω − ϖ)`,
//! 5. rotate into the equatorial J2000 frame with the fixed J2000 obliquity.
//!
//! The three positions are recomputed together on every [`EllipticalOrbit::set_julian_date`].

use tracing::debug;

use crate::angle::reduce_degrees;
use crate::astro_errors::AstroError;
use crate::constants::{Degree, JulianDate, JD_J2000, OBLIQUITY_J2000, RADEG};
use crate::kepler::solve_kepler_danby;
use crate::orb_elem::{InstantElements, OrbitalElements};
use crate::ref_system::{Matrix3D, Vector3D};

/// Position of a body in its own orbital plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPosition {
    /// Mean anomaly reduced into `(−180°, 180°]`.
    pub mean_anomaly: Degree,
    pub eccentric_anomaly: Degree,
    pub true_anomaly: Degree,
    /// Perifocal coordinates in AU, `z = 0`.
    pub coordinates: Vector3D,
}

/// Solve the orbit at `jd` and return the perifocal position.
pub fn calculate_orbital_position(
    jd: JulianDate,
    elements: &OrbitalElements,
) -> Result<OrbitalPosition, AstroError> {
    let el = elements.at(jd);
    orbital_position_from(&el)
}

fn orbital_position_from(el: &InstantElements) -> Result<OrbitalPosition, AstroError> {
    let mean_anomaly = reduce_degrees(el.mean_anomaly);
    let ecc_anomaly = solve_kepler_danby(mean_anomaly, el.eccentricity)?;

    let e = el.eccentricity;
    let x = el.semi_major_axis * (ecc_anomaly.cos() - e);
    let y = el.semi_major_axis * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    Ok(OrbitalPosition {
        mean_anomaly,
        eccentric_anomaly: ecc_anomaly / RADEG,
        true_anomaly: y.atan2(x) / RADEG,
        coordinates: Vector3D::new(x, y, 0.0),
    })
}

/// Rotate a perifocal position into the ecliptic J2000 frame.
///
/// The order `Rz(Ω − ϖ)`, then `Rx(−i)`, then `Rz(−Ω)` is the perifocal → ecliptic
/// transform; any other order gives a different frame.
pub fn calculate_ecliptic_position(
    jd: JulianDate,
    elements: &OrbitalElements,
    orbital: &OrbitalPosition,
) -> Vector3D {
    ecliptic_position_from(&elements.at(jd), orbital)
}

fn ecliptic_position_from(el: &InstantElements, orbital: &OrbitalPosition) -> Vector3D {
    let node = el.longitude_of_ascending_node;
    let rot1 = Matrix3D::rotate_z((node - el.longitude_of_perihelion) * RADEG);
    let rot2 = Matrix3D::rotate_x(-el.inclination * RADEG);
    let rot3 = Matrix3D::rotate_z(-node * RADEG);

    rot3 * (rot2 * (rot1 * orbital.coordinates))
}

/// Propagated orbit of one body.
#[derive(Debug, Clone)]
pub struct EllipticalOrbit {
    elements: OrbitalElements,
    julian_date: JulianDate,
    orbital_position: OrbitalPosition,
    ecliptic_position: Vector3D,
    equatorial_position: Vector3D,
    mat_ecl_to_equ_2000: Matrix3D,
}

impl EllipticalOrbit {
    /// Build the orbit and evaluate it at J2000.
    pub fn new(elements: OrbitalElements) -> Result<Self, AstroError> {
        let mut orbit = EllipticalOrbit {
            elements,
            julian_date: JD_J2000,
            orbital_position: OrbitalPosition {
                mean_anomaly: 0.0,
                eccentric_anomaly: 0.0,
                true_anomaly: 0.0,
                coordinates: Vector3D::zeros(),
            },
            ecliptic_position: Vector3D::zeros(),
            equatorial_position: Vector3D::zeros(),
            mat_ecl_to_equ_2000: Matrix3D::rotate_x(-OBLIQUITY_J2000 * RADEG),
        };
        orbit.set_julian_date(JD_J2000)?;
        Ok(orbit)
    }

    /// Re-derive the three positions at `jd`.
    ///
    /// On error the orbit keeps the positions of the previous date.
    pub fn set_julian_date(&mut self, jd: JulianDate) -> Result<(), AstroError> {
        let el = self.elements.at(jd);
        let orbital = orbital_position_from(&el)?;
        let ecliptic = ecliptic_position_from(&el, &orbital);

        self.julian_date = jd;
        self.orbital_position = orbital;
        self.ecliptic_position = ecliptic;
        self.equatorial_position = self.mat_ecl_to_equ_2000 * ecliptic;
        debug!(jd, radius = ecliptic.radius(), "orbit propagated");
        Ok(())
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn julian_date(&self) -> JulianDate {
        self.julian_date
    }

    pub fn orbital_position(&self) -> &OrbitalPosition {
        &self.orbital_position
    }

    /// Heliocentric ecliptic J2000 position, AU.
    pub fn ecliptic_position(&self) -> Vector3D {
        self.ecliptic_position
    }

    /// Heliocentric equatorial J2000 position, AU.
    pub fn equatorial_position(&self) -> Vector3D {
        self.equatorial_position
    }
}
