//! # Target: the frame/epoch transform pipeline
//!
//! A [`Target`] starts from the geocentric equatorial J2000 position of a body and produces
//! its position in every combination of
//!
//! - center: geocentric or topocentric ([`Center`]),
//! - frame: equatorial, ecliptic or horizontal ([`Frame`]),
//! - equinox: J2000 or of date ([`Equinox`]),
//!
//! plus the hour angle. The twelve vectors form a single dependency graph; each node is
//! derived from exactly one parent:
//!
//! ```text
//! GeoEqu2000 ──Rx(+ε₂₀₀₀)──▶ GeoEcl2000 ──Rz(−p)──▶ GeoEclNow ──Rx(−ε)──▶ GeoEquNow
//!     │                                                                     │
//!  EquToHor                                                              EquToHor
//!     ▼                                                                     ▼
//! GeoHor2000 ──−ERAU·ẑ──▶ TopoHor2000                    GeoHorNow ──−ERAU·ẑ──▶ TopoHorNow
//!                            │ HorToEqu
//!                            ▼
//!                        TopoEqu2000 ──Rx(+ε₂₀₀₀)──▶ TopoEcl2000 ──Rz(−p)──▶ TopoEclNow ──Rx(−ε)──▶ TopoEquNow
//! ```
//!
//! `TopoHorNow` and `TopoEquNow` therefore reach the same point by two routes; they agree
//! to within the parallax offset turned through the precession angle.
//!
//! `ε₂₀₀₀` is the fixed J2000 obliquity, `ε` and `p` are the obliquity and precession of the
//! tick. The topocentric step removes the observer's offset along the local vertical only.
//!
//! Nodes are evaluated on first access and memoized in [`TargetFrames`]; all of them come
//! from one [`ObservatoryState`] and therefore from one instant.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::angle::wrap_hour_angle;
use crate::astro_errors::AstroError;
use crate::constants::{AstronomicalUnit, Hour, DEFAULT_TARGET_DISTANCE, ERAU, OBLIQUITY_J2000, RADEG};
use crate::coordinates::{EclipticCoordinates, EquatorialCoordinates, HorizontalCoordinates};
use crate::observatory::ObservatoryState;
use crate::ref_system::{Matrix3D, Vector3D};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Geo,
    Topo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    Equatorial,
    Ecliptic,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equinox {
    J2000,
    OfDate,
}

const NODES: usize = 12;

fn node_index(center: Center, frame: Frame, equinox: Equinox) -> usize {
    let c = match center {
        Center::Geo => 0,
        Center::Topo => 1,
    };
    let f = match frame {
        Frame::Equatorial => 0,
        Frame::Ecliptic => 1,
        Frame::Horizontal => 2,
    };
    let e = match equinox {
        Equinox::J2000 => 0,
        Equinox::OfDate => 1,
    };
    c * 6 + f * 2 + e
}

/// Hour angle `lmst − ra`, wrapped into `(−12, 12]` h (positive West of the meridian).
pub fn calculate_hour_angle(lmst: Hour, right_ascension: Hour) -> Hour {
    wrap_hour_angle(lmst - right_ascension)
}

/// Memoized frame graph of one target at one observatory state.
#[derive(Debug)]
pub struct TargetFrames {
    observatory: Arc<ObservatoryState>,
    has_distance: bool,
    seed: Vector3D,
    mat_equ_to_ecl_2000: Matrix3D,
    nodes: [OnceCell<Vector3D>; NODES],
}

impl TargetFrames {
    /// Seed the graph with a geocentric equatorial J2000 position.
    ///
    /// Arguments
    /// ---------
    /// * `geo_equ_2000`: catalog position; a missing distance is replaced by `default_distance`.
    /// * `default_distance`: radius used for distance-less inputs, in AU.
    /// * `observatory`: site and instant of every derived node.
    pub fn new(
        geo_equ_2000: &EquatorialCoordinates,
        default_distance: AstronomicalUnit,
        observatory: Arc<ObservatoryState>,
    ) -> Self {
        TargetFrames {
            observatory,
            has_distance: geo_equ_2000.distance.is_some(),
            seed: geo_equ_2000.to_vector(default_distance),
            mat_equ_to_ecl_2000: Matrix3D::rotate_x(OBLIQUITY_J2000 * RADEG),
            nodes: Default::default(),
        }
    }

    pub fn observatory(&self) -> &Arc<ObservatoryState> {
        &self.observatory
    }

    /// Cartesian position in AU for one center/frame/equinox combination.
    pub fn vector(&self, center: Center, frame: Frame, equinox: Equinox) -> Vector3D {
        *self.nodes[node_index(center, frame, equinox)]
            .get_or_init(|| self.compute(center, frame, equinox))
    }

    fn compute(&self, center: Center, frame: Frame, equinox: Equinox) -> Vector3D {
        use Center::*;
        use Equinox::*;
        use Frame::*;

        let obs = &self.observatory;
        let tick = &obs.tick;

        match (center, frame, equinox) {
            (Geo, Equatorial, J2000) => self.seed,
            (Geo, Ecliptic, J2000) => self.mat_equ_to_ecl_2000 * self.vector(Geo, Equatorial, J2000),
            (Geo, Ecliptic, OfDate) => tick.mat_precess_to_date * self.vector(Geo, Ecliptic, J2000),
            (Geo, Equatorial, OfDate) => tick.mat_ecl_to_equ * self.vector(Geo, Ecliptic, OfDate),
            (Geo, Horizontal, e) => obs.mat_equ_to_hor * self.vector(Geo, Equatorial, e),
            (Topo, Horizontal, e) => {
                self.vector(Geo, Horizontal, e) - Vector3D::new(0.0, 0.0, ERAU)
            }
            (Topo, Equatorial, J2000) => obs.mat_hor_to_equ * self.vector(Topo, Horizontal, J2000),
            (Topo, Ecliptic, J2000) => {
                self.mat_equ_to_ecl_2000 * self.vector(Topo, Equatorial, J2000)
            }
            // of-date topocentric positions are precessed from J2000, as on the geocentric side
            (Topo, Ecliptic, OfDate) => tick.mat_precess_to_date * self.vector(Topo, Ecliptic, J2000),
            (Topo, Equatorial, OfDate) => tick.mat_ecl_to_equ * self.vector(Topo, Ecliptic, OfDate),
        }
    }

    pub fn equatorial(&self, center: Center, equinox: Equinox) -> EquatorialCoordinates {
        let v = self.vector(center, Frame::Equatorial, equinox);
        EquatorialCoordinates::from_vector(&v, self.has_distance)
    }

    pub fn ecliptic(&self, center: Center, equinox: Equinox) -> EclipticCoordinates {
        let v = self.vector(center, Frame::Ecliptic, equinox);
        EclipticCoordinates::from_vector(&v, self.has_distance)
    }

    pub fn horizontal(&self, center: Center, equinox: Equinox) -> HorizontalCoordinates {
        let v = self.vector(center, Frame::Horizontal, equinox);
        HorizontalCoordinates::from_vector(&v, self.has_distance)
    }

    /// Topocentric equatorial coordinates of date.
    pub fn topo_equ_now(&self) -> EquatorialCoordinates {
        self.equatorial(Center::Topo, Equinox::OfDate)
    }

    /// Topocentric horizontal coordinates of date, the apparent position on the local sky.
    pub fn topo_hor_now(&self) -> HorizontalCoordinates {
        self.horizontal(Center::Topo, Equinox::OfDate)
    }

    pub fn hour_angle(&self) -> Hour {
        calculate_hour_angle(self.observatory.lmst, self.topo_equ_now().right_ascension)
    }
}

#[derive(Debug, Clone)]
pub struct TargetBuilder {
    name: Option<String>,
    geo_equ_2000: Option<EquatorialCoordinates>,
    observatory: Option<Arc<ObservatoryState>>,
    default_distance: AstronomicalUnit,
}

impl Default for TargetBuilder {
    fn default() -> Self {
        TargetBuilder {
            name: None,
            geo_equ_2000: None,
            observatory: None,
            default_distance: DEFAULT_TARGET_DISTANCE,
        }
    }
}

impl TargetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn geo_equ_2000(mut self, coordinates: EquatorialCoordinates) -> Self {
        self.geo_equ_2000 = Some(coordinates);
        self
    }

    pub fn observatory(mut self, state: Arc<ObservatoryState>) -> Self {
        self.observatory = Some(state);
        self
    }

    pub fn default_distance(mut self, distance: AstronomicalUnit) -> Self {
        self.default_distance = distance;
        self
    }

    pub fn build(self) -> Result<Target, AstroError> {
        let geo_equ_2000 = self
            .geo_equ_2000
            .ok_or(AstroError::MissingDependency("geo_equ_2000"))?;
        let observatory = self
            .observatory
            .ok_or(AstroError::MissingDependency("observatory"))?;

        let frames = Arc::new(TargetFrames::new(
            &geo_equ_2000,
            self.default_distance,
            observatory,
        ));
        Ok(Target {
            name: self.name,
            geo_equ_2000,
            default_distance: self.default_distance,
            frames,
        })
    }
}

/// A catalog body followed through the frame graph.
///
/// Changing the input position or the observatory replaces the whole [`TargetFrames`]
/// graph; a previously obtained `Arc<TargetFrames>` keeps describing the old inputs.
#[derive(Debug, Clone)]
pub struct Target {
    name: Option<String>,
    geo_equ_2000: EquatorialCoordinates,
    default_distance: AstronomicalUnit,
    frames: Arc<TargetFrames>,
}

impl Target {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn geo_equ_2000(&self) -> &EquatorialCoordinates {
        &self.geo_equ_2000
    }

    pub fn frames(&self) -> Arc<TargetFrames> {
        Arc::clone(&self.frames)
    }

    fn rebuild(&mut self, observatory: Arc<ObservatoryState>) {
        self.frames = Arc::new(TargetFrames::new(
            &self.geo_equ_2000,
            self.default_distance,
            observatory,
        ));
        debug!(target = self.name.as_deref().unwrap_or(""), "target frames rebuilt");
    }

    pub fn set_geo_equ_2000(&mut self, coordinates: EquatorialCoordinates) {
        if coordinates != self.geo_equ_2000 {
            self.geo_equ_2000 = coordinates;
            self.rebuild(Arc::clone(&self.frames.observatory));
        }
    }

    pub fn set_observatory(&mut self, state: Arc<ObservatoryState>) {
        if !Arc::ptr_eq(&state, &self.frames.observatory) {
            self.rebuild(state);
        }
    }
}

#[cfg(test)]
mod target_test {
    use super::*;
    use crate::observatory::ObservatoryBuilder;
    use crate::time::ClockTick;
    use approx::assert_abs_diff_eq;
    use hifitime::Epoch;

    fn observatory(latitude: f64, longitude: f64) -> Arc<ObservatoryState> {
        let tick = Arc::new(ClockTick::from_epoch(Epoch::from_gregorian_utc(
            2021, 11, 4, 2, 15, 0, 0,
        )));
        ObservatoryBuilder::new()
            .latitude(latitude)
            .longitude(longitude)
            .clock_tick(tick)
            .build()
            .unwrap()
            .state()
    }

    #[test]
    fn test_missing_dependencies() {
        let err = TargetBuilder::new().observatory(observatory(0.0, 0.0)).build();
        assert_eq!(err.unwrap_err(), AstroError::MissingDependency("geo_equ_2000"));

        let err = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::new(1.0, 2.0, None))
            .build();
        assert_eq!(err.unwrap_err(), AstroError::MissingDependency("observatory"));
    }

    #[test]
    fn test_hour_angle_formula() {
        assert_eq!(calculate_hour_angle(5.0, 5.0), 0.0);
        assert_eq!(calculate_hour_angle(5.0, 6.0), -1.0);
        assert_eq!(calculate_hour_angle(23.5, 0.5), -1.0);
        assert_eq!(calculate_hour_angle(0.5, 23.5), 1.0);
    }

    #[test]
    fn test_hour_angle_on_meridian() {
        let obs = observatory(0.0, 0.0);
        let tick = &obs.tick;

        // place the target on the meridian of date and walk back to J2000
        let now = Vector3D::from_polar(obs.lmst * 15.0 * RADEG, 0.0, 1.0);
        let ecl_now = tick.mat_equ_to_ecl * now;
        let ecl_2000 = tick.mat_precess_from_date * ecl_now;
        let equ_2000 = Matrix3D::rotate_x(-OBLIQUITY_J2000 * RADEG) * ecl_2000;
        let coords = EquatorialCoordinates::from_vector(&equ_2000, false);

        let target = TargetBuilder::new()
            .geo_equ_2000(coords)
            .observatory(Arc::clone(&obs))
            .build()
            .unwrap();
        assert_abs_diff_eq!(target.frames().hour_angle(), 0.0, epsilon = 1e-6);

        // one hour east of the meridian
        let east = Vector3D::from_polar((obs.lmst + 1.0) * 15.0 * RADEG, 0.0, 1.0);
        let east_2000 = Matrix3D::rotate_x(-OBLIQUITY_J2000 * RADEG)
            * (tick.mat_precess_from_date * (tick.mat_equ_to_ecl * east));
        let target = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::from_vector(&east_2000, false))
            .observatory(obs)
            .build()
            .unwrap();
        assert_abs_diff_eq!(target.frames().hour_angle(), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_geocentric_ecliptic_of_pole() {
        // the north celestial pole has ecliptic latitude 90° − ε
        let target = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::new(0.0, 90.0, None))
            .observatory(observatory(45.0, 0.0))
            .build()
            .unwrap();
        let ecl = target.frames().ecliptic(Center::Geo, Equinox::J2000);
        assert_abs_diff_eq!(ecl.latitude, 90.0 - OBLIQUITY_J2000, epsilon = 1e-9);
        assert_abs_diff_eq!(ecl.longitude, 90.0, epsilon = 1e-9);
        assert_eq!(ecl.distance, None);
    }

    #[test]
    fn test_precession_shifts_longitude() {
        let obs = observatory(45.0, 0.0);
        let target = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::new(6.0, 22.0, None))
            .observatory(Arc::clone(&obs))
            .build()
            .unwrap();
        let frames = target.frames();
        let l2000 = frames.ecliptic(Center::Geo, Equinox::J2000).longitude;
        let lnow = frames.ecliptic(Center::Geo, Equinox::OfDate).longitude;
        assert_abs_diff_eq!(lnow - l2000, obs.tick.precession_since_j2000, epsilon = 1e-9);
    }

    #[test]
    fn test_parallax_of_nearby_target() {
        let obs = observatory(30.0, 10.0);
        let hor = obs.mat_hor_to_equ * Vector3D::from_polar(0.3, 20.0 * RADEG, 0.00257);
        let target = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::from_vector(&hor, true))
            .observatory(Arc::clone(&obs))
            .build()
            .unwrap();
        let frames = target.frames();

        let geo = frames.horizontal(Center::Geo, Equinox::J2000);
        let topo = frames.horizontal(Center::Topo, Equinox::J2000);
        // the Moon-like target appears lower from the surface, and closer
        assert!(topo.altitude < geo.altitude);
        assert!(topo.distance.unwrap() < geo.distance.unwrap());
        assert_abs_diff_eq!(topo.azimuth, geo.azimuth, epsilon = 1e-9);
    }

    #[test]
    fn test_topocentric_of_date_is_precessed() {
        let obs = observatory(30.0, 10.0);
        let near = EquatorialCoordinates::new(3.2, 12.0, Some(0.0025));
        let target = TargetBuilder::new()
            .geo_equ_2000(near)
            .observatory(Arc::clone(&obs))
            .build()
            .unwrap();
        let frames = target.frames();

        let ecl_2000 = frames.vector(Center::Topo, Frame::Ecliptic, Equinox::J2000);
        let ecl_now = frames.vector(Center::Topo, Frame::Ecliptic, Equinox::OfDate);
        assert_eq!(ecl_now, obs.tick.mat_precess_to_date * ecl_2000);
        assert_eq!(
            frames.vector(Center::Topo, Frame::Equatorial, Equinox::OfDate),
            obs.tick.mat_ecl_to_equ * ecl_now
        );

        // the horizontal route differs only by the parallax offset turned through precession
        let hor_now = frames.vector(Center::Topo, Frame::Horizontal, Equinox::OfDate);
        let via_hor = obs.mat_hor_to_equ * hor_now;
        let via_ecl = frames.vector(Center::Topo, Frame::Equatorial, Equinox::OfDate);
        assert!((via_hor - via_ecl).radius() < 0.05 * ERAU);
    }

    #[test]
    fn test_distant_target_frames_agree() {
        let target = TargetBuilder::new()
            .geo_equ_2000(EquatorialCoordinates::new(14.2, -60.8, None))
            .observatory(observatory(-30.0, -70.0))
            .build()
            .unwrap();
        let frames = target.frames();
        for equinox in [Equinox::J2000, Equinox::OfDate] {
            for frame in [Frame::Equatorial, Frame::Ecliptic, Frame::Horizontal] {
                let g = frames.vector(Center::Geo, frame, equinox);
                let t = frames.vector(Center::Topo, frame, equinox);
                assert!(g.angular_separation(&t) < 1e-7);
                assert_abs_diff_eq!(g.radius(), DEFAULT_TARGET_DISTANCE, epsilon = 1e-8);
            }
        }
        assert_eq!(frames.topo_equ_now().distance, None);
    }

    #[test]
    fn test_setters_rebuild_frames() {
        let obs = observatory(45.0, 0.0);
        let mut target = TargetBuilder::new()
            .name("Vega")
            .geo_equ_2000(EquatorialCoordinates::new(18.6156, 38.7837, None))
            .observatory(Arc::clone(&obs))
            .build()
            .unwrap();
        assert_eq!(target.name(), Some("Vega"));

        let before = target.frames();
        target.set_observatory(Arc::clone(&obs));
        assert!(Arc::ptr_eq(&before, &target.frames()));

        target.set_geo_equ_2000(EquatorialCoordinates::new(5.9195, 7.4071, None));
        assert!(!Arc::ptr_eq(&before, &target.frames()));
        assert_eq!(target.geo_equ_2000().right_ascension, 5.9195);

        target.set_observatory(observatory(-20.0, 0.0));
        assert_eq!(target.frames().observatory().latitude, -20.0);
    }
}
