//! # Sky: one consistent update of the whole pipeline
//!
//! [`Sky`] owns every stateful component and drives them in dependency order for a given
//! instant:
//!
//! ```text
//! Clock ──▶ SolarSystem ──┐
//!   │                     ├──▶ TargetFrames (Sun, Moon, planets, catalog) ──▶ MoonPhase
//!   ├──▶ LunarPosition ───┤
//!   └──▶ Observatory ─────┘
//! ```
//!
//! The result of [`Sky::update`] is an immutable [`SkySnapshot`] behind an `Arc`. Every
//! frame inside a snapshot was derived from the same [`ClockTick`], and asking again for
//! the same epoch returns the same snapshot.
//!
//! ```rust,no_run
//! use hifitime::Epoch;
//! use skyframes::coordinates::EquatorialCoordinates;
//! use skyframes::sky::{Sky, SkyConfig};
//! use skyframes::solar_system::Body;
//!
//! let config = SkyConfig {
//!     latitude: Some(48.85),
//!     longitude: Some(2.35),
//!     ..SkyConfig::default()
//! };
//! let mut sky = Sky::new(config)?;
//! sky.add_target("Vega", EquatorialCoordinates::new(18.6156, 38.7837, None));
//!
//! let snapshot = sky.update(Epoch::from_gregorian_utc(2024, 8, 12, 22, 0, 0, 0))?;
//! let mars = snapshot.body(Body::Mars).topo_hor_now();
//! println!("Mars: az {:.2}°, alt {:.2}°", mars.azimuth, mars.altitude);
//! println!("Moon: {}", snapshot.moon_phase.name);
//! # Ok::<(), skyframes::astro_errors::AstroError>(())
//! ```

use std::sync::Arc;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::astro_errors::AstroError;
use crate::constants::{AstronomicalUnit, Degree, DEFAULT_TARGET_DISTANCE};
use crate::coordinates::EquatorialCoordinates;
use crate::moon::{LunarPosition, MoonPhase, DEFAULT_LUNAR_MAX_ITERATIONS};
use crate::observatory::{Observatory, ObservatoryBuilder, ObservatoryState};
use crate::orb_elem::StandishTable;
use crate::solar_system::{Body, SolarSystem, SolarSystemPositions};
use crate::target::{Center, Equinox, Frame, TargetBuilder, TargetFrames};
use crate::time::{Clock, ClockTick};

/// Settings of a [`Sky`].
///
/// Latitude and longitude have no default and must be given; the other fields fall back
/// to their defaults when absent from a serialized configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub name: Option<String>,
    /// Decimal degrees, North positive.
    pub latitude: Option<Degree>,
    /// Decimal degrees, East positive.
    pub longitude: Option<Degree>,
    pub element_table: StandishTable,
    /// Distance given to catalog entries without one, AU.
    pub default_distance: AstronomicalUnit,
    pub lunar_max_iterations: usize,
}

impl Default for SkyConfig {
    fn default() -> Self {
        SkyConfig {
            name: None,
            latitude: None,
            longitude: None,
            element_table: StandishTable::default(),
            default_distance: DEFAULT_TARGET_DISTANCE,
            lunar_max_iterations: DEFAULT_LUNAR_MAX_ITERATIONS,
        }
    }
}

/// Everything computed for one instant.
#[derive(Debug)]
pub struct SkySnapshot {
    pub tick: Arc<ClockTick>,
    pub observatory: Arc<ObservatoryState>,
    pub solar_system: Arc<SolarSystemPositions>,
    pub moon: Arc<TargetFrames>,
    pub moon_phase: MoonPhase,
    bodies: Vec<Arc<TargetFrames>>,
    targets: Vec<(String, Arc<TargetFrames>)>,
}

impl SkySnapshot {
    /// Frames of a solar-system body, indexed like [`Body::ALL`].
    pub fn body(&self, body: Body) -> &Arc<TargetFrames> {
        &self.bodies[body as usize]
    }

    pub fn sun(&self) -> &Arc<TargetFrames> {
        self.body(Body::Sun)
    }

    /// Frames of a catalog entry, looked up by the name given to [`Sky::add_target`].
    pub fn target(&self, name: &str) -> Option<&Arc<TargetFrames>> {
        self.targets
            .iter()
            .find(|(target, _)| target == name)
            .map(|(_, frames)| frames)
    }

    pub fn targets(&self) -> impl Iterator<Item = (&str, &Arc<TargetFrames>)> {
        self.targets
            .iter()
            .map(|(name, frames)| (name.as_str(), frames))
    }
}

pub struct Sky {
    config: SkyConfig,
    latitude: Degree,
    longitude: Degree,
    clock: Clock,
    solar_system: SolarSystem,
    lunar: LunarPosition,
    observatory: Option<Observatory>,
    catalog: Vec<(String, EquatorialCoordinates)>,
    last: Option<Arc<SkySnapshot>>,
}

impl Sky {
    pub fn new(config: SkyConfig) -> Result<Self, AstroError> {
        let latitude = config
            .latitude
            .ok_or(AstroError::MissingDependency("latitude"))?;
        let longitude = config
            .longitude
            .ok_or(AstroError::MissingDependency("longitude"))?;

        Ok(Sky {
            latitude,
            longitude,
            clock: Clock::new(),
            solar_system: SolarSystem::new(config.element_table)?,
            lunar: LunarPosition::new(config.lunar_max_iterations),
            observatory: None,
            catalog: Vec::new(),
            last: None,
            config,
        })
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    /// Register a catalog entry with its geocentric equatorial J2000 position.
    ///
    /// An entry with an existing name is replaced.
    pub fn add_target(&mut self, name: impl Into<String>, geo_equ_2000: EquatorialCoordinates) {
        let name = name.into();
        match self.catalog.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = geo_equ_2000,
            None => self.catalog.push((name, geo_equ_2000)),
        }
        self.last = None;
    }

    /// Move the observer. The next update recomputes everything downstream.
    pub fn set_location(&mut self, latitude: Degree, longitude: Degree) {
        self.latitude = latitude;
        self.longitude = longitude;
        self.config.latitude = Some(latitude);
        self.config.longitude = Some(longitude);
        if let Some(observatory) = self.observatory.as_mut() {
            observatory.set_latitude(latitude);
            observatory.set_longitude(longitude);
        }
        self.last = None;
    }

    pub fn last_snapshot(&self) -> Option<Arc<SkySnapshot>> {
        self.last.clone()
    }

    fn observatory_state(&mut self, tick: &Arc<ClockTick>) -> Result<Arc<ObservatoryState>, AstroError> {
        if let Some(observatory) = self.observatory.as_mut() {
            observatory.set_clock_tick(Arc::clone(tick));
            return Ok(observatory.state());
        }

        let mut builder = ObservatoryBuilder::new()
            .latitude(self.latitude)
            .longitude(self.longitude)
            .clock_tick(Arc::clone(tick));
        if let Some(name) = &self.config.name {
            builder = builder.name(name.clone());
        }
        let observatory = builder.build()?;
        let state = observatory.state();
        self.observatory = Some(observatory);
        Ok(state)
    }

    /// Bring every component to `epoch`.
    ///
    /// Return
    /// ------
    /// * The snapshot for `epoch`; the previous one if nothing changed since.
    /// * [`AstroError::KeplerNonConvergence`] if a planetary orbit cannot be solved; the
    ///   previous snapshot is kept in that case.
    pub fn update(&mut self, epoch: Epoch) -> Result<Arc<SkySnapshot>, AstroError> {
        if let Some(last) = &self.last {
            if last.tick.epoch == epoch {
                return Ok(Arc::clone(last));
            }
        }

        let tick = self.clock.tick(epoch);
        let solar_system = self.solar_system.update(&tick)?;
        let moon_equ_2000 = self.lunar.equ_2000(&tick);
        let observatory = self.observatory_state(&tick)?;

        let frames = |coordinates: &EquatorialCoordinates| {
            Arc::new(TargetFrames::new(
                coordinates,
                self.config.default_distance,
                Arc::clone(&observatory),
            ))
        };

        let bodies: Vec<_> = solar_system
            .iter()
            .map(|(_, position)| frames(&position.equ_2000))
            .collect();
        let moon = frames(&moon_equ_2000);

        let targets = self
            .catalog
            .iter()
            .map(|(name, coordinates)| -> Result<_, AstroError> {
                let target = TargetBuilder::new()
                    .name(name.clone())
                    .geo_equ_2000(*coordinates)
                    .default_distance(self.config.default_distance)
                    .observatory(Arc::clone(&observatory))
                    .build()?;
                Ok((name.clone(), target.frames()))
            })
            .collect::<Result<Vec<_>, AstroError>>()?;

        let moon_phase = MoonPhase::from_ecliptic(
            &moon.vector(Center::Geo, Frame::Ecliptic, Equinox::J2000),
            &bodies[Body::Sun as usize].vector(Center::Geo, Frame::Ecliptic, Equinox::J2000),
        );

        debug!(
            jd = tick.jd,
            lmst = observatory.lmst,
            targets = targets.len(),
            phase = moon_phase.name.as_str(),
            "sky updated"
        );

        let snapshot = Arc::new(SkySnapshot {
            tick,
            observatory,
            solar_system,
            moon,
            moon_phase,
            bodies,
            targets,
        });
        self.last = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

#[cfg(test)]
mod sky_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn paris() -> SkyConfig {
        SkyConfig {
            name: Some("Paris".into()),
            latitude: Some(48.85),
            longitude: Some(2.35),
            ..SkyConfig::default()
        }
    }

    #[test]
    fn test_missing_location() {
        let err = Sky::new(SkyConfig::default()).err();
        assert_eq!(err, Some(AstroError::MissingDependency("latitude")));

        let config = SkyConfig {
            latitude: Some(10.0),
            ..SkyConfig::default()
        };
        assert_eq!(Sky::new(config).err(), Some(AstroError::MissingDependency("longitude")));
    }

    #[test]
    fn test_default_config() {
        let config = SkyConfig::default();
        assert_eq!(config.default_distance, 1000.0);
        assert_eq!(config.lunar_max_iterations, 50);
        assert_eq!(config.element_table, StandishTable::From1800AdTo2050Ad);
    }

    #[test]
    fn test_same_epoch_same_snapshot() {
        let mut sky = Sky::new(paris()).unwrap();
        let epoch = Epoch::from_gregorian_utc(2023, 3, 14, 20, 0, 0, 0);
        let a = sky.update(epoch).unwrap();
        let b = sky.update(epoch).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        sky.add_target("M42", EquatorialCoordinates::new(5.5881, -5.3911, None));
        let c = sky.update(epoch).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(c.target("M42").is_some());
        assert!(Arc::ptr_eq(&sky.last_snapshot().unwrap(), &c));
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let mut sky = Sky::new(paris()).unwrap();
        sky.add_target("Sirius", EquatorialCoordinates::new(6.7525, -16.7161, None));
        let snapshot = sky
            .update(Epoch::from_gregorian_utc(2023, 12, 24, 23, 0, 0, 0))
            .unwrap();

        assert_eq!(snapshot.solar_system.jd, snapshot.tick.jd);
        assert!(Arc::ptr_eq(&snapshot.observatory.tick, &snapshot.tick));
        for body in Body::ALL {
            assert!(Arc::ptr_eq(snapshot.body(body).observatory(), &snapshot.observatory));
        }
        assert!(Arc::ptr_eq(snapshot.moon.observatory(), &snapshot.observatory));
        for (_, frames) in snapshot.targets() {
            assert!(Arc::ptr_eq(frames.observatory(), &snapshot.observatory));
        }
    }

    #[test]
    fn test_sun_at_local_noon() {
        let mut sky = Sky::new(SkyConfig {
            latitude: Some(45.0),
            longitude: Some(0.0),
            ..SkyConfig::default()
        })
        .unwrap();
        let snapshot = sky
            .update(Epoch::from_gregorian_utc(2021, 6, 21, 12, 0, 0, 0))
            .unwrap();

        let sun = snapshot.sun().topo_hor_now();
        // 90° − 45° + 23.44°
        assert_abs_diff_eq!(sun.altitude, 68.4, epsilon = 0.5);
        assert!(snapshot.sun().hour_angle().abs() < 0.2);
        assert!(snapshot.sun().topo_equ_now().distance.is_some());
    }

    #[test]
    fn test_polaris_altitude_matches_latitude() {
        let mut sky = Sky::new(paris()).unwrap();
        sky.add_target("Polaris", EquatorialCoordinates::new(2.5303, 89.2641, None));
        let snapshot = sky
            .update(Epoch::from_gregorian_utc(2020, 1, 15, 3, 0, 0, 0))
            .unwrap();

        let polaris = snapshot.target("Polaris").unwrap().topo_hor_now();
        assert_abs_diff_eq!(polaris.altitude, 48.85, epsilon = 1.5);
        assert_eq!(polaris.distance, None);
        assert!(snapshot.target("Vega").is_none());
    }

    #[test]
    fn test_set_location() {
        let mut sky = Sky::new(paris()).unwrap();
        let epoch = Epoch::from_gregorian_utc(2022, 2, 2, 2, 0, 0, 0);
        let before = sky.update(epoch).unwrap();

        sky.set_location(-33.9, 18.4);
        let after = sky.update(epoch).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.observatory.latitude, -33.9);
        assert_eq!(sky.config().longitude, Some(18.4));
        assert!(Arc::ptr_eq(&before.tick, &after.tick));
    }
}
