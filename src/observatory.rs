//! # Observatory: local sidereal time and horizon matrices
//!
//! An [`Observatory`] combines a site (latitude, longitude, both in decimal degrees, East
//! positive) with the current [`ClockTick`] and derives:
//!
//! - the local mean sidereal time `lmst = gmst + longitude/15`, in `[0, 24)` h,
//! - the equatorial→horizontal matrix `Ry(90° − φ) · Rz(lmst·15°)`,
//! - the horizontal→equatorial matrix `Rz(−lmst·15°) · Ry(φ − 90°)`.
//!
//! The horizontal frame has +X toward the south point, +Y toward the east point and +Z
//! toward the zenith.
//!
//! ## Construction
//!
//! Latitude, longitude and clock tick are all required. [`ObservatoryBuilder::build`]
//! reports the first missing one as [`AstroError::MissingDependency`], so an observatory
//! that exists always has a complete state.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hifitime::Epoch;
//! use skyframes::observatory::ObservatoryBuilder;
//! use skyframes::time::ClockTick;
//!
//! let tick = Arc::new(ClockTick::from_epoch(Epoch::from_gregorian_utc_at_noon(2024, 6, 21)));
//! let observatory = ObservatoryBuilder::new()
//!     .name("Pic du Midi")
//!     .latitude(42.936)
//!     .longitude(0.142)
//!     .clock_tick(tick)
//!     .build()?;
//! println!("LMST = {:.4} h", observatory.state().lmst);
//! # Ok::<(), skyframes::astro_errors::AstroError>(())
//! ```
//!
//! Every setter recomputes the state at once and swaps in a new `Arc<ObservatoryState>`;
//! holders of the previous state keep a consistent, older snapshot.

use std::sync::Arc;

use tracing::debug;

use crate::angle::normalize_hours;
use crate::astro_errors::AstroError;
use crate::constants::{Degree, Hour, DEG_PER_HOUR, RADEG};
use crate::ref_system::Matrix3D;
use crate::time::ClockTick;

/// Local mean sidereal time in `[0, 24)` h for an East-positive longitude in degrees.
pub fn calculate_lmst(gmst: Hour, longitude: Degree) -> Hour {
    normalize_hours(gmst + longitude / DEG_PER_HOUR)
}

/// Derived quantities of an observatory for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservatoryState {
    pub tick: Arc<ClockTick>,
    pub latitude: Degree,
    pub longitude: Degree,
    pub lmst: Hour,
    pub mat_equ_to_hor: Matrix3D,
    pub mat_hor_to_equ: Matrix3D,
}

impl ObservatoryState {
    pub fn new(latitude: Degree, longitude: Degree, tick: Arc<ClockTick>) -> Self {
        let lmst = calculate_lmst(tick.gmst, longitude);
        let lst_angle = lmst * DEG_PER_HOUR * RADEG;

        let mat_equ_to_hor =
            Matrix3D::rotate_y((90.0 - latitude) * RADEG) * Matrix3D::rotate_z(lst_angle);
        let mat_hor_to_equ =
            Matrix3D::rotate_z(-lst_angle) * Matrix3D::rotate_y((latitude - 90.0) * RADEG);

        ObservatoryState {
            tick,
            latitude,
            longitude,
            lmst,
            mat_equ_to_hor,
            mat_hor_to_equ,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObservatoryBuilder {
    name: Option<String>,
    latitude: Option<Degree>,
    longitude: Option<Degree>,
    clock_tick: Option<Arc<ClockTick>>,
}

impl ObservatoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn latitude(mut self, latitude: Degree) -> Self {
        self.latitude = Some(latitude);
        self
    }

    pub fn longitude(mut self, longitude: Degree) -> Self {
        self.longitude = Some(longitude);
        self
    }

    pub fn clock_tick(mut self, tick: Arc<ClockTick>) -> Self {
        self.clock_tick = Some(tick);
        self
    }

    pub fn build(self) -> Result<Observatory, AstroError> {
        let latitude = self.latitude.ok_or(AstroError::MissingDependency("latitude"))?;
        let longitude = self.longitude.ok_or(AstroError::MissingDependency("longitude"))?;
        let tick = self.clock_tick.ok_or(AstroError::MissingDependency("clock_tick"))?;

        Ok(Observatory {
            name: self.name,
            state: Arc::new(ObservatoryState::new(latitude, longitude, tick)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Observatory {
    name: Option<String>,
    state: Arc<ObservatoryState>,
}

impl Observatory {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current state, shared by every consumer.
    pub fn state(&self) -> Arc<ObservatoryState> {
        Arc::clone(&self.state)
    }

    fn recompute(&mut self, latitude: Degree, longitude: Degree, tick: Arc<ClockTick>) {
        self.state = Arc::new(ObservatoryState::new(latitude, longitude, tick));
        debug!(
            latitude,
            longitude,
            lmst = self.state.lmst,
            "observatory state recomputed"
        );
    }

    pub fn set_latitude(&mut self, latitude: Degree) {
        if latitude != self.state.latitude {
            self.recompute(latitude, self.state.longitude, Arc::clone(&self.state.tick));
        }
    }

    pub fn set_longitude(&mut self, longitude: Degree) {
        if longitude != self.state.longitude {
            self.recompute(self.state.latitude, longitude, Arc::clone(&self.state.tick));
        }
    }

    /// Move the observatory to a new instant. A tick for the same instant is ignored.
    pub fn set_clock_tick(&mut self, tick: Arc<ClockTick>) {
        if !Arc::ptr_eq(&tick, &self.state.tick) && tick.epoch != self.state.tick.epoch {
            self.recompute(self.state.latitude, self.state.longitude, tick);
        }
    }
}
