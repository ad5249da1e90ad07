//! # Error taxonomy
//!
//! Every fallible operation of the crate returns [`AstroError`]; see its variants for
//! the configuration, numerical and domain failure families.

use thiserror::Error;

/// Errors raised by the ephemeris engine.
///
/// Three families are distinguished:
/// - **configuration**: a component was built before one of its required inputs was wired
///   ([`AstroError::MissingDependency`]);
/// - **numerical**: an iterative solver did not converge within its budget
///   ([`AstroError::KeplerNonConvergence`], [`AstroError::MaxIterationsExceeded`]);
/// - **domain**: the caller supplied arguments outside the contract of an operation
///   ([`AstroError::NoSignChange`], [`AstroError::InvalidCalendarDate`], [`AstroError::InvalidAngle`]).
///
/// Nothing is retried internally; the caller decides what to do with a failed frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    #[error("Missing dependency: {0} must be provided before build")]
    MissingDependency(&'static str),

    #[error(
        "Kepler equation did not converge after {iterations} iterations (M = {mean_anomaly} rad, e = {eccentricity})"
    )]
    KeplerNonConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
    },

    #[error("Brackets do not contain a sign change: f({lower}) and f({upper}) have the same sign")]
    NoSignChange { lower: f64, upper: f64 },

    #[error("Exceeded max iterations: {0}")]
    MaxIterationsExceeded(usize),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Invalid angle: {0}")]
    InvalidAngle(String),
}
