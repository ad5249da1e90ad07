//! # Kepler's equation, elliptic case
//!
//! Solves `E − e·sin E = M` for the eccentric anomaly `E` with Danby's third-order
//! corrector (Danby, *Fundamentals of Celestial Mechanics*, §6.6).
//!
//! Each step evaluates `f(E)` and its first three derivatives and applies a correction of
//! increasing order:
//!
//! ```text
//! δ₁ = −f / f'
//! δ₂ = −f / (f' + δ₁·f''/2)
//! δ₃ = −f / (f' + δ₁·f''/2 + δ₂²·f'''/6)
//! E ← E + δ₃
//! ```
//!
//! Convergence is cubic; for planetary eccentricities two or three steps are enough.
//! Failing to reach the tolerance within [`DANBY_MAX_ITERATIONS`] steps means the element
//! set is pathological, and is reported as [`AstroError::KeplerNonConvergence`] rather
//! than returning a partially converged value.

use tracing::error;

use crate::angle::reduce_degrees;
use crate::astro_errors::AstroError;
use crate::constants::{Degree, Radian, RADEG};

/// Residual `|E − e·sin E − M|` below which the solution is accepted.
pub const DANBY_TOLERANCE: f64 = 1e-6;

/// Maximum number of corrector steps.
pub const DANBY_MAX_ITERATIONS: usize = 10;

// sign(0) must be 0 so that M = 0 starts exactly at E = 0
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Starting guess `E₀ = M + 0.85·e·sign(sin M)`.
pub fn danby_first_guess(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    mean_anomaly + 0.85 * eccentricity * sign(mean_anomaly.sin())
}

/// Solve Kepler's equation for the eccentric anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly in degrees, any range (reduced into `(−180°, 180°]`).
/// * `eccentricity`: orbital eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * The eccentric anomaly in radians, in the same half-turn as the reduced mean anomaly,
///   or [`AstroError::KeplerNonConvergence`] after [`DANBY_MAX_ITERATIONS`] steps.
pub fn solve_kepler_danby(mean_anomaly: Degree, eccentricity: f64) -> Result<Radian, AstroError> {
    let m = reduce_degrees(mean_anomaly) * RADEG;
    let mut ecc_anomaly = danby_first_guess(m, eccentricity);

    let mut iterations = 0;
    while iterations < DANBY_MAX_ITERATIONS {
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let f = ecc_anomaly - eccentricity * sin_e - m;
        if f.abs() < DANBY_TOLERANCE {
            return Ok(ecc_anomaly);
        }

        let fp = 1.0 - eccentricity * cos_e;
        let fpp = eccentricity * sin_e;
        let fppp = eccentricity * cos_e;

        let mut accum = fp;
        let del = -f / accum;
        accum += del * fpp / 2.0;
        let delstar = -f / accum;
        accum += delstar * delstar * fppp / 6.0;
        ecc_anomaly += -f / accum;

        iterations += 1;
    }

    // the last correction may have landed inside the tolerance
    if (ecc_anomaly - eccentricity * ecc_anomaly.sin() - m).abs() < DANBY_TOLERANCE {
        return Ok(ecc_anomaly);
    }

    error!(
        mean_anomaly = m,
        eccentricity, iterations, "Kepler equation did not converge"
    );
    Err(AstroError::KeplerNonConvergence {
        mean_anomaly: m,
        eccentricity,
        iterations,
    })
}
