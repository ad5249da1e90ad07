//! # Bisection root finder
//!
//! Solves `f(x) = 0` between two bracketing guesses. The brackets are checked before the
//! first iteration: residuals of the same sign are reported as
//! [`AstroError::NoSignChange`]. The search stops when either the residual at the midpoint
//! or the half-width of the bracket falls below the tolerance.

use crate::astro_errors::AstroError;

/// Scalar function of one variable.
///
/// Implemented for every `Fn(f64) -> f64`, so closures can be passed directly.
pub trait RootHelper {
    fn solve_y(&self, x: f64) -> f64;
}

impl<F> RootHelper for F
where
    F: Fn(f64) -> f64,
{
    fn solve_y(&self, x: f64) -> f64 {
        self(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolution {
    pub x_root: f64,
    pub y_root: f64,
    pub iterations: usize,
}

/// Find a root of `helper` inside `[lower, upper]`.
///
/// Arguments
/// ---------
/// * `helper`: the function whose zero is sought.
/// * `lower`, `upper`: bracketing guesses; their residuals must have opposite signs (a zero
///   residual at either end is accepted as a root).
/// * `tolerance`: absolute tolerance on both the residual and the bracket half-width.
/// * `max_iterations`: iteration budget.
///
/// Return
/// ------
/// * The root, the residual at the root and the number of iterations used.
/// * [`AstroError::NoSignChange`] if the brackets do not straddle a root.
/// * [`AstroError::MaxIterationsExceeded`] if the budget is spent first.
pub fn bisection<H: RootHelper + ?Sized>(
    helper: &H,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<RootSolution, AstroError> {
    let mut a = lower;
    let mut b = upper;
    let mut fa = helper.solve_y(a);
    let fb = helper.solve_y(b);

    if fa == 0.0 {
        return Ok(RootSolution { x_root: a, y_root: fa, iterations: 0 });
    }
    if fb == 0.0 {
        return Ok(RootSolution { x_root: b, y_root: fb, iterations: 0 });
    }
    if fa.signum() == fb.signum() {
        return Err(AstroError::NoSignChange { lower, upper });
    }

    for iteration in 1..=max_iterations {
        let mid = 0.5 * (a + b);
        let fmid = helper.solve_y(mid);

        if fmid.abs() < tolerance || 0.5 * (b - a).abs() < tolerance {
            return Ok(RootSolution {
                x_root: mid,
                y_root: fmid,
                iterations: iteration,
            });
        }

        if fa.signum() == fmid.signum() {
            a = mid;
            fa = fmid;
        } else {
            b = mid;
        }
    }

    Err(AstroError::MaxIterationsExceeded(max_iterations))
}
