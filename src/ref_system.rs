//! # Cartesian vectors and frame rotations
//!
//! Every coordinate transform of the crate is a chain of 3×3 rotations applied to a
//! Cartesian vector. This module provides the two primitives used for that:
//!
//! - [`Vector3D`]: a position in a right-handed Cartesian frame, convertible to and from
//!   the polar form `(φ, θ, r)` (azimuthal angle, polar angle measured from the XY plane,
//!   radius).
//! - [`Matrix3D`]: an orthonormal rotation, built **only** through [`Matrix3D::identity`]
//!   and the axis constructors [`Matrix3D::rotate_x`], [`Matrix3D::rotate_y`],
//!   [`Matrix3D::rotate_z`], then composed with `*`.
//!
//! ## Rotation convention
//!
//! The axis constructors rotate the **reference frame** by the given angle (right-hand rule),
//! which is the ERFA/SOFA convention:
//!
//! ```text
//! Rx(a) = | 1    0       0    |
//!         | 0    cos a   sin a|
//!         | 0   -sin a   cos a|
//! ```
//!
//! A vector is transformed as a column vector, `v' = M · v`. Composition is the ordinary
//! (non-commutative) matrix product: `(A * B) * v` applies `B` first, then `A`.

use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::Radian;

/// Polar decomposition of a [`Vector3D`].
///
/// * `phi`: azimuthal angle in (−π, π] measured in the XY plane from +X toward +Y.
/// * `theta`: polar angle in [−π/2, π/2] measured from the XY plane toward +Z.
/// * `radius`: Euclidean norm, ≥ 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub phi: Radian,
    pub theta: Radian,
    pub radius: f64,
}

/// Cartesian 3-vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D(Vector3<f64>);

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    pub fn zeros() -> Self {
        Vector3D(Vector3::zeros())
    }

    /// Build a vector from its polar form.
    ///
    /// Arguments
    /// ---------
    /// * `phi`: azimuthal angle in radians.
    /// * `theta`: polar angle above the XY plane in radians.
    /// * `radius`: length of the vector.
    pub fn from_polar(phi: Radian, theta: Radian, radius: f64) -> Self {
        let rxy = radius * theta.cos();
        Vector3D::new(rxy * phi.cos(), rxy * phi.sin(), radius * theta.sin())
    }

    /// Decompose the vector into `(φ, θ, r)`.
    ///
    /// At the origin the direction is undefined; both angles are returned as `0.0`
    /// together with a zero radius.
    pub fn to_polar(&self) -> Polar {
        let radius = self.radius();
        if radius == 0.0 {
            return Polar {
                phi: 0.0,
                theta: 0.0,
                radius,
            };
        }

        Polar {
            phi: self.0.y.atan2(self.0.x),
            theta: (self.0.z / radius).clamp(-1.0, 1.0).asin(),
            radius,
        }
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn radius(&self) -> f64 {
        self.0.norm()
    }

    pub fn dot(&self, rhs: &Vector3D) -> f64 {
        self.0.dot(&rhs.0)
    }

    pub fn cross(&self, rhs: &Vector3D) -> Vector3D {
        Vector3D(self.0.cross(&rhs.0))
    }

    /// Angle between two vectors in radians, in `[0, π]`.
    ///
    /// The normalized dot product is clamped to `[−1, 1]` before `acos`: nearly parallel
    /// vectors routinely overshoot by a few ulps and would otherwise yield `NaN`. A null
    /// vector has no direction; its separation from anything is `0`.
    pub fn angular_separation(&self, rhs: &Vector3D) -> Radian {
        let norms = self.radius() * rhs.radius();
        if norms == 0.0 {
            return 0.0;
        }
        let cos_sep = self.dot(rhs) / norms;
        cos_sep.clamp(-1.0, 1.0).acos()
    }

    pub fn as_nalgebra(&self) -> &Vector3<f64> {
        &self.0
    }
}

impl From<Vector3<f64>> for Vector3D {
    fn from(v: Vector3<f64>) -> Self {
        Vector3D(v)
    }
}

impl Index<usize> for Vector3D {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector3D {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 - rhs.0)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D(-self.0)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, scalar: f64) -> Vector3D {
        Vector3D(self.0 * scalar)
    }
}

/// Orthonormal 3×3 rotation matrix.
///
/// There is no constructor taking arbitrary coefficients: a `Matrix3D` is always a product
/// of axis rotations and therefore stays a proper rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3D(Matrix3<f64>);

impl Default for Matrix3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3D {
    pub fn identity() -> Self {
        Matrix3D(Matrix3::identity())
    }

    /// Frame rotation of `alpha` radians about the X axis.
    pub fn rotate_x(alpha: Radian) -> Self {
        Self::about(Vector3::x_axis(), alpha)
    }

    /// Frame rotation of `alpha` radians about the Y axis.
    pub fn rotate_y(alpha: Radian) -> Self {
        Self::about(Vector3::y_axis(), alpha)
    }

    /// Frame rotation of `alpha` radians about the Z axis.
    pub fn rotate_z(alpha: Radian) -> Self {
        Self::about(Vector3::z_axis(), alpha)
    }

    // nalgebra builds active rotations; rotating the frame by alpha is the active rotation by -alpha.
    fn about(axis: nalgebra::Unit<Vector3<f64>>, alpha: Radian) -> Self {
        Matrix3D(Rotation3::from_axis_angle(&axis, -alpha).into())
    }

    /// Inverse rotation.
    pub fn transpose(&self) -> Self {
        Matrix3D(self.0.transpose())
    }

    /// Coefficient at `(row, column)`, zero-based.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.0[(row, column)]
    }

    pub fn as_nalgebra(&self) -> &Matrix3<f64> {
        &self.0
    }
}

impl Mul for Matrix3D {
    type Output = Matrix3D;

    fn mul(self, rhs: Matrix3D) -> Matrix3D {
        Matrix3D(self.0 * rhs.0)
    }
}

impl Mul<Vector3D> for Matrix3D {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 * rhs.0)
    }
}

impl Mul<Vector3D> for &Matrix3D {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Vector3D {
        Vector3D(self.0 * rhs.0)
    }
}
