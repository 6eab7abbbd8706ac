//! # Polynomial satellite orbits
//!
//! Tabulated satellite state vectors are replaced by one low-degree polynomial per
//! Cartesian axis. This module defines the shared types; the work is split in two
//! submodules:
//!
//! - [`poly_fit`](crate::orbit::poly_fit) – least-squares fit of the polynomials from
//!   [`OrbitSample`]s through packed normal equations.
//! - [`evaluator`](crate::orbit::evaluator) – position/velocity evaluation, closest
//!   approach to a ground point and the resulting azimuth/incidence.
//!
//! ## Time convention
//!
//! Polynomials are evaluated at `t` **relative to** [`OrbitPolynomial::t0`], the time of
//! the first sample of the fitted arc. Centering keeps the powers of `t` small and the
//! normal matrix well conditioned.
//!
//! ```text
//! x(t) = c_x[0] + c_x[1]·t + … + c_x[d]·t^d      t = time − t0
//! ```
use std::fmt;

use crate::constants::Seconds;
use crate::daisy_errors::DaisyError;

pub mod evaluator;
pub mod poly_fit;

/// One Cartesian axis of the ECEF frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// One tabulated satellite state: time (s) and ECEF position (m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSample {
    pub t: Seconds,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OrbitSample {
    pub fn new(t: Seconds, x: f64, y: f64, z: f64) -> Self {
        OrbitSample { t, x, y, z }
    }

    /// Coordinate of the sample along `axis`.
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Fitted orbit: one polynomial per Cartesian axis over a time window.
///
/// Fields
/// -----------------
/// * `degree` – polynomial degree `d`, each axis has `d + 1` coefficients.
/// * `coeffs` – coefficients per axis (`[X, Y, Z]`), lowest power first.
/// * `t0` – reference time subtracted before evaluation.
/// * `t_start`, `t_stop` – time window of the fitted arc (first and last sample).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPolynomial {
    pub degree: usize,
    pub coeffs: [Vec<f64>; 3],
    pub t0: Seconds,
    pub t_start: Seconds,
    pub t_stop: Seconds,
}

impl OrbitPolynomial {
    /// Assemble a polynomial orbit, checking that every axis carries `degree + 1`
    /// coefficients and that the time window is ordered.
    pub fn new(
        coeffs: [Vec<f64>; 3],
        t0: Seconds,
        t_start: Seconds,
        t_stop: Seconds,
    ) -> Result<Self, DaisyError> {
        let len = coeffs[0].len();
        if len == 0 || coeffs.iter().any(|c| c.len() != len) {
            return Err(DaisyError::InvalidPolynomialFile(format!(
                "axis coefficient counts differ or are empty: {}/{}/{}",
                coeffs[0].len(),
                coeffs[1].len(),
                coeffs[2].len()
            )));
        }
        if !(t_stop >= t_start) {
            return Err(DaisyError::InvalidPolynomialFile(format!(
                "time window is not ordered: [{t_start}, {t_stop}]"
            )));
        }

        Ok(OrbitPolynomial {
            degree: len - 1,
            coeffs,
            t0,
            t_start,
            t_stop,
        })
    }

    pub fn axis_coeffs(&self, axis: Axis) -> &[f64] {
        &self.coeffs[axis.index()]
    }

    /// Length of the search bracket used by the closest-approach search.
    pub fn arc_duration(&self) -> Seconds {
        self.t_stop - self.t_start
    }
}

impl fmt::Display for OrbitPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrbitPolynomial(degree={}, window=[{:.5}, {:.5}] s, t0={:.5})",
            self.degree, self.t_start, self.t_stop, self.t0
        )?;
        if f.alternate() {
            for axis in Axis::ALL {
                write!(f, "\n  {axis}:")?;
                for c in self.axis_coeffs(axis) {
                    write!(f, " {c:23.15e}")?;
                }
            }
        }
        Ok(())
    }
}
