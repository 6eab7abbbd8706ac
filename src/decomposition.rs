//! # East/up decomposition of two line-of-sight velocities
//!
//! Two LOS velocities measured from different viewing geometries only constrain the
//! motion inside the **observation plane** spanned by the two look vectors. The
//! decomposition works in that plane:
//!
//! 1. Look vectors in ENU, `l = (−sin az·sin inc, −cos az·sin inc, cos inc)`.
//! 2. Plane normal `n = a × b` (normalized), plane azimuth `atan(n_e / n_n)` and plane
//!    tilt `atan(n_u / |n_h|)`.
//! 3. In-plane reference direction `s = (−n_u·sin az_p, −n_u·cos az_p, |n_h|)` and the
//!    angles `α = asin|a × s|`, `β = asin|b × s|` of each look vector to it.
//! 4. Strike and tilt motions
//!
//! ```text
//! strike = (v_b / cos β − v_a / cos α) / (tan α + tan β)
//! tilt   = v_a / cos α + tan α · strike
//! ```
//!
//! 5. `up = tilt / cos(tilt_p)`, `east = strike / cos(az_p)`.
//!
//! The north component is unobservable with two near-polar orbits; the returned
//! east and up values absorb its projection (they are biased by any north motion).
//!
//! Every division is guarded: a geometry that would divide by (almost) zero returns
//! [`DaisyError::DegenerateGeometry`] instead of a NaN or infinite velocity.
use nalgebra::Vector3;

use crate::constants::{Degree, MmPerYear, MIN_DIVISOR, MIN_NORMAL_NORM};
use crate::daisy_errors::DaisyError;
use crate::io::records::VelocityRecord;

/// Below this, the north component of the plane normal leaves the plane azimuth undefined.
const MIN_NORMAL_NORTH: f64 = 1.0e-12;

/// One line-of-sight measurement with its viewing geometry (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LosObservation {
    pub azimuth: Degree,
    pub incidence: Degree,
    pub velocity: MmPerYear,
}

impl LosObservation {
    pub fn new(azimuth: Degree, incidence: Degree, velocity: MmPerYear) -> Self {
        LosObservation {
            azimuth,
            incidence,
            velocity,
        }
    }

    /// Unit look vector in the local (east, north, up) frame.
    pub fn look_vector(&self) -> Vector3<f64> {
        let (sin_az, cos_az) = self.azimuth.to_radians().sin_cos();
        let (sin_inc, cos_inc) = self.incidence.to_radians().sin_cos();
        Vector3::new(-sin_az * sin_inc, -cos_az * sin_inc, cos_inc)
    }
}

/// East-west and vertical velocity in mm/year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundMotion {
    pub east: MmPerYear,
    pub up: MmPerYear,
}

impl GroundMotion {
    pub fn magnitude(&self) -> MmPerYear {
        self.east.hypot(self.up)
    }
}

fn guard(value: f64, what: &str) -> Result<f64, DaisyError> {
    if value.abs() < MIN_DIVISOR || !value.is_finite() {
        Err(DaisyError::DegenerateGeometry(format!(
            "{what} = {value:e} is too close to zero"
        )))
    } else {
        Ok(value)
    }
}

/// Decompose the LOS velocities of two viewing geometries into east and up motion.
///
/// Arguments
/// -----------------
/// * `a`, `b`: the two observations (typically ascending and descending).
///
/// Return
/// ----------
/// * The [`GroundMotion`] in the unit of the input velocities.
///
/// Errors
/// ----------
/// * [`DaisyError::DegenerateGeometry`] when the look vectors are (anti)parallel, when
///   the plane azimuth is undefined or when any divisor is below `1e-9`.
pub fn decompose(a: &LosObservation, b: &LosObservation) -> Result<GroundMotion, DaisyError> {
    let la = a.look_vector();
    let lb = b.look_vector();

    let normal = la.cross(&lb);
    let norm = normal.norm();
    if !(norm >= MIN_NORMAL_NORM) {
        return Err(DaisyError::DegenerateGeometry(format!(
            "look vectors are parallel (|a × b| = {norm:e})"
        )));
    }
    let n = normal / norm;

    if n.y.abs() < MIN_NORMAL_NORTH {
        return Err(DaisyError::DegenerateGeometry(
            "observation plane normal has no north component".into(),
        ));
    }

    let plane_azimuth = (n.x / n.y).atan();
    let horizontal = n.x.hypot(n.y);
    let plane_tilt = (n.z / horizontal).atan();

    let (sin_paz, cos_paz) = plane_azimuth.sin_cos();
    let s = Vector3::new(-n.z * sin_paz, -n.z * cos_paz, horizontal);

    let alpha = la.cross(&s).norm().min(1.0).asin();
    let beta = lb.cross(&s).norm().min(1.0).asin();

    let cos_alpha = guard(alpha.cos(), "cos(alpha)")?;
    let cos_beta = guard(beta.cos(), "cos(beta)")?;
    let tan_sum = guard(alpha.tan() + beta.tan(), "tan(alpha) + tan(beta)")?;
    let cos_tilt = guard(plane_tilt.cos(), "cos(plane tilt)")?;
    let cos_paz = guard(cos_paz, "cos(plane azimuth)")?;

    let strike = (b.velocity / cos_beta - a.velocity / cos_alpha) / tan_sum;
    let tilt = a.velocity / cos_alpha + alpha.tan() * strike;

    let motion = GroundMotion {
        east: strike / cos_paz,
        up: tilt / cos_tilt,
    };
    if !(motion.east.is_finite() && motion.up.is_finite()) {
        return Err(DaisyError::DegenerateGeometry(format!(
            "non-finite motion {motion:?}"
        )));
    }
    Ok(motion)
}

/// Split integrated records into near-zero and target sets.
///
/// A record whose velocity magnitude `sqrt(east² + up²)` is `≤ threshold` goes to the
/// first vector. Input order is preserved in both.
pub fn partition_by_magnitude(
    records: Vec<VelocityRecord>,
    threshold: MmPerYear,
) -> (Vec<VelocityRecord>, Vec<VelocityRecord>) {
    records
        .into_iter()
        .partition(|r| r.motion().magnitude() <= threshold)
}
