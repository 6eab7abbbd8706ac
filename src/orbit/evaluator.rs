//! # Evaluation of polynomial orbits against a ground point
//!
//! State-free evaluation of an [`OrbitPolynomial`]:
//!
//! - [`OrbitPolynomial::position`] / [`OrbitPolynomial::velocity`] – Horner evaluation
//!   of the polynomials and of their time derivative.
//! - [`OrbitPolynomial::los_velocity_cosine`] – cosine between the satellite velocity
//!   and the ground→satellite line of sight. It vanishes at zero Doppler.
//! - [`OrbitPolynomial::closest_approach`] – bisection of that cosine over the fitted
//!   arc.
//! - [`look_angles`] – azimuth and incidence of the line of sight in the local
//!   East/North/Up frame of the ground point.
//!
//! ## Closest approach
//!
//! The search bracket is `[0, t_stop − t_start]` (times relative to `t0`). At every
//! step the midpoint is evaluated and the half that still brackets the sign change is
//! kept. The loop stops once `|cosine| < 1e-11` or after `max_iter` evaluations;
//! hitting the iteration cap is not an error, the last midpoint is returned.
//!
//! The search assumes that the cosine changes sign **once** over the arc. An arc
//! that does not contain the zero-Doppler instant converges to one of its ends.
//!
//! ## Azimuth convention
//!
//! The raw azimuth of the line of sight is measured clockwise from north in
//! `[0°, 360°)`, then shifted by 180° (`az > 180 → az − 180`, else `az + 180`):
//! the reported angle is the azimuth of the ground→satellite direction seen from the
//! satellite side, which is what the velocity decomposition expects.
use nalgebra::Vector3;

use crate::constants::{Degree, Seconds, CLOSEST_APPROACH_EPS, NORTH_FLOOR};
use crate::geodesy::GeoPoint;
use crate::orbit::poly_fit::horner;
use crate::orbit::{Axis, OrbitPolynomial};

/// Result of the closest-approach search.
///
/// * `time` – time of closest approach relative to `t0`.
/// * `position` – satellite ECEF position at `time`.
/// * `cosine` – velocity/LOS cosine at `time` (≈ 0 when converged).
/// * `iterations` – number of midpoint evaluations performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub time: Seconds,
    pub position: Vector3<f64>,
    pub cosine: f64,
    pub iterations: usize,
}

impl ClosestApproach {
    pub fn converged(&self) -> bool {
        self.cosine.abs() < CLOSEST_APPROACH_EPS
    }
}

/// Viewing angles of a satellite from a ground point, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub azimuth: Degree,
    pub incidence: Degree,
}

/// Derivative `Σ i·c_i·t^(i−1)` evaluated with Horner's scheme.
fn horner_derivative(coeffs: &[f64], t: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (i, c)| acc * t + i as f64 * c)
}

impl OrbitPolynomial {
    /// Satellite ECEF position at `t` seconds after `t0`.
    pub fn position(&self, t: Seconds) -> Vector3<f64> {
        Vector3::from_fn(|i, _| horner(self.axis_coeffs(Axis::ALL[i]), t))
    }

    /// Satellite ECEF velocity at `t` seconds after `t0`.
    pub fn velocity(&self, t: Seconds) -> Vector3<f64> {
        Vector3::from_fn(|i, _| horner_derivative(self.axis_coeffs(Axis::ALL[i]), t))
    }

    /// Cosine of the angle between the satellite velocity and the ground→satellite
    /// vector at time `t` (relative to `t0`).
    pub fn los_velocity_cosine(&self, ground: &GeoPoint, t: Seconds) -> f64 {
        self.cosine_and_position(ground, t).0
    }

    fn cosine_and_position(&self, ground: &GeoPoint, t: Seconds) -> (f64, Vector3<f64>) {
        let sat = self.position(t);
        let los = sat - ground.xyz;
        let vel = self.velocity(t);
        (vel.dot(&los) / (vel.norm() * los.norm()), sat)
    }

    /// Search the zero-Doppler time of `ground` over the fitted arc.
    ///
    /// Arguments
    /// -----------------
    /// * `ground`: the ground point.
    /// * `max_iter`: maximum number of bisection steps.
    ///
    /// Return
    /// ----------
    /// * A [`ClosestApproach`] holding the last evaluated midpoint. With
    ///   `max_iter == 0` no midpoint is evaluated and the start of the arc is returned.
    pub fn closest_approach(&self, ground: &GeoPoint, max_iter: usize) -> ClosestApproach {
        let mut start = 0.0;
        let mut end = self.arc_duration();

        let (mut v_start, mut position) = self.cosine_and_position(ground, start);
        let mut time = start;
        let mut cosine = v_start;
        let mut iterations = 0;

        // forces at least one midpoint even when the arc start is already a root
        let mut v_mid = 1.0_f64;

        while v_mid.abs() > CLOSEST_APPROACH_EPS && iterations < max_iter {
            let mid = 0.5 * (start + end);
            let (v, sat) = self.cosine_and_position(ground, mid);
            v_mid = v;

            if v_start * v_mid > 0.0 {
                start = mid;
                v_start = v_mid;
            } else {
                end = mid;
            }

            time = mid;
            cosine = v_mid;
            position = sat;
            iterations += 1;
        }

        ClosestApproach {
            time,
            position,
            cosine,
            iterations,
        }
    }

    /// Closest approach followed by [`look_angles`] at the satellite position found.
    pub fn azimuth_incidence(&self, ground: &GeoPoint, max_iter: usize) -> LookAngles {
        let approach = self.closest_approach(ground, max_iter);
        look_angles(ground, &approach.position)
    }
}

/// Azimuth and incidence of `satellite` seen from `ground`.
///
/// Arguments
/// -----------------
/// * `ground`: the ground point, its ellipsoidal coordinates define the ENU frame.
/// * `satellite`: ECEF position of the satellite in meters.
///
/// Return
/// ----------
/// * [`LookAngles`] in degrees: `incidence = acos(up / range)`, azimuth rephased by 180°
///   (see the module documentation).
pub fn look_angles(ground: &GeoPoint, satellite: &Vector3<f64>) -> LookAngles {
    let enu = ground.enu_rotation() * (satellite - ground.xyz);
    let (east, mut north, up) = (enu.x, enu.y, enu.z);

    let incidence = (up / enu.norm()).clamp(-1.0, 1.0).acos().to_degrees();

    if north == 0.0 {
        north = NORTH_FLOOR;
    }

    let raw = (east / north).abs().atan();
    let azimuth = if north < 0.0 && east >= 0.0 {
        std::f64::consts::PI - raw
    } else if north < 0.0 {
        std::f64::consts::PI + raw
    } else if east < 0.0 {
        std::f64::consts::TAU - raw
    } else {
        raw
    }
    .to_degrees();

    let azimuth = if azimuth > 180.0 {
        azimuth - 180.0
    } else {
        azimuth + 180.0
    };

    LookAngles { azimuth, incidence }
}

#[cfg(test)]
mod evaluator_test {
    use super::*;
    use crate::constants::WGS84_A;
    use approx::assert_relative_eq;

    /// Straight pass along +z at 700 km up and 300 km east of (lon 0, lat 0),
    /// zero Doppler at `tc` seconds.
    fn straight_pass(tc: f64) -> OrbitPolynomial {
        OrbitPolynomial::new(
            [
                vec![WGS84_A + 700e3, 0.0],
                vec![300e3, 0.0],
                vec![-7000.0 * tc, 7000.0],
            ],
            0.0,
            0.0,
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn test_position_velocity() {
        let orbit = OrbitPolynomial::new(
            [
                vec![1.0, 2.0, 3.0],
                vec![0.0, 0.0, 1.0],
                vec![5.0, -1.0, 0.0],
            ],
            0.0,
            0.0,
            10.0,
        )
        .unwrap();

        assert_eq!(orbit.position(2.0), Vector3::new(17.0, 4.0, 3.0));
        assert_eq!(orbit.velocity(2.0), Vector3::new(14.0, 4.0, -1.0));
        assert_eq!(orbit.velocity(0.0), Vector3::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn test_closest_approach_straight_pass() {
        let orbit = straight_pass(37.3);
        let ground = GeoPoint::from_degrees(0.0, 0.0, 0.0);

        let approach = orbit.closest_approach(&ground, 1000);
        assert!(approach.converged());
        assert!(approach.iterations < 100);
        assert_relative_eq!(approach.time, 37.3, epsilon = 1e-6);
        assert_relative_eq!(approach.position.y, 300e3, epsilon = 1e-6);
        assert!(approach.position.z.abs() < 1e-2);
    }

    #[test]
    fn test_closest_approach_iteration_cap() {
        let orbit = straight_pass(37.3);
        let ground = GeoPoint::from_degrees(0.0, 0.0, 0.0);

        let none = orbit.closest_approach(&ground, 0);
        assert_eq!(none.iterations, 0);
        assert_eq!(none.time, 0.0);
        assert_eq!(none.position, orbit.position(0.0));

        let few = orbit.closest_approach(&ground, 3);
        assert_eq!(few.iterations, 3);
        // 50, 25, 37.5
        assert_eq!(few.time, 37.5);
        assert!(!few.converged());
    }

    #[test]
    fn test_look_angles_straight_pass() {
        let orbit = straight_pass(37.3);
        let ground = GeoPoint::from_degrees(0.0, 0.0, 0.0);

        let angles = orbit.azimuth_incidence(&ground, 1000);
        assert_relative_eq!(
            angles.incidence,
            (300.0_f64 / 700.0).atan().to_degrees(),
            epsilon = 1e-6
        );
        // satellite due east, rephased by 180°
        assert_relative_eq!(angles.azimuth, 270.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_angles_quadrants() {
        let ground = GeoPoint::from_degrees(0.0, 0.0, 0.0);
        // ECEF offsets at (0, 0): east = +y, north = +z, up = +x
        let at = |east: f64, north: f64| ground.xyz + Vector3::new(500e3, east, north);

        let north_east = look_angles(&ground, &at(100e3, 100e3));
        assert_relative_eq!(north_east.azimuth, 225.0, epsilon = 1e-9);

        let south_east = look_angles(&ground, &at(100e3, -100e3));
        assert_relative_eq!(south_east.azimuth, 315.0, epsilon = 1e-9);

        let south_west = look_angles(&ground, &at(-100e3, -100e3));
        assert_relative_eq!(south_west.azimuth, 45.0, epsilon = 1e-9);

        let north_west = look_angles(&ground, &at(-100e3, 100e3));
        assert_relative_eq!(north_west.azimuth, 135.0, epsilon = 1e-9);

        let due_south = look_angles(&ground, &at(0.0, -100e3));
        assert_relative_eq!(due_south.azimuth, 360.0, epsilon = 1e-9);

        let due_north = look_angles(&ground, &at(0.0, 100e3));
        assert_relative_eq!(due_north.azimuth, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_look_angles_zenith() {
        let ground = GeoPoint::from_degrees(12.0, 45.0, 150.0);
        let up = ground.enu_rotation().transpose() * Vector3::new(0.0, 0.0, 800e3);

        let angles = look_angles(&ground, &(ground.xyz + up));
        assert!(angles.incidence.abs() < 1e-6);
        assert!(angles.azimuth.is_finite());
    }
}
