//! # Ellipsoidal ↔ Cartesian coordinates (WGS-84)
//!
//! Conversions between geodetic coordinates `(lon, lat, h)` and Earth-centered,
//! Earth-fixed Cartesian coordinates `(x, y, z)`, plus the local East/North/Up
//! frame of a ground point.
//!
//! Units
//! -----------------
//! * `lon`, `lat`: **radians**; `lon` is returned in `[0, 2π)`.
//! * `h`, `x`, `y`, `z`: **meters**, `h` above the ellipsoid.
//!
//! The inverse conversion performs **one** refinement through the parametric
//! (reduced) latitude. Over terrestrial heights this reproduces the forward
//! conversion to far below a micrometer, which is all the orbit and clustering
//! consumers need.
//!
//! ## See also
//! ------------
//! * [`crate::orbit::evaluator`] – closest approach and look angles built on [`enu_rotation`].
//! * [`crate::scatterers::dominant`] – Cartesian averaging of cluster members.
use nalgebra::{Matrix3, Vector3};

use crate::constants::{Meter, Radian, WGS84_A, WGS84_B, WGS84_E2};

/// A ground point carrying both its ellipsoidal and Cartesian coordinates.
///
/// Build it with [`GeoPoint::from_ellipsoidal`] or [`GeoPoint::from_cartesian`];
/// both constructors compute the other representation so the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in radians, `[0, 2π)` when built from Cartesian coordinates.
    pub lon: Radian,
    /// Geodetic latitude in radians.
    pub lat: Radian,
    /// Height above the ellipsoid in meters.
    pub h: Meter,
    /// Earth-centered, Earth-fixed position in meters.
    pub xyz: Vector3<f64>,
}

impl GeoPoint {
    pub fn from_ellipsoidal(lon: Radian, lat: Radian, h: Meter) -> Self {
        GeoPoint {
            lon,
            lat,
            h,
            xyz: ell_to_cart(lon, lat, h),
        }
    }

    pub fn from_cartesian(xyz: Vector3<f64>) -> Self {
        let (lon, lat, h) = cart_to_ell(&xyz);
        GeoPoint { lon, lat, h, xyz }
    }

    /// Build a point from longitude/latitude given in **degrees**.
    pub fn from_degrees(lon_deg: f64, lat_deg: f64, h: Meter) -> Self {
        Self::from_ellipsoidal(lon_deg.to_radians(), lat_deg.to_radians(), h)
    }

    /// Rotation from ECEF vectors to the local East/North/Up frame of this point.
    pub fn enu_rotation(&self) -> Matrix3<f64> {
        enu_rotation(self.lon, self.lat)
    }
}

/// Convert geodetic coordinates to ECEF Cartesian coordinates.
///
/// Arguments
/// -----------------
/// * `lon`: longitude in radians.
/// * `lat`: geodetic latitude in radians.
/// * `h`: height above the WGS-84 ellipsoid in meters.
///
/// Return
/// ----------
/// * The ECEF position `(x, y, z)` in meters.
pub fn ell_to_cart(lon: Radian, lat: Radian, h: Meter) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // prime vertical radius of curvature
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        ((1.0 - WGS84_E2) * n + h) * sin_lat,
    )
}

/// Convert ECEF Cartesian coordinates to geodetic coordinates.
///
/// The latitude is obtained from one pass through the parametric latitude
/// `θ = atan(a·z / (b·p))`, followed by
/// `φ = atan((z + (a²−b²)/b · sin³θ) / (p − (a²−b²)/a · cos³θ))`.
///
/// Arguments
/// -----------------
/// * `xyz`: ECEF position in meters.
///
/// Return
/// ----------
/// * `(lon, lat, h)` with `lon ∈ [0, 2π)` and `lat` in radians, `h` in meters.
///
/// Remarks
/// ----------
/// * No error conditions: NaN and infinities propagate.
/// * Exactly on the polar axis (`p = 0`) the height is not meaningful.
pub fn cart_to_ell(xyz: &Vector3<f64>) -> (Radian, Radian, Meter) {
    let (x, y, z) = (xyz.x, xyz.y, xyz.z);
    let ab2 = WGS84_A * WGS84_A - WGS84_B * WGS84_B;
    let p = x.hypot(y);

    let theta = (WGS84_A / p / WGS84_B * z).atan();
    let (st, ct) = theta.sin_cos();

    let lat = ((z + ab2 / WGS84_B * st * st * st) / (p - ab2 / WGS84_A * ct * ct * ct)).atan();
    let (sl, cl) = lat.sin_cos();

    let n = WGS84_A * WGS84_A / (WGS84_A * WGS84_A * cl * cl + WGS84_B * WGS84_B * sl * sl).sqrt();

    let mut lon = (y / x).atan();
    if x < 0.0 {
        lon += std::f64::consts::PI;
    }
    if lon < 0.0 {
        lon += std::f64::consts::TAU;
    }

    (lon, lat, p / cl - n)
}

/// Rotation matrix from ECEF to the local East/North/Up frame.
///
/// The rows of the returned matrix are the East, North and Up unit vectors
/// expressed in ECEF, so `R · v` gives the `(e, n, u)` components of `v`.
pub fn enu_rotation(lon: Radian, lat: Radian) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

#[cfg(test)]
mod geodesy_test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_ell_to_cart_equator() {
        let xyz = ell_to_cart(0.0, 0.0, 0.0);
        assert_relative_eq!(xyz.x, WGS84_A, epsilon = 1e-9);
        assert_relative_eq!(xyz.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(xyz.z, 0.0, epsilon = 1e-9);

        let xyz = ell_to_cart(std::f64::consts::FRAC_PI_2, 0.0, 100.0);
        assert_relative_eq!(xyz.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(xyz.y, WGS84_A + 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ell_to_cart_pole() {
        let xyz = ell_to_cart(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        assert_relative_eq!(xyz.z, WGS84_B, epsilon = 1e-4);
        assert!(xyz.x.abs() < 1e-6);
    }

    #[test]
    fn test_longitude_range() {
        let (lon, _, _) = cart_to_ell(&Vector3::new(-4.0e6, -1.0e6, 4.5e6));
        assert!(lon > std::f64::consts::PI && lon < 1.5 * std::f64::consts::PI);

        let (lon, _, _) = cart_to_ell(&Vector3::new(4.0e6, -1.0e6, 4.5e6));
        assert!(lon > 1.5 * std::f64::consts::PI && lon < std::f64::consts::TAU);

        let (lon, _, _) = cart_to_ell(&Vector3::new(-4.0e6, 1.0e6, 4.5e6));
        assert!(lon > std::f64::consts::FRAC_PI_2 && lon < std::f64::consts::PI);
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10_000 {
            let lon = rng.random_range(0.0..std::f64::consts::TAU);
            let lat = rng.random_range(-1.4..1.4);
            let h = rng.random_range(-500.0..5000.0);

            let xyz = ell_to_cart(lon, lat, h);
            let (lon2, lat2, h2) = cart_to_ell(&xyz);

            assert!((lon2 - lon).abs() < 1e-9, "lon {lon} -> {lon2}");
            assert!((lat2 - lat).abs() < 1e-9, "lat {lat} -> {lat2}");
            assert!((h2 - h).abs() < 1e-6, "h {h} -> {h2}");
        }
    }

    #[test]
    fn test_nan_propagates() {
        let (lon, lat, h) = cart_to_ell(&Vector3::new(f64::NAN, 1.0, 1.0));
        assert!(lon.is_nan() && lat.is_nan() && h.is_nan());
    }

    #[test]
    fn test_enu_rotation() {
        // at lon = 0, lat = 0: east = +y, north = +z, up = +x
        let rot = enu_rotation(0.0, 0.0);
        let enu = rot * Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(enu, Vector3::new(2.0, 3.0, 1.0), epsilon = 1e-15);

        let rot = enu_rotation(0.3, -0.8);
        assert_relative_eq!(rot * rot.transpose(), Matrix3::identity(), epsilon = 1e-14);
    }

    #[test]
    fn test_geo_point_consistency() {
        let p = GeoPoint::from_degrees(19.5, 47.25, 230.0);
        let q = GeoPoint::from_cartesian(p.xyz);
        assert_relative_eq!(p.lon, q.lon, epsilon = 1e-12);
        assert_relative_eq!(p.lat, q.lat, epsilon = 1e-12);
        assert_relative_eq!(p.h, q.h, epsilon = 1e-6);
    }
}
