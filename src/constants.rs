//! # Constants and type definitions for DAISY
//!
//! This module centralizes the **ellipsoid parameters**, **conversion factors**, and
//! **unit aliases** shared by the geodetic, orbit and clustering code.
//!
//! ## Overview
//!
//! - WGS-84 ellipsoid (semi-major axis, semi-minor axis, first eccentricity squared)
//! - Spherical Earth radius used by the planar clustering threshold
//! - Numerical tolerances of the closest-approach search and of the decomposition
//! - Unit aliases used in signatures across the crate
//!
//! All values are compile-time constants; nothing here is mutable at runtime.

// -------------------------------------------------------------------------------------------------
// WGS-84 ellipsoid
// -------------------------------------------------------------------------------------------------

/// WGS-84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 semi-minor axis in meters
pub const WGS84_B: f64 = 6_356_752.3142;

/// WGS-84 first eccentricity squared, `(a² − b²) / a²` (≈ 6.694380e-3)
pub const WGS84_E2: f64 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_A * WGS84_A);

/// Radius of the spherical Earth used to turn a separation in meters into degrees
pub const R_EARTH: f64 = 6_372_000.0;

// -------------------------------------------------------------------------------------------------
// Numerical tolerances
// -------------------------------------------------------------------------------------------------

/// Stop criterion of the closest-approach bisection on the velocity/LOS cosine
pub const CLOSEST_APPROACH_EPS: f64 = 1.0e-11;

/// Replacement of an exactly zero north component in the azimuth computation
pub const NORTH_FLOOR: f64 = 1.0e-9;

/// Minimum length of the observation-plane normal accepted by the decomposition
pub const MIN_NORMAL_NORM: f64 = 1.0e-9;

/// Minimum magnitude of any divisor in the decomposition (cosines, tangent sum)
pub const MIN_DIVISOR: f64 = 1.0e-9;

/// Squared distance (m²) under which a cluster member coincides with its dominant point
pub const COINCIDENT_DIST2: f64 = 1.0e-12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Velocity in millimeters per year
pub type MmPerYear = f64;
/// Orbit time in seconds (time of day of the tabulated state vectors)
pub type Seconds = f64;
