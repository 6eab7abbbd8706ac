//! # Persistent scatterers of the ascending and descending tracks
//!
//! A persistent scatterer (PS) is a radar target measured along the line of sight of
//! one viewing geometry. The two geometries are the [`Track::Ascending`] and
//! [`Track::Descending`] passes of the satellite.
//!
//! Submodules:
//!
//! - [`select`](crate::scatterers::select) – keep the scatterers of one track that have
//!   a neighbour in the other one.
//! - [`cluster`](crate::scatterers::cluster) – greedy clustering of the two tracks.
//! - [`dominant`](crate::scatterers::dominant) – dominant point of a two-track cluster.
//!
//! ## Planar distance threshold
//!
//! Clustering and selection compare `Δlon² + Δlat²` (in degrees) with the square of the
//! separation converted to degrees on a sphere of radius [`R_EARTH`]. The longitude
//! difference is not scaled by `cos(lat)`, so the neighbourhood is an ellipse elongated
//! east-west away from the equator.
use std::fmt;

use crate::constants::{Degree, Meter, MmPerYear, R_EARTH};
use crate::geodesy::GeoPoint;

pub mod cluster;
pub mod dominant;
pub mod select;

/// Viewing geometry of a scatterer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    Ascending,
    Descending,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Ascending => write!(f, "ascending"),
            Track::Descending => write!(f, "descending"),
        }
    }
}

/// One persistent scatterer.
///
/// `lon`/`lat` are in **degrees**, `h` is the corrected height in meters and
/// `los_velocity` the line-of-sight velocity in mm/year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScattererPoint {
    pub lon: Degree,
    pub lat: Degree,
    pub h: Meter,
    pub los_velocity: MmPerYear,
    pub track: Track,
}

impl ScattererPoint {
    pub fn new(lon: Degree, lat: Degree, h: Meter, los_velocity: MmPerYear, track: Track) -> Self {
        ScattererPoint {
            lon,
            lat,
            h,
            los_velocity,
            track,
        }
    }

    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.lon, self.lat, self.h)
    }

    /// Squared planar distance in degrees² (see the module documentation).
    #[inline]
    pub fn planar_dist2(&self, other: &ScattererPoint) -> f64 {
        let dlon = self.lon - other.lon;
        let dlat = self.lat - other.lat;
        dlon * dlon + dlat * dlat
    }
}

/// Clustering state of a scatterer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointState {
    Available,
    Consumed,
}

/// A scatterer together with its clustering state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPoint {
    pub point: ScattererPoint,
    pub state: PointState,
}

impl TrackedPoint {
    pub fn is_available(&self) -> bool {
        self.state == PointState::Available
    }
}

impl From<ScattererPoint> for TrackedPoint {
    fn from(point: ScattererPoint) -> Self {
        TrackedPoint {
            point,
            state: PointState::Available,
        }
    }
}

/// Square of `separation` (meters) expressed in degrees on the spherical Earth.
pub fn separation_threshold(separation: Meter) -> f64 {
    let deg = (separation / R_EARTH).to_degrees();
    deg * deg
}
