//! # Dominant point of a two-track cluster
//!
//! The dominant point stands for a cluster of ascending and descending scatterers:
//!
//! * **Position**: Cartesian mean of the members where each track counts for half,
//!   every member of a track weighting `1 / count` of that track.
//! * **Velocities**: one per track, inverse-square-distance interpolation of the
//!   track members at the dominant position,
//!   `v = Σ(v_i / d_i²) / Σ(1 / d_i²)`.
//!
//! A member lying on the dominant point (`d² < 1e-12 m²`) would receive an infinite
//! weight; the interpolated velocity of its track is then the mean of the coincident
//! members.
use nalgebra::Vector3;

use crate::constants::{Degree, Meter, MmPerYear, COINCIDENT_DIST2};
use crate::geodesy::GeoPoint;
use crate::scatterers::cluster::Cluster;
use crate::scatterers::Track;

/// Representative point of a cluster with one interpolated velocity per track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantPoint {
    pub lon: Degree,
    pub lat: Degree,
    pub h: Meter,
    pub asc_velocity: MmPerYear,
    pub dsc_velocity: MmPerYear,
}

impl DominantPoint {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.lon, self.lat, self.h)
    }
}

/// What a non-empty cluster turns into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterOutcome {
    /// Both tracks are present.
    Accepted(DominantPoint),
    /// Members from one track only, with the member count of each track.
    Hermit { ascending: usize, descending: usize },
}

fn interpolate_velocity(members: &[(Vector3<f64>, MmPerYear)], dominant: &Vector3<f64>) -> MmPerYear {
    let dist2: Vec<f64> = members
        .iter()
        .map(|(xyz, _)| (dominant - xyz).norm_squared())
        .collect();

    let coincident: Vec<MmPerYear> = members
        .iter()
        .zip(&dist2)
        .filter(|(_, d2)| **d2 < COINCIDENT_DIST2)
        .map(|((_, v), _)| *v)
        .collect();
    if !coincident.is_empty() {
        return coincident.iter().sum::<f64>() / coincident.len() as f64;
    }

    let (sum_wv, sum_w) = members
        .iter()
        .zip(&dist2)
        .fold((0.0, 0.0), |(swv, sw), ((_, v), d2)| (swv + v / d2, sw + 1.0 / d2));
    sum_wv / sum_w
}

/// Estimate the dominant point of a cluster.
///
/// Return
/// ----------
/// * `None` when one of the tracks has no member (hermit or empty cluster).
pub fn estimate_dominant(cluster: &Cluster) -> Option<DominantPoint> {
    let n_asc = cluster.ascending_count();
    let n_dsc = cluster.descending_count();
    if n_asc == 0 || n_dsc == 0 {
        return None;
    }

    let mut ascending = Vec::with_capacity(n_asc);
    let mut descending = Vec::with_capacity(n_dsc);
    for p in &cluster.members {
        let xyz = p.geo_point().xyz;
        match p.track {
            Track::Ascending => ascending.push((xyz, p.los_velocity)),
            Track::Descending => descending.push((xyz, p.los_velocity)),
        }
    }

    let mean = |members: &[(Vector3<f64>, MmPerYear)]| {
        members.iter().map(|(xyz, _)| xyz).sum::<Vector3<f64>>() / members.len() as f64
    };
    let xyz = (mean(&ascending) + mean(&descending)) / 2.0;
    let dominant = GeoPoint::from_cartesian(xyz);

    Some(DominantPoint {
        lon: dominant.lon.to_degrees(),
        lat: dominant.lat.to_degrees(),
        h: dominant.h,
        asc_velocity: interpolate_velocity(&ascending, &xyz),
        dsc_velocity: interpolate_velocity(&descending, &xyz),
    })
}
