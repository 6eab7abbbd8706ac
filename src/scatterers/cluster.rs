//! # Greedy two-track clustering
//!
//! Clusters are grown one at a time around an **anchor**, the first scatterer still
//! available in track A (or in track B once track A is exhausted). Every available
//! scatterer of either track whose planar squared distance to the anchor is strictly
//! below the separation threshold joins the cluster and is marked
//! [`PointState::Consumed`]. The anchor itself is always consumed, so repeated calls
//! partition the two tracks: every scatterer ends up in exactly one cluster.
//!
//! The clustering is sequential and order dependent: the result depends on the order
//! of the input files.
//!
//! ## See also
//! ------------
//! * [`estimate_dominant`](crate::scatterers::dominant::estimate_dominant) – turns an
//!   accepted cluster into a dominant point.
use std::fmt;

use crate::constants::Meter;
use crate::daisy_errors::DaisyError;
use crate::scatterers::dominant::{estimate_dominant, ClusterOutcome};
use crate::scatterers::{separation_threshold, PointState, ScattererPoint, Track, TrackedPoint};

/// Scatterers gathered around one anchor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cluster {
    pub members: Vec<ScattererPoint>,
}

impl Cluster {
    pub fn ascending_count(&self) -> usize {
        self.count(Track::Ascending)
    }

    pub fn descending_count(&self) -> usize {
        self.count(Track::Descending)
    }

    fn count(&self, track: Track) -> usize {
        self.members.iter().filter(|p| p.track == track).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A non-empty cluster with members from one track only.
    pub fn is_hermit(&self) -> bool {
        !self.is_empty() && (self.ascending_count() == 0 || self.descending_count() == 0)
    }

    /// Consume the cluster into its outcome.
    ///
    /// Return
    /// ----------
    /// * `Some(ClusterOutcome::Accepted)` – both tracks are present, the dominant
    ///   point is estimated.
    /// * `Some(ClusterOutcome::Hermit)` – only one track is present.
    /// * `None` – the cluster is empty.
    pub fn outcome(self) -> Option<ClusterOutcome> {
        if self.is_empty() {
            return None;
        }
        match estimate_dominant(&self) {
            Some(dominant) => Some(ClusterOutcome::Accepted(dominant)),
            None => Some(ClusterOutcome::Hermit {
                ascending: self.ascending_count(),
                descending: self.descending_count(),
            }),
        }
    }
}

fn first_available(track: &[TrackedPoint]) -> Option<usize> {
    track.iter().position(TrackedPoint::is_available)
}

fn consume(tp: &mut TrackedPoint, members: &mut Vec<ScattererPoint>) {
    tp.state = PointState::Consumed;
    members.push(tp.point);
}

/// Build the next cluster from the two tracks.
///
/// Arguments
/// -----------------
/// * `track_a`, `track_b`: the scatterers and their states, updated in place.
/// * `separation`: cluster size in meters.
///
/// Return
/// ----------
/// * The cluster (members of `track_a` first). An empty cluster means that both tracks
///   are fully consumed.
pub fn cluster_one(
    track_a: &mut [TrackedPoint],
    track_b: &mut [TrackedPoint],
    separation: Meter,
) -> Cluster {
    let mut members = Vec::new();

    let anchor = if let Some(i) = first_available(track_a) {
        consume(&mut track_a[i], &mut members);
        track_a[i].point
    } else if let Some(i) = first_available(track_b) {
        consume(&mut track_b[i], &mut members);
        track_b[i].point
    } else {
        return Cluster { members };
    };

    let threshold = separation_threshold(separation);

    for tp in track_a.iter_mut().chain(track_b.iter_mut()) {
        if tp.is_available() && tp.point.planar_dist2(&anchor) < threshold {
            consume(tp, &mut members);
        }
    }

    Cluster { members }
}

/// Iterator over the clusters of an ascending and a descending track.
///
/// The ascending track plays the role of track A.
#[derive(Debug, Clone)]
pub struct Clusterer {
    ascending: Vec<TrackedPoint>,
    descending: Vec<TrackedPoint>,
    separation: Meter,
}

impl Clusterer {
    pub fn new(
        ascending: Vec<ScattererPoint>,
        descending: Vec<ScattererPoint>,
        separation: Meter,
    ) -> Result<Self, DaisyError> {
        if !(separation.is_finite() && separation > 0.0) {
            return Err(DaisyError::InvalidParameter(format!(
                "cluster separation must be positive and finite, got {separation}"
            )));
        }
        Ok(Clusterer {
            ascending: ascending.into_iter().map(TrackedPoint::from).collect(),
            descending: descending.into_iter().map(TrackedPoint::from).collect(),
            separation,
        })
    }

    /// Number of scatterers not yet assigned to a cluster.
    pub fn remaining(&self) -> usize {
        self.ascending
            .iter()
            .chain(&self.descending)
            .filter(|tp| tp.is_available())
            .count()
    }

    pub fn total(&self) -> usize {
        self.ascending.len() + self.descending.len()
    }
}

impl Iterator for Clusterer {
    type Item = Cluster;

    fn next(&mut self) -> Option<Cluster> {
        let cluster = cluster_one(&mut self.ascending, &mut self.descending, self.separation);
        (!cluster.is_empty()).then_some(cluster)
    }
}

/// Counters of the dominant-point stage.
///
/// Display
/// -----------------
/// * `format!("{}", stats)` – `clusters=12, accepted=9, hermits=3`
/// * `format!("{:#}", stats)` – multi-line summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClusterStats {
    pub clusters: usize,
    pub accepted: usize,
    pub hermits: usize,
}

impl ClusterStats {
    pub fn record(&mut self, outcome: &ClusterOutcome) {
        self.clusters += 1;
        match outcome {
            ClusterOutcome::Accepted(_) => self.accepted += 1,
            ClusterOutcome::Hermit { .. } => self.hermits += 1,
        }
    }
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Clusters of ascending and descending PS - summary")?;
            writeln!(f, "-------------------------------------------------")?;
            writeln!(f, "clusters : {}", self.clusters)?;
            writeln!(f, "accepted : {}", self.accepted)?;
            write!(f, "hermits  : {}", self.hermits)
        } else {
            write!(
                f,
                "clusters={}, accepted={}, hermits={}",
                self.clusters, self.accepted, self.hermits
            )
        }
    }
}
