//! # Processing stages
//!
//! The five stages of the processing chain, each reading its inputs from files and
//! writing its outputs to files:
//!
//! | Stage            | Inputs                                   | Outputs                        |
//! |------------------|------------------------------------------|--------------------------------|
//! | [`data_select`]  | ascending / descending PS files          | adjacent PS of both tracks     |
//! | [`dominant`]     | ascending / descending PS files          | dominant points                |
//! | [`poly_orbit`]   | tabular orbit file                       | `.porb` polynomial orbit       |
//! | [`integrate`]    | dominant points, two `.porb` files       | east/up velocities             |
//! | [`zero_select`]  | east/up velocities                       | zero and target velocities     |
//!
//! Every stage logs a banner and its statistics through the [`log`] facade (install
//! any logger to see them) and, with the `progress` feature, renders a progress bar
//! for its main loop.
//!
//! ## Failure policy
//!
//! File and fit errors abort the stage. In [`integrate`] a point whose viewing
//! geometry is degenerate is logged, counted in [`IntegrateReport::degenerate`] and left
//! out of the output; the other points are processed normally.
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use rayon::prelude::*;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

use crate::daisy_errors::DaisyError;
use crate::decomposition::{decompose, partition_by_magnitude, LosObservation};
use crate::io::orbit_file::{read_orbit_samples, read_polynomial, write_polynomial};
use crate::io::points::{read_points, write_points};
use crate::io::records::{
    read_dominant_points, read_velocity_records, write_dominant_points, write_velocity_records,
    VelocityRecord,
};
use crate::orbit::poly_fit::{fit_orbit, OrbitFit};
use crate::orbit::{Axis, OrbitPolynomial};
use crate::params::DaisyParams;
use crate::scatterers::cluster::{ClusterStats, Clusterer};
use crate::scatterers::dominant::{ClusterOutcome, DominantPoint};
use crate::scatterers::select::select_adjacent;
use crate::scatterers::{ScattererPoint, Track};

#[cfg(feature = "progress")]
fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new((total as u64).max(1));
    pb.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
        )
        .expect("indicatif template"),
    );
    pb.enable_steady_tick(Duration::from_millis(200));
    pb
}

fn log_track_sizes(in_asc: &Utf8Path, asc: &[ScattererPoint], in_dsc: &Utf8Path, dsc: &[ScattererPoint]) {
    for (path, points, track) in [
        (in_asc, asc, Track::Ascending),
        (in_dsc, dsc, Track::Descending),
    ] {
        info!("{track} track: {} PSs read from {path}", points.len());
    }
}

/// Path of the polynomial orbit written for a tabular orbit file (`.porb` extension).
pub fn porb_path_for(path: &Utf8Path) -> Utf8PathBuf {
    path.with_extension("porb")
}

/// Scatterer counts of the adjacent-PS selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionReport {
    pub asc_read: usize,
    pub dsc_read: usize,
    pub asc_selected: usize,
    pub dsc_selected: usize,
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ascending {}/{} selected, descending {}/{} selected",
            self.asc_selected, self.asc_read, self.dsc_selected, self.dsc_read
        )
    }
}

/// Keep the scatterers of each track that have a neighbour on the other track.
///
/// The ascending scatterers are selected against the whole descending track, then the
/// descending scatterers against the **selected** ascending ones. The separation is
/// [`DaisyParams::separation`].
pub fn data_select(
    in_asc: &Utf8Path,
    in_dsc: &Utf8Path,
    out_asc: &Utf8Path,
    out_dsc: &Utf8Path,
    params: &DaisyParams,
) -> Result<SelectionReport, DaisyError> {
    info!("data_select: adjacent ascending and descending PSs are selected");
    info!("approximate PS separation {:.1} m", params.separation);

    let asc = read_points(in_asc, Track::Ascending)?;
    let dsc = read_points(in_dsc, Track::Descending)?;
    log_track_sizes(in_asc, &asc, in_dsc, &dsc);

    let asc_selected = select_adjacent(&asc, &dsc, params.separation);
    write_points(out_asc, &asc_selected)?;

    let dsc_selected = select_adjacent(&dsc, &asc_selected, params.separation);
    write_points(out_dsc, &dsc_selected)?;

    let report = SelectionReport {
        asc_read: asc.len(),
        dsc_read: dsc.len(),
        asc_selected: asc_selected.len(),
        dsc_selected: dsc_selected.len(),
    };
    info!("{report}");
    Ok(report)
}

/// Cluster the two tracks and write the dominant point of every accepted cluster.
///
/// Return
/// ----------
/// * The [`ClusterStats`] (clusters, accepted, hermits).
pub fn dominant(
    in_asc: &Utf8Path,
    in_dsc: &Utf8Path,
    out: &Utf8Path,
    params: &DaisyParams,
) -> Result<ClusterStats, DaisyError> {
    info!("dominant: clusters of ascending and descending PSs and their dominant points");
    info!("approximate cluster size {:.1} m", params.separation);

    let asc = read_points(in_asc, Track::Ascending)?;
    let dsc = read_points(in_dsc, Track::Descending)?;
    log_track_sizes(in_asc, &asc, in_dsc, &dsc);

    let clusterer = Clusterer::new(asc, dsc, params.separation)?;

    #[cfg(feature = "progress")]
    let pb = progress_bar(clusterer.total());

    let mut stats = ClusterStats::default();
    let mut points: Vec<DominantPoint> = Vec::new();

    for cluster in clusterer {
        #[cfg(feature = "progress")]
        pb.inc(cluster.len() as u64);

        if let Some(outcome) = cluster.outcome() {
            stats.record(&outcome);
            if let ClusterOutcome::Accepted(point) = outcome {
                points.push(point);
            }
        }
    }

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    write_dominant_points(out, &points)?;

    info!("{stats:#}");
    info!("{} dominant points written to {out}", points.len());
    Ok(stats)
}

/// Fit the polynomial orbit of a tabular orbit file and write it as `.porb`.
///
/// The degree is [`DaisyParams::poly_degree`]. See [`porb_path_for`] for the
/// conventional output name.
pub fn poly_orbit(
    in_orbit: &Utf8Path,
    out_porb: &Utf8Path,
    params: &DaisyParams,
) -> Result<OrbitFit, DaisyError> {
    info!("poly_orbit: tabular orbit data are converted to polynomials");
    info!("input: {in_orbit}, output: {out_porb}, degree: {}", params.poly_degree);

    let samples = read_orbit_samples(in_orbit)?;
    let fit = fit_orbit(&samples, params.poly_degree)?;
    write_polynomial(out_porb, &fit.polynomial)?;
    info!("{}", fit.polynomial);
    debug!("{:#}", fit.polynomial);

    for (axis, axis_fit) in Axis::ALL.iter().zip(&fit.axes) {
        info!(
            "fit of {axis} coordinates: mu0 = {:.4} m, {} samples",
            axis_fit.sigma0, fit.samples
        );
    }
    Ok(fit)
}

/// East/up velocity of one dominant point seen from two polynomial orbits.
///
/// Errors
/// ----------
/// * [`DaisyError::DegenerateGeometry`] when the two viewing geometries cannot be
///   separated.
pub fn integrate_point(
    point: &DominantPoint,
    asc_orbit: &OrbitPolynomial,
    dsc_orbit: &OrbitPolynomial,
    max_iter: usize,
) -> Result<VelocityRecord, DaisyError> {
    let ground = point.geo_point();
    let asc = asc_orbit.azimuth_incidence(&ground, max_iter);
    let dsc = dsc_orbit.azimuth_incidence(&ground, max_iter);

    let motion = decompose(
        &LosObservation::new(asc.azimuth, asc.incidence, point.asc_velocity),
        &LosObservation::new(dsc.azimuth, dsc.incidence, point.dsc_velocity),
    )?;
    Ok(VelocityRecord::new(point, motion))
}

/// Outcome counts of [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrateReport {
    pub written: usize,
    pub degenerate: usize,
}

impl fmt::Display for IntegrateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "written={}, degenerate={}", self.written, self.degenerate)
    }
}

/// Compute the east/up velocities of every dominant point.
///
/// Points are independent and processed in parallel; the output keeps the input order.
pub fn integrate(
    in_dominant: &Utf8Path,
    asc_porb: &Utf8Path,
    dsc_porb: &Utf8Path,
    out: &Utf8Path,
    params: &DaisyParams,
) -> Result<IntegrateReport, DaisyError> {
    info!("integrate: east-west and up-down velocities of the dominant points");
    info!("inputs: {in_dominant}, {asc_porb}, {dsc_porb}; output: {out}");

    let asc_orbit = read_polynomial(asc_porb)?;
    let dsc_orbit = read_polynomial(dsc_porb)?;
    let points = read_dominant_points(in_dominant)?;

    #[cfg(feature = "progress")]
    let pb = progress_bar(points.len());

    let results: Vec<Result<VelocityRecord, DaisyError>> = points
        .par_iter()
        .map(|point| {
            let record = integrate_point(point, &asc_orbit, &dsc_orbit, params.max_iter);
            #[cfg(feature = "progress")]
            pb.inc(1);
            record
        })
        .collect();

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    let mut report = IntegrateReport::default();
    let mut records = Vec::with_capacity(results.len());
    for (index, (point, result)) in points.iter().zip(results).enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) if e.is_per_point() => {
                warn!(
                    "dominant point {index} ({:.7}, {:.7}) skipped: {e}",
                    point.lon, point.lat
                );
                report.degenerate += 1;
            }
            Err(e) => return Err(e),
        }
    }

    write_velocity_records(out, &records)?;
    report.written = records.len();

    info!("{report}");
    Ok(report)
}

/// Counts of the zero-velocity selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZeroSelectReport {
    pub zero: usize,
    pub target: usize,
}

impl fmt::Display for ZeroSelectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zero dominant DSs {}, target DSs {}", self.zero, self.target)
    }
}

/// Split integrated velocities into near-zero and target files.
///
/// A point goes to `out_zero` when `sqrt(east² + up²) ≤ params.zero_threshold`.
pub fn zero_select(
    in_integrated: &Utf8Path,
    out_zero: &Utf8Path,
    out_target: &Utf8Path,
    params: &DaisyParams,
) -> Result<ZeroSelectReport, DaisyError> {
    info!("zero_select: integrated DSs with nearly zero velocity");
    info!("zero DSs <= {:.1} mm/year", params.zero_threshold);

    let records = read_velocity_records(in_integrated)?;
    let (zero, target) = partition_by_magnitude(records, params.zero_threshold);

    write_velocity_records(out_zero, &zero)?;
    write_velocity_records(out_target, &target)?;

    let report = ZeroSelectReport {
        zero: zero.len(),
        target: target.len(),
    };
    info!("{report}");
    Ok(report)
}
