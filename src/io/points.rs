//! Per-track scatterer files: `lon lat velocity height height_correction`.
//!
//! Longitude and latitude are in degrees, velocity in mm/year, heights in meters. The
//! two height columns are summed once at ingestion.
//!
//! [`write_points`] therefore does not reproduce the two input height columns: it
//! writes the summed height followed by a `0` correction. Reading the file back gives
//! the same corrected height.
use std::io::Write;

use camino::Utf8Path;

use crate::daisy_errors::DaisyError;
use crate::io::{read_records, write_records};
use crate::scatterers::{ScattererPoint, Track};

pub fn read_points(path: &Utf8Path, track: Track) -> Result<Vec<ScattererPoint>, DaisyError> {
    read_records(path, 5, |v| ScattererPoint::new(v[0], v[1], v[3] + v[4], v[2], track))
}

/// Write scatterers back in the five-column layout, with a zero height correction.
pub fn write_points(path: &Utf8Path, points: &[ScattererPoint]) -> Result<(), DaisyError> {
    write_records(path, points, |out, p| {
        writeln!(
            out,
            "{:16.9e} {:16.9e} {:16.7e} {:16.7e} {:16.7e}",
            p.lon, p.lat, p.los_velocity, p.h, 0.0
        )
    })
}
