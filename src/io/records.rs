//! Dominant-point and integrated-velocity record files.
//!
//! Both are five-column files (`lon lat h` in degrees/meters, then two velocities in
//! mm/year):
//!
//! * dominant points: `lon lat h v_asc v_dsc`
//! * integrated velocities: `lon lat h east up`
use std::io::Write;

use camino::Utf8Path;

use crate::constants::{Degree, Meter, MmPerYear};
use crate::daisy_errors::DaisyError;
use crate::decomposition::GroundMotion;
use crate::io::{read_records, write_records};
use crate::scatterers::dominant::DominantPoint;

/// East/up velocity of a dominant point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRecord {
    pub lon: Degree,
    pub lat: Degree,
    pub h: Meter,
    pub east: MmPerYear,
    pub up: MmPerYear,
}

impl VelocityRecord {
    pub fn new(point: &DominantPoint, motion: GroundMotion) -> Self {
        VelocityRecord {
            lon: point.lon,
            lat: point.lat,
            h: point.h,
            east: motion.east,
            up: motion.up,
        }
    }

    pub fn motion(&self) -> GroundMotion {
        GroundMotion {
            east: self.east,
            up: self.up,
        }
    }
}

pub fn read_dominant_points(path: &Utf8Path) -> Result<Vec<DominantPoint>, DaisyError> {
    read_records(path, 5, |v| DominantPoint {
        lon: v[0],
        lat: v[1],
        h: v[2],
        asc_velocity: v[3],
        dsc_velocity: v[4],
    })
}

pub fn write_dominant_points(path: &Utf8Path, points: &[DominantPoint]) -> Result<(), DaisyError> {
    write_records(path, points, |out, p| {
        writeln!(
            out,
            "{:16.9e} {:16.9e} {:10.4} {:9.4} {:9.4}",
            p.lon, p.lat, p.h, p.asc_velocity, p.dsc_velocity
        )
    })
}

pub fn read_velocity_records(path: &Utf8Path) -> Result<Vec<VelocityRecord>, DaisyError> {
    read_records(path, 5, |v| VelocityRecord {
        lon: v[0],
        lat: v[1],
        h: v[2],
        east: v[3],
        up: v[4],
    })
}

pub fn write_velocity_records(path: &Utf8Path, records: &[VelocityRecord]) -> Result<(), DaisyError> {
    write_records(path, records, |out, r| {
        writeln!(
            out,
            "{:16.9e} {:16.9e} {:10.4} {:9.4} {:9.4}",
            r.lon, r.lat, r.h, r.east, r.up
        )
    })
}
