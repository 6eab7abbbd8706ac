//! # Text record formats
//!
//! All files are whitespace-separated ASCII. Record files (`points`, `records`) hold
//! one record per line; blank lines and lines starting with `#` are skipped. Orbit
//! files are token streams (see [`orbit_file`]).
//!
//! | Module                              | Format                                    |
//! |-------------------------------------|-------------------------------------------|
//! | [`points`](crate::io::points)       | `lon lat velocity height height_corr`     |
//! | [`orbit_file`](crate::io::orbit_file) | tabular orbit, polynomial orbit (`.porb`) |
//! | [`records`](crate::io::records)     | dominant points, integrated velocities    |
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use nom::{
    character::complete::space0,
    multi::count,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::daisy_errors::DaisyError;

pub mod orbit_file;
pub mod points;
pub mod records;

/// Parse exactly `n` floating point columns separated by blanks.
pub(crate) fn parse_columns(input: &str, n: usize) -> IResult<&str, Vec<f64>> {
    terminated(count(preceded(space0, double), n), space0).parse(input)
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Read a line-oriented record file.
///
/// Every kept line must contain exactly `columns` numbers; `build` turns them into a
/// record. A malformed line stops the read with [`DaisyError::Parsing`] (1-based line
/// number).
pub(crate) fn read_records<T, F>(path: &Utf8Path, columns: usize, build: F) -> Result<Vec<T>, DaisyError>
where
    F: Fn(&[f64]) -> T,
{
    let content = std::fs::read_to_string(path)?;

    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !is_skipped(line))
        .map(|(i, line)| match parse_columns(line, columns) {
            Ok(("", values)) => Ok(build(&values)),
            _ => Err(DaisyError::Parsing {
                path: path.to_string(),
                line: i + 1,
                content: line.to_string(),
            }),
        })
        .collect()
}

/// Write one line per record with `format`, through a buffered writer.
pub(crate) fn write_records<T, F>(path: &Utf8Path, records: &[T], format: F) -> Result<(), DaisyError>
where
    F: Fn(&mut BufWriter<File>, &T) -> std::io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    for record in records {
        format(&mut out, record)?;
    }
    out.flush()?;
    Ok(())
}
