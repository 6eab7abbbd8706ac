//! # Orbit files
//!
//! ## Tabular orbit
//!
//! A free-form text file (typically an interferometric processor result file) in
//! which the token `NUMBER_OF_DATAPOINTS:` is followed by the number of state vectors
//! and then by that many `t x y z` rows (time in seconds, ECEF position in meters).
//! Everything before the header and after the last row is ignored.
//!
//! ## Polynomial orbit (`.porb`)
//!
//! ```text
//!   4                                   degree
//!  43140.00000                          t_start
//!  43240.00000                          t_stop
//!  c0 c1 … c4                           X coefficients
//!  c0 c1 … c4                           Y coefficients
//!  c0 c1 … c4                           Z coefficients
//! ```
//!
//! Polynomials are evaluated at `t − t_start`.
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{digit1, multispace0},
    combinator::map_res,
    multi::count,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use crate::daisy_errors::DaisyError;
use crate::orbit::{Axis, OrbitPolynomial, OrbitSample};
use crate::params::MAX_POLY_DEGREE;

const DATAPOINTS_HEADER: &str = "NUMBER_OF_DATAPOINTS:";

fn ws_double(input: &str) -> IResult<&str, f64> {
    preceded(multispace0, double).parse(input)
}

fn ws_usize(input: &str) -> IResult<&str, usize> {
    preceded(multispace0, map_res(digit1, str::parse::<usize>)).parse(input)
}

fn orbit_row(input: &str) -> IResult<&str, OrbitSample> {
    let (input, (t, x, y, z)) = (ws_double, ws_double, ws_double, ws_double).parse(input)?;
    Ok((input, OrbitSample::new(t, x, y, z)))
}

/// Parse the state vectors of a tabular orbit held in memory.
pub fn parse_orbit_samples(content: &str, source: &str) -> Result<Vec<OrbitSample>, DaisyError> {
    let header: IResult<&str, &str> =
        preceded(take_until(DATAPOINTS_HEADER), tag(DATAPOINTS_HEADER)).parse(content);
    let (rest, _) = header.map_err(|_| DaisyError::MissingOrbitHeader(source.to_string()))?;

    let (mut rest, expected) = ws_usize(rest).map_err(|_| {
        let line = content[..content.len() - rest.len()].lines().count();
        DaisyError::Parsing {
            path: source.to_string(),
            line,
            content: rest.lines().next().unwrap_or_default().trim().to_string(),
        }
    })?;

    // the announced count is untrusted: rows are pushed as they parse
    let mut samples = Vec::new();
    while samples.len() < expected {
        match orbit_row(rest) {
            Ok((next, sample)) => {
                samples.push(sample);
                rest = next;
            }
            Err(_) => {
                return Err(DaisyError::TruncatedOrbitFile {
                    expected,
                    found: samples.len(),
                })
            }
        }
    }
    Ok(samples)
}

/// Read the state vectors of a tabular orbit file.
///
/// Errors
/// ----------
/// * [`DaisyError::MissingOrbitHeader`] if `NUMBER_OF_DATAPOINTS:` never appears.
/// * [`DaisyError::TruncatedOrbitFile`] if fewer rows than announced can be read.
pub fn read_orbit_samples(path: &Utf8Path) -> Result<Vec<OrbitSample>, DaisyError> {
    let content = std::fs::read_to_string(path)?;
    parse_orbit_samples(&content, path.as_str())
}

/// Write a polynomial orbit in the `.porb` format.
pub fn write_polynomial(path: &Utf8Path, orbit: &OrbitPolynomial) -> Result<(), DaisyError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{:3}", orbit.degree)?;
    writeln!(out, "{:13.5}", orbit.t_start)?;
    writeln!(out, "{:13.5}", orbit.t_stop)?;
    for axis in Axis::ALL {
        for c in orbit.axis_coeffs(axis) {
            write!(out, " {c:24.16e}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn porb_header(input: &str) -> IResult<&str, (usize, f64, f64)> {
    (ws_usize, ws_double, ws_double).parse(input)
}

/// Parse a `.porb` polynomial orbit held in memory.
///
/// Errors
/// ----------
/// * [`DaisyError::InvalidPolynomialFile`] on a malformed header, a degree above
///   [`MAX_POLY_DEGREE`], a wrong coefficient count or an unordered time window.
pub fn parse_polynomial(content: &str) -> Result<OrbitPolynomial, DaisyError> {
    let (rest, (degree, t_start, t_stop)) = porb_header(content).map_err(|e| {
        DaisyError::InvalidPolynomialFile(format!("expected degree and time window ({e})"))
    })?;

    if degree > MAX_POLY_DEGREE {
        return Err(DaisyError::InvalidPolynomialFile(format!(
            "degree {degree} exceeds {MAX_POLY_DEGREE}"
        )));
    }

    let n_coeffs = 3 * (degree + 1);
    let (rest, coeffs) = count(ws_double, n_coeffs).parse(rest).map_err(|e| {
        DaisyError::InvalidPolynomialFile(format!(
            "expected {n_coeffs} coefficients for degree {degree} ({e})"
        ))
    })?;

    if !rest.trim().is_empty() {
        return Err(DaisyError::InvalidPolynomialFile(format!(
            "unexpected content after the coefficients of a degree {degree} polynomial"
        )));
    }

    let u = degree + 1;
    let axis = |k: usize| coeffs[k * u..(k + 1) * u].to_vec();
    OrbitPolynomial::new([axis(0), axis(1), axis(2)], t_start, t_start, t_stop)
}

/// Read a `.porb` polynomial orbit.
pub fn read_polynomial(path: &Utf8Path) -> Result<OrbitPolynomial, DaisyError> {
    let content = std::fs::read_to_string(path)?;
    parse_polynomial(&content)
}
