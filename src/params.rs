//! # Processing parameters
//!
//! [`DaisyParams`] gathers the tunable values of the pipeline stages. Build it with
//! [`DaisyParams::default`] or through the validating [`DaisyParamsBuilder`]:
//!
//! ```rust,no_run
//! use daisy::params::DaisyParams;
//!
//! let params = DaisyParams::builder()
//!     .separation(80.0)
//!     .poly_degree(3)
//!     .build()
//!     .unwrap();
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use crate::constants::{Meter, MmPerYear};
use crate::daisy_errors::DaisyError;

/// Largest polynomial degree accepted for the orbit fit.
pub const MAX_POLY_DEGREE: usize = 10;

/// Tunable parameters of the processing chain.
///
/// Fields
/// -----------------
/// * `separation` – scatterer separation in meters, used by the adjacent-PS selection
///   and as cluster size by the dominant-point stage.
/// * `poly_degree` – degree of the orbit polynomials.
/// * `max_iter` – iteration cap of the closest-approach bisection.
/// * `zero_threshold` – velocity magnitude (mm/year) at or below which an integrated
///   point is considered motionless.
///
/// Defaults
/// -----------------
/// * `separation`: 100 m
/// * `poly_degree`: 4
/// * `max_iter`: 1000
/// * `zero_threshold`: 0.6 mm/year
#[derive(Debug, Clone, PartialEq)]
pub struct DaisyParams {
    pub separation: Meter,
    pub poly_degree: usize,
    pub max_iter: usize,
    pub zero_threshold: MmPerYear,
}

impl DaisyParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent builder starting from the default values.
    pub fn builder() -> DaisyParamsBuilder {
        DaisyParamsBuilder::new()
    }
}

impl Default for DaisyParams {
    fn default() -> Self {
        DaisyParams {
            separation: 100.0,
            poly_degree: 4,
            max_iter: 1000,
            zero_threshold: 0.6,
        }
    }
}

/// Builder for [`DaisyParams`], with validation.
#[derive(Debug, Clone)]
pub struct DaisyParamsBuilder {
    params: DaisyParams,
}

impl Default for DaisyParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DaisyParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: DaisyParams::default(),
        }
    }

    pub fn separation(mut self, v: Meter) -> Self {
        self.params.separation = v;
        self
    }

    pub fn poly_degree(mut self, v: usize) -> Self {
        self.params.poly_degree = v;
        self
    }

    pub fn max_iter(mut self, v: usize) -> Self {
        self.params.max_iter = v;
        self
    }

    pub fn zero_threshold(mut self, v: MmPerYear) -> Self {
        self.params.zero_threshold = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Validate and produce the [`DaisyParams`].
    ///
    /// Validation rules
    /// -----------------
    /// * `separation` finite and `> 0`.
    /// * `1 ≤ poly_degree ≤ 10` (a constant orbit has no velocity).
    /// * `max_iter ≥ 1`.
    /// * `zero_threshold` finite and `≥ 0`.
    pub fn build(self) -> Result<DaisyParams, DaisyError> {
        let p = &self.params;

        if !(Self::gt0(p.separation) && p.separation.is_finite()) {
            return Err(DaisyError::InvalidParameter(
                "separation must be finite and > 0".into(),
            ));
        }
        if !(1..=MAX_POLY_DEGREE).contains(&p.poly_degree) {
            return Err(DaisyError::InvalidParameter(format!(
                "poly_degree must be in [1, {MAX_POLY_DEGREE}]"
            )));
        }
        if p.max_iter == 0 {
            return Err(DaisyError::InvalidParameter(
                "max_iter must be >= 1".into(),
            ));
        }
        if !(Self::ge0(p.zero_threshold) && p.zero_threshold.is_finite()) {
            return Err(DaisyError::InvalidParameter(
                "zero_threshold must be finite and >= 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for DaisyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "DAISY processing parameters")?;
            writeln!(f, "---------------------------")?;
            writeln!(f, "  separation     = {:.1} m         # PS separation / cluster size", self.separation)?;
            writeln!(f, "  poly_degree    = {}               # degree of the orbit polynomials", self.poly_degree)?;
            writeln!(f, "  max_iter       = {}            # closest-approach iterations", self.max_iter)?;
            write!(f, "  zero_threshold = {:.2} mm/year  # zero-velocity criterion", self.zero_threshold)
        } else {
            write!(
                f,
                "DaisyParams(separation={:.1}m, poly_degree={}, max_iter={}, zero_threshold={:.2}mm/y)",
                self.separation, self.poly_degree, self.max_iter, self.zero_threshold
            )
        }
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = DaisyParams::default();
        assert_eq!(p.separation, 100.0);
        assert_eq!(p.poly_degree, 4);
        assert_eq!(p.max_iter, 1000);
        assert_eq!(p.zero_threshold, 0.6);
        assert_eq!(DaisyParams::builder().build().unwrap(), p);
        assert_eq!(
            format!("{p}"),
            "DaisyParams(separation=100.0m, poly_degree=4, max_iter=1000, zero_threshold=0.60mm/y)"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let p = DaisyParams::builder()
            .separation(50.0)
            .poly_degree(3)
            .max_iter(200)
            .zero_threshold(0.0)
            .build()
            .unwrap();
        assert_eq!(p.separation, 50.0);
        assert_eq!(p.poly_degree, 3);
        assert_eq!(p.max_iter, 200);
        assert_eq!(p.zero_threshold, 0.0);
    }

    #[test]
    fn test_builder_validation() {
        let invalid = [
            DaisyParams::builder().separation(0.0),
            DaisyParams::builder().separation(f64::NAN),
            DaisyParams::builder().separation(f64::INFINITY),
            DaisyParams::builder().poly_degree(0),
            DaisyParams::builder().poly_degree(11),
            DaisyParams::builder().max_iter(0),
            DaisyParams::builder().zero_threshold(-0.1),
            DaisyParams::builder().zero_threshold(f64::NAN),
        ];
        for builder in invalid {
            assert!(matches!(
                builder.build(),
                Err(DaisyError::InvalidParameter(_))
            ));
        }
    }
}
