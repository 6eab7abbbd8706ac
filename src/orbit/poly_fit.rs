//! # Least-squares polynomial fit of tabulated orbits
//!
//! Each Cartesian axis of an orbit arc is fitted independently with
//!
//! ```text
//! o(t) = a0 + a1·t + a2·t² + … + ad·t^d        t = sample.t − samples[0].t
//! ```
//!
//! The normal equations `(AᵗA)·x = Aᵗb` are accumulated sample by sample: the
//! design-matrix row `[t⁰, …, t^d]` is never stored beyond the current sample,
//! `AᵗA` goes straight into a [`PackedSymmetricMatrix`] and `Aᵗb` into a plain
//! vector. The packed matrix is then inverted in place by
//! [`PackedSymmetricMatrix::cholesky_invert`], which also provides the cofactor
//! diagonal used for the coefficient standard deviations.
//!
//! ## Error semantics
//! -----------------
//! * `m ≤ d + 1` samples → [`DaisyError::InsufficientSamples`] (no degree of freedom left).
//! * Singular normal matrix → [`DaisyError::SingularMatrix`]. The fit is aborted; no
//!   default coefficients are ever substituted.
//! * [`fit_orbit`] wraps any axis failure into [`DaisyError::AxisFit`] so the caller
//!   knows which axis broke.
use std::fmt;

use itertools::Itertools;
use log::debug;

use crate::daisy_errors::DaisyError;
use crate::orbit::{Axis, OrbitPolynomial, OrbitSample};
use crate::packed_matrix::PackedSymmetricMatrix;

/// Result of the fit of one axis.
///
/// * `coeffs` – polynomial coefficients, lowest power first.
/// * `sigma0` – a-posteriori standard deviation of unit weight, `sqrt(Σr² / (m − u))`.
/// * `coeff_std` – standard deviation of each coefficient, `sigma0 · sqrt(Q_ii)`.
/// * `samples` – number of samples `m` used by the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisFit {
    pub coeffs: Vec<f64>,
    pub sigma0: f64,
    pub coeff_std: Vec<f64>,
    pub samples: usize,
}

impl AxisFit {
    /// Redundancy `m − u` of the fit (0 for a hand-built fit with too few samples).
    pub fn degrees_of_freedom(&self) -> usize {
        self.samples.saturating_sub(self.coeffs.len())
    }
}

impl fmt::Display for AxisFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mu0 = {:.4}", self.sigma0)?;
        writeln!(f, "          coefficients                  std")?;
        for (j, (c, s)) in self.coeffs.iter().zip(&self.coeff_std).enumerate() {
            writeln!(f, "{j:2} {c:23.15e}   {s:23.15e}")?;
        }
        Ok(())
    }
}

/// Fitted orbit with the statistics of the three axis fits.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitFit {
    pub polynomial: OrbitPolynomial,
    pub axes: [AxisFit; 3],
    pub samples: usize,
}

/// Evaluate `Σ c_j·t^j` with Horner's scheme.
#[inline]
pub(crate) fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Fit one axis of an orbit arc with a polynomial of degree `degree`.
///
/// Arguments
/// -----------------
/// * `samples`: time-ascending orbit samples; the first one defines the time origin.
/// * `degree`: polynomial degree `d` (`d + 1` unknowns).
/// * `axis`: which coordinate of the samples is fitted.
///
/// Return
/// ----------
/// * The [`AxisFit`] (coefficients, `sigma0`, coefficient standard deviations).
///
/// Errors
/// ----------
/// * [`DaisyError::InsufficientSamples`] if `samples.len() ≤ degree + 1`.
/// * [`DaisyError::SingularMatrix`] if the normal matrix is not positive definite
///   (e.g. repeated sample times).
pub fn fit_axis(samples: &[OrbitSample], degree: usize, axis: Axis) -> Result<AxisFit, DaisyError> {
    let m = samples.len();
    let u = degree + 1;
    if m <= u {
        return Err(DaisyError::InsufficientSamples {
            samples: m,
            unknowns: u,
        });
    }

    let t0 = samples[0].t;
    let mut ata = PackedSymmetricMatrix::new(u);
    let mut atl = vec![0.0; u];
    let mut row = vec![0.0; u];

    for sample in samples {
        let t = sample.t - t0;
        let obs = sample.coord(axis);

        let mut power = 1.0;
        for r in row.iter_mut() {
            *r = power;
            power *= t;
        }

        for i in 0..u {
            atl[i] += row[i] * obs;
            for j in i..u {
                ata.add(i, j, row[i] * row[j]);
            }
        }
    }

    ata.cholesky_invert()?;
    let coeffs = ata.mul_vec(&atl);

    let sum_r2: f64 = samples
        .iter()
        .map(|s| {
            let r = horner(&coeffs, s.t - t0) - s.coord(axis);
            r * r
        })
        .sum();
    let sigma0 = (sum_r2 / (m - u) as f64).sqrt();

    let coeff_std = (0..u).map(|i| sigma0 * ata.diagonal(i).sqrt()).collect();

    Ok(AxisFit {
        coeffs,
        sigma0,
        coeff_std,
        samples: m,
    })
}

/// Fit the three axes of an orbit arc and assemble the [`OrbitPolynomial`].
///
/// The three axis fits are independent and share no state. The time origin `t0`
/// and the window `[t_start, t_stop]` are the times of the first and last sample.
///
/// Errors
/// ----------
/// * [`DaisyError::UnorderedOrbitSamples`] if the sample times decrease.
/// * [`DaisyError::AxisFit`] wrapping the failure of the first failing axis.
pub fn fit_orbit(samples: &[OrbitSample], degree: usize) -> Result<OrbitFit, DaisyError> {
    if let Some((index, _)) = samples
        .iter()
        .tuple_windows()
        .enumerate()
        .find(|(_, (a, b))| b.t < a.t)
    {
        return Err(DaisyError::UnorderedOrbitSamples { index: index + 1 });
    }

    let fit = |axis: Axis| {
        fit_axis(samples, degree, axis).map_err(|e| DaisyError::AxisFit {
            axis,
            source: Box::new(e),
        })
    };

    let axes = [fit(Axis::X)?, fit(Axis::Y)?, fit(Axis::Z)?];

    for (axis, axis_fit) in Axis::ALL.iter().zip(&axes) {
        debug!(
            "fit of {axis} coordinates, degree of freedom = {}\n{axis_fit}",
            axis_fit.degrees_of_freedom()
        );
    }

    // `fit_axis` guarantees at least two samples here
    let t_start = samples[0].t;
    let t_stop = samples[samples.len() - 1].t;
    let polynomial = OrbitPolynomial::new(
        [
            axes[0].coeffs.clone(),
            axes[1].coeffs.clone(),
            axes[2].coeffs.clone(),
        ],
        t_start,
        t_start,
        t_stop,
    )?;

    Ok(OrbitFit {
        polynomial,
        axes,
        samples: samples.len(),
    })
}

#[cfg(test)]
mod poly_fit_test {
    use super::*;
    use approx::assert_relative_eq;

    fn samples_from(coeffs: [&[f64]; 3], times: &[f64]) -> Vec<OrbitSample> {
        let t0 = times[0];
        times
            .iter()
            .map(|&t| {
                OrbitSample::new(
                    t,
                    horner(coeffs[0], t - t0),
                    horner(coeffs[1], t - t0),
                    horner(coeffs[2], t - t0),
                )
            })
            .collect()
    }

    #[test]
    fn test_horner() {
        assert_eq!(horner(&[1.0, 2.0, 3.0], 2.0), 17.0);
        assert_eq!(horner(&[], 2.0), 0.0);
    }

    #[test]
    fn test_exact_cubic() {
        let times: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let c = [12.5, -3.0, 0.75, 0.02];
        let samples = samples_from([&c, &c, &c], &times);

        let fit = fit_axis(&samples, 3, Axis::Y).unwrap();
        for (got, want) in fit.coeffs.iter().zip(c) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        assert!(fit.sigma0 < 1e-9);
        assert!(fit.coeff_std.iter().all(|s| *s < 1e-9));
        assert_eq!(fit.samples, 10);
        assert_eq!(fit.degrees_of_freedom(), 6);
    }

    #[test]
    fn test_axis_fit_display_and_redundancy() {
        let fit = AxisFit {
            coeffs: vec![1.5, -0.25],
            sigma0: 0.125,
            coeff_std: vec![0.5, 0.0625],
            samples: 1,
        };
        assert_eq!(fit.degrees_of_freedom(), 0);
        let lines = [
            "mu0 = 0.1250",
            "          coefficients                  std",
            " 0     1.500000000000000e0      5.000000000000000e-1",
            " 1   -2.500000000000000e-1      6.250000000000000e-2",
        ];
        assert_eq!(format!("{fit}"), lines.join("\n") + "\n");
    }

    #[test]
    fn test_noisy_line_statistics() {
        // alternating ±1 residuals around y = 2 + 0.5 t
        let samples: Vec<OrbitSample> = (0..8)
            .map(|i| {
                let t = i as f64;
                let noise = if i % 2 == 0 { 1.0 } else { -1.0 };
                OrbitSample::new(t, 2.0 + 0.5 * t + noise, 0.0, 0.0)
            })
            .collect();

        let fit = fit_axis(&samples, 1, Axis::X).unwrap();
        assert!(fit.sigma0 > 0.9 && fit.sigma0 < 1.2);
        assert!(fit.coeff_std[0] > fit.coeff_std[1]);
        assert_relative_eq!(fit.coeffs[1], 0.5, epsilon = 0.2);
    }

    #[test]
    fn test_insufficient_samples() {
        let samples: Vec<OrbitSample> = (0..5)
            .map(|i| OrbitSample::new(i as f64, 1.0, 2.0, 3.0))
            .collect();

        assert_eq!(
            fit_axis(&samples, 4, Axis::X),
            Err(DaisyError::InsufficientSamples {
                samples: 5,
                unknowns: 5
            })
        );
        assert_eq!(
            fit_axis(&[], 0, Axis::Z),
            Err(DaisyError::InsufficientSamples {
                samples: 0,
                unknowns: 1
            })
        );
    }

    #[test]
    fn test_repeated_times_are_singular() {
        let samples: Vec<OrbitSample> = (0..6)
            .map(|i| OrbitSample::new(10.0, i as f64, 0.0, 0.0))
            .collect();

        let err = fit_axis(&samples, 2, Axis::X).unwrap_err();
        assert!(matches!(err, DaisyError::SingularMatrix { .. }));
    }

    #[test]
    fn test_fit_orbit_wraps_axis() {
        let samples: Vec<OrbitSample> = (0..3)
            .map(|i| OrbitSample::new(i as f64, 1.0, 2.0, 3.0))
            .collect();

        match fit_orbit(&samples, 2) {
            Err(DaisyError::AxisFit { axis, source }) => {
                assert_eq!(axis, Axis::X);
                assert_eq!(
                    *source,
                    DaisyError::InsufficientSamples {
                        samples: 3,
                        unknowns: 3
                    }
                );
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_fit_orbit_unordered() {
        let samples = vec![
            OrbitSample::new(0.0, 1.0, 1.0, 1.0),
            OrbitSample::new(10.0, 1.0, 1.0, 1.0),
            OrbitSample::new(5.0, 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            fit_orbit(&samples, 1),
            Err(DaisyError::UnorderedOrbitSamples { index: 2 })
        );
    }

    #[test]
    fn test_fit_orbit_window() {
        let times: Vec<f64> = (0..11).map(|i| 43_140.0 + 10.0 * i as f64).collect();
        let cx = [7_078_137.0, 0.0];
        let cy = [-261_100.0, 7_000.0];
        let cz = [1_000.0, -3.0];
        let samples = samples_from([&cx, &cy, &cz], &times);

        let fit = fit_orbit(&samples, 1).unwrap();
        assert_eq!(fit.samples, 11);
        assert_eq!(fit.polynomial.degree, 1);
        assert_eq!(fit.polynomial.t0, 43_140.0);
        assert_eq!(fit.polynomial.t_start, 43_140.0);
        assert_eq!(fit.polynomial.t_stop, 43_240.0);
        assert_relative_eq!(fit.polynomial.coeffs[1][1], 7_000.0, epsilon = 1e-6);
        assert_relative_eq!(fit.polynomial.coeffs[2][0], 1_000.0, epsilon = 1e-6);
    }
}
