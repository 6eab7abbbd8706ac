//! # Packed symmetric matrices and in-place Cholesky inversion
//!
//! A symmetric `n×n` matrix is stored as its `n(n+1)/2` distinct elements in a
//! flat, owned buffer. Element `(i, j)` lives at index [`plc(i, j)`](plc), which is
//! symmetric in its arguments:
//!
//! ```text
//!          column j →
//!   row i   0  1  3  6
//!     ↓        2  4  7
//!                 5  8
//!                    9
//! ```
//!
//! Every piece of code touching a packed matrix (normal-equation builder, solver,
//! statistics) goes through [`plc`]; there is no other addressing scheme.
//!
//! The solver [`PackedSymmetricMatrix::cholesky_invert`] is meant for the small,
//! well-conditioned normal matrices of the orbit polynomial fit. It is not a
//! general linear-algebra routine.
use nalgebra::DMatrix;

use crate::daisy_errors::DaisyError;

/// Position of element `(i, j)` of a symmetric matrix stored as a packed triangle.
///
/// The function is symmetric: `plc(i, j) == plc(j, i)`.
#[inline]
pub fn plc(i: usize, j: usize) -> usize {
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    hi * (hi + 1) / 2 + lo
}

/// Symmetric matrix stored as a packed triangle (see [`plc`]).
#[derive(Debug, Clone, PartialEq)]
pub struct PackedSymmetricMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PackedSymmetricMatrix {
    /// Zero matrix of dimension `n`.
    pub fn new(n: usize) -> Self {
        PackedSymmetricMatrix {
            n,
            data: vec![0.0; n * (n + 1) / 2],
        }
    }

    /// Pack the upper triangle of a square dense matrix.
    ///
    /// Only elements `(i, j)` with `i ≤ j` are read; the matrix is assumed symmetric.
    pub fn from_dense(dense: &DMatrix<f64>) -> Result<Self, DaisyError> {
        if !dense.is_square() {
            return Err(DaisyError::InvalidParameter(format!(
                "cannot pack a non-square {}x{} matrix",
                dense.nrows(),
                dense.ncols()
            )));
        }
        let n = dense.nrows();
        let mut packed = Self::new(n);
        for j in 0..n {
            for i in 0..=j {
                packed.set(i, j, dense[(i, j)]);
            }
        }
        Ok(packed)
    }

    /// Expand into a full dense matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n, self.n, |i, j| self.get(i, j))
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[plc(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[plc(i, j)] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self.data[plc(i, j)] += value;
    }

    #[inline]
    pub fn diagonal(&self, i: usize) -> f64 {
        self.data[plc(i, i)]
    }

    /// Product of the (full, symmetric) matrix with a vector.
    ///
    /// # Panics
    ///
    /// Panics if `v.len()` differs from the matrix dimension.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.n, "dimension mismatch in mul_vec");
        (0..self.n)
            .map(|i| (0..self.n).map(|j| self.get(i, j) * v[j]).sum())
            .collect()
    }

    /// Replace the matrix by its inverse using an in-place Cholesky decomposition.
    ///
    /// The routine runs in three passes over the packed triangle:
    ///
    /// 1. factorization `A = RᵀR` (`R` upper triangular, stored in place),
    /// 2. inversion of `R` row by row,
    /// 3. multiply-back `A⁻¹ = R⁻¹ R⁻ᵀ`.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` – the buffer now holds the inverse of the original matrix.
    /// * `Err(DaisyError::SingularMatrix)` – a pivot was `≤ 0` (or NaN): the matrix is
    ///   not positive definite. The buffer content is then unspecified.
    pub fn cholesky_invert(&mut self) -> Result<(), DaisyError> {
        let n = self.n;
        let q = &mut self.data;

        // factorization
        for i in 0..n {
            let pivot = q[plc(i, i)];
            if !(pivot > 0.0) {
                return Err(DaisyError::SingularMatrix { pivot: i, value: pivot });
            }
            let sqr = pivot.sqrt();

            for k in i..n {
                q[plc(i, k)] /= sqr;
            }

            for j in i + 1..n {
                for k in j..n {
                    q[plc(j, k)] -= q[plc(i, j)] * q[plc(i, k)];
                }
            }
        }

        // inversion of the triangular factor
        for i in 0..n {
            let ia = plc(i, i);
            q[ia] = 1.0 / q[ia];

            for j in i + 1..n {
                let sum: f64 = (i..j).map(|k| q[plc(i, k)] * q[plc(k, j)]).sum();
                q[plc(i, j)] = -sum / q[plc(j, j)];
            }
        }

        // multiply back
        for i in 0..n {
            for k in i..n {
                let sum: f64 = (k..n).map(|j| q[plc(i, j)] * q[plc(k, j)]).sum();
                q[plc(i, k)] = sum;
            }
        }

        Ok(())
    }
}
