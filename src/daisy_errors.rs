use thiserror::Error;

use crate::orbit::Axis;

#[derive(Error, Debug)]
pub enum DaisyError {
    #[error("Normal matrix is not positive definite (pivot {pivot} = {value:e})")]
    SingularMatrix { pivot: usize, value: f64 },

    #[error("Not enough orbit samples: {samples} samples for {unknowns} unknowns")]
    InsufficientSamples { samples: usize, unknowns: usize },

    #[error("Polynomial fit of the {axis} axis failed: {source}")]
    AxisFit {
        axis: Axis,
        #[source]
        source: Box<DaisyError>,
    },

    #[error("Orbit samples are not in ascending time order (sample {index})")]
    UnorderedOrbitSamples { index: usize },

    #[error("Degenerate viewing geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error while parsing {path}, line {line}: {content:?}")]
    Parsing {
        path: String,
        line: usize,
        content: String,
    },

    #[error("NUMBER_OF_DATAPOINTS header not found in orbit file: {0}")]
    MissingOrbitHeader(String),

    #[error("Orbit file announces {expected} data points but only {found} were read")]
    TruncatedOrbitFile { expected: usize, found: usize },

    #[error("Invalid polynomial orbit file: {0}")]
    InvalidPolynomialFile(String),
}

impl PartialEq for DaisyError {
    fn eq(&self, other: &Self) -> bool {
        use DaisyError::*;
        match (self, other) {
            (
                SingularMatrix {
                    pivot: a,
                    value: va,
                },
                SingularMatrix {
                    pivot: b,
                    value: vb,
                },
            ) => a == b && (va == vb || (va.is_nan() && vb.is_nan())),
            (
                InsufficientSamples {
                    samples: sa,
                    unknowns: ua,
                },
                InsufficientSamples {
                    samples: sb,
                    unknowns: ub,
                },
            ) => sa == sb && ua == ub,
            (
                AxisFit {
                    axis: a,
                    source: sa,
                },
                AxisFit {
                    axis: b,
                    source: sb,
                },
            ) => a == b && sa == sb,
            (UnorderedOrbitSamples { index: a }, UnorderedOrbitSamples { index: b }) => a == b,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // io errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            (
                Parsing {
                    path: pa,
                    line: la,
                    content: ca,
                },
                Parsing {
                    path: pb,
                    line: lb,
                    content: cb,
                },
            ) => pa == pb && la == lb && ca == cb,
            (MissingOrbitHeader(a), MissingOrbitHeader(b)) => a == b,
            (
                TruncatedOrbitFile {
                    expected: ea,
                    found: fa,
                },
                TruncatedOrbitFile {
                    expected: eb,
                    found: fb,
                },
            ) => ea == eb && fa == fb,
            (InvalidPolynomialFile(a), InvalidPolynomialFile(b)) => a == b,

            _ => false,
        }
    }
}

impl DaisyError {
    /// `true` for the errors that are tied to one point of a batch (the batch goes on).
    pub fn is_per_point(&self) -> bool {
        matches!(self, DaisyError::DegenerateGeometry(_))
    }
}
