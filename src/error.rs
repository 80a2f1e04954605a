use core::fmt;
use thiserror::Error;

/// Result alias for `spendnet`.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a flow record was rejected at the graph boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFault {
    /// Weight was zero or negative.
    NonPositiveWeight,
    /// Weight was NaN or infinite.
    NonFiniteWeight,
    /// One of the labels was empty.
    EmptyLabel,
    /// Both endpoints carry the same label.
    SelfLoop,
    /// Adding the weight would push the graph's total out of `f64` range.
    TotalOverflow,
}

impl fmt::Display for EdgeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            EdgeFault::NonPositiveWeight => "weight must be positive",
            EdgeFault::NonFiniteWeight => "weight must be finite",
            EdgeFault::EmptyLabel => "labels must be non-empty",
            EdgeFault::SelfLoop => "endpoints must differ",
            EdgeFault::TotalOverflow => "total weight would overflow",
        };
        f.write_str(msg)
    }
}

/// Errors returned by graph construction and analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A flow record failed validation.
    #[error("invalid edge #{position} ({source_label:?} -- {target_label:?}, weight {weight}): {reason}")]
    InvalidEdge {
        /// Zero-based position of the record in the builder's input.
        position: usize,
        /// First endpoint as supplied.
        source_label: String,
        /// Second endpoint as supplied.
        target_label: String,
        /// Weight as supplied.
        weight: f64,
        /// What was wrong with it.
        reason: EdgeFault,
    },

    /// No nodes were supplied.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}
