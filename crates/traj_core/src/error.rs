//! Error types shared by the registry, the driver and the integrator.

use crate::solvers::SolverKind;

/// Failure of a solve or of integrator setup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// The point at `index` could not be finalized; `0..=last_valid` are kept.
    #[error(
        "numeric divergence computing point {index} (dimension {dimension}); last valid point is {last_valid}"
    )]
    NumericDivergence {
        index: usize,
        dimension: usize,
        last_valid: usize,
    },
}

/// Mismatch between the state, the registry and what a solver assumes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("system must have positive dimension")]
    ZeroDimension,

    #[error("state dimension mismatch. Expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("initial state component {index} is not finite")]
    NonFiniteInitialState { index: usize },

    #[error("RHS index {index} is out of range for dimension {dimension}")]
    IndexOutOfRange { index: usize, dimension: usize },

    #[error("RHS slot {index} has no function assigned")]
    UnassignedRhs { index: usize },

    #[error("{solver} solver requires dimension {required}, got {actual}")]
    SolverDimension {
        solver: SolverKind,
        required: usize,
        actual: usize,
    },
}

/// Rejected `(time, step)` pair.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("time horizon must be positive and finite (got {0})")]
    Time(f64),

    #[error("step size must be positive and finite (got {0})")]
    Step(f64),

    #[error("step size {step} exceeds time horizon {time}")]
    StepExceedsTime { step: f64, time: f64 },

    #[error("time horizon {time} with step {step} needs more points than can be addressed")]
    TooManySteps { step: f64, time: f64 },
}

impl SolveError {
    /// Index of the last point that was finalized before the failure, if any.
    pub fn last_valid(&self) -> Option<usize> {
        match self {
            SolveError::NumericDivergence { last_valid, .. } => Some(*last_valid),
            _ => None,
        }
    }

    pub fn is_divergence(&self) -> bool {
        matches!(self, SolveError::NumericDivergence { .. })
    }
}
