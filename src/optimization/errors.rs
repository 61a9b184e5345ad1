use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Caller input ----
    /// The objective is undefined at the starting point.
    InfeasibleStart,

    /// Starting point / direction dimensions do not agree.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    /// Tolerance needs to be positive and finite.
    InvalidTol {
        tol: f64,
        reason: &'static str,
    },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },

    /// Population size needs to be at least 2.
    InvalidPopSize {
        popsize: usize,
        reason: &'static str,
    },

    /// Problem dimension unsupported by the requested method.
    UnsupportedDimension {
        method: &'static str,
        dim: usize,
        reason: &'static str,
    },

    /// Invalid method name passed to `Method::from_str`.
    InvalidMethod {
        name: String,
        reason: &'static str,
    },

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    // ---- Objective / gradient ----
    /// Objective returned a non-finite value at a feasible point.
    NonFiniteCost {
        value: f64,
    },

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Both endpoints handed to the 1-D line maximizer are infeasible.
    UndefinedLineSegment,

    /// Objective undefined at a point visited by a method that assumes an
    /// unconstrained domain.
    InfeasiblePoint,

    // ---- Solver outcome ----
    /// Best point coordinates must be finite.
    InvalidBestPoint {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Solver finished without producing a best point.
    MissingBestPoint,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Caller input ----
            OptError::InfeasibleStart => {
                write!(f, "Objective is undefined at the starting point")
            }
            OptError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidTol { tol, reason } => {
                write!(f, "Invalid tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidPopSize { popsize, reason } => {
                write!(f, "Invalid population size {popsize}: {reason}")
            }
            OptError::UnsupportedDimension { method, dim, reason } => {
                write!(f, "Method '{method}' cannot handle dimension {dim}: {reason}")
            }
            OptError::InvalidMethod { name, reason } => {
                write!(f, "Invalid method '{name}': {reason}")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }

            // ---- Objective / gradient ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite objective value: {value}")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            OptError::UndefinedLineSegment => {
                write!(f, "Objective is undefined at both endpoints of the line segment")
            }
            OptError::InfeasiblePoint => {
                write!(f, "Objective is undefined at a point visited by an unconstrained method")
            }

            // ---- Solver outcome ----
            OptError::InvalidBestPoint { index, value, reason } => {
                write!(f, "Invalid best point at index {index}: {value}: {reason}")
            }
            OptError::MissingBestPoint => {
                write!(f, "Solver finished without a best point")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
