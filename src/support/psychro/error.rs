use thiserror::Error;

/// Errors that can occur while resolving a moist-air state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PsychroError {
    /// The supplied properties are malformed or insufficient.
    ///
    /// Raised for non-positive pressure, fewer than two independent
    /// properties, relative humidity outside `[0, 1]`, a negative humidity
    /// ratio, or a temperature outside the correlation domain.
    #[error("invalid input: {context}")]
    InvalidInput { context: String },

    /// The supplied properties are individually valid but describe no
    /// physical state, or disagree with each other.
    #[error("inconsistent state: {context}")]
    InconsistentState { context: String },

    /// An iterative inversion did not converge.
    #[error("convergence failure: {context}")]
    Convergence { context: String },
}

impl PsychroError {
    /// Creates a [`PsychroError::InvalidInput`] error with the given context.
    pub fn invalid_input(context: impl Into<String>) -> Self {
        Self::InvalidInput {
            context: context.into(),
        }
    }

    /// Creates a [`PsychroError::InconsistentState`] error with the given context.
    pub fn inconsistent(context: impl Into<String>) -> Self {
        Self::InconsistentState {
            context: context.into(),
        }
    }

    /// Creates a [`PsychroError::Convergence`] error with the given context.
    pub fn convergence(context: impl Into<String>) -> Self {
        Self::Convergence {
            context: context.into(),
        }
    }
}
