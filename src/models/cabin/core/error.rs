use thiserror::Error;

use crate::support::{constraint::ConstraintError, psychro::PsychroError};

/// Errors that can occur while solving the cabin loop.
#[derive(Debug, Error)]
pub enum CabinError {
    /// A configuration or input value violates its constraint.
    #[error("invalid value for `{field}`")]
    InvalidInput {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// A humidity ratio could not be derived from a temperature and
    /// relative humidity.
    #[error("psychrometric evaluation failed")]
    Psychro(#[from] PsychroError),

    /// The loop equations have no unique solution.
    #[error("cabin loop equations are singular")]
    Singular,
}

impl CabinError {
    /// Returns a closure mapping a constraint violation to this error.
    pub(super) fn invalid(field: &'static str) -> impl Fn(ConstraintError) -> Self {
        move |source| Self::InvalidInput { field, source }
    }
}
