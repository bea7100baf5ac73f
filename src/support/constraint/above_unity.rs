use std::cmp::Ordering;

use super::{Constrained, Constraint, ConstraintError, UnitBounds};

/// Marker type enforcing that a value is strictly greater than one.
///
/// Compressor and turbine pressure ratios are defined as the larger pressure
/// over the smaller one, so a ratio at or below one is not a compression or
/// an expansion at all.
///
/// # Examples
///
/// ```
/// use ecs_models::support::constraint::AboveUnity;
///
/// assert!(AboveUnity::new(3.0).is_ok());
/// assert!(AboveUnity::new(1.0).is_err());
/// assert!(AboveUnity::new(0.8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveUnity;

impl AboveUnity {
    /// Constructs `Constrained<T, AboveUnity>` if value > 1.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if the value is less than or equal to one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, AboveUnity>, ConstraintError> {
        Constrained::<T, AboveUnity>::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for AboveUnity {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::one()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Less | Ordering::Equal) => Err(ConstraintError::BelowMinimum),
            None => Err(ConstraintError::NotANumber),
        }
    }
}
