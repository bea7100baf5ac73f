use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-zero.
///
/// Used for signed quantities that end up as divisors, such as the
/// indoor-outdoor temperature difference of a cabin envelope.
///
/// # Examples
///
/// ```
/// use ecs_models::support::constraint::{Constrained, NonZero};
/// use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin};
///
/// let across_skin = NonZero::new(TemperatureInterval::new::<kelvin>(-70.0)).unwrap();
/// assert_eq!(across_skin.into_inner().get::<kelvin>(), -70.0);
///
/// assert!(Constrained::<_, NonZero>::new(0.0).is_err());
/// assert!(NonZero::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonZero;

impl NonZero {
    /// Constructs a [`Constrained<T, NonZero>`] if the value is not zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Constrained<T, NonZero>, ConstraintError> {
        Constrained::<T, NonZero>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonZero {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Less) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            None => Err(ConstraintError::NotANumber),
        }
    }
}
