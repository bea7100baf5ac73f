use std::{cmp::Ordering, marker::PhantomData, ops::Add};

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// Absolute pressures, absolute temperatures, and mass flows in this crate
/// are all held as `Constrained<_, StrictlyPositive>` once validated.
///
/// # Examples
///
/// ```
/// use ecs_models::support::constraint::{Constrained, StrictlyPositive};
/// use uom::si::{f64::Pressure, pressure::kilopascal};
///
/// let bleed = StrictlyPositive::new(Pressure::new::<kilopascal>(300.0)).unwrap();
/// assert_eq!(bleed.into_inner().get::<kilopascal>(), 300.0);
///
/// assert!(Constrained::<_, StrictlyPositive>::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-100.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

/// Adds two strictly positive values.
///
/// # Panics
///
/// Panics in debug builds if the sum is unexpectedly non-positive.
impl<T> Add for Constrained<T, StrictlyPositive>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let value = self.value + rhs.value;
        debug_assert!(
            value > T::zero(),
            "sum of strictly positive values must stay positive"
        );
        Self {
            value,
            _marker: PhantomData,
        }
    }
}
