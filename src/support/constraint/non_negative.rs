use std::{cmp::Ordering, marker::PhantomData, ops::Add};

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-negative (zero or greater).
///
/// Used for quantities where zero is meaningful, such as the humidity ratio
/// of perfectly dry bleed air.
///
/// # Examples
///
/// ```
/// use ecs_models::support::constraint::{Constrained, NonNegative};
///
/// let dry = NonNegative::new(0.0).unwrap();
/// assert_eq!(dry.into_inner(), 0.0);
///
/// let humid = Constrained::<_, NonNegative>::new(0.012).unwrap();
/// assert_eq!(humid.into_inner(), 0.012);
///
/// assert!(NonNegative::new(-1e-6).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs a [`Constrained<T, NonNegative>`] if the value is non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }

    /// Returns zero as a non-negative constrained value.
    #[must_use]
    pub fn zero<T: PartialOrd + Zero>() -> Constrained<T, NonNegative> {
        Constrained::<T, NonNegative>::zero()
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

/// Adds two non-negative values.
///
/// # Panics
///
/// Panics in debug builds if the sum is unexpectedly negative.
impl<T> Add for Constrained<T, NonNegative>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let value = self.value + rhs.value;
        debug_assert!(
            value >= T::zero(),
            "sum of non-negative values must stay non-negative"
        );
        Self {
            value,
            _marker: PhantomData,
        }
    }
}

impl<T> Zero for Constrained<T, NonNegative>
where
    T: PartialOrd + Zero,
{
    fn zero() -> Self {
        Self {
            value: T::zero(),
            _marker: PhantomData,
        }
    }

    fn is_zero(&self) -> bool {
        self.value == T::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Ratio, ratio::ratio};

    #[test]
    fn humidity_ratios() {
        assert!(NonNegative::new(Ratio::new::<ratio>(0.0)).is_ok());
        assert!(NonNegative::new(Ratio::new::<ratio>(0.01)).is_ok());
        assert_eq!(
            NonNegative::new(Ratio::new::<ratio>(-0.001)),
            Err(ConstraintError::Negative)
        );
    }

    #[test]
    fn sum_of_removed_water() {
        let removed = [0.002, 0.0, 0.0005]
            .into_iter()
            .map(|w| NonNegative::new(w).unwrap())
            .sum::<Constrained<f64, NonNegative>>();

        assert!((removed.into_inner() - 0.0025).abs() < 1e-15);
        assert!(NonNegative::zero::<f64>().is_zero());
    }
}
