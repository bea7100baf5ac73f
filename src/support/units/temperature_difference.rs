use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Extension trait for subtracting absolute temperatures.
///
/// [`uom`] does not define `ThermodynamicTemperature - ThermodynamicTemperature`
/// (see [#380](https://github.com/iliekturtles/uom/issues/380)), so the
/// approach temperatures used by the heat exchanger stages go through
/// [`minus`](Self::minus).
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}
