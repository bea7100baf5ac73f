use uom::si::{
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{NonNegative, StrictlyPositive, UnitInterval};

use super::CycleError;

/// Input to a single air-cycle simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackInput {
    pub bleed: BleedAir,
    pub cabin: CabinTarget,
}

impl PackInput {
    #[must_use]
    pub fn new(bleed: BleedAir, cabin: CabinTarget) -> Self {
        Self { bleed, cabin }
    }

    pub(super) fn validate(&self) -> Result<(), CycleError> {
        self.bleed.validate()?;
        self.cabin.validate()
    }
}

/// Engine bleed air entering the pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleedAir {
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
    pub humidity_ratio: Ratio,
}

impl BleedAir {
    /// Creates perfectly dry bleed air.
    #[must_use]
    pub fn dry(pressure: Pressure, temperature: ThermodynamicTemperature) -> Self {
        Self {
            pressure,
            temperature,
            humidity_ratio: Ratio::new::<ratio>(0.0),
        }
    }

    /// Sets the humidity ratio.
    #[must_use]
    pub fn with_humidity_ratio(self, humidity_ratio: Ratio) -> Self {
        Self {
            humidity_ratio,
            ..self
        }
    }

    fn validate(&self) -> Result<(), CycleError> {
        StrictlyPositive::new(self.pressure).map_err(CycleError::invalid("bleed.pressure"))?;
        StrictlyPositive::new(self.temperature.get::<kelvin>())
            .map_err(CycleError::invalid("bleed.temperature"))?;
        NonNegative::new(self.humidity_ratio).map_err(CycleError::invalid("bleed.humidity_ratio"))?;
        Ok(())
    }
}

/// Cabin conditions the pack must serve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabinTarget {
    /// Delivery temperature setpoint.
    ///
    /// Also taken as the temperature of recirculated cabin air.
    pub temperature: ThermodynamicTemperature,

    /// Cabin pressure setpoint.
    pub pressure: Pressure,

    /// Relative humidity of the recirculated cabin air.
    pub relative_humidity: Ratio,
}

impl CabinTarget {
    #[must_use]
    pub fn new(
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        relative_humidity: Ratio,
    ) -> Self {
        Self {
            temperature,
            pressure,
            relative_humidity,
        }
    }

    fn validate(&self) -> Result<(), CycleError> {
        StrictlyPositive::new(self.pressure).map_err(CycleError::invalid("cabin.pressure"))?;
        StrictlyPositive::new(self.temperature.get::<kelvin>())
            .map_err(CycleError::invalid("cabin.temperature"))?;
        UnitInterval::new(self.relative_humidity)
            .map_err(CycleError::invalid("cabin.relative_humidity"))?;
        Ok(())
    }
}
