use uom::si::{
    f64::{Power, Pressure, SpecificHeatCapacity, ThermalConductance},
    available_energy::joule_per_kilogram,
    power::watt,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductance::watt_per_kelvin,
};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    units::SpecificEnthalpy,
};

use super::CabinError;

/// Physical constants and controller tuning for the cabin loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabinLoopConfig {
    /// Specific heat of air.
    pub specific_heat: SpecificHeatCapacity,

    /// Latent heat of vaporization of water.
    pub latent_heat: SpecificEnthalpy,

    /// Gain of the zone temperature controller acting on the heating coil.
    pub temperature_gain: ThermalConductance,

    /// Gain of the zone humidity controller acting on the humidifier,
    /// in watts per unit humidity ratio.
    pub humidity_gain: Power,

    /// Total pressure at which humidity ratios are evaluated.
    pub pressure: Pressure,
}

impl Default for CabinLoopConfig {
    fn default() -> Self {
        Self {
            specific_heat: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1000.0),
            latent_heat: SpecificEnthalpy::new::<joule_per_kilogram>(2_496_000.0),
            temperature_gain: ThermalConductance::new::<watt_per_kelvin>(1e10),
            humidity_gain: Power::new::<watt>(1e10),
            pressure: Pressure::new::<pascal>(101_325.0),
        }
    }
}

impl CabinLoopConfig {
    /// Checks every value and freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CabinError::InvalidInput`] naming the first value that is not
    /// strictly positive.
    pub(crate) fn validate(&self) -> Result<CabinSystem, CabinError> {
        Ok(CabinSystem {
            specific_heat: StrictlyPositive::new(self.specific_heat)
                .map_err(CabinError::invalid("specific_heat"))?,
            latent_heat: StrictlyPositive::new(self.latent_heat)
                .map_err(CabinError::invalid("latent_heat"))?,
            temperature_gain: StrictlyPositive::new(self.temperature_gain)
                .map_err(CabinError::invalid("temperature_gain"))?,
            humidity_gain: StrictlyPositive::new(self.humidity_gain)
                .map_err(CabinError::invalid("humidity_gain"))?,
            pressure: StrictlyPositive::new(self.pressure)
                .map_err(CabinError::invalid("pressure"))?,
        })
    }
}

/// A validated cabin loop configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CabinSystem {
    pub(super) specific_heat: Constrained<SpecificHeatCapacity, StrictlyPositive>,
    pub(super) latent_heat: Constrained<SpecificEnthalpy, StrictlyPositive>,
    pub(super) temperature_gain: Constrained<ThermalConductance, StrictlyPositive>,
    pub(super) humidity_gain: Constrained<Power, StrictlyPositive>,
    pub(super) pressure: Constrained<Pressure, StrictlyPositive>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::support::constraint::ConstraintError;

    #[test]
    fn defaults_are_valid() {
        let system = CabinLoopConfig::default().validate().unwrap();
        assert_eq!(system.pressure.into_inner().get::<pascal>(), 101_325.0);
        assert_eq!(
            system.latent_heat.into_inner().get::<joule_per_kilogram>(),
            2_496_000.0
        );
    }

    #[test]
    fn gains_must_be_positive() {
        let config = CabinLoopConfig {
            humidity_gain: Power::new::<watt>(0.0),
            ..CabinLoopConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CabinError::InvalidInput {
                field: "humidity_gain",
                source: ConstraintError::Zero,
            })
        ));
    }
}
