use uom::si::{
    f64::{MassRate, Power, Ratio, ThermodynamicTemperature},
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{NonZero, StrictlyPositive, UnitIntervalLowerOpen},
    units::TemperatureDifference,
};

use super::CabinError;

/// Operating point of the cabin loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabinLoopInput {
    /// Fresh air delivered by the air-cycle machine.
    pub fresh_air_flow: MassRate,

    /// Fresh share of the supply flow; the rest is recirculated cabin air.
    pub fresh_air_share: Ratio,

    /// Temperature at which air is supplied to the zone.
    pub supply_temperature: ThermodynamicTemperature,

    /// Zone temperature setpoint.
    pub cabin_temperature: ThermodynamicTemperature,

    /// Zone relative humidity setpoint.
    pub cabin_relative_humidity: Ratio,

    /// Temperature of the fresh air leaving the turbine.
    pub turbine_temperature: ThermodynamicTemperature,

    /// Relative humidity of the fresh air leaving the turbine.
    pub turbine_relative_humidity: Ratio,

    /// Static temperature outside the fuselage.
    pub external_temperature: ThermodynamicTemperature,

    /// Auxiliary sensible gains in the zone.
    pub sensible_gain: Power,

    /// Auxiliary latent gains in the zone.
    pub latent_gain: Power,
}

impl CabinLoopInput {
    /// Checks the values that would make the loop equations meaningless.
    pub(super) fn validate(&self) -> Result<(), CabinError> {
        StrictlyPositive::new(self.fresh_air_flow).map_err(CabinError::invalid("fresh_air_flow"))?;
        UnitIntervalLowerOpen::new(self.fresh_air_share.get::<ratio>())
            .map_err(CabinError::invalid("fresh_air_share"))?;
        for (field, temperature) in [
            ("supply_temperature", self.supply_temperature),
            ("cabin_temperature", self.cabin_temperature),
            ("turbine_temperature", self.turbine_temperature),
            ("external_temperature", self.external_temperature),
        ] {
            StrictlyPositive::new(temperature.get::<kelvin>()).map_err(CabinError::invalid(field))?;
        }
        NonZero::new(self.external_temperature.minus(self.cabin_temperature))
            .map_err(CabinError::invalid("external_temperature"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{
        mass_rate::kilogram_per_second, power::watt, thermodynamic_temperature::degree_celsius,
    };

    use crate::support::constraint::ConstraintError;

    fn input() -> CabinLoopInput {
        CabinLoopInput {
            fresh_air_flow: MassRate::new::<kilogram_per_second>(1.0),
            fresh_air_share: Ratio::new::<ratio>(0.5),
            supply_temperature: ThermodynamicTemperature::new::<degree_celsius>(18.0),
            cabin_temperature: ThermodynamicTemperature::new::<degree_celsius>(22.0),
            cabin_relative_humidity: Ratio::new::<ratio>(0.3),
            turbine_temperature: ThermodynamicTemperature::new::<degree_celsius>(5.0),
            turbine_relative_humidity: Ratio::new::<ratio>(1.0),
            external_temperature: ThermodynamicTemperature::new::<degree_celsius>(-40.0),
            sensible_gain: Power::new::<watt>(5000.0),
            latent_gain: Power::new::<watt>(1000.0),
        }
    }

    #[test]
    fn accepts_a_typical_operating_point() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn all_fresh_air_is_allowed() {
        let all_fresh = CabinLoopInput {
            fresh_air_share: Ratio::new::<ratio>(1.0),
            ..input()
        };
        assert!(all_fresh.validate().is_ok());
    }

    #[test]
    fn rejects_a_zero_fresh_share() {
        let closed = CabinLoopInput {
            fresh_air_share: Ratio::new::<ratio>(0.0),
            ..input()
        };
        assert!(matches!(
            closed.validate(),
            Err(CabinError::InvalidInput {
                field: "fresh_air_share",
                ..
            })
        ));
    }

    #[test]
    fn rejects_a_missing_fresh_flow() {
        let stalled = CabinLoopInput {
            fresh_air_flow: MassRate::new::<kilogram_per_second>(-0.2),
            ..input()
        };
        assert!(matches!(
            stalled.validate(),
            Err(CabinError::InvalidInput {
                field: "fresh_air_flow",
                source: ConstraintError::Negative,
            })
        ));
    }

    #[test]
    fn rejects_an_outside_temperature_at_setpoint() {
        let balanced = CabinLoopInput {
            external_temperature: ThermodynamicTemperature::new::<degree_celsius>(22.0),
            ..input()
        };
        assert!(matches!(
            balanced.validate(),
            Err(CabinError::InvalidInput {
                field: "external_temperature",
                source: ConstraintError::Zero,
            })
        ));
    }
}
