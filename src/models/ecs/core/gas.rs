use uom::si::{
    f64::{Ratio, SpecificHeatCapacity, ThermodynamicTemperature},
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{AboveUnity, Constrained, ConstraintError, StrictlyPositive, UnitIntervalLowerOpen},
    units::SpecificGasConstant,
};

use super::CycleError;

/// Perfect-gas constants used for the compression and expansion stages.
///
/// Water vapour is neglected in the isentropic relations; the defaults are
/// those of dry air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingGas {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
}

impl Default for WorkingGas {
    fn default() -> Self {
        Self {
            gas_constant: SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.053),
            cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1005.0),
        }
    }
}

impl WorkingGas {
    /// Returns the ratio of specific heats, `cp / (cp - R)`.
    #[must_use]
    pub fn heat_capacity_ratio(&self) -> f64 {
        let r = self.gas_constant.get::<joule_per_kilogram_kelvin>();
        let cp = self.cp.get::<joule_per_kilogram_kelvin>();
        cp / (cp - r)
    }

    pub(super) fn validate(&self) -> Result<IsentropicGas, CycleError> {
        let r = StrictlyPositive::new(self.gas_constant.get::<joule_per_kilogram_kelvin>())
            .map_err(CycleError::invalid("gas.gas_constant"))?
            .into_inner();
        let cp = StrictlyPositive::new(self.cp.get::<joule_per_kilogram_kelvin>())
            .map_err(CycleError::invalid("gas.cp"))?
            .into_inner();
        if cp <= r {
            return Err(CycleError::InvalidConfiguration {
                field: "gas.cp",
                source: ConstraintError::BelowMinimum,
            });
        }
        Ok(IsentropicGas { exponent: r / cp })
    }
}

/// Validated gas holding the isentropic exponent `(γ - 1) / γ = R / cp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct IsentropicGas {
    exponent: f64,
}

impl IsentropicGas {
    /// Outlet temperature of a compressor with the given pressure ratio.
    pub(super) fn compressed(
        &self,
        inlet: ThermodynamicTemperature,
        pressure_ratio: Constrained<Ratio, AboveUnity>,
        efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
    ) -> ThermodynamicTemperature {
        let t_in = inlet.get::<kelvin>();
        let pr = pressure_ratio.into_inner().get::<ratio>();
        let eta = efficiency.into_inner().get::<ratio>();
        ThermodynamicTemperature::new::<kelvin>(t_in * (1.0 + (pr.powf(self.exponent) - 1.0) / eta))
    }

    /// Outlet temperature of a turbine with the given expansion ratio.
    pub(super) fn expanded(
        &self,
        inlet: ThermodynamicTemperature,
        pressure_ratio: Constrained<Ratio, AboveUnity>,
        efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
    ) -> ThermodynamicTemperature {
        let t_in = inlet.get::<kelvin>();
        let pr = pressure_ratio.into_inner().get::<ratio>();
        let eta = efficiency.into_inner().get::<ratio>();
        ThermodynamicTemperature::new::<kelvin>(t_in * (1.0 - eta * (1.0 - pr.powf(-self.exponent))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn ratio_of(value: f64) -> Ratio {
        Ratio::new::<ratio>(value)
    }

    #[test]
    fn dry_air_defaults() {
        assert_relative_eq!(WorkingGas::default().heat_capacity_ratio(), 1.4, epsilon = 2e-3);
    }

    #[test]
    fn ideal_expansion_follows_the_isentrope() {
        let gas = WorkingGas::default().validate().unwrap();
        let t = gas.expanded(
            ThermodynamicTemperature::new::<kelvin>(320.52),
            AboveUnity::new(ratio_of(3.0)).unwrap(),
            UnitIntervalLowerOpen::new(ratio_of(1.0)).unwrap(),
        );
        let isentrope = 320.52 * 3.0_f64.powf(-287.053 / 1005.0);
        assert_relative_eq!(t.get::<kelvin>(), isentrope, max_relative = 1e-12);
    }

    #[test]
    fn losses_heat_the_outlet() {
        let gas = WorkingGas::default().validate().unwrap();
        let inlet = ThermodynamicTemperature::new::<kelvin>(320.0);
        let pr = AboveUnity::new(ratio_of(2.5)).unwrap();
        let ideal = UnitIntervalLowerOpen::new(ratio_of(1.0)).unwrap();
        let lossy = UnitIntervalLowerOpen::new(ratio_of(0.8)).unwrap();

        assert!(gas.compressed(inlet, pr, lossy) > gas.compressed(inlet, pr, ideal));
        assert!(gas.expanded(inlet, pr, lossy) > gas.expanded(inlet, pr, ideal));
    }

    #[test]
    fn rejects_non_physical_constants() {
        let gas = WorkingGas {
            cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(200.0),
            ..WorkingGas::default()
        };
        assert!(matches!(
            gas.validate(),
            Err(CycleError::InvalidConfiguration { field: "gas.cp", .. })
        ));
    }
}
