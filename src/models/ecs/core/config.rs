use uom::si::{
    f64::{Ratio, TemperatureInterval, ThermodynamicTemperature},
    ratio::ratio,
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{
        AboveUnity, Constrained, StrictlyPositive, UnitInterval, UnitIntervalLowerOpen,
        UnitIntervalUpperOpen,
    },
    psychro::{PsychroConfig, Psychrometrics},
};

use super::{CycleError, WorkingGas, gas::IsentropicGas};

/// Configuration of an air-cycle pack.
///
/// Plain quantities, validated once by
/// [`AirCycleMachine::new`](crate::models::ecs::AirCycleMachine::new).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackConfig {
    /// Temperature of the ram air used as heat sink by the heat exchangers.
    pub ram_air_temperature: ThermodynamicTemperature,
    pub precooler: PrecoolerConfig,

    /// Bootstrap compressor and secondary heat exchanger, if fitted.
    pub bootstrap: Option<BootstrapConfig>,
    pub turbine: TurbineConfig,
    pub mixing: MixingConfig,
    pub psychro: PsychroConfig,
    pub gas: WorkingGas,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            ram_air_temperature: ThermodynamicTemperature::new::<kelvin>(288.15),
            precooler: PrecoolerConfig::default(),
            bootstrap: None,
            turbine: TurbineConfig::default(),
            mixing: MixingConfig::default(),
            psychro: PsychroConfig::default(),
            gas: WorkingGas::default(),
        }
    }
}

/// Precooler between the bleed port and the rest of the pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecoolerConfig {
    /// Heat exchanger effectiveness against ram air, in `[0, 1]`.
    pub effectiveness: Ratio,

    /// Fractional pressure drop across the precooler, in `[0, 1)`.
    pub pressure_drop: Ratio,
}

impl Default for PrecoolerConfig {
    fn default() -> Self {
        Self {
            effectiveness: Ratio::new::<ratio>(0.8),
            pressure_drop: Ratio::new::<ratio>(0.0),
        }
    }
}

/// Bootstrap compressor followed by a secondary heat exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    /// Outlet over inlet pressure, greater than one.
    pub pressure_ratio: Ratio,

    /// Isentropic efficiency, in `(0, 1]`.
    pub efficiency: Ratio,

    /// Secondary heat exchanger effectiveness against ram air, in `[0, 1]`.
    pub secondary_effectiveness: Ratio,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            pressure_ratio: Ratio::new::<ratio>(1.5),
            efficiency: Ratio::new::<ratio>(0.8),
            secondary_effectiveness: Ratio::new::<ratio>(0.8),
        }
    }
}

/// Cooling turbine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbineConfig {
    /// Inlet over outlet pressure, greater than one.
    pub pressure_ratio: Ratio,

    /// Isentropic efficiency, in `(0, 1]`.
    pub efficiency: Ratio,
}

impl Default for TurbineConfig {
    fn default() -> Self {
        Self {
            pressure_ratio: Ratio::new::<ratio>(3.0),
            efficiency: Ratio::new::<ratio>(0.85),
        }
    }
}

/// Mixing chamber feeding the cabin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixingConfig {
    /// Dry-air mass fraction of recirculated cabin air, in `[0, 1)`.
    pub recirculation_fraction: Ratio,

    /// Upper bound on the dry-air mass fraction of trim air, in `[0, 1]`.
    ///
    /// Zero disables trim air.
    pub max_trim_fraction: Ratio,

    /// How close the delivery temperature must come to its setpoint.
    pub target_tol: TemperatureInterval,

    /// Iteration cap for the trim-air fraction search.
    pub max_iters: usize,
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            recirculation_fraction: Ratio::new::<ratio>(0.0),
            max_trim_fraction: Ratio::new::<ratio>(0.5),
            target_tol: TemperatureInterval::new::<delta_kelvin>(0.5),
            max_iters: 100,
        }
    }
}

/// A pack configuration with every value checked against its constraint.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pack {
    pub(super) ram_air_temperature: ThermodynamicTemperature,
    pub(super) precooler: Precooler,
    pub(super) bootstrap: Option<Bootstrap>,
    pub(super) turbine: Turbine,
    pub(super) mixing: Mixing,
    pub(super) gas: IsentropicGas,

    /// Engine for bleed and cabin air.
    pub(super) inlet_engine: Psychrometrics,

    /// Engine for stage outlets, which may carry condensed water.
    pub(super) stage_engine: Psychrometrics,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Precooler {
    pub(super) effectiveness: Constrained<Ratio, UnitInterval>,
    pub(super) pressure_drop: Constrained<Ratio, UnitIntervalUpperOpen>,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Bootstrap {
    pub(super) pressure_ratio: Constrained<Ratio, AboveUnity>,
    pub(super) efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
    pub(super) secondary_effectiveness: Constrained<Ratio, UnitInterval>,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Turbine {
    pub(super) pressure_ratio: Constrained<Ratio, AboveUnity>,
    pub(super) efficiency: Constrained<Ratio, UnitIntervalLowerOpen>,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Mixing {
    pub(super) recirculation: Constrained<Ratio, UnitIntervalUpperOpen>,
    pub(super) max_trim: Constrained<Ratio, UnitInterval>,
    pub(super) target_tol: TemperatureInterval,
    pub(super) max_iters: usize,
}

impl Mixing {
    /// Largest trim fraction the chamber can take alongside recirculation.
    pub(super) fn trim_ceiling(&self) -> f64 {
        let recirculation = self.recirculation.into_inner().get::<ratio>();
        self.max_trim.into_inner().get::<ratio>().min(1.0 - recirculation)
    }
}

impl PackConfig {
    /// Checks every value against its constraint.
    pub(crate) fn validate(&self) -> Result<Pack, CycleError> {
        StrictlyPositive::new(self.ram_air_temperature.get::<kelvin>())
            .map_err(CycleError::invalid("ram_air_temperature"))?;

        let precooler = Precooler {
            effectiveness: UnitInterval::new(self.precooler.effectiveness)
                .map_err(CycleError::invalid("precooler.effectiveness"))?,
            pressure_drop: UnitIntervalUpperOpen::new(self.precooler.pressure_drop)
                .map_err(CycleError::invalid("precooler.pressure_drop"))?,
        };

        let bootstrap = self
            .bootstrap
            .map(|bootstrap| -> Result<Bootstrap, CycleError> {
                Ok(Bootstrap {
                    pressure_ratio: AboveUnity::new(bootstrap.pressure_ratio)
                        .map_err(CycleError::invalid("compressor.pressure_ratio"))?,
                    efficiency: UnitIntervalLowerOpen::new(bootstrap.efficiency)
                        .map_err(CycleError::invalid("compressor.efficiency"))?,
                    secondary_effectiveness: UnitInterval::new(bootstrap.secondary_effectiveness)
                        .map_err(CycleError::invalid("secondary.effectiveness"))?,
                })
            })
            .transpose()?;

        let turbine = Turbine {
            pressure_ratio: AboveUnity::new(self.turbine.pressure_ratio)
                .map_err(CycleError::invalid("turbine.pressure_ratio"))?,
            efficiency: UnitIntervalLowerOpen::new(self.turbine.efficiency)
                .map_err(CycleError::invalid("turbine.efficiency"))?,
        };

        let mixing = Mixing {
            recirculation: UnitIntervalUpperOpen::new(self.mixing.recirculation_fraction)
                .map_err(CycleError::invalid("mixing.recirculation_fraction"))?,
            max_trim: UnitInterval::new(self.mixing.max_trim_fraction)
                .map_err(CycleError::invalid("mixing.max_trim_fraction"))?,
            target_tol: StrictlyPositive::new(self.mixing.target_tol)
                .map_err(CycleError::invalid("mixing.target_tol"))?
                .into_inner(),
            max_iters: StrictlyPositive::new(self.mixing.max_iters)
                .map_err(CycleError::invalid("mixing.max_iters"))?
                .into_inner(),
        };

        Ok(Pack {
            ram_air_temperature: self.ram_air_temperature,
            precooler,
            bootstrap,
            turbine,
            mixing,
            gas: self.gas.validate()?,
            inlet_engine: Psychrometrics::new(self.psychro),
            stage_engine: Psychrometrics::new(self.psychro.with_supersaturation()),
        })
    }
}
