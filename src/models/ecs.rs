//! Air-cycle environmental control system packs.
//!
//! [`AirCycleMachine`] walks engine bleed air through the pack to cabin
//! delivery and returns the ordered [`CyclePath`] of stage states.
//! The computational core is in the internal `core` module.

mod core;

pub use self::core::{
    BleedAir, BootstrapConfig, CabinTarget, CycleError, CycleOutcome, CyclePath, CycleStage,
    CycleWarning, MixingConfig, PackConfig, PackInput, PrecoolerConfig, Shortfall, StageKind,
    StageParameters, TurbineConfig, WorkingGas,
};

use twine_core::Model;

use self::core::Pack;

/// An air-cycle machine with a validated pack configuration.
///
/// # Example
///
/// ```
/// use ecs_models::models::ecs::{
///     AirCycleMachine, BleedAir, CabinTarget, PackConfig, PackInput, StageKind,
/// };
/// use uom::si::{
///     f64::{Pressure, Ratio, ThermodynamicTemperature},
///     pressure::kilopascal,
///     ratio::ratio,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let machine = AirCycleMachine::new(PackConfig::default()).unwrap();
/// let outcome = machine
///     .simulate(&PackInput::new(
///         BleedAir::dry(
///             Pressure::new::<kilopascal>(300.0),
///             ThermodynamicTemperature::new::<kelvin>(450.0),
///         ),
///         CabinTarget::new(
///             ThermodynamicTemperature::new::<kelvin>(295.0),
///             Pressure::new::<kilopascal>(75.0),
///             Ratio::new::<ratio>(0.2),
///         ),
///     ))
///     .unwrap();
///
/// assert_eq!(
///     outcome.path.kinds(),
///     [StageKind::Precooler, StageKind::Turbine, StageKind::MixingChamber]
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AirCycleMachine {
    pack: Pack,
}

impl AirCycleMachine {
    /// Validates the pack configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::InvalidConfiguration`] naming the first value
    /// that violates its constraint.
    pub fn new(config: PackConfig) -> Result<Self, CycleError> {
        Ok(Self {
            pack: config.validate()?,
        })
    }

    /// Simulates one pass of bleed air through the pack.
    ///
    /// Unreachable delivery targets do not fail; they produce a best-effort
    /// path with a [`CycleWarning::TargetNotMet`] attached.
    ///
    /// # Errors
    ///
    /// - [`CycleError::InvalidConfiguration`] for malformed bleed or cabin
    ///   values, before any stage runs.
    /// - [`CycleError::Inlet`] if the bleed or recirculated air cannot be
    ///   resolved.
    /// - [`CycleError::Stage`] if a stage outlet cannot be resolved, carrying
    ///   the stages completed so far.
    pub fn simulate(&self, input: &PackInput) -> Result<CycleOutcome, CycleError> {
        self.pack.simulate(input)
    }
}

impl Model for AirCycleMachine {
    type Input = PackInput;
    type Output = CycleOutcome;
    type Error = CycleError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.simulate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Pressure, Ratio, ThermodynamicTemperature},
        pressure::{kilopascal, pascal},
        ratio::ratio,
        thermodynamic_temperature::kelvin,
    };

    use crate::support::psychro::PsychroError;

    fn bleed() -> BleedAir {
        BleedAir::dry(
            Pressure::new::<pascal>(300_000.0),
            ThermodynamicTemperature::new::<kelvin>(450.0),
        )
        .with_humidity_ratio(Ratio::new::<ratio>(0.005))
    }

    fn cabin() -> CabinTarget {
        CabinTarget::new(
            ThermodynamicTemperature::new::<kelvin>(295.0),
            Pressure::new::<kilopascal>(75.0),
            Ratio::new::<ratio>(0.2),
        )
    }

    fn simulate(config: PackConfig, input: PackInput) -> Result<CycleOutcome, CycleError> {
        AirCycleMachine::new(config)?.simulate(&input)
    }

    #[test]
    fn reference_pack_condenses_and_trims() {
        let outcome = simulate(PackConfig::default(), PackInput::new(bleed(), cabin())).unwrap();
        let path = &outcome.path;

        assert_eq!(
            path.kinds(),
            [
                StageKind::Precooler,
                StageKind::Turbine,
                StageKind::WaterSeparator,
                StageKind::MixingChamber,
            ]
        );

        assert!(path.len() >= 3);
        for pair in path.stages().windows(2) {
            assert!(pair[1].outlet.pressure <= pair[0].outlet.pressure);
        }

        let precooler = path.stage(StageKind::Precooler).unwrap();
        assert_relative_eq!(precooler.outlet.temperature.get::<kelvin>(), 320.52, epsilon = 1e-9);
        assert_eq!(precooler.outlet.humidity_ratio, precooler.inlet.humidity_ratio);

        let turbine = path.stage(StageKind::Turbine).unwrap();
        assert_relative_eq!(turbine.outlet.pressure.get::<pascal>(), 100_000.0, max_relative = 1e-12);
        assert_relative_eq!(turbine.outlet.temperature.get::<kelvin>(), 247.15, epsilon = 0.05);
        assert!(turbine.outlet.temperature < turbine.inlet.temperature);

        let separator = path.stage(StageKind::WaterSeparator).unwrap();
        let removed = separator.removed_water.unwrap().get::<ratio>();
        assert_relative_eq!(
            removed,
            0.005 - separator.outlet.humidity_ratio.get::<ratio>(),
            max_relative = 1e-12
        );
        assert!(separator.outlet.humidity_ratio.get::<ratio>() < 4e-4);

        let mixing = path.stage(StageKind::MixingChamber).unwrap();
        let StageParameters::Mixing { trim_fraction, .. } = mixing.parameters else {
            panic!("mixing chamber without mixing parameters");
        };
        assert_relative_eq!(trim_fraction.get::<ratio>(), 0.234, epsilon = 0.005);

        let delivery = outcome.delivery().unwrap();
        assert_relative_eq!(delivery.temperature.get::<kelvin>(), 295.0, epsilon = 0.5);
        assert_relative_eq!(delivery.pressure.get::<kilopascal>(), 75.0);
        assert!(outcome.target_met());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn stages_chain_outlet_to_inlet() {
        let outcome = simulate(PackConfig::default(), PackInput::new(bleed(), cabin())).unwrap();
        for pair in outcome.path.stages().windows(2) {
            assert_eq!(pair[0].outlet, pair[1].inlet);
        }
    }

    #[test]
    fn dry_bleed_skips_the_separator() {
        let input = PackInput::new(
            BleedAir::dry(
                Pressure::new::<pascal>(300_000.0),
                ThermodynamicTemperature::new::<kelvin>(450.0),
            ),
            cabin(),
        );
        let outcome = simulate(PackConfig::default(), input).unwrap();
        assert!(outcome.path.stage(StageKind::WaterSeparator).is_none());
        assert!(outcome.path.iter().all(|stage| stage.removed_water.is_none()));
    }

    #[test]
    fn disabled_trim_misses_the_target() {
        let config = PackConfig {
            mixing: MixingConfig {
                max_trim_fraction: Ratio::new::<ratio>(0.0),
                ..MixingConfig::default()
            },
            ..PackConfig::default()
        };
        let outcome = simulate(config, PackInput::new(bleed(), cabin())).unwrap();

        assert_eq!(outcome.path.len(), 4);
        assert!(!outcome.target_met());
        assert!(matches!(
            outcome.warnings.as_slice(),
            [CycleWarning::TargetNotMet(Shortfall::Temperature { .. })]
        ));
    }

    #[test]
    fn bootstrap_adds_compression_and_secondary_cooling() {
        let config = PackConfig {
            bootstrap: Some(BootstrapConfig::default()),
            ..PackConfig::default()
        };
        let outcome = simulate(config, PackInput::new(bleed(), cabin())).unwrap();
        let path = &outcome.path;

        assert_eq!(
            &path.kinds()[..3],
            [
                StageKind::Precooler,
                StageKind::Compressor,
                StageKind::SecondaryHeatExchanger,
            ]
        );
        let compressor = path.stage(StageKind::Compressor).unwrap();
        assert!(compressor.outlet.temperature > compressor.inlet.temperature);
        assert_relative_eq!(
            compressor.outlet.pressure.get::<pascal>(),
            1.5 * compressor.inlet.pressure.get::<pascal>(),
            max_relative = 1e-12
        );
        let secondary = path.stage(StageKind::SecondaryHeatExchanger).unwrap();
        assert!(secondary.outlet.temperature < secondary.inlet.temperature);
    }

    #[test]
    fn recirculation_enters_the_mix() {
        let config = PackConfig {
            mixing: MixingConfig {
                recirculation_fraction: Ratio::new::<ratio>(0.4),
                ..MixingConfig::default()
            },
            ..PackConfig::default()
        };
        let outcome = simulate(config, PackInput::new(bleed(), cabin())).unwrap();
        let mixing = outcome.path.stage(StageKind::MixingChamber).unwrap();

        let StageParameters::Mixing {
            recirculation_fraction,
            trim_fraction,
        } = mixing.parameters
        else {
            panic!("mixing chamber without mixing parameters");
        };
        assert_relative_eq!(recirculation_fraction.get::<ratio>(), 0.4);
        assert!(trim_fraction.get::<ratio>() < 0.234);
        assert!(outcome.target_met());
    }

    #[test]
    fn humid_recirculation_fogging_the_mix_still_delivers() {
        let config = PackConfig {
            mixing: MixingConfig {
                recirculation_fraction: Ratio::new::<ratio>(0.5),
                ..MixingConfig::default()
            },
            ..PackConfig::default()
        };
        let cabin = CabinTarget {
            relative_humidity: Ratio::new::<ratio>(0.6),
            ..cabin()
        };
        let outcome = simulate(config, PackInput::new(bleed(), cabin)).unwrap();

        let mixing = outcome.path.stage(StageKind::MixingChamber).unwrap();
        let StageParameters::Mixing { trim_fraction, .. } = mixing.parameters else {
            panic!("mixing chamber without mixing parameters");
        };
        assert!(trim_fraction.get::<ratio>() > 0.05 && trim_fraction.get::<ratio>() < 0.2);

        let delivery = outcome.delivery().unwrap();
        assert_relative_eq!(delivery.temperature.get::<kelvin>(), 295.0, epsilon = 0.5);
        assert!(delivery.relative_humidity.get::<ratio>() < 1.0);
        assert!(outcome.target_met());
    }

    #[test]
    fn trim_search_reports_non_convergence() {
        let config = PackConfig {
            mixing: MixingConfig {
                max_iters: 2,
                ..MixingConfig::default()
            },
            ..PackConfig::default()
        };

        match simulate(config, PackInput::new(bleed(), cabin())) {
            Err(CycleError::Stage {
                stage,
                partial,
                source,
            }) => {
                assert_eq!(stage, StageKind::MixingChamber);
                assert_eq!(partial.len(), 3);
                assert!(matches!(source, PsychroError::Convergence { .. }));
            }
            other => panic!("expected a mixing chamber failure, got {other:?}"),
        }
    }

    #[test]
    fn cabin_above_pack_pressure_is_a_shortfall() {
        let cabin = CabinTarget {
            pressure: Pressure::new::<kilopascal>(110.0),
            ..cabin()
        };
        let outcome = simulate(PackConfig::default(), PackInput::new(bleed(), cabin)).unwrap();

        assert!(outcome.warnings.iter().any(|warning| matches!(
            warning,
            CycleWarning::TargetNotMet(Shortfall::Pressure { .. })
        )));
        let delivery = outcome.delivery().unwrap();
        assert_relative_eq!(delivery.pressure.get::<kilopascal>(), 100.0, max_relative = 1e-12);
    }

    #[test]
    fn invalid_compressor_fails_before_any_stage() {
        let config = PackConfig {
            bootstrap: Some(BootstrapConfig {
                pressure_ratio: Ratio::new::<ratio>(0.8),
                ..BootstrapConfig::default()
            }),
            ..PackConfig::default()
        };
        assert!(matches!(
            AirCycleMachine::new(config),
            Err(CycleError::InvalidConfiguration {
                field: "compressor.pressure_ratio",
                ..
            })
        ));
    }

    #[test]
    fn engine_failure_reports_the_stage_and_partial_path() {
        let config = PackConfig {
            ram_air_temperature: ThermodynamicTemperature::new::<kelvin>(200.0),
            precooler: PrecoolerConfig {
                effectiveness: Ratio::new::<ratio>(1.0),
                ..PrecoolerConfig::default()
            },
            turbine: TurbineConfig {
                pressure_ratio: Ratio::new::<ratio>(10.0),
                efficiency: Ratio::new::<ratio>(1.0),
            },
            ..PackConfig::default()
        };

        match simulate(config, PackInput::new(bleed(), cabin())) {
            Err(CycleError::Stage {
                stage,
                partial,
                source,
            }) => {
                assert_eq!(stage, StageKind::Turbine);
                assert_eq!(partial.kinds(), [StageKind::Precooler]);
                assert!(matches!(source, PsychroError::InvalidInput { .. }));
            }
            other => panic!("expected a turbine failure, got {other:?}"),
        }
    }

    #[test]
    fn out_of_domain_bleed_is_an_inlet_error() {
        let input = PackInput::new(
            BleedAir::dry(
                Pressure::new::<pascal>(300_000.0),
                ThermodynamicTemperature::new::<kelvin>(600.0),
            ),
            cabin(),
        );
        assert!(matches!(
            simulate(PackConfig::default(), input),
            Err(CycleError::Inlet(PsychroError::InvalidInput { .. }))
        ));
    }

    #[test]
    fn model_adapter_delegates() {
        let machine = AirCycleMachine::new(PackConfig::default()).unwrap();
        let input = PackInput::new(bleed(), cabin());
        assert_eq!(machine.call(&input).unwrap(), machine.simulate(&input).unwrap());
    }
}
