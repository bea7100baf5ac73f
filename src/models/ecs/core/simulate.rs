use std::mem;

use tracing::{debug, warn};
use uom::si::{
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::psychro::{MoistAirState, PartialState, PsychroError};

use super::{
    CycleError, CycleOutcome, CyclePath, CycleStage, CycleWarning, PackInput, StageKind,
    config::Pack,
};

impl Pack {
    /// Walks bleed air through every configured stage to cabin delivery.
    pub(crate) fn simulate(&self, input: &PackInput) -> Result<CycleOutcome, CycleError> {
        input.validate()?;

        let bleed = self
            .inlet_engine
            .resolve(
                &PartialState::new(input.bleed.pressure)
                    .with_temperature(input.bleed.temperature)
                    .with_humidity_ratio(input.bleed.humidity_ratio),
            )
            .map_err(CycleError::Inlet)?;

        let recirculated = if self.mixing.recirculation.into_inner().get::<ratio>() > 0.0 {
            let cabin = self
                .inlet_engine
                .resolve(
                    &PartialState::new(input.cabin.pressure)
                        .with_temperature(input.cabin.temperature)
                        .with_relative_humidity(input.cabin.relative_humidity),
                )
                .map_err(CycleError::Inlet)?;
            Some(cabin)
        } else {
            None
        };

        let mut run = Run::new(self);

        let mut state = run.precooler(&bleed)?;
        if let Some(bootstrap) = self.bootstrap {
            state = run.compressor(&state, &bootstrap)?;
            state = run.secondary_heat_exchanger(&state, &bootstrap)?;
        }
        state = run.turbine(&state)?;
        if let Some(separated) = run.water_separator(&state)? {
            state = separated;
        }
        run.mixing_chamber(&state, recirculated.as_ref(), &bleed, &input.cabin)?;

        Ok(run.finish())
    }
}

/// Accumulates the path and warnings of one simulation.
pub(super) struct Run<'a> {
    pub(super) pack: &'a Pack,
    path: CyclePath,
    warnings: Vec<CycleWarning>,
}

impl<'a> Run<'a> {
    fn new(pack: &'a Pack) -> Self {
        Self {
            pack,
            path: CyclePath::default(),
            warnings: Vec::new(),
        }
    }

    fn finish(self) -> CycleOutcome {
        CycleOutcome {
            path: self.path,
            warnings: self.warnings,
        }
    }

    /// Resolves a stage outlet from the properties the stage changes.
    ///
    /// A negative humidity ratio is clamped to dry air with a warning.
    pub(super) fn outlet(
        &mut self,
        kind: StageKind,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
        humidity_ratio: Ratio,
    ) -> Result<MoistAirState, CycleError> {
        let humidity_ratio = self.guard_humidity(kind, humidity_ratio);
        let engine = self.pack.stage_engine;
        engine
            .resolve(
                &PartialState::new(pressure)
                    .with_temperature(temperature)
                    .with_humidity_ratio(humidity_ratio),
            )
            .map_err(|source| self.fail(kind, source))
    }

    /// Builds the error for a failed stage, handing over the path so far.
    pub(super) fn fail(&mut self, kind: StageKind, source: PsychroError) -> CycleError {
        CycleError::Stage {
            stage: kind,
            partial: mem::take(&mut self.path),
            source,
        }
    }

    /// Clamps a negative humidity ratio to zero with a `DryOut` warning.
    ///
    /// A guard: no current stage removes more water than it carries.
    pub(super) fn guard_humidity(&mut self, kind: StageKind, humidity_ratio: Ratio) -> Ratio {
        if humidity_ratio.get::<ratio>() >= 0.0 {
            return humidity_ratio;
        }
        self.warn(CycleWarning::DryOut {
            stage: kind,
            computed: humidity_ratio,
        });
        Ratio::new::<ratio>(0.0)
    }

    pub(super) fn warn(&mut self, warning: CycleWarning) {
        warn!(%warning, "air-cycle warning");
        self.warnings.push(warning);
    }

    /// Appends a completed stage and returns its outlet.
    pub(super) fn push(&mut self, stage: CycleStage) -> MoistAirState {
        debug!(
            stage = %stage.kind,
            temperature_k = stage.outlet.temperature.get::<kelvin>(),
            pressure_pa = stage.outlet.pressure.get::<pascal>(),
            humidity_ratio = stage.outlet.humidity_ratio.get::<ratio>(),
            "stage complete"
        );
        let outlet = stage.outlet;
        self.path.push(stage);
        outlet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::ecs::core::PackConfig;

    #[test]
    fn negative_humidity_is_clamped_with_a_warning() {
        let pack = PackConfig::default().validate().unwrap();
        let mut run = Run::new(&pack);

        let guarded = run.guard_humidity(StageKind::WaterSeparator, Ratio::new::<ratio>(-1e-5));
        assert_eq!(guarded.get::<ratio>(), 0.0);

        let kept = run.guard_humidity(StageKind::Turbine, Ratio::new::<ratio>(0.004));
        assert_eq!(kept.get::<ratio>(), 0.004);

        let outcome = run.finish();
        assert_eq!(
            outcome.warnings,
            vec![CycleWarning::DryOut {
                stage: StageKind::WaterSeparator,
                computed: Ratio::new::<ratio>(-1e-5),
            }]
        );
        assert!(outcome.target_met());
    }

    #[test]
    fn failed_stage_hands_over_the_partial_path() {
        let pack = PackConfig::default().validate().unwrap();
        let mut run = Run::new(&pack);

        let err = run
            .outlet(
                StageKind::Turbine,
                Pressure::new::<pascal>(100_000.0),
                ThermodynamicTemperature::new::<kelvin>(100.0),
                Ratio::new::<ratio>(0.0),
            )
            .unwrap_err();

        match err {
            CycleError::Stage { stage, partial, source } => {
                assert_eq!(stage, StageKind::Turbine);
                assert!(partial.is_empty());
                assert!(matches!(source, PsychroError::InvalidInput { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
