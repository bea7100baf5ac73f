//! Mixing chamber and trim-air control.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    ratio::ratio,
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    psychro::{MoistAirState, PartialState, PsychroError, Psychrometrics},
    units::SpecificEnthalpy,
};

use super::{
    CabinTarget, CycleError, CycleStage, CycleWarning, Shortfall, StageKind, StageParameters,
    simulate::Run,
};

/// Bisection settings for the trim fraction search.
const TRIM_FRACTION_TOL: f64 = 1e-12;
const TRIM_RESIDUAL_TOL: f64 = 1e-6;

/// The streams entering the mixing chamber.
#[derive(Debug, Clone, Copy)]
struct Streams<'a> {
    conditioned: &'a MoistAirState,
    recirculated: Option<&'a MoistAirState>,
    trim: &'a MoistAirState,
    recirculation: f64,
    pressure: Pressure,
}

impl Streams<'_> {
    /// Adiabatic mix for a given trim fraction, on a dry-air mass basis.
    fn mix(
        &self,
        engine: &Psychrometrics,
        trim_fraction: f64,
    ) -> Result<MoistAirState, PsychroError> {
        let conditioned = 1.0 - self.recirculation - trim_fraction;
        let mut enthalpy = conditioned * h(self.conditioned) + trim_fraction * h(self.trim);
        let mut humidity =
            conditioned * w(self.conditioned) + trim_fraction * w(self.trim);
        if let Some(recirculated) = self.recirculated {
            enthalpy += self.recirculation * h(recirculated);
            humidity += self.recirculation * w(recirculated);
        }

        engine.resolve(
            &PartialState::new(self.pressure)
                .with_humidity_ratio(Ratio::new::<ratio>(humidity))
                .with_enthalpy(SpecificEnthalpy::new::<joule_per_kilogram>(enthalpy)),
        )
    }
}

fn h(state: &MoistAirState) -> f64 {
    state.enthalpy.get::<joule_per_kilogram>()
}

fn w(state: &MoistAirState) -> f64 {
    state.humidity_ratio.get::<ratio>()
}

/// Model adapter exposing the trim fraction as the sole input.
struct TrimModel<'a> {
    streams: Streams<'a>,
    engine: &'a Psychrometrics,
}

impl Model for TrimModel<'_> {
    type Input = f64;
    type Output = MoistAirState;
    type Error = PsychroError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.streams.mix(self.engine, *input)
    }
}

/// Equation problem matching the mixed temperature to the delivery setpoint.
struct TrimProblem {
    target: ThermodynamicTemperature,
}

impl EquationProblem<1> for TrimProblem {
    type Input = f64;
    type Output = MoistAirState;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.temperature.get::<kelvin>() - self.target.get::<kelvin>()])
    }
}

/// The chosen trim fraction with the resulting mix.
struct Trim {
    fraction: f64,
    outlet: MoistAirState,
    shortfall: Option<Shortfall>,
}

impl Run<'_> {
    /// Mixes conditioned, recirculated, and trim air for cabin delivery.
    pub(super) fn mixing_chamber(
        &mut self,
        conditioned: &MoistAirState,
        recirculated: Option<&MoistAirState>,
        bleed: &MoistAirState,
        cabin: &CabinTarget,
    ) -> Result<MoistAirState, CycleError> {
        if cabin.pressure > conditioned.pressure {
            self.warn(CycleWarning::TargetNotMet(Shortfall::Pressure {
                target: cabin.pressure,
                available: conditioned.pressure,
            }));
        }

        let streams = Streams {
            conditioned,
            recirculated,
            trim: bleed,
            recirculation: self.pack.mixing.recirculation.into_inner().get::<ratio>(),
            pressure: if cabin.pressure < conditioned.pressure {
                cabin.pressure
            } else {
                conditioned.pressure
            },
        };

        let trim = self
            .solve_trim(streams, cabin.temperature)
            .map_err(|source| self.fail(StageKind::MixingChamber, source))?;
        if let Some(shortfall) = trim.shortfall {
            self.warn(CycleWarning::TargetNotMet(shortfall));
        }

        Ok(self.push(CycleStage {
            kind: StageKind::MixingChamber,
            inlet: *conditioned,
            outlet: trim.outlet,
            parameters: StageParameters::Mixing {
                recirculation_fraction: Ratio::new::<ratio>(streams.recirculation),
                trim_fraction: Ratio::new::<ratio>(trim.fraction),
            },
            removed_water: None,
        }))
    }

    /// Finds the trim fraction that brings the mix to `target`.
    ///
    /// Falls back to the nearest bound, with a shortfall, when the target
    /// lies outside what trim air can reach.
    fn solve_trim(
        &self,
        streams: Streams<'_>,
        target: ThermodynamicTemperature,
    ) -> Result<Trim, PsychroError> {
        let engine = &self.pack.stage_engine;
        let tol = self.pack.mixing.target_tol.get::<delta_kelvin>();
        let miss = |state: &MoistAirState| state.temperature.get::<kelvin>() - target.get::<kelvin>();
        let best_effort = |fraction: f64, outlet: MoistAirState| Trim {
            fraction,
            outlet,
            shortfall: (miss(&outlet).abs() > tol).then_some(Shortfall::Temperature {
                target,
                achieved: outlet.temperature,
            }),
        };

        let untrimmed = streams.mix(engine, 0.0)?;
        let ceiling = self.pack.mixing.trim_ceiling();
        if miss(&untrimmed) >= -tol || ceiling <= 0.0 {
            return Ok(best_effort(0.0, untrimmed));
        }

        let fully_trimmed = streams.mix(engine, ceiling)?;
        if miss(&fully_trimmed) < -tol {
            return Ok(best_effort(ceiling, fully_trimmed));
        }

        let model = TrimModel { streams, engine };
        let problem = TrimProblem { target };
        let config = bisection::Config {
            max_iters: self.pack.mixing.max_iters,
            x_abs_tol: TRIM_FRACTION_TOL,
            x_rel_tol: 0.0,
            residual_tol: TRIM_RESIDUAL_TOL,
        };

        let solution = bisection::solve(
            &model,
            &problem,
            [0.0, ceiling],
            &config,
            |event: &bisection::Event<'_, _, _>| {
                // Unresolvable mixes sit below the correlation domain, on the
                // cold side of the target.
                if event.result().is_err() {
                    return Some(bisection::Action::assume_negative());
                }
                None
            },
        )
        .map_err(|error| PsychroError::convergence(format!("trim-air fraction: {error}")))?;

        if solution.status != bisection::Status::Converged {
            return Err(PsychroError::convergence(format!(
                "trim-air fraction did not converge after {} iterations (residual {:e} K)",
                solution.iters, solution.residual
            )));
        }

        Ok(best_effort(solution.x, solution.snapshot.output))
    }
}
