//! Scalar root finding on top of the bisection solver.

use std::convert::Infallible;

use tracing::trace;
use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use super::{PsychroConfig, PsychroError};

/// Model adapter exposing a scalar residual function to the solver.
struct Residual<F> {
    function: F,
}

impl<F> Model for Residual<F>
where
    F: Fn(f64) -> Result<f64, PsychroError>,
{
    type Input = f64;
    type Output = f64;
    type Error = PsychroError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        (self.function)(*input)
    }
}

/// Equation problem whose residual is the model output itself.
struct Root;

impl EquationProblem<1> for Root {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([*output])
    }
}

/// Finds the temperature in `bracket` where `residual` changes sign.
///
/// Callers orient `residual` so that it increases with temperature and so
/// that points where it cannot be evaluated lie on the high side; failed
/// evaluations are treated as positive.
///
/// # Errors
///
/// - [`PsychroError::InconsistentState`] if the residual does not change
///   sign across the bracket.
/// - [`PsychroError::Convergence`] if the solver fails or hits its
///   iteration limit.
pub(super) fn solve_temperature(
    config: &PsychroConfig,
    quantity: &str,
    bracket: [f64; 2],
    residual: impl Fn(f64) -> Result<f64, PsychroError>,
) -> Result<f64, PsychroError> {
    let model = Residual { function: residual };

    let solution = bisection::solve(
        &model,
        &Root,
        bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )
    .map_err(|error| match error {
        bisection::Error::InvalidBracket(_) => PsychroError::inconsistent(format!(
            "no {quantity} between {:.3} K and {:.3} K satisfies the supplied properties",
            bracket[0], bracket[1]
        )),
        other => PsychroError::convergence(format!("{quantity}: {other}")),
    })?;

    if solution.status != bisection::Status::Converged {
        return Err(PsychroError::convergence(format!(
            "{quantity} did not converge after {} iterations (residual {:e})",
            solution.iters, solution.residual
        )));
    }

    trace!(quantity, kelvin = solution.x, iters = solution.iters, "bisection converged");
    Ok(solution.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn finds_a_linear_root() {
        let root = solve_temperature(&PsychroConfig::default(), "test", [200.0, 400.0], |t| {
            Ok(t - 300.0)
        })
        .unwrap();
        assert_relative_eq!(root, 300.0, epsilon = 1e-8);
    }

    #[test]
    fn failed_evaluations_steer_downward() {
        let root = solve_temperature(&PsychroConfig::default(), "test", [200.0, 400.0], |t| {
            if t > 320.0 {
                Err(PsychroError::inconsistent("too hot"))
            } else {
                Ok(t - 250.0)
            }
        })
        .unwrap();
        assert_relative_eq!(root, 250.0, epsilon = 1e-8);
    }

    #[test]
    fn missing_sign_change_is_inconsistent() {
        let err = solve_temperature(&PsychroConfig::default(), "test", [200.0, 400.0], |t| {
            Ok(t + 1.0)
        })
        .unwrap_err();
        assert!(matches!(err, PsychroError::InconsistentState { .. }));
    }

    #[test]
    fn iteration_limit_is_a_convergence_failure() {
        let config = PsychroConfig {
            max_iters: 2,
            ..PsychroConfig::default()
        };
        let err = solve_temperature(&config, "test", [200.0, 400.0], |t| Ok(t - 299.0))
            .unwrap_err();
        assert!(matches!(err, PsychroError::Convergence { .. }));
    }
}
