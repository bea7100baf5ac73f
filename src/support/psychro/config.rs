use twine_solvers::equation::bisection;
use uom::si::{f64::TemperatureInterval, temperature_interval::kelvin as delta_kelvin};

/// Numerical settings for the property engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsychroConfig {
    /// Maximum iteration count for each bisection inversion.
    pub max_iters: usize,

    /// Absolute tolerance on the temperature being solved for.
    pub temperature_tol: TemperatureInterval,

    /// Relative tolerance on the temperature being solved for.
    pub relative_tol: f64,

    /// Relative tolerance used when checking extra supplied properties
    /// against the resolved state.
    pub consistency_tol: f64,

    /// Whether the `(dry-bulb, humidity ratio)` and `(humidity ratio,
    /// enthalpy)` pairs may describe fog.
    pub allow_supersaturation: bool,
}

impl Default for PsychroConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            temperature_tol: TemperatureInterval::new::<delta_kelvin>(1e-9),
            relative_tol: 0.0,
            consistency_tol: 1e-6,
            allow_supersaturation: false,
        }
    }
}

impl PsychroConfig {
    /// Returns a copy of this configuration that permits fog states.
    #[must_use]
    pub fn with_supersaturation(self) -> Self {
        Self {
            allow_supersaturation: true,
            ..self
        }
    }

    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.temperature_tol.get::<delta_kelvin>(),
            x_rel_tol: self.relative_tol,
            residual_tol: 1e-12,
        }
    }
}
