//! Cabin conditioning loop downstream of the air-cycle machine.
//!
//! [`CabinLoop`] sizes the heating coil and humidifier that keep the cabin
//! at its temperature and humidity setpoints for a given fresh-air supply.
//! The computational core is in the internal `core` module.

mod core;

pub use self::core::{AirNode, CabinError, CabinLoopConfig, CabinLoopInput, CabinSolution};

use twine_core::Model;

use self::core::CabinSystem;

/// A cabin conditioning loop with a validated configuration.
///
/// # Example
///
/// ```
/// use ecs_models::models::cabin::{CabinLoop, CabinLoopConfig, CabinLoopInput};
/// use uom::si::{
///     f64::{MassRate, Power, Ratio, ThermodynamicTemperature},
///     mass_rate::kilogram_per_second,
///     power::kilowatt,
///     ratio::ratio,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let cabin = CabinLoop::new(CabinLoopConfig::default()).unwrap();
/// let solution = cabin
///     .solve(&CabinLoopInput {
///         fresh_air_flow: MassRate::new::<kilogram_per_second>(0.8),
///         fresh_air_share: Ratio::new::<ratio>(0.6),
///         supply_temperature: ThermodynamicTemperature::new::<degree_celsius>(28.0),
///         cabin_temperature: ThermodynamicTemperature::new::<degree_celsius>(24.0),
///         cabin_relative_humidity: Ratio::new::<ratio>(0.2),
///         turbine_temperature: ThermodynamicTemperature::new::<degree_celsius>(2.0),
///         turbine_relative_humidity: Ratio::new::<ratio>(1.0),
///         external_temperature: ThermodynamicTemperature::new::<degree_celsius>(-50.0),
///         sensible_gain: Power::new::<kilowatt>(4.0),
///         latent_gain: Power::new::<kilowatt>(0.5),
///     })
///     .unwrap();
///
/// let cabin_temperature = solution.cabin.temperature.get::<degree_celsius>();
/// assert!((cabin_temperature - 24.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CabinLoop {
    system: CabinSystem,
}

impl CabinLoop {
    /// Validates the loop configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CabinError::InvalidInput`] if any constant or gain is not
    /// strictly positive.
    pub fn new(config: CabinLoopConfig) -> Result<Self, CabinError> {
        Ok(Self {
            system: config.validate()?,
        })
    }

    /// Solves the loop at one operating point.
    ///
    /// # Errors
    ///
    /// - [`CabinError::InvalidInput`] for a non-positive fresh-air flow, a
    ///   fresh-air share outside `(0, 1]`, or an outside temperature equal to
    ///   the cabin setpoint.
    /// - [`CabinError::Psychro`] if a humidity ratio cannot be evaluated.
    /// - [`CabinError::Singular`] if the loop equations have no unique
    ///   solution.
    pub fn solve(&self, input: &CabinLoopInput) -> Result<CabinSolution, CabinError> {
        self.system.solve(input)
    }
}

impl Model for CabinLoop {
    type Input = CabinLoopInput;
    type Output = CabinSolution;
    type Error = CabinError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.solve(input)
    }
}
