//! Moist-air state resolution as a Twine model.

use twine_core::Model;

use crate::support::psychro::{
    MoistAirState, PartialState, PsychroConfig, PsychroError, Psychrometrics,
};

/// Resolves a [`PartialState`] into a full [`MoistAirState`].
///
/// A thin [`Model`] adapter over [`Psychrometrics`], so the property engine
/// can be composed and solved like any other Twine model.
///
/// # Example
///
/// ```
/// use ecs_models::{models::psychro::PropertyEngine, support::psychro::PartialState};
/// use twine_core::Model;
/// use uom::si::{
///     f64::{Pressure, Ratio, ThermodynamicTemperature},
///     pressure::pascal,
///     ratio::ratio,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let engine = PropertyEngine::default();
/// let state = engine
///     .call(
///         &PartialState::new(Pressure::new::<pascal>(101_325.0))
///             .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(20.0))
///             .with_humidity_ratio(Ratio::new::<ratio>(0.0)),
///     )
///     .unwrap();
///
/// assert!(state.dew_point.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyEngine {
    engine: Psychrometrics,
}

impl PropertyEngine {
    /// Creates a property engine model with the given configuration.
    #[must_use]
    pub fn new(config: PsychroConfig) -> Self {
        Self {
            engine: Psychrometrics::new(config),
        }
    }
}

impl Model for PropertyEngine {
    type Input = PartialState;
    type Output = MoistAirState;
    type Error = PsychroError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.engine.resolve(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::kilojoule_per_kilogram,
        f64::{Pressure, Ratio, ThermodynamicTemperature},
        pressure::pascal,
        ratio::ratio,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::support::units::SpecificEnthalpy;

    #[test]
    fn delegates_to_the_engine() {
        let partial = PartialState::new(Pressure::new::<pascal>(80_000.0))
            .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(18.0))
            .with_enthalpy(SpecificEnthalpy::new::<kilojoule_per_kilogram>(40.0));

        let model = PropertyEngine::default();
        let state = model.call(&partial).unwrap();

        assert_eq!(state, Psychrometrics::default().resolve(&partial).unwrap());
        assert!(state.humidity_ratio.get::<ratio>() > 0.0);
    }

    #[test]
    fn surfaces_engine_errors() {
        let partial = PartialState::new(Pressure::new::<pascal>(101_325.0))
            .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(18.0));
        assert!(matches!(
            PropertyEngine::default().call(&partial),
            Err(PsychroError::InvalidInput { .. })
        ));
    }

    #[test]
    fn configuration_reaches_the_engine() {
        let partial = PartialState::new(Pressure::new::<pascal>(101_325.0))
            .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(5.0))
            .with_humidity_ratio(Ratio::new::<ratio>(0.01));

        assert!(PropertyEngine::default().call(&partial).is_err());

        let fog = PropertyEngine::new(PsychroConfig::default().with_supersaturation())
            .call(&partial)
            .unwrap();
        assert_relative_eq!(fog.relative_humidity.get::<ratio>(), 1.0);
    }
}
