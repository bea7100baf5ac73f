use uom::si::{
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
};

use crate::support::units::SpecificEnthalpy;

use super::correlations;

/// A fully resolved moist-air state.
///
/// Enthalpy is per unit mass of dry air. For fog states the humidity ratio
/// is the total water content and the excess over saturation is carried as
/// condensed water in the enthalpy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistAirState {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub humidity_ratio: Ratio,
    pub relative_humidity: Ratio,
    pub enthalpy: SpecificEnthalpy,
    pub wet_bulb: ThermodynamicTemperature,

    /// Dew-point temperature.
    ///
    /// `None` when the vapour partial pressure lies below the saturation
    /// correlation's domain, which includes perfectly dry air.
    pub dew_point: Option<ThermodynamicTemperature>,
}

impl MoistAirState {
    /// Partial pressure of the water vapour.
    ///
    /// For fog states this is the saturation pressure.
    #[must_use]
    pub fn vapour_pressure(&self) -> Pressure {
        let p = self.pressure.get::<pascal>();
        let w = self.humidity_ratio.get::<ratio>();
        Pressure::new::<pascal>(correlations::vapour_pressure(w, p))
    }

    /// Returns `true` if the air is at (or beyond) saturation.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.relative_humidity.get::<ratio>() >= 1.0
    }

    /// Returns this state as a partial state carrying every property.
    ///
    /// Resolving the result reproduces this state.
    #[must_use]
    pub fn to_partial(&self) -> PartialState {
        PartialState {
            pressure: self.pressure,
            temperature: Some(self.temperature),
            humidity_ratio: Some(self.humidity_ratio),
            relative_humidity: Some(self.relative_humidity),
            wet_bulb: Some(self.wet_bulb),
            dew_point: self.dew_point,
            enthalpy: Some(self.enthalpy),
        }
    }
}

/// A moist-air state with only some properties known.
///
/// Pressure is always required. At least two of the remaining properties
/// must be supplied to fix a state.
///
/// # Example
///
/// ```
/// use ecs_models::support::psychro::PartialState;
/// use uom::si::{
///     f64::{Pressure, Ratio, ThermodynamicTemperature},
///     pressure::pascal,
///     ratio::percent,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let partial = PartialState::new(Pressure::new::<pascal>(101_325.0))
///     .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(25.0))
///     .with_relative_humidity(Ratio::new::<percent>(50.0));
///
/// assert_eq!(partial.supplied(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialState {
    pub pressure: Pressure,
    pub temperature: Option<ThermodynamicTemperature>,
    pub humidity_ratio: Option<Ratio>,
    pub relative_humidity: Option<Ratio>,
    pub wet_bulb: Option<ThermodynamicTemperature>,
    pub dew_point: Option<ThermodynamicTemperature>,
    pub enthalpy: Option<SpecificEnthalpy>,
}

impl PartialState {
    /// Creates a partial state at the given pressure with nothing else known.
    #[must_use]
    pub fn new(pressure: Pressure) -> Self {
        Self {
            pressure,
            temperature: None,
            humidity_ratio: None,
            relative_humidity: None,
            wet_bulb: None,
            dew_point: None,
            enthalpy: None,
        }
    }

    /// Sets the dry-bulb temperature.
    #[must_use]
    pub fn with_temperature(self, temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature: Some(temperature),
            ..self
        }
    }

    /// Sets the humidity ratio (kg water per kg dry air).
    #[must_use]
    pub fn with_humidity_ratio(self, humidity_ratio: Ratio) -> Self {
        Self {
            humidity_ratio: Some(humidity_ratio),
            ..self
        }
    }

    /// Sets the relative humidity as a fraction in `[0, 1]`.
    #[must_use]
    pub fn with_relative_humidity(self, relative_humidity: Ratio) -> Self {
        Self {
            relative_humidity: Some(relative_humidity),
            ..self
        }
    }

    /// Sets the thermodynamic wet-bulb temperature.
    #[must_use]
    pub fn with_wet_bulb(self, wet_bulb: ThermodynamicTemperature) -> Self {
        Self {
            wet_bulb: Some(wet_bulb),
            ..self
        }
    }

    /// Sets the dew-point temperature.
    #[must_use]
    pub fn with_dew_point(self, dew_point: ThermodynamicTemperature) -> Self {
        Self {
            dew_point: Some(dew_point),
            ..self
        }
    }

    /// Sets the specific enthalpy per unit dry air.
    #[must_use]
    pub fn with_enthalpy(self, enthalpy: SpecificEnthalpy) -> Self {
        Self {
            enthalpy: Some(enthalpy),
            ..self
        }
    }

    /// Number of properties supplied besides pressure.
    #[must_use]
    pub fn supplied(&self) -> usize {
        [
            self.temperature.is_some(),
            self.humidity_ratio.is_some(),
            self.relative_humidity.is_some(),
            self.wet_bulb.is_some(),
            self.dew_point.is_some(),
            self.enthalpy.is_some(),
        ]
        .into_iter()
        .filter(|&known| known)
        .count()
    }
}
