//! Psychrometric property engine for moist air.
//!
//! Given total pressure and any two independent properties (dry-bulb,
//! humidity ratio, relative humidity, wet-bulb, dew point, enthalpy), the
//! [`Psychrometrics`] engine completes the full [`MoistAirState`].
//!
//! Correlations follow ASHRAE Handbook Fundamentals (2017), chapter 1:
//! Hyland-Wexler saturation pressure over ice and liquid water, valid from
//! 173.15 K to 473.15 K. Iterative inversions (wet-bulb, dew point, and the
//! pairs that do not fix the dry-bulb temperature directly) use the
//! `twine-solvers` bisection solver.
//!
//! The free functions in this module are scalar shortcuts for the common
//! "humidity at a given temperature" queries.

mod batch;
mod config;
mod correlations;
mod engine;
mod error;
mod root;
mod state;

use uom::si::{
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

pub use config::PsychroConfig;
pub use engine::Psychrometrics;
pub use error::PsychroError;
pub use state::{MoistAirState, PartialState};

use correlations::{T_MAX, T_MIN};

/// Saturation vapour pressure of water at `temperature`.
///
/// Over ice below 0 °C, over liquid water above.
///
/// # Errors
///
/// Returns [`PsychroError::InvalidInput`] if the temperature lies outside
/// the correlation domain.
pub fn saturation_pressure(temperature: ThermodynamicTemperature) -> Result<Pressure, PsychroError> {
    let t = validated_temperature(temperature, "temperature")?;
    Ok(Pressure::new::<pascal>(correlations::saturation_pressure(t)))
}

/// Humidity ratio of saturated air at `temperature` and `pressure`.
///
/// # Errors
///
/// - [`PsychroError::InvalidInput`] for a non-positive pressure or a
///   temperature outside the correlation domain.
/// - [`PsychroError::InconsistentState`] if water boils at this temperature
///   and pressure, where no saturation limit exists.
pub fn saturation_humidity_ratio(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
) -> Result<Ratio, PsychroError> {
    humidity_ratio(temperature, Ratio::new::<ratio>(1.0), pressure)
}

/// Humidity ratio of air at `temperature`, `relative_humidity`, and `pressure`.
///
/// # Errors
///
/// - [`PsychroError::InvalidInput`] for a non-positive pressure, a relative
///   humidity outside `[0, 1]`, or a temperature outside the correlation
///   domain.
/// - [`PsychroError::InconsistentState`] if the vapour pressure would reach
///   the total pressure.
pub fn humidity_ratio(
    temperature: ThermodynamicTemperature,
    relative_humidity: Ratio,
    pressure: Pressure,
) -> Result<Ratio, PsychroError> {
    let p = validated_pressure(pressure)?;
    let t = validated_temperature(temperature, "temperature")?;
    let rh = validated_relative_humidity(relative_humidity)?;
    engine::humidity_ratio_at(t, rh, p).map(Ratio::new::<ratio>)
}

fn validated_pressure(pressure: Pressure) -> Result<f64, PsychroError> {
    let p = pressure.get::<pascal>();
    if p.is_finite() && p > 0.0 {
        Ok(p)
    } else {
        Err(PsychroError::invalid_input(format!(
            "pressure must be positive and finite, got {p} Pa"
        )))
    }
}

fn validated_temperature(
    temperature: ThermodynamicTemperature,
    name: &str,
) -> Result<f64, PsychroError> {
    let t = temperature.get::<kelvin>();
    if (T_MIN..=T_MAX).contains(&t) {
        Ok(t)
    } else {
        Err(PsychroError::invalid_input(format!(
            "{name} {t} K lies outside the correlation domain [{T_MIN}, {T_MAX}] K"
        )))
    }
}

fn validated_relative_humidity(relative_humidity: Ratio) -> Result<f64, PsychroError> {
    let rh = relative_humidity.get::<ratio>();
    if (0.0..=1.0).contains(&rh) {
        Ok(rh)
    } else {
        Err(PsychroError::invalid_input(format!(
            "relative humidity must lie in [0, 1], got {rh}"
        )))
    }
}
