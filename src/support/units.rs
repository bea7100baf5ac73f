//! Extensions to [`uom`].
//!
//! Every physical value crossing this crate's API is a [`uom`] quantity in SI.
//! This module adds the few quantities [`uom`] lacks and a helper for
//! subtracting absolute temperatures.
//!
//! Humidity ratios (kg water per kg dry air) and relative humidities are
//! dimensionless and carried as [`uom::si::f64::Ratio`].
//!
//! ```
//! use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};
//! use ecs_models::support::units::TemperatureDifference;
//!
//! let bleed = ThermodynamicTemperature::new::<kelvin>(450.0);
//! let ram = ThermodynamicTemperature::new::<kelvin>(288.15);
//! let approach = bleed.minus(ram);
//! ```

mod quantities;
mod temperature_difference;

pub use quantities::{SpecificEnthalpy, SpecificGasConstant};
pub use temperature_difference::TemperatureDifference;
