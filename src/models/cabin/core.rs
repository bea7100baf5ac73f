//! Steady-state cabin conditioning loop.
//!
//! Fresh air from the air-cycle machine is blended with cabin return air in
//! a mixing box, then passes a heating coil and a vapour humidifier before
//! entering the thermal zone. Two proportional controllers drive the coil and
//! humidifier so the zone holds its temperature and humidity setpoints.
//!
//! The balances are linear in the node temperatures, humidity ratios, and
//! loads, and are solved together as one 12x12 system.

mod config;
mod error;
mod input;
mod solution;
mod system;

pub use config::CabinLoopConfig;
pub use error::CabinError;
pub use input::CabinLoopInput;
pub use solution::{AirNode, CabinSolution};

pub(crate) use config::CabinSystem;
