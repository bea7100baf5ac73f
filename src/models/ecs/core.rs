//! Air-cycle machine stage walk.
//!
//! Bleed air passes through a precooler, an optional bootstrap compressor
//! and secondary heat exchanger, a cooling turbine, a water separator when
//! the turbine outlet carries condensate, and finally a mixing chamber that
//! blends in recirculated cabin air and trim air. Every stage outlet is
//! re-derived through the property engine from the properties it changes.

mod config;
mod error;
mod gas;
mod input;
mod mixing;
mod path;
mod simulate;
mod stages;

pub use config::{BootstrapConfig, MixingConfig, PackConfig, PrecoolerConfig, TurbineConfig};
pub use error::{CycleError, CycleWarning, Shortfall};
pub use gas::WorkingGas;
pub use input::{BleedAir, CabinTarget, PackInput};
pub use path::{CycleOutcome, CyclePath, CycleStage, StageKind, StageParameters};

pub(crate) use config::Pack;
