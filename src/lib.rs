//! # ECS Models
//!
//! Psychrometric and air-cycle models for aircraft environmental control
//! systems, built on [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: [`twine_core::Model`] implementations for the air-cycle
//!   pack, the cabin conditioning loop, and moist-air state resolution.
//! - [`support`]: The psychrometric property engine, numeric constraints,
//!   and unit extensions the models are built on.
//!
//! ## Units
//!
//! Every physical value at the API boundary is a [`uom`] quantity in SI.
//! Humidity ratios are kilograms of water per kilogram of dry air, and
//! enthalpies are per kilogram of dry air.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` per resolved state and stage,
//! `warn` per cycle warning) and never installs a subscriber.
//!
//! Note: APIs in [`support`] are public because they are useful on their own,
//! but they are not stable.

pub mod models;
pub mod support;
