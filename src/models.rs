//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! - [`psychro`]: moist-air state resolution.
//! - [`ecs`]: the air-cycle pack from engine bleed to cabin delivery.
//! - [`cabin`]: the conditioning loop that holds the cabin at its setpoints.
//!
//! # Model structure
//!
//! Each system model lives in its own module with an internal `core`
//! submodule holding the computation. The `core` module is an implementation
//! detail; its public types are re-exported by the parent module.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that delegates
//! to the core API, so each model can be called directly or composed with
//! other Twine models and solvers.

pub mod cabin;
pub mod ecs;
pub mod psychro;
