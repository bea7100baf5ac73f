use std::fmt;

use thiserror::Error;
use uom::si::{
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::{constraint::ConstraintError, psychro::PsychroError};

use super::{CyclePath, StageKind};

/// Errors that can occur while simulating an air-cycle machine.
#[derive(Debug, Error)]
pub enum CycleError {
    /// A configuration or input value violates its constraint.
    ///
    /// Raised before any stage runs.
    #[error("invalid value for `{field}`")]
    InvalidConfiguration {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// The bleed inlet or recirculated cabin air could not be resolved.
    #[error("inlet air could not be resolved")]
    Inlet(#[source] PsychroError),

    /// A stage failed to produce a valid outlet state.
    ///
    /// `partial` holds every stage completed before the failure.
    #[error("{stage} stage failed")]
    Stage {
        stage: StageKind,
        partial: CyclePath,
        #[source]
        source: PsychroError,
    },
}

impl CycleError {
    /// Returns a closure mapping a constraint violation to this error.
    pub(super) fn invalid(field: &'static str) -> impl Fn(ConstraintError) -> Self {
        move |source| Self::InvalidConfiguration { field, source }
    }
}

/// A condition noted during simulation that does not abort the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleWarning {
    /// A stage computed a negative humidity ratio, which was clamped to zero.
    DryOut { stage: StageKind, computed: Ratio },

    /// The delivery target could not be met; the path is best-effort.
    TargetNotMet(Shortfall),
}

/// How the delivered air falls short of the cabin target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shortfall {
    /// The reachable delivery temperature misses the setpoint.
    Temperature {
        target: ThermodynamicTemperature,
        achieved: ThermodynamicTemperature,
    },

    /// The conditioned stream cannot reach the cabin pressure setpoint.
    Pressure { target: Pressure, available: Pressure },
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryOut { stage, computed } => write!(
                f,
                "{stage} computed a negative humidity ratio ({:e}); clamped to dry air",
                computed.get::<ratio>()
            ),
            Self::TargetNotMet(Shortfall::Temperature { target, achieved }) => write!(
                f,
                "delivery temperature {:.2} K misses the {:.2} K setpoint",
                achieved.get::<kelvin>(),
                target.get::<kelvin>()
            ),
            Self::TargetNotMet(Shortfall::Pressure { target, available }) => write!(
                f,
                "cabin pressure {:.0} Pa exceeds the {:.0} Pa available downstream of the turbine",
                target.get::<pascal>(),
                available.get::<pascal>()
            ),
        }
    }
}
