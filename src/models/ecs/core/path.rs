use std::fmt;

use uom::si::f64::Ratio;

use crate::support::psychro::MoistAirState;

use super::CycleWarning;

/// The kind of component a [`CycleStage`] models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Precooler,
    Compressor,
    SecondaryHeatExchanger,
    Turbine,
    WaterSeparator,
    MixingChamber,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Precooler => "precooler",
            Self::Compressor => "compressor",
            Self::SecondaryHeatExchanger => "secondary heat exchanger",
            Self::Turbine => "turbine",
            Self::WaterSeparator => "water separator",
            Self::MixingChamber => "mixing chamber",
        };
        f.write_str(name)
    }
}

/// Stage-specific values actually applied to produce a stage outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageParameters {
    /// Effectiveness cooling against ram air.
    HeatExchanger {
        effectiveness: Ratio,
        pressure_drop: Ratio,
    },

    /// Adiabatic compression.
    Compression {
        pressure_ratio: Ratio,
        isentropic_efficiency: Ratio,
    },

    /// Adiabatic expansion.
    Expansion {
        pressure_ratio: Ratio,
        isentropic_efficiency: Ratio,
    },

    /// Removal of condensed water down to saturation.
    Separation,

    /// Dry-air mass fractions of the recirculated and trim-air streams.
    ///
    /// The conditioned stream makes up the remainder.
    Mixing {
        recirculation_fraction: Ratio,
        trim_fraction: Ratio,
    },
}

/// One component of the air-cycle machine with its inlet and outlet states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleStage {
    pub kind: StageKind,
    pub inlet: MoistAirState,
    pub outlet: MoistAirState,
    pub parameters: StageParameters,

    /// Condensate removed per unit mass of dry air.
    ///
    /// Only the water separator sets this.
    pub removed_water: Option<Ratio>,
}

/// The ordered sequence of stages from bleed inlet to cabin delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CyclePath {
    stages: Vec<CycleStage>,
}

impl CyclePath {
    pub(super) fn push(&mut self, stage: CycleStage) {
        self.stages.push(stage);
    }

    /// Returns the stages in flow order.
    #[must_use]
    pub fn stages(&self) -> &[CycleStage] {
        &self.stages
    }

    /// Returns an iterator over the stages in flow order.
    pub fn iter(&self) -> std::slice::Iter<'_, CycleStage> {
        self.stages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the first stage of the given kind, if present.
    #[must_use]
    pub fn stage(&self, kind: StageKind) -> Option<&CycleStage> {
        self.stages.iter().find(|stage| stage.kind == kind)
    }

    /// Returns the stage kinds in flow order.
    #[must_use]
    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|stage| stage.kind).collect()
    }

    /// Returns the outlet of the last stage.
    #[must_use]
    pub fn delivery(&self) -> Option<&MoistAirState> {
        self.stages.last().map(|stage| &stage.outlet)
    }
}

impl<'a> IntoIterator for &'a CyclePath {
    type Item = &'a CycleStage;
    type IntoIter = std::slice::Iter<'a, CycleStage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

impl IntoIterator for CyclePath {
    type Item = CycleStage;
    type IntoIter = std::vec::IntoIter<CycleStage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.into_iter()
    }
}

/// A completed simulation: the full path and any warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub path: CyclePath,
    pub warnings: Vec<CycleWarning>,
}

impl CycleOutcome {
    /// Returns the air delivered to the cabin.
    #[must_use]
    pub fn delivery(&self) -> Option<&MoistAirState> {
        self.path.delivery()
    }

    /// Returns `true` unless a [`CycleWarning::TargetNotMet`] was raised.
    #[must_use]
    pub fn target_met(&self) -> bool {
        !self
            .warnings
            .iter()
            .any(|warning| matches!(warning, CycleWarning::TargetNotMet(_)))
    }
}
