//! Heat exchanger, turbomachinery, and separator stages.

use uom::si::{
    f64::{Ratio, ThermodynamicTemperature},
    ratio::ratio,
};

use crate::support::{
    psychro::{self, MoistAirState},
    units::TemperatureDifference,
};

use super::{
    CycleError, CycleStage, StageKind, StageParameters, config::Bootstrap, simulate::Run,
};

impl Run<'_> {
    /// Cools bleed air against ram air.
    pub(super) fn precooler(&mut self, inlet: &MoistAirState) -> Result<MoistAirState, CycleError> {
        let effectiveness = self.pack.precooler.effectiveness.into_inner();
        let pressure_drop = self.pack.precooler.pressure_drop.into_inner();

        let temperature = self.ram_cooled(inlet.temperature, effectiveness);
        let pressure = inlet.pressure * (1.0 - pressure_drop.get::<ratio>());
        let outlet = self.outlet(
            StageKind::Precooler,
            pressure,
            temperature,
            inlet.humidity_ratio,
        )?;

        Ok(self.push(CycleStage {
            kind: StageKind::Precooler,
            inlet: *inlet,
            outlet,
            parameters: StageParameters::HeatExchanger {
                effectiveness,
                pressure_drop,
            },
            removed_water: None,
        }))
    }

    /// Bootstrap compression on the air-cycle machine shaft.
    pub(super) fn compressor(
        &mut self,
        inlet: &MoistAirState,
        bootstrap: &Bootstrap,
    ) -> Result<MoistAirState, CycleError> {
        let temperature =
            self.pack
                .gas
                .compressed(inlet.temperature, bootstrap.pressure_ratio, bootstrap.efficiency);
        let pressure_ratio = bootstrap.pressure_ratio.into_inner();
        let pressure = inlet.pressure * pressure_ratio.get::<ratio>();
        let outlet = self.outlet(
            StageKind::Compressor,
            pressure,
            temperature,
            inlet.humidity_ratio,
        )?;

        Ok(self.push(CycleStage {
            kind: StageKind::Compressor,
            inlet: *inlet,
            outlet,
            parameters: StageParameters::Compression {
                pressure_ratio,
                isentropic_efficiency: bootstrap.efficiency.into_inner(),
            },
            removed_water: None,
        }))
    }

    /// Removes the heat of compression against ram air.
    pub(super) fn secondary_heat_exchanger(
        &mut self,
        inlet: &MoistAirState,
        bootstrap: &Bootstrap,
    ) -> Result<MoistAirState, CycleError> {
        let effectiveness = bootstrap.secondary_effectiveness.into_inner();
        let temperature = self.ram_cooled(inlet.temperature, effectiveness);
        let outlet = self.outlet(
            StageKind::SecondaryHeatExchanger,
            inlet.pressure,
            temperature,
            inlet.humidity_ratio,
        )?;

        Ok(self.push(CycleStage {
            kind: StageKind::SecondaryHeatExchanger,
            inlet: *inlet,
            outlet,
            parameters: StageParameters::HeatExchanger {
                effectiveness,
                pressure_drop: Ratio::new::<ratio>(0.0),
            },
            removed_water: None,
        }))
    }

    /// Expands the air, cooling it far enough that water usually condenses.
    pub(super) fn turbine(&mut self, inlet: &MoistAirState) -> Result<MoistAirState, CycleError> {
        let turbine = self.pack.turbine;
        let temperature =
            self.pack
                .gas
                .expanded(inlet.temperature, turbine.pressure_ratio, turbine.efficiency);
        let pressure_ratio = turbine.pressure_ratio.into_inner();
        let pressure = inlet.pressure / pressure_ratio.get::<ratio>();
        let outlet = self.outlet(StageKind::Turbine, pressure, temperature, inlet.humidity_ratio)?;

        Ok(self.push(CycleStage {
            kind: StageKind::Turbine,
            inlet: *inlet,
            outlet,
            parameters: StageParameters::Expansion {
                pressure_ratio,
                isentropic_efficiency: turbine.efficiency.into_inner(),
            },
            removed_water: None,
        }))
    }

    /// Strips condensed water down to saturation.
    ///
    /// Returns `None`, and records no stage, when nothing has condensed.
    pub(super) fn water_separator(
        &mut self,
        inlet: &MoistAirState,
    ) -> Result<Option<MoistAirState>, CycleError> {
        if !inlet.is_saturated() {
            return Ok(None);
        }

        let saturation = psychro::saturation_humidity_ratio(inlet.temperature, inlet.pressure)
            .map_err(|source| self.fail(StageKind::WaterSeparator, source))?;
        if inlet.humidity_ratio <= saturation {
            return Ok(None);
        }

        let outlet = self.outlet(
            StageKind::WaterSeparator,
            inlet.pressure,
            inlet.temperature,
            saturation,
        )?;

        Ok(Some(self.push(CycleStage {
            kind: StageKind::WaterSeparator,
            inlet: *inlet,
            outlet,
            parameters: StageParameters::Separation,
            removed_water: Some(inlet.humidity_ratio - outlet.humidity_ratio),
        })))
    }

    /// Outlet temperature of an effectiveness heat exchanger against ram air.
    fn ram_cooled(
        &self,
        inlet: ThermodynamicTemperature,
        effectiveness: Ratio,
    ) -> ThermodynamicTemperature {
        inlet - effectiveness.get::<ratio>() * inlet.minus(self.pack.ram_air_temperature)
    }
}
