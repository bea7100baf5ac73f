use uom::si::f64::{MassRate, Power, Ratio, ThermalConductance, ThermodynamicTemperature};

/// Temperature and humidity ratio at one point of the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirNode {
    pub temperature: ThermodynamicTemperature,
    pub humidity_ratio: Ratio,
}

/// Converged state of the cabin loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CabinSolution {
    /// Fresh air entering the mixing box.
    pub turbine_outlet: AirNode,
    /// Mixing box outlet.
    pub mixed: AirNode,
    /// Heating coil outlet.
    pub heated: AirNode,
    /// Humidifier outlet, supplied to the zone.
    pub supplied: AirNode,
    /// Zone air, also the return stream.
    pub cabin: AirNode,

    /// Sensible heat added by the heating coil.
    pub heating_coil_load: Power,
    /// Latent heat added by the humidifier.
    pub humidifier_load: Power,
    /// Sensible load absorbed by the zone air.
    pub zone_sensible_load: Power,
    /// Latent load absorbed by the zone air.
    pub zone_latent_load: Power,

    /// Total supply mass flow.
    pub supply_flow: MassRate,
    /// Envelope conductance implied by the design supply temperature.
    pub envelope_conductance: ThermalConductance,
}

impl CabinSolution {
    /// The five loop points in flow order, from turbine outlet to cabin.
    #[must_use]
    pub fn nodes(&self) -> [AirNode; 5] {
        [
            self.turbine_outlet,
            self.mixed,
            self.heated,
            self.supplied,
            self.cabin,
        ]
    }
}
