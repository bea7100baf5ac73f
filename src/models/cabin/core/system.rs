use nalgebra::{DMatrix, DVector};
use tracing::debug;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassRate, Power, Ratio, ThermalConductance, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::psychro;

use super::{AirNode, CabinError, CabinLoopInput, CabinSolution, config::CabinSystem};

/// Number of unknowns: four node temperatures and humidity ratios, and four
/// loads.
const UNKNOWNS: usize = 12;

/// Coefficients of the loop balances, temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    /// Supply flow times specific heat, W/K.
    sensible: f64,
    /// Supply flow times latent heat, W per unit humidity ratio.
    latent: f64,
    fresh_share: f64,
    envelope: f64,
    temperature_gain: f64,
    humidity_gain: f64,
    turbine_temperature: f64,
    turbine_humidity: f64,
    cabin_temperature: f64,
    cabin_humidity: f64,
    external_temperature: f64,
    sensible_gain: f64,
    latent_gain: f64,
}

impl Coefficients {
    /// Assembles `A x = b` for
    /// `x = [t0, w0, t1, w1, t2, w2, t3, w3, Qs_coil, Ql_humidifier, Qs_zone, Ql_zone]`.
    fn assemble(&self) -> (DMatrix<f64>, DVector<f64>) {
        let mut a = DMatrix::<f64>::zeros(UNKNOWNS, UNKNOWNS);
        let mut b = DVector::<f64>::zeros(UNKNOWNS);
        let (mc, ml, alpha) = (self.sensible, self.latent, self.fresh_share);

        // Mixing box.
        a[(0, 0)] = mc;
        a[(0, 6)] = -(1.0 - alpha) * mc;
        b[0] = alpha * mc * self.turbine_temperature;
        a[(1, 1)] = ml;
        a[(1, 7)] = -(1.0 - alpha) * ml;
        b[1] = alpha * ml * self.turbine_humidity;

        // Heating coil.
        a[(2, 0)] = mc;
        a[(2, 2)] = -mc;
        a[(2, 8)] = 1.0;
        a[(3, 1)] = ml;
        a[(3, 3)] = -ml;

        // Vapour humidifier.
        a[(4, 2)] = mc;
        a[(4, 4)] = -mc;
        a[(5, 3)] = ml;
        a[(5, 5)] = -ml;
        a[(5, 9)] = 1.0;

        // Thermal zone.
        a[(6, 4)] = mc;
        a[(6, 6)] = -mc;
        a[(6, 10)] = 1.0;
        a[(7, 5)] = ml;
        a[(7, 7)] = -ml;
        a[(7, 11)] = 1.0;

        // Envelope.
        a[(8, 6)] = self.envelope;
        a[(8, 10)] = 1.0;
        b[8] = self.envelope * self.external_temperature + self.sensible_gain;
        a[(9, 11)] = 1.0;
        b[9] = self.latent_gain;

        // Controllers.
        a[(10, 6)] = self.temperature_gain;
        a[(10, 8)] = 1.0;
        b[10] = self.temperature_gain * self.cabin_temperature;
        a[(11, 7)] = self.humidity_gain;
        a[(11, 9)] = 1.0;
        b[11] = self.humidity_gain * self.cabin_humidity;

        (a, b)
    }
}

/// Solves the assembled system by LU decomposition.
fn solve_linear(a: DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, CabinError> {
    let x = a.lu().solve(b).ok_or(CabinError::Singular)?;
    if x.iter().all(|value| value.is_finite()) {
        Ok(x)
    } else {
        Err(CabinError::Singular)
    }
}

impl CabinSystem {
    /// Solves the loop at one operating point.
    pub(crate) fn solve(&self, input: &CabinLoopInput) -> Result<CabinSolution, CabinError> {
        input.validate()?;

        let pressure = self.pressure.into_inner();
        let turbine_humidity = psychro::humidity_ratio(
            input.turbine_temperature,
            input.turbine_relative_humidity,
            pressure,
        )?;
        let cabin_humidity = psychro::humidity_ratio(
            input.cabin_temperature,
            input.cabin_relative_humidity,
            pressure,
        )?;

        let c = self.specific_heat.into_inner().get::<joule_per_kilogram_kelvin>();
        let l = self.latent_heat.into_inner().get::<joule_per_kilogram>();
        let fresh_share = input.fresh_air_share.get::<ratio>();
        let supply_flow = input.fresh_air_flow.get::<kilogram_per_second>() / fresh_share;

        let cabin_temperature = input.cabin_temperature.get::<degree_celsius>();
        let external_temperature = input.external_temperature.get::<degree_celsius>();
        let sensible_gain = input.sensible_gain.get::<watt>();

        // The design supply temperature fixes the zone load, and with it the
        // envelope conductance that balances the outside temperature.
        let zone_load = -supply_flow * c * (input.supply_temperature.get::<degree_celsius>()
            - cabin_temperature);
        let envelope =
            (zone_load - sensible_gain) / (external_temperature - cabin_temperature);

        let coefficients = Coefficients {
            sensible: supply_flow * c,
            latent: supply_flow * l,
            fresh_share,
            envelope,
            temperature_gain: self.temperature_gain.into_inner().get::<watt_per_kelvin>(),
            humidity_gain: self.humidity_gain.into_inner().get::<watt>(),
            turbine_temperature: input.turbine_temperature.get::<degree_celsius>(),
            turbine_humidity: turbine_humidity.get::<ratio>(),
            cabin_temperature,
            cabin_humidity: cabin_humidity.get::<ratio>(),
            external_temperature,
            sensible_gain,
            latent_gain: input.latent_gain.get::<watt>(),
        };

        let (a, b) = coefficients.assemble();
        let x = solve_linear(a, &b)?;

        let node = |i: usize| AirNode {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(x[2 * i]),
            humidity_ratio: Ratio::new::<ratio>(x[2 * i + 1]),
        };
        let solution = CabinSolution {
            turbine_outlet: AirNode {
                temperature: input.turbine_temperature,
                humidity_ratio: turbine_humidity,
            },
            mixed: node(0),
            heated: node(1),
            supplied: node(2),
            cabin: node(3),
            heating_coil_load: Power::new::<watt>(x[8]),
            humidifier_load: Power::new::<watt>(x[9]),
            zone_sensible_load: Power::new::<watt>(x[10]),
            zone_latent_load: Power::new::<watt>(x[11]),
            supply_flow: MassRate::new::<kilogram_per_second>(supply_flow),
            envelope_conductance: ThermalConductance::new::<watt_per_kelvin>(envelope),
        };

        debug!(
            supply_flow_kg_s = supply_flow,
            envelope_w_k = envelope,
            heating_coil_w = x[8],
            humidifier_w = x[9],
            cabin_c = x[6],
            "cabin loop solved"
        );

        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Pressure, pressure::pascal, thermodynamic_temperature::kelvin};

    use crate::{models::cabin::CabinLoopConfig, support::psychro::PsychroError};

    fn input() -> CabinLoopInput {
        CabinLoopInput {
            fresh_air_flow: MassRate::new::<kilogram_per_second>(1.0),
            fresh_air_share: Ratio::new::<ratio>(0.5),
            supply_temperature: ThermodynamicTemperature::new::<degree_celsius>(30.0),
            cabin_temperature: ThermodynamicTemperature::new::<degree_celsius>(22.0),
            cabin_relative_humidity: Ratio::new::<ratio>(0.3),
            turbine_temperature: ThermodynamicTemperature::new::<degree_celsius>(5.0),
            turbine_relative_humidity: Ratio::new::<ratio>(1.0),
            external_temperature: ThermodynamicTemperature::new::<degree_celsius>(-40.0),
            sensible_gain: Power::new::<watt>(5000.0),
            latent_gain: Power::new::<watt>(1000.0),
        }
    }

    fn solve(input: &CabinLoopInput) -> Result<CabinSolution, CabinError> {
        CabinLoopConfig::default().validate()?.solve(input)
    }

    fn celsius(node: &AirNode) -> f64 {
        node.temperature.get::<degree_celsius>()
    }

    fn w(node: &AirNode) -> f64 {
        node.humidity_ratio.get::<ratio>()
    }

    #[test]
    fn controllers_hold_the_setpoints() {
        let input = input();
        let solution = solve(&input).unwrap();

        let setpoint_w = psychro::humidity_ratio(
            input.cabin_temperature,
            input.cabin_relative_humidity,
            Pressure::new::<pascal>(101_325.0),
        )
        .unwrap();

        assert_relative_eq!(celsius(&solution.cabin), 22.0, epsilon = 1e-4);
        assert_relative_eq!(w(&solution.cabin), setpoint_w.get::<ratio>(), epsilon = 1e-5);
    }

    #[test]
    fn zone_is_supplied_at_the_design_temperature() {
        let solution = solve(&input()).unwrap();
        assert_relative_eq!(celsius(&solution.supplied), 30.0, epsilon = 1e-4);
        assert_relative_eq!(solution.supply_flow.get::<kilogram_per_second>(), 2.0);
    }

    #[test]
    fn component_balances_hold() {
        let solution = solve(&input()).unwrap();
        let mc = 2.0 * 1000.0;
        let ml = 2.0 * 2_496_000.0;
        let turbine = &solution.turbine_outlet;

        assert_relative_eq!(
            celsius(&solution.mixed),
            0.5 * celsius(&solution.cabin) + 0.5 * celsius(turbine),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            w(&solution.mixed),
            0.5 * w(&solution.cabin) + 0.5 * w(turbine),
            epsilon = 1e-12
        );

        assert_relative_eq!(
            solution.heating_coil_load.get::<watt>(),
            mc * (celsius(&solution.heated) - celsius(&solution.mixed)),
            epsilon = 1e-6
        );
        assert_relative_eq!(w(&solution.heated), w(&solution.mixed), epsilon = 1e-12);

        assert_relative_eq!(celsius(&solution.supplied), celsius(&solution.heated), epsilon = 1e-9);
        assert_relative_eq!(
            solution.humidifier_load.get::<watt>(),
            ml * (w(&solution.supplied) - w(&solution.heated)),
            epsilon = 1e-6
        );

        assert_relative_eq!(
            solution.zone_sensible_load.get::<watt>(),
            mc * (celsius(&solution.cabin) - celsius(&solution.supplied)),
            epsilon = 1e-6
        );
        assert_relative_eq!(solution.zone_latent_load.get::<watt>(), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn envelope_conductance_matches_the_zone_load() {
        let solution = solve(&input()).unwrap();
        // Zone load -2 kg/s * 1000 J/kg K * (30 - 22) K = -16 kW, less 5 kW of
        // gains, across a -62 K difference.
        assert_relative_eq!(
            solution.envelope_conductance.get::<watt_per_kelvin>(),
            (-16_000.0 - 5000.0) / -62.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn nodes_follow_the_flow() {
        let solution = solve(&input()).unwrap();
        let nodes = solution.nodes();
        assert_eq!(nodes[0], solution.turbine_outlet);
        assert_eq!(nodes[4], solution.cabin);
        assert_relative_eq!(nodes[0].temperature.get::<kelvin>(), 278.15, epsilon = 1e-9);
    }

    #[test]
    fn bad_relative_humidity_is_a_psychro_error() {
        let input = CabinLoopInput {
            turbine_relative_humidity: Ratio::new::<ratio>(1.2),
            ..input()
        };
        assert!(matches!(
            solve(&input),
            Err(CabinError::Psychro(PsychroError::InvalidInput { .. }))
        ));
    }

    #[test]
    fn singular_system_is_reported() {
        let a = DMatrix::<f64>::zeros(UNKNOWNS, UNKNOWNS);
        let b = DVector::<f64>::from_element(UNKNOWNS, 1.0);
        assert!(matches!(solve_linear(a, &b), Err(CabinError::Singular)));
    }
}
