//! Moist-air correlations from ASHRAE Handbook Fundamentals (2017), chapter 1.
//!
//! Everything here works on raw SI `f64` values: temperatures in kelvin,
//! pressures in pascal, humidity ratios in kg/kg, enthalpies in J/kg dry air.
//! The typed API in the parent module converts at the boundary.

/// Lower limit of the Hyland-Wexler saturation correlation (-100 °C).
pub(crate) const T_MIN: f64 = 173.15;

/// Upper limit of the Hyland-Wexler saturation correlation (200 °C).
pub(crate) const T_MAX: f64 = 473.15;

/// Ice point, where the correlation switches from ice to liquid water.
pub(crate) const T_ICE: f64 = 273.15;

/// Ratio of the molar masses of water vapour and dry air.
const EPSILON: f64 = 0.621_945;

const CP_DRY_AIR: f64 = 1006.0;
const CP_VAPOUR: f64 = 1860.0;
const H_FG_0: f64 = 2_501_000.0;
const CP_LIQUID: f64 = 4186.0;
const CP_ICE: f64 = 2100.0;
const H_FUSION: f64 = 333_400.0;

/// Saturation vapour pressure over ice (below 0 °C) or liquid water.
///
/// ASHRAE 2017 equations (5) and (6).
pub(crate) fn saturation_pressure(t: f64) -> f64 {
    let ln_p = if t < T_ICE {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843_0e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024_0e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    ln_p.exp()
}

/// Humidity ratio for a vapour partial pressure `p_w` at total pressure `p`.
pub(crate) fn humidity_ratio_from_vapour_pressure(p_w: f64, p: f64) -> f64 {
    EPSILON * p_w / (p - p_w)
}

/// Vapour partial pressure for humidity ratio `w` at total pressure `p`.
pub(crate) fn vapour_pressure(w: f64, p: f64) -> f64 {
    p * w / (EPSILON + w)
}

/// Saturation humidity ratio, or `INFINITY` when the air is at or above its
/// boiling point for the given pressure.
pub(crate) fn saturation_humidity_ratio(t: f64, p: f64) -> f64 {
    let p_ws = saturation_pressure(t);
    if p_ws >= p {
        return f64::INFINITY;
    }
    humidity_ratio_from_vapour_pressure(p_ws, p)
}

/// Moist-air enthalpy per unit dry air, ASHRAE 2017 equation (32).
pub(crate) fn enthalpy(t: f64, w: f64) -> f64 {
    let t_c = t - T_ICE;
    CP_DRY_AIR * t_c + w * (H_FG_0 + CP_VAPOUR * t_c)
}

/// Enthalpy of saturated air carrying `w - w_s` of condensed water.
pub(crate) fn fog_enthalpy(t: f64, w: f64, w_s: f64) -> f64 {
    let t_c = t - T_ICE;
    let condensed = if t < T_ICE {
        -H_FUSION + CP_ICE * t_c
    } else {
        CP_LIQUID * t_c
    };
    enthalpy(t, w_s) + (w - w_s) * condensed
}

/// Dry-bulb temperature from enthalpy and humidity ratio (inverse of [`enthalpy`]).
pub(crate) fn dry_bulb_from_enthalpy(h: f64, w: f64) -> f64 {
    T_ICE + (h - H_FG_0 * w) / (CP_DRY_AIR + CP_VAPOUR * w)
}

/// Humidity ratio from dry-bulb and wet-bulb temperatures.
///
/// ASHRAE 2017 equation (33) above freezing and (35) below, in kJ-based
/// coefficients. Returns `None` when the wet-bulb temperature is at or above
/// the boiling point for `p`.
pub(crate) fn humidity_ratio_from_wet_bulb(t: f64, t_wb: f64, p: f64) -> Option<f64> {
    let w_s = saturation_humidity_ratio(t_wb, p);
    if !w_s.is_finite() {
        return None;
    }
    let (t_c, t_wb_c) = (t - T_ICE, t_wb - T_ICE);
    let (a, b, c) = psychrometer_coefficients(t_wb_c);
    Some(((a - b * t_wb_c) * w_s - 1.006 * (t_c - t_wb_c)) / (a + 1.86 * t_c - c * t_wb_c))
}

/// Dry-bulb temperature from humidity ratio and wet-bulb temperature.
///
/// The psychrometer equation is linear in the dry-bulb temperature, so this
/// is its closed-form inverse. Returns `None` under the same condition as
/// [`humidity_ratio_from_wet_bulb`].
pub(crate) fn dry_bulb_from_wet_bulb(w: f64, t_wb: f64, p: f64) -> Option<f64> {
    let w_s = saturation_humidity_ratio(t_wb, p);
    if !w_s.is_finite() {
        return None;
    }
    let t_wb_c = t_wb - T_ICE;
    let (a, b, c) = psychrometer_coefficients(t_wb_c);
    let t_c = ((a - b * t_wb_c) * w_s + 1.006 * t_wb_c - w * (a - c * t_wb_c)) / (1.86 * w + 1.006);
    Some(t_c + T_ICE)
}

fn psychrometer_coefficients(t_wb_c: f64) -> (f64, f64, f64) {
    if t_wb_c >= 0.0 {
        (2501.0, 2.326, 4.186)
    } else {
        (2830.0, 0.24, 2.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn saturation_pressure_matches_ashrae_table() {
        // ASHRAE 2017 Table 3.
        assert_relative_eq!(saturation_pressure(T_ICE + 25.0), 3169.9, max_relative = 1e-3);
        assert_relative_eq!(saturation_pressure(T_ICE + 100.0), 101_418.0, max_relative = 1e-3);
        assert_relative_eq!(saturation_pressure(T_ICE - 20.0), 103.26, max_relative = 1e-3);
        assert_relative_eq!(saturation_pressure(T_ICE), 611.2, max_relative = 1e-3);
    }

    #[test]
    fn boiling_air_has_no_saturation_limit() {
        assert!(saturation_humidity_ratio(T_ICE + 120.0, 101_325.0).is_infinite());
        assert!(saturation_humidity_ratio(T_ICE + 120.0, 300_000.0).is_finite());
    }

    #[test]
    fn vapour_pressure_inverts_humidity_ratio() {
        let w = humidity_ratio_from_vapour_pressure(1500.0, 101_325.0);
        assert_relative_eq!(vapour_pressure(w, 101_325.0), 1500.0, max_relative = 1e-12);
    }

    #[test]
    fn enthalpy_inverts_to_dry_bulb() {
        let t = 300.0;
        let h = enthalpy(t, 0.012);
        assert_relative_eq!(dry_bulb_from_enthalpy(h, 0.012), t, max_relative = 1e-12);
    }

    #[test]
    fn psychrometer_equation_inverts_in_both_regimes() {
        let p = 101_325.0;
        for (t, t_wb) in [(303.15, 293.15), (268.15, 265.0)] {
            let w = humidity_ratio_from_wet_bulb(t, t_wb, p).unwrap();
            let back = dry_bulb_from_wet_bulb(w, t_wb, p).unwrap();
            assert_relative_eq!(back, t, max_relative = 1e-12);
        }
    }

    #[test]
    fn psychrometer_equation_is_saturated_at_equal_temperatures() {
        let p = 101_325.0;
        let t = 290.0;
        let w = humidity_ratio_from_wet_bulb(t, t, p).unwrap();
        assert_relative_eq!(w, saturation_humidity_ratio(t, p), max_relative = 1e-12);
    }

    #[test]
    fn fog_enthalpy_adds_condensed_water() {
        let t = T_ICE + 10.0;
        let w_s = saturation_humidity_ratio(t, 101_325.0);
        let extra = fog_enthalpy(t, w_s + 0.001, w_s) - enthalpy(t, w_s);
        assert_relative_eq!(extra, 0.001 * CP_LIQUID * 10.0, max_relative = 1e-12);
    }
}
