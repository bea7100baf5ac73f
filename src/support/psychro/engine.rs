use tracing::debug;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, Ratio, ThermodynamicTemperature},
    pressure::pascal,
    ratio::ratio,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::SpecificEnthalpy;

use super::{
    MoistAirState, PartialState, PsychroConfig, PsychroError,
    correlations::{self as corr, T_MAX, T_MIN},
    root::solve_temperature,
};

/// Distance kept below the boiling point when bounding a temperature search.
const BOILING_MARGIN: f64 = 1e-3;

/// Relative slack before a humidity ratio counts as beyond saturation.
const SATURATION_SLACK: f64 = 1e-9;

/// The psychrometric property engine.
///
/// Completes a moist-air state from pressure and any two independent
/// properties using the ASHRAE 2017 correlations. The engine holds only its
/// numerical configuration and is cheap to copy and share across threads.
///
/// # Example
///
/// ```
/// use ecs_models::support::psychro::{PartialState, Psychrometrics};
/// use uom::si::{
///     f64::{Pressure, Ratio, ThermodynamicTemperature},
///     pressure::pascal,
///     ratio::ratio,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let engine = Psychrometrics::default();
/// let state = engine
///     .resolve(
///         &PartialState::new(Pressure::new::<pascal>(101_325.0))
///             .with_temperature(ThermodynamicTemperature::new::<degree_celsius>(25.0))
///             .with_relative_humidity(Ratio::new::<ratio>(0.5)),
///     )
///     .unwrap();
///
/// assert!((state.humidity_ratio.get::<ratio>() - 0.00988).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Psychrometrics {
    config: PsychroConfig,
}

impl Psychrometrics {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: PsychroConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &PsychroConfig {
        &self.config
    }

    /// Resolves a full moist-air state from a partial one.
    ///
    /// One independent pair fixes the state, chosen in priority order:
    /// dry-bulb first, then humidity ratio, relative humidity, wet-bulb,
    /// and dew point. Any other supplied property must agree with the
    /// resolved state within [`PsychroConfig::consistency_tol`].
    ///
    /// # Errors
    ///
    /// - [`PsychroError::InvalidInput`] for malformed or insufficient input.
    /// - [`PsychroError::InconsistentState`] if no physical state matches.
    /// - [`PsychroError::Convergence`] if an inversion fails to converge.
    pub fn resolve(&self, partial: &PartialState) -> Result<MoistAirState, PsychroError> {
        let known = Known::from_partial(partial)?;
        let (t, w) = self.fix(&known)?;

        let fog_allowed = self.config.allow_supersaturation && known.fixes_total_water();
        let state = self.complete(known.p, t, w, fog_allowed)?;
        self.check_consistency(&known, &state)?;

        debug!(
            pressure_pa = known.p,
            temperature_k = t,
            humidity_ratio = w,
            "resolved moist-air state"
        );
        Ok(state)
    }

    /// Returns the dry-bulb temperature and humidity ratio fixed by the
    /// highest-priority independent pair.
    fn fix(&self, k: &Known) -> Result<(f64, f64), PsychroError> {
        let p = k.p;
        match (k.t, k.w, k.rh, k.twb, k.tdp, k.h) {
            (Some(t), Some(w), ..) => Ok((t, w)),
            (Some(t), _, Some(rh), ..) => Ok((t, humidity_ratio_at(t, rh, p)?)),
            (Some(t), _, _, Some(twb), ..) => Ok((t, humidity_ratio_from_wet_bulb(t, twb, p)?)),
            (Some(t), _, _, _, Some(tdp), _) => Ok((t, humidity_ratio_from_dew_point(tdp, p)?)),
            (Some(t), .., Some(h)) => Ok((t, humidity_ratio_from_enthalpy(t, h))),
            (None, Some(w), Some(rh), ..) => Ok((self.dry_bulb_from_relative_humidity(w, rh, p)?, w)),
            (None, Some(w), _, Some(twb), ..) => Ok((dry_bulb_from_wet_bulb(w, twb, p)?, w)),
            (None, Some(w), .., Some(h)) => Ok((self.dry_bulb_from_enthalpy(w, h, p)?, w)),
            (None, None, Some(rh), Some(twb), ..) => self.from_rh_and_wet_bulb(rh, twb, p),
            (None, None, Some(rh), _, Some(tdp), _) => self.from_rh_and_dew_point(rh, tdp, p),
            (None, None, Some(rh), .., Some(h)) => self.from_rh_and_enthalpy(rh, h, p),
            (None, None, None, Some(twb), Some(tdp), _) => {
                let w = humidity_ratio_from_dew_point(tdp, p)?;
                Ok((dry_bulb_from_wet_bulb(w, twb, p)?, w))
            }
            (None, None, None, None, Some(tdp), Some(h)) => {
                let w = humidity_ratio_from_dew_point(tdp, p)?;
                Ok((corr::dry_bulb_from_enthalpy(h, w), w))
            }
            _ => Err(PsychroError::invalid_input(
                "supplied properties are not independent; humidity ratio with dew point, \
                 or wet-bulb with enthalpy, cannot fix a state on their own",
            )),
        }
    }

    fn dry_bulb_from_relative_humidity(
        &self,
        w: f64,
        rh: f64,
        p: f64,
    ) -> Result<f64, PsychroError> {
        match (w == 0.0, rh == 0.0) {
            (true, true) => Err(PsychroError::invalid_input(
                "dry air with zero relative humidity does not fix a temperature",
            )),
            (true, false) | (false, true) => Err(PsychroError::inconsistent(format!(
                "humidity ratio {w} and relative humidity {rh} cannot both hold"
            ))),
            (false, false) => self.saturation_temperature(corr::vapour_pressure(w, p) / rh),
        }
    }

    /// Dry-bulb temperature for a humidity ratio and enthalpy.
    ///
    /// With supersaturation allowed, water beyond saturation at the
    /// all-vapour temperature is taken as condensate and the temperature is
    /// found on the fog enthalpy instead.
    fn dry_bulb_from_enthalpy(&self, w: f64, h: f64, p: f64) -> Result<f64, PsychroError> {
        let t = corr::dry_bulb_from_enthalpy(h, w);
        if !self.config.allow_supersaturation
            || !(T_MIN..=T_MAX).contains(&t)
            || w <= corr::saturation_humidity_ratio(t, p) * (1.0 + SATURATION_SLACK)
        {
            return Ok(t);
        }

        let t_saturated = self.saturation_temperature(corr::vapour_pressure(w, p))?;
        solve_temperature(&self.config, "fog temperature", [t, t_saturated], |x| {
            let w_s = corr::saturation_humidity_ratio(x, p);
            let h_x = if w > w_s {
                corr::fog_enthalpy(x, w, w_s)
            } else {
                corr::enthalpy(x, w)
            };
            Ok(h_x - h)
        })
    }

    fn from_rh_and_dew_point(&self, rh: f64, tdp: f64, p: f64) -> Result<(f64, f64), PsychroError> {
        if rh == 0.0 {
            return Err(PsychroError::inconsistent(
                "a dew point was supplied for air with zero relative humidity",
            ));
        }
        let w = humidity_ratio_from_dew_point(tdp, p)?;
        let t = self.saturation_temperature(corr::saturation_pressure(tdp) / rh)?;
        Ok((t, w))
    }

    fn from_rh_and_enthalpy(&self, rh: f64, h: f64, p: f64) -> Result<(f64, f64), PsychroError> {
        let upper = self.relative_humidity_ceiling(rh, p)?;
        let t = solve_temperature(&self.config, "dry-bulb temperature", [T_MIN, upper], |t| {
            Ok(corr::enthalpy(t, humidity_ratio_at(t, rh, p)?) - h)
        })?;
        Ok((t, humidity_ratio_at(t, rh, p)?))
    }

    fn from_rh_and_wet_bulb(&self, rh: f64, twb: f64, p: f64) -> Result<(f64, f64), PsychroError> {
        if rh >= 1.0 {
            return Ok((twb, humidity_ratio_from_wet_bulb(twb, twb, p)?));
        }
        let upper = self.relative_humidity_ceiling(rh, p)?;
        if upper <= twb {
            return Err(PsychroError::inconsistent(format!(
                "wet-bulb {twb:.3} K is too warm for relative humidity {rh} at {p:.1} Pa"
            )));
        }
        let t = solve_temperature(&self.config, "dry-bulb temperature", [twb, upper], |t| {
            Ok(humidity_ratio_at(t, rh, p)? - humidity_ratio_from_wet_bulb(t, twb, p)?)
        })?;
        Ok((t, humidity_ratio_at(t, rh, p)?))
    }

    /// Highest temperature at which `rh` keeps the vapour pressure below `p`.
    fn relative_humidity_ceiling(&self, rh: f64, p: f64) -> Result<f64, PsychroError> {
        if rh == 0.0 || corr::saturation_pressure(T_MAX) * rh < p {
            return Ok(T_MAX);
        }
        Ok((self.saturation_temperature(p / rh)? - BOILING_MARGIN).max(T_MIN))
    }

    /// Temperature at which the saturation pressure equals `p_ws`.
    fn saturation_temperature(&self, p_ws: f64) -> Result<f64, PsychroError> {
        let range = corr::saturation_pressure(T_MIN)..=corr::saturation_pressure(T_MAX);
        if !range.contains(&p_ws) {
            return Err(PsychroError::inconsistent(format!(
                "saturation pressure {p_ws:.4} Pa lies outside the correlation range"
            )));
        }
        let ln_p_ws = p_ws.ln();
        solve_temperature(&self.config, "saturation temperature", [T_MIN, T_MAX], |t| {
            Ok(corr::saturation_pressure(t).ln() - ln_p_ws)
        })
    }

    /// Builds the full state from dry-bulb temperature and humidity ratio.
    fn complete(
        &self,
        p: f64,
        t: f64,
        w: f64,
        fog_allowed: bool,
    ) -> Result<MoistAirState, PsychroError> {
        if !(T_MIN..=T_MAX).contains(&t) {
            return Err(PsychroError::inconsistent(format!(
                "dry-bulb temperature {t:.3} K lies outside the correlation domain"
            )));
        }
        if !w.is_finite() || w < 0.0 {
            return Err(PsychroError::inconsistent(format!(
                "supplied properties imply a negative humidity ratio ({w:e})"
            )));
        }

        let w_s = corr::saturation_humidity_ratio(t, p);
        if w > w_s * (1.0 + SATURATION_SLACK) {
            if !fog_allowed {
                return Err(PsychroError::inconsistent(format!(
                    "humidity ratio {w:.6} exceeds saturation ({w_s:.6}) at {t:.2} K"
                )));
            }
            return Ok(state(p, t, w, 1.0, corr::fog_enthalpy(t, w, w_s), t, Some(t)));
        }

        let h = corr::enthalpy(t, w);
        if w >= w_s * (1.0 - SATURATION_SLACK) {
            return Ok(state(p, t, w, 1.0, h, t, Some(t)));
        }

        let p_w = corr::vapour_pressure(w, p);
        let rh = (p_w / corr::saturation_pressure(t)).min(1.0);
        let wet_bulb = self.wet_bulb(t, w, p)?;
        let dew_point = self.dew_point(t, p_w)?;
        Ok(state(p, t, w, rh, h, wet_bulb, dew_point))
    }

    fn dew_point(&self, t: f64, p_w: f64) -> Result<Option<f64>, PsychroError> {
        if p_w < corr::saturation_pressure(T_MIN) {
            return Ok(None);
        }
        let ln_p_w = p_w.ln();
        solve_temperature(&self.config, "dew point", [T_MIN, t], |x| {
            Ok(corr::saturation_pressure(x).ln() - ln_p_w)
        })
        .map(Some)
    }

    fn wet_bulb(&self, t: f64, w: f64, p: f64) -> Result<f64, PsychroError> {
        let upper = if corr::saturation_pressure(t) < p {
            t
        } else {
            self.saturation_temperature(p)? - BOILING_MARGIN
        };
        let residual = |x: f64| -> Result<f64, PsychroError> {
            Ok(humidity_ratio_from_wet_bulb(t, x, p)? - w)
        };

        if residual(T_MIN)? > 0.0 {
            return Err(PsychroError::invalid_input(format!(
                "the wet-bulb temperature of {t:.2} K air lies below the {T_MIN} K correlation limit"
            )));
        }
        solve_temperature(&self.config, "wet-bulb temperature", [T_MIN, upper], residual)
    }

    fn check_consistency(&self, k: &Known, s: &MoistAirState) -> Result<(), PsychroError> {
        let tol = self.config.consistency_tol;
        let agree = |name: &str, supplied: Option<f64>, resolved: f64, floor: f64| match supplied {
            Some(v) if (v - resolved).abs() > tol * v.abs().max(resolved.abs()) + floor => {
                Err(PsychroError::inconsistent(format!(
                    "supplied {name} {v} disagrees with {resolved} implied by the other properties"
                )))
            }
            _ => Ok(()),
        };

        agree("dry-bulb temperature", k.t, s.temperature.get::<kelvin>(), 1e-9)?;
        agree("humidity ratio", k.w, s.humidity_ratio.get::<ratio>(), 1e-12)?;
        agree("relative humidity", k.rh, s.relative_humidity.get::<ratio>(), 1e-9)?;
        agree("wet-bulb temperature", k.twb, s.wet_bulb.get::<kelvin>(), 1e-9)?;
        agree("enthalpy", k.h, s.enthalpy.get::<joule_per_kilogram>(), 1e-6)?;

        match (k.tdp, s.dew_point) {
            (Some(tdp), Some(resolved)) => agree("dew point", Some(tdp), resolved.get::<kelvin>(), 1e-9),
            (Some(tdp), None) => Err(PsychroError::inconsistent(format!(
                "supplied dew point {tdp} K but the air is too dry to have one"
            ))),
            (None, _) => Ok(()),
        }
    }
}

/// Supplied properties as validated SI values.
#[derive(Debug, Clone, Copy)]
struct Known {
    p: f64,
    t: Option<f64>,
    w: Option<f64>,
    rh: Option<f64>,
    twb: Option<f64>,
    tdp: Option<f64>,
    h: Option<f64>,
}

impl Known {
    fn from_partial(partial: &PartialState) -> Result<Self, PsychroError> {
        let p = super::validated_pressure(partial.pressure)?;

        let w = partial.humidity_ratio.map(|w| w.get::<ratio>());
        if let Some(w) = w
            && !(w.is_finite() && w >= 0.0)
        {
            return Err(PsychroError::invalid_input(format!(
                "humidity ratio must be non-negative, got {w}"
            )));
        }

        let rh = partial
            .relative_humidity
            .map(super::validated_relative_humidity)
            .transpose()?;

        let h = partial.enthalpy.map(|h| h.get::<joule_per_kilogram>());
        if let Some(h) = h
            && !h.is_finite()
        {
            return Err(PsychroError::invalid_input("enthalpy must be finite"));
        }

        if partial.supplied() < 2 {
            return Err(PsychroError::invalid_input(format!(
                "at least two properties besides pressure are required, got {}",
                partial.supplied()
            )));
        }

        Ok(Self {
            p,
            t: validated(partial.temperature, "dry-bulb temperature")?,
            w,
            rh,
            twb: validated(partial.wet_bulb, "wet-bulb temperature")?,
            tdp: validated(partial.dew_point, "dew point")?,
            h,
        })
    }
}

impl Known {
    /// Whether the fixing pair carries the total water content directly,
    /// which is what a fog state needs.
    fn fixes_total_water(&self) -> bool {
        match (self.t, self.w, self.rh, self.twb, self.h) {
            (Some(_), Some(_), ..) => true,
            (None, Some(_), None, None, Some(_)) => true,
            _ => false,
        }
    }
}

fn validated(
    temperature: Option<ThermodynamicTemperature>,
    name: &str,
) -> Result<Option<f64>, PsychroError> {
    temperature
        .map(|t| super::validated_temperature(t, name))
        .transpose()
}

/// Humidity ratio at dry-bulb `t` and relative humidity `rh`.
pub(super) fn humidity_ratio_at(t: f64, rh: f64, p: f64) -> Result<f64, PsychroError> {
    let p_w = rh * corr::saturation_pressure(t);
    if p_w >= p {
        return Err(PsychroError::inconsistent(format!(
            "vapour pressure {p_w:.1} Pa at {t:.2} K reaches the total pressure {p:.1} Pa"
        )));
    }
    Ok(corr::humidity_ratio_from_vapour_pressure(p_w, p))
}

fn humidity_ratio_from_wet_bulb(t: f64, twb: f64, p: f64) -> Result<f64, PsychroError> {
    if twb > t {
        return Err(PsychroError::inconsistent(format!(
            "wet-bulb {twb:.3} K lies above dry-bulb {t:.3} K"
        )));
    }
    corr::humidity_ratio_from_wet_bulb(t, twb, p).ok_or_else(|| boiling(twb, p))
}

fn humidity_ratio_from_dew_point(tdp: f64, p: f64) -> Result<f64, PsychroError> {
    let p_w = corr::saturation_pressure(tdp);
    if p_w >= p {
        return Err(boiling(tdp, p));
    }
    Ok(corr::humidity_ratio_from_vapour_pressure(p_w, p))
}

fn humidity_ratio_from_enthalpy(t: f64, h: f64) -> f64 {
    let t_c = t - corr::T_ICE;
    (h - 1006.0 * t_c) / (2_501_000.0 + 1860.0 * t_c)
}

fn dry_bulb_from_wet_bulb(w: f64, twb: f64, p: f64) -> Result<f64, PsychroError> {
    let t = corr::dry_bulb_from_wet_bulb(w, twb, p).ok_or_else(|| boiling(twb, p))?;
    if t < twb * (1.0 - SATURATION_SLACK) {
        return Err(PsychroError::inconsistent(format!(
            "humidity ratio {w:.6} exceeds saturation at the wet-bulb temperature {twb:.3} K"
        )));
    }
    Ok(t)
}

fn boiling(t: f64, p: f64) -> PsychroError {
    PsychroError::inconsistent(format!(
        "water boils at or below {t:.3} K when the total pressure is {p:.1} Pa"
    ))
}

fn state(
    p: f64,
    t: f64,
    w: f64,
    rh: f64,
    h: f64,
    wet_bulb: f64,
    dew_point: Option<f64>,
) -> MoistAirState {
    MoistAirState {
        temperature: ThermodynamicTemperature::new::<kelvin>(t),
        pressure: Pressure::new::<pascal>(p),
        humidity_ratio: Ratio::new::<ratio>(w),
        relative_humidity: Ratio::new::<ratio>(rh),
        enthalpy: SpecificEnthalpy::new::<joule_per_kilogram>(h),
        wet_bulb: ThermodynamicTemperature::new::<kelvin>(wet_bulb),
        dew_point: dew_point.map(ThermodynamicTemperature::new::<kelvin>),
    }
}
