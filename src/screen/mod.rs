//! Two-stage screening of candidate paths without a terrain profile.
//!
//! Stage one compares the path length with the optical (k = 1) and standard
//! radio (k = 4/3) horizons. Stage two checks Fresnel clearance at the
//! midpoint only. Heights come in feet and distances in miles; they are
//! converted to meters once, before the shared geometry runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::PathParameters;
use crate::error::{
    ensure_finite, ensure_fraction, ensure_normal, ensure_positive, LosError, Result,
};
use crate::geo::Endpoint;
use crate::physics::fresnel::{calculate_wavelength, midpoint_fresnel_radius};
use crate::physics::horizon::horizon_distance_mi;
use crate::physics::refraction::{
    curvature_bulge, effective_earth_radius, RefractionParams, STANDARD_K_FACTOR,
};
use crate::units::{ft_to_m, m_to_ft, m_to_mi, mi_to_m};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Drop,
    Maybe,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenReason {
    BeyondHorizon,
    WithinStrict,
    MidFresnelFail,
    MidFresnelPass,
}

impl ScreenReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenReason::BeyondHorizon => "beyond_horizon",
            ScreenReason::WithinStrict => "within_strict",
            ScreenReason::MidFresnelFail => "mid_fresnel_fail",
            ScreenReason::MidFresnelPass => "mid_fresnel_pass",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonScreen {
    pub verdict: Verdict,
    pub strict_horizon_mi: f64,
    pub standard_horizon_mi: f64,
}

/// Fresnel clearance evaluated at the path midpoint only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidpointFresnel {
    pub pass: bool,
    /// Ray height above the curved earth at the midpoint
    pub clearance_m: f64,
    /// Fresnel fraction times the first Fresnel radius
    pub required_m: f64,
    pub fresnel_radius_at_midpoint_m: f64,
    pub bulge_at_midpoint_m: f64,
}

impl MidpointFresnel {
    pub fn clearance_ft(&self) -> f64 {
        m_to_ft(self.clearance_m)
    }

    pub fn required_ft(&self) -> f64 {
        m_to_ft(self.required_m)
    }

    pub fn bulge_ft(&self) -> f64 {
        m_to_ft(self.bulge_at_midpoint_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub verdict: Verdict,
    pub reason: ScreenReason,
    pub strict_horizon_mi: f64,
    pub standard_horizon_mi: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fresnel: Option<MidpointFresnel>,
}

fn default_fresnel_fraction() -> f64 {
    0.6
}

fn default_k_strict() -> f64 {
    1.0
}

fn default_k_standard() -> f64 {
    STANDARD_K_FACTOR
}

/// Inputs for the quick screen, in the imperial units the rules of thumb use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathInputs {
    pub distance_mi: f64,
    pub frequency_mhz: f64,
    pub h1_agl_ft: f64,
    pub h2_agl_ft: f64,
    /// Ground elevations; the midpoint ray uses them only when both are set
    #[serde(default)]
    pub h1_asl_ft: Option<f64>,
    #[serde(default)]
    pub h2_asl_ft: Option<f64>,
    #[serde(default = "default_fresnel_fraction")]
    pub fresnel_fraction: f64,
    #[serde(default = "default_k_strict")]
    pub k_horizon_strict: f64,
    #[serde(default = "default_k_standard")]
    pub k_horizon_generous: f64,
    #[serde(default = "default_k_standard")]
    pub k_fresnel: f64,
}

impl PathInputs {
    pub fn new(distance_mi: f64, frequency_mhz: f64, h1_agl_ft: f64, h2_agl_ft: f64) -> Self {
        Self {
            distance_mi,
            frequency_mhz,
            h1_agl_ft,
            h2_agl_ft,
            h1_asl_ft: None,
            h2_asl_ft: None,
            fresnel_fraction: default_fresnel_fraction(),
            k_horizon_strict: default_k_strict(),
            k_horizon_generous: default_k_standard(),
            k_fresnel: default_k_standard(),
        }
    }

    /// Converts two metric endpoints into screen inputs.
    pub fn from_endpoints(home: &Endpoint, target: &Endpoint, frequency_mhz: f64) -> Self {
        Self {
            h1_asl_ft: Some(m_to_ft(home.ground_elevation_m)),
            h2_asl_ft: Some(m_to_ft(target.ground_elevation_m)),
            ..Self::new(
                m_to_mi(home.distance_to_m(target)),
                frequency_mhz,
                m_to_ft(home.antenna_height_agl_m),
                m_to_ft(target.antenna_height_agl_m),
            )
        }
    }

    pub fn with_ground_elevations(mut self, h1_asl_ft: f64, h2_asl_ft: f64) -> Self {
        self.h1_asl_ft = Some(h1_asl_ft);
        self.h2_asl_ft = Some(h2_asl_ft);
        self
    }

    pub fn with_fresnel_fraction(mut self, fraction: f64) -> Self {
        self.fresnel_fraction = fraction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("distance (mi)", self.distance_mi)?;
        ensure_positive("frequency (MHz)", self.frequency_mhz)?;
        ensure_finite("h1 AGL (ft)", self.h1_agl_ft)?;
        ensure_finite("h2 AGL (ft)", self.h2_agl_ft)?;
        if let Some(h) = self.h1_asl_ft {
            ensure_finite("h1 ASL (ft)", h)?;
        }
        if let Some(h) = self.h2_asl_ft {
            ensure_finite("h2 ASL (ft)", h)?;
        }
        ensure_fraction(self.fresnel_fraction)?;
        ensure_positive("strict horizon k-factor", self.k_horizon_strict)?;
        ensure_positive("generous horizon k-factor", self.k_horizon_generous)?;
        ensure_positive("Fresnel k-factor", self.k_fresnel)
    }

    /// Straight-line ray height at the midpoint in feet.
    fn ray_height_mid_ft(&self) -> f64 {
        match (self.h1_asl_ft, self.h2_asl_ft) {
            (Some(g1), Some(g2)) => ((g1 + self.h1_agl_ft) + (g2 + self.h2_agl_ft)) / 2.0,
            _ => (self.h1_agl_ft + self.h2_agl_ft) / 2.0,
        }
    }
}

/// Stage one with the conventional k = 1 and k = 4/3 horizons.
pub fn horizon_screen(h1_ft: f64, h2_ft: f64, distance_mi: f64) -> Result<HorizonScreen> {
    horizon_screen_with(h1_ft, h2_ft, distance_mi, 1.0, STANDARD_K_FACTOR)
}

pub fn horizon_screen_with(
    h1_ft: f64,
    h2_ft: f64,
    distance_mi: f64,
    k_strict: f64,
    k_generous: f64,
) -> Result<HorizonScreen> {
    ensure_finite("h1 (ft)", h1_ft)?;
    ensure_finite("h2 (ft)", h2_ft)?;
    if !distance_mi.is_finite() || distance_mi < 0.0 {
        return Err(LosError::invalid(format!(
            "distance (mi) must be finite and non-negative, got {distance_mi}"
        )));
    }
    let strict = horizon_distance_mi(h1_ft, h2_ft, k_strict)?;
    let standard = horizon_distance_mi(h1_ft, h2_ft, k_generous)?;

    let verdict = if distance_mi > standard {
        Verdict::Drop
    } else if distance_mi <= strict {
        Verdict::Keep
    } else {
        Verdict::Maybe
    };

    Ok(HorizonScreen {
        verdict,
        strict_horizon_mi: strict,
        standard_horizon_mi: standard,
    })
}

/// Stage two: the full-profile formulas specialised to `x = D / 2`.
pub fn fresnel_midpoint_screen(inputs: &PathInputs) -> Result<MidpointFresnel> {
    inputs.validate()?;

    let total_m = mi_to_m(inputs.distance_mi);
    let wavelength = calculate_wavelength(inputs.frequency_mhz)?;
    let r1 = midpoint_fresnel_radius(wavelength, total_m)?;
    let required_m = inputs.fresnel_fraction * r1;

    let r_eff = effective_earth_radius(RefractionParams { k_factor: inputs.k_fresnel });
    ensure_normal("effective earth radius (m)", r_eff)?;
    let bulge_m = curvature_bulge(total_m / 2.0, total_m, r_eff);
    let clearance_m = ft_to_m(inputs.ray_height_mid_ft()) - bulge_m;

    Ok(MidpointFresnel {
        pass: clearance_m >= required_m,
        clearance_m,
        required_m,
        fresnel_radius_at_midpoint_m: r1,
        bulge_at_midpoint_m: bulge_m,
    })
}

/// Combines both stages.
///
/// A horizon Keep that fails the midpoint check is only downgraded to Maybe,
/// while a horizon Maybe that fails it is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickScreen {
    /// Accept paths inside the optical horizon without the midpoint check.
    #[serde(default)]
    pub trust_strict_horizon: bool,
}

impl QuickScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trusting_strict_horizon() -> Self {
        Self { trust_strict_horizon: true }
    }

    pub fn classify(&self, inputs: &PathInputs) -> Result<ScreenResult> {
        inputs.validate()?;
        let horizon = horizon_screen_with(
            inputs.h1_agl_ft,
            inputs.h2_agl_ft,
            inputs.distance_mi,
            inputs.k_horizon_strict,
            inputs.k_horizon_generous,
        )?;

        let result =
            |verdict: Verdict, reason: ScreenReason, fresnel: Option<MidpointFresnel>| {
                ScreenResult {
                    verdict,
                    reason,
                    strict_horizon_mi: horizon.strict_horizon_mi,
                    standard_horizon_mi: horizon.standard_horizon_mi,
                    fresnel,
                }
            };

        let outcome = match horizon.verdict {
            Verdict::Drop => result(Verdict::Drop, ScreenReason::BeyondHorizon, None),
            Verdict::Keep if self.trust_strict_horizon => {
                result(Verdict::Keep, ScreenReason::WithinStrict, None)
            }
            Verdict::Keep => {
                let f = fresnel_midpoint_screen(inputs)?;
                if f.pass {
                    result(Verdict::Keep, ScreenReason::MidFresnelPass, Some(f))
                } else {
                    result(Verdict::Maybe, ScreenReason::MidFresnelFail, Some(f))
                }
            }
            Verdict::Maybe => {
                let f = fresnel_midpoint_screen(inputs)?;
                if f.pass {
                    result(Verdict::Maybe, ScreenReason::MidFresnelPass, Some(f))
                } else {
                    result(Verdict::Drop, ScreenReason::MidFresnelFail, Some(f))
                }
            }
        };

        debug!(
            distance_mi = inputs.distance_mi,
            verdict = ?outcome.verdict,
            reason = outcome.reason.as_str(),
            "screened path"
        );
        Ok(outcome)
    }

    /// Screens two metric endpoints with the frequency, Fresnel fraction and
    /// k-factor of `params`. The horizon stage keeps its own k values.
    pub fn classify_endpoints(
        &self,
        home: &Endpoint,
        target: &Endpoint,
        params: &PathParameters,
    ) -> Result<ScreenResult> {
        params.validate()?;
        let inputs = PathInputs {
            k_fresnel: params.k_factor,
            ..PathInputs::from_endpoints(home, target, params.frequency_mhz)
                .with_fresnel_fraction(params.fresnel_fraction)
        };
        self.classify(&inputs)
    }
}

/// Classification with the default policy.
pub fn classify(inputs: &PathInputs) -> Result<ScreenResult> {
    QuickScreen::new().classify(inputs)
}
