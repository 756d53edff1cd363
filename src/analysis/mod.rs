//! Full-profile clearance analysis.
//!
//! Every sample is placed in the same curved reference frame: both the
//! straight line between the antennas and the terrain are lifted by the
//! earth-curvature bulge, then the first Fresnel zone is wrapped around the
//! line and compared with the terrain.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_fraction, ensure_normal, ensure_positive, LosError, Result};
use crate::physics::fresnel::{calculate_wavelength, first_fresnel_radius};
use crate::physics::refraction::{
    curvature_bulge_profile, effective_earth_radius, RefractionParams, STANDARD_K_FACTOR,
};
use crate::terrain::TerrainProfile;

/// Terrain intruding into the Fresnel zone by more than this is severe.
pub const SEVERE_INTRUSION_M: f64 = 60.0 / crate::units::FT_PER_M;

/// Fresnel fraction the clearance margin is normalized against.
pub const MARGIN_REFERENCE_FRACTION: f64 = 0.6;

fn default_step_m() -> f64 {
    200.0
}

fn default_frequency_mhz() -> f64 {
    146.0
}

fn default_k_factor() -> f64 {
    STANDARD_K_FACTOR
}

fn default_fresnel_fraction() -> f64 {
    0.6
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathParameters {
    /// Sample spacing in meters
    #[serde(default = "default_step_m")]
    pub step_m: f64,
    #[serde(default = "default_frequency_mhz")]
    pub frequency_mhz: f64,
    /// Effective-earth-radius multiplier
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Fraction of the first Fresnel zone that must stay clear
    #[serde(default = "default_fresnel_fraction")]
    pub fresnel_fraction: f64,
}

impl Default for PathParameters {
    fn default() -> Self {
        Self {
            step_m: default_step_m(),
            frequency_mhz: default_frequency_mhz(),
            k_factor: default_k_factor(),
            fresnel_fraction: default_fresnel_fraction(),
        }
    }
}

impl PathParameters {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("step (m)", self.step_m)?;
        ensure_positive("frequency (MHz)", self.frequency_mhz)?;
        ensure_positive("k-factor", self.k_factor)?;
        ensure_fraction(self.fresnel_fraction)
    }

    pub fn refraction(&self) -> RefractionParams {
        RefractionParams { k_factor: self.k_factor }
    }
}

/// How far terrain reaches into the target Fresnel envelope at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intrusion {
    Clear,
    /// Within 60 ft of the envelope
    Minor,
    Severe,
}

impl Intrusion {
    pub fn from_clearance(clearance_m: f64) -> Self {
        if clearance_m >= 0.0 {
            Intrusion::Clear
        } else if clearance_m >= -SEVERE_INTRUSION_M {
            Intrusion::Minor
        } else {
            Intrusion::Severe
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceResult {
    pub params: PathParameters,
    pub distance_m: Vec<f64>,
    pub curvature_bulge_m: Vec<f64>,
    pub effective_los_m: Vec<f64>,
    pub effective_terrain_m: Vec<f64>,
    /// Chord between the curvature-adjusted antenna tops
    pub chord_m: Vec<f64>,
    /// First Fresnel half-width scaled by the target fraction
    pub fresnel_radius_m: Vec<f64>,
    pub fresnel_lower_m: Vec<f64>,
    pub fresnel_upper_m: Vec<f64>,
    /// Lower envelope minus terrain; positive is clear
    pub clearance_m: Vec<f64>,
    /// Line of sight minus terrain, ignoring the Fresnel zone
    pub geometric_clearance_m: Vec<f64>,
    pub has_line_of_sight: bool,
    pub has_geometric_los: bool,
    pub min_clearance_m: f64,
    pub worst_sample_index: usize,
    pub total_distance_m: f64,
    /// Unscaled first Fresnel radius at the worst sample
    pub full_fresnel_radius_at_worst_m: f64,
}

impl ClearanceResult {
    pub fn len(&self) -> usize {
        self.clearance_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clearance_m.is_empty()
    }

    /// Clearance at the worst sample as a multiple of 60 % of the full first
    /// Fresnel radius there. `None` when the worst sample sits on an antenna,
    /// where the zone has no width.
    pub fn margin_ratio(&self) -> Option<f64> {
        let reference = MARGIN_REFERENCE_FRACTION * self.full_fresnel_radius_at_worst_m;
        (reference > 0.0).then(|| self.min_clearance_m / reference)
    }

    pub fn intrusions(&self) -> Vec<Intrusion> {
        self.clearance_m
            .iter()
            .map(|&c| Intrusion::from_clearance(c))
            .collect()
    }

    /// Worst clearance in feet, for imperial summaries.
    pub fn min_clearance_ft(&self) -> f64 {
        crate::units::m_to_ft(self.min_clearance_m)
    }
}

/// Stateless; kept as a type so callers can hold it next to [`crate::screen::QuickScreen`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileAnalyzer;

impl ProfileAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        profile: &TerrainProfile,
        params: &PathParameters,
    ) -> Result<ClearanceResult> {
        params.validate()?;

        let n = profile.len();
        if n < 2 {
            return Err(LosError::invalid(format!(
                "profile needs at least 2 samples, got {n}"
            )));
        }
        let total = profile.total_distance_m();
        if !(total > 0.0) {
            return Err(LosError::invalid("zero-length path"));
        }

        let dist = profile.distance_m();
        let r_eff = effective_earth_radius(params.refraction());
        ensure_normal("effective earth radius (m)", r_eff)?;
        let wavelength = calculate_wavelength(params.frequency_mhz)?;

        let bulge = curvature_bulge_profile(dist, r_eff);
        let effective_los: Vec<f64> = profile
            .straight_line_m()
            .iter()
            .zip(&bulge)
            .map(|(l, b)| l + b)
            .collect();
        let effective_terrain: Vec<f64> = profile
            .ground_elevation_m()
            .iter()
            .zip(&bulge)
            .map(|(g, b)| g + b)
            .collect();

        let (y0, y1) = (effective_los[0], effective_los[n - 1]);
        let chord: Vec<f64> = dist.iter().map(|&d| y0 + (y1 - y0) * d / total).collect();

        let mut full_radius = Vec::with_capacity(n);
        for &x in dist {
            full_radius.push(first_fresnel_radius(wavelength, x, total - x)?);
        }
        let mut fresnel_radius: Vec<f64> = full_radius
            .iter()
            .map(|r| params.fresnel_fraction * r)
            .collect();
        // No zone width at the antennas themselves.
        fresnel_radius[0] = 0.0;
        fresnel_radius[n - 1] = 0.0;
        full_radius[0] = 0.0;
        full_radius[n - 1] = 0.0;

        let fresnel_lower: Vec<f64> = effective_los
            .iter()
            .zip(&fresnel_radius)
            .map(|(los, r)| los - r)
            .collect();
        let fresnel_upper: Vec<f64> = effective_los
            .iter()
            .zip(&fresnel_radius)
            .map(|(los, r)| los + r)
            .collect();

        let clearance: Vec<f64> = fresnel_lower
            .iter()
            .zip(&effective_terrain)
            .map(|(lower, terr)| lower - terr)
            .collect();
        let geometric_clearance: Vec<f64> = effective_los
            .iter()
            .zip(&effective_terrain)
            .map(|(los, terr)| los - terr)
            .collect();
        if let Some(i) = clearance.iter().position(|c| !c.is_finite()) {
            return Err(LosError::invalid(format!(
                "clearance at sample {i} is not finite; check the k-factor and frequency"
            )));
        }

        let worst = clearance
            .iter()
            .position_min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0);
        let min_clearance = clearance[worst];
        let has_geometric_los = geometric_clearance.iter().all(|&c| c >= 0.0);

        debug!(
            samples = n,
            total_m = total,
            worst_index = worst,
            min_clearance_m = min_clearance,
            los = min_clearance >= 0.0,
            "analyzed terrain profile"
        );

        Ok(ClearanceResult {
            params: *params,
            distance_m: dist.to_vec(),
            curvature_bulge_m: bulge,
            effective_los_m: effective_los,
            effective_terrain_m: effective_terrain,
            chord_m: chord,
            fresnel_radius_m: fresnel_radius,
            fresnel_lower_m: fresnel_lower,
            fresnel_upper_m: fresnel_upper,
            clearance_m: clearance,
            geometric_clearance_m: geometric_clearance,
            has_line_of_sight: min_clearance >= 0.0,
            has_geometric_los,
            min_clearance_m: min_clearance,
            worst_sample_index: worst,
            total_distance_m: total,
            full_fresnel_radius_at_worst_m: full_radius[worst],
        })
    }
}

/// Shorthand for `ProfileAnalyzer::new().analyze(..)`.
pub fn analyze(profile: &TerrainProfile, params: &PathParameters) -> Result<ClearanceResult> {
    ProfileAnalyzer::new().analyze(profile, params)
}

