use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result};
use crate::geo::EARTH_RADIUS;

/// Standard reference atmosphere.
pub const STANDARD_K_FACTOR: f64 = 4.0 / 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefractionParams {
    pub k_factor: f64,
}

impl Default for RefractionParams {
    fn default() -> Self {
        Self { k_factor: STANDARD_K_FACTOR }
    }
}

impl RefractionParams {
    pub fn new(k_factor: f64) -> Result<Self> {
        ensure_positive("k-factor", k_factor)?;
        Ok(Self { k_factor })
    }
}

pub fn effective_earth_radius(params: RefractionParams) -> f64 {
    EARTH_RADIUS * params.k_factor
}

/// Earth-curvature sag at `x` meters along a chord of `total_m` meters.
///
/// Symmetric parabolic approximation `x (D - x) / (2 Reff)`, good for paths
/// up to a few hundred kilometers.
pub fn curvature_bulge(x: f64, total_m: f64, r_eff: f64) -> f64 {
    x * (total_m - x) / (2.0 * r_eff)
}

/// Per-sample bulge for a whole profile; `total_m` is the last distance.
pub fn curvature_bulge_profile(distances: &[f64], r_eff: f64) -> Vec<f64> {
    let total_m = distances.last().copied().unwrap_or(0.0);
    distances
        .iter()
        .map(|&x| curvature_bulge(x, total_m, r_eff))
        .collect()
}
