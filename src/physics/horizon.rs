//! Radio-horizon rule of thumb: `d (mi) ≈ C (√h1 + √h2)` with heights in feet.

use crate::error::{ensure_positive, Result};
use crate::physics::refraction::STANDARD_K_FACTOR;

/// Optical horizon coefficient (k = 1).
pub const C_OPTICAL: f64 = 1.06;
/// Standard radio horizon coefficient (k = 4/3).
pub const C_STANDARD: f64 = 1.23;

/// Coefficient `C` for refraction factor `k`.
///
/// Exact at the two anchors. Other values interpolate linearly in `1/√k`
/// between the anchors with the fraction clamped to [0, 1], so `C` is
/// non-decreasing in `k`.
pub fn horizon_coefficient(k: f64) -> Result<f64> {
    ensure_positive("k-factor", k)?;
    if k == 1.0 {
        return Ok(C_OPTICAL);
    }
    if k == STANDARD_K_FACTOR {
        return Ok(C_STANDARD);
    }
    let t = (1.0 / k.sqrt() - 1.0) / (1.0 / STANDARD_K_FACTOR.sqrt() - 1.0);
    let t = t.clamp(0.0, 1.0);
    Ok(C_OPTICAL * (1.0 - t) + C_STANDARD * t)
}

/// Horizon distance in miles for antenna heights in feet. Negative heights count as zero.
pub fn horizon_distance_mi(h1_ft: f64, h2_ft: f64, k: f64) -> Result<f64> {
    let c = horizon_coefficient(k)?;
    Ok(c * (h1_ft.max(0.0).sqrt() + h2_ft.max(0.0).sqrt()))
}
