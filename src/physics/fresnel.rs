use crate::error::{ensure_normal, ensure_positive, LosError, Result};

pub const C_LIGHT: f64 = 299_792_458.0;

pub fn calculate_wavelength(freq_mhz: f64) -> Result<f64> {
    ensure_positive("frequency (MHz)", freq_mhz)?;
    let wavelength = C_LIGHT / (freq_mhz * 1e6);
    ensure_normal("wavelength (m)", wavelength)?;
    Ok(wavelength)
}

/// First Fresnel zone radius `sqrt(λ d1 d2 / D)` in meters.
///
/// `d1` and `d2` are the distances to each end. Zero at either end, widest at
/// the midpoint. Negative `d2` from floating-point noise at the far end is
/// treated as zero.
pub fn first_fresnel_radius(wavelength_m: f64, d1: f64, d2: f64) -> Result<f64> {
    let total = d1 + d2;
    if !(total > 0.0) {
        return Err(LosError::invalid(format!(
            "path length must be positive, got {total} m"
        )));
    }
    Ok((wavelength_m * d1.max(0.0) * d2.max(0.0) / total).sqrt())
}

/// Radius at the path midpoint, `sqrt(λ D / 4)`.
pub fn midpoint_fresnel_radius(wavelength_m: f64, total_m: f64) -> Result<f64> {
    let half = total_m / 2.0;
    first_fresnel_radius(wavelength_m, half, half)
}
