//! Metric/imperial conversions.
//!
//! Horizon and midpoint rules of thumb are stated in feet and miles, profile
//! analysis works in meters. Conversions happen here and nowhere else.

pub const FT_PER_M: f64 = 3.280839895;
pub const M_PER_MI: f64 = 1609.344;

pub fn m_to_ft(m: f64) -> f64 {
    m * FT_PER_M
}

pub fn ft_to_m(ft: f64) -> f64 {
    ft / FT_PER_M
}

pub fn mi_to_m(mi: f64) -> f64 {
    mi * M_PER_MI
}

pub fn m_to_mi(m: f64) -> f64 {
    m / M_PER_MI
}

