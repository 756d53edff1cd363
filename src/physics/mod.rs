//! Shared propagation geometry: earth curvature, Fresnel zones, radio horizon.

pub mod fresnel;
pub mod horizon;
pub mod refraction;
