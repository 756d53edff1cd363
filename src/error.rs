use thiserror::Error;

pub type Result<T> = std::result::Result<T, LosError>;

/// Errors raised by the propagation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LosError {
    /// Parameters or profile data that cannot produce a meaningful result
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LosError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LosError::InvalidInput(msg.into())
    }
}

/// Fails with `InvalidInput` unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LosError::invalid(format!("{name} must be a positive number, got {value}")));
    }
    Ok(())
}

pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(LosError::invalid(format!("{name} must be finite, got {value}")));
    }
    Ok(())
}

/// Derived quantities such as the wavelength or the effective earth radius
/// must be normal floats; subnormal or infinite values poison every later step.
pub(crate) fn ensure_normal(name: &str, value: f64) -> Result<()> {
    if !value.is_normal() {
        return Err(LosError::invalid(format!("{name} is out of range: {value}")));
    }
    Ok(())
}

/// The target Fresnel fraction lives in (0, 1].
pub(crate) fn ensure_fraction(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(LosError::invalid(format!(
            "fresnel fraction must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}
