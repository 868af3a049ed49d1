//! Beta-function utilities.

use pp_core::{Error, Result};
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

/// `ln B(a, b) = ln Γ(a) + ln Γ(b) - ln Γ(a+b)`.
#[inline]
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete Beta `I_x(a, b)`.
///
/// `x` is clamped into `[0, 1]`; callers handle support checks themselves.
#[inline]
pub fn regularized_incomplete(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    beta_reg(a, b, x)
}

/// Validate Beta shape parameters.
pub fn check_shape(a: f64, b: f64) -> Result<()> {
    if !a.is_finite() || a <= 0.0 {
        return Err(Error::InvalidParameter(format!("alpha must be finite and > 0, got {}", a)));
    }
    if !b.is_finite() || b <= 0.0 {
        return Err(Error::InvalidParameter(format!("beta must be finite and > 0, got {}", b)));
    }
    Ok(())
}

/// Convert mean and variance of a Beta law to its `(a, b)` shape parameters.
///
/// Requires `0 < mu < 1` and `0 < var < mu (1 - mu)`.
pub fn mean_variance_to_ab(mu: f64, var: f64) -> Result<(f64, f64)> {
    if !(mu > 0.0 && mu < 1.0) {
        return Err(Error::InvalidParameter(format!("beta mean must be in (0, 1), got {mu}")));
    }
    if !(var > 0.0 && var < mu * (1.0 - mu)) {
        return Err(Error::InvalidParameter(format!(
            "beta variance must be in (0, mu(1-mu)) = (0, {}), got {var}",
            mu * (1.0 - mu)
        )));
    }
    let a = ((1.0 - mu) / var - 1.0 / mu) * mu * mu;
    Ok((a, a * (1.0 / mu - 1.0)))
}

/// Mean and variance of a Beta law with shape `(a, b)`.
pub fn ab_to_mean_variance(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    (a / s, a * b / (s * s * (s + 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ln_beta_known_values() {
        // B(1,1) = 1, B(2,3) = 1/12
        assert_relative_eq!(ln_beta(1.0, 1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(ln_beta(2.0, 3.0), (1.0f64 / 12.0).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_regularized_incomplete_edges_and_symmetry() {
        assert_eq!(regularized_incomplete(2.0, 3.0, -0.5), 0.0);
        assert_eq!(regularized_incomplete(2.0, 3.0, 1.5), 1.0);
        assert_relative_eq!(regularized_incomplete(2.0, 2.0, 0.5), 0.5, epsilon = 1e-12);
        // Uniform: I_x(1,1) = x
        assert_relative_eq!(regularized_incomplete(1.0, 1.0, 0.3), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_moment_conversions_roundtrip() {
        let (a, b) = mean_variance_to_ab(0.3, 0.01).unwrap();
        let (mu, var) = ab_to_mean_variance(a, b);
        assert_relative_eq!(mu, 0.3, epsilon = 1e-12);
        assert_relative_eq!(var, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(check_shape(0.0, 1.0).is_err());
        assert!(check_shape(1.0, -2.0).is_err());
        assert!(mean_variance_to_ab(1.2, 0.01).is_err());
        assert!(mean_variance_to_ab(0.5, 0.3).is_err());
    }
}
