use crate::pdf::BoundedPdf;
use pp_core::{Error, Result, Support};
use pp_prob::math::xlogy;

/// Normalization `∫_min^max x^alpha dx` of an unnormalized power law.
///
/// `ln(max/min)` when `alpha == -1`, otherwise `(max^(alpha+1) - min^(alpha+1)) / (alpha+1)`.
/// No validation: callers decide whether the interval is admissible.
pub fn power_law_norm(min: f64, max: f64, alpha: f64) -> f64 {
    if alpha == -1.0 {
        (max / min).ln()
    } else {
        let k = alpha + 1.0;
        (max.powf(k) - min.powf(k)) / k
    }
}

/// Truncated power law `p(x) ∝ x^alpha` on `[min, max]`.
#[derive(Debug, Clone)]
pub struct PowerLawPdf {
    support: Support,
    alpha: f64,
    norm: f64,
    ln_norm: f64,
}

impl PowerLawPdf {
    /// Create a power law on `[min, max]` with slope `alpha`.
    ///
    /// Requires `0 <= min < max`, and `min > 0` when `alpha <= -1` so the normalization
    /// stays finite.
    pub fn new(min: f64, max: f64, alpha: f64) -> Result<Self> {
        let support = Support::new(min, max)?;
        if !alpha.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "PowerLawPdf alpha must be finite, got {alpha}"
            )));
        }
        if min < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "PowerLawPdf requires min >= 0, got {min}"
            )));
        }
        if min == 0.0 && alpha <= -1.0 {
            return Err(Error::InvalidParameter(format!(
                "PowerLawPdf with alpha={alpha} <= -1 is not normalizable down to min=0"
            )));
        }
        let norm = power_law_norm(min, max, alpha);
        if !norm.is_finite() || norm <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "PowerLawPdf normalization is not finite and positive on [{min}, {max}] with alpha={alpha}: {norm}"
            )));
        }
        Ok(Self { support, alpha, norm, ln_norm: norm.ln() })
    }

    /// Slope.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `ln ∫ x^alpha dx` over the support.
    pub fn ln_norm(&self) -> f64 {
        self.ln_norm
    }
}

impl BoundedPdf for PowerLawPdf {
    fn support(&self) -> Support {
        self.support
    }

    #[inline]
    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        xlogy(self.alpha, x) - self.ln_norm
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let mass = power_law_norm(self.support.min, x, self.alpha) / self.norm;
        mass.clamp(0.0, 1.0).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pp_prob::grid::{linspace, trapezoid};

    #[test]
    fn test_norm_matches_closed_form() {
        assert_relative_eq!(power_law_norm(1.0, 100.0, -1.0), 100.0f64.ln(), epsilon = 1e-14);
        assert_relative_eq!(power_law_norm(0.0, 2.0, 1.0), 2.0, epsilon = 1e-14);
        assert_relative_eq!(power_law_norm(1.0, 10.0, -2.0), 0.9, epsilon = 1e-14);
    }

    #[test]
    fn test_pdf_at_reference_point() {
        let p = PowerLawPdf::new(1.0, 100.0, -2.0).unwrap();
        // norm = 1 - 1/100
        assert_relative_eq!(p.pdf(10.0), 0.01 / 0.99, epsilon = 1e-12);
        assert_eq!(p.cdf(1.0), 0.0);
        assert_relative_eq!(p.cdf(100.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_square_on_one_to_ten() {
        let p = PowerLawPdf::new(1.0, 10.0, -2.0).unwrap();
        assert_relative_eq!(p.ln_norm().exp(), 0.9, epsilon = 1e-14);
        assert_relative_eq!(p.pdf(1.0), 1.0 / 0.9, epsilon = 1e-12);
        assert_relative_eq!(p.cdf(10.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha_minus_one() {
        let p = PowerLawPdf::new(1.0, 100.0, -1.0).unwrap();
        let n = 100.0f64.ln();
        assert_relative_eq!(p.pdf(5.0), 1.0 / (5.0 * n), epsilon = 1e-12);
        assert_relative_eq!(p.cdf(10.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_lower_edge() {
        let p = PowerLawPdf::new(0.0, 2.0, 1.0).unwrap();
        assert_relative_eq!(p.pdf(1.0), 0.5, epsilon = 1e-12);
        assert_eq!(p.pdf(0.0), 0.0);
        assert_relative_eq!(p.cdf(1.0), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_integrates_to_one() {
        let p = PowerLawPdf::new(2.0, 50.0, -2.3).unwrap();
        let x = linspace(2.0, 50.0, 20_001);
        let y: Vec<f64> = x.iter().map(|&v| p.pdf(v)).collect();
        assert_relative_eq!(trapezoid(&y, &x), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(PowerLawPdf::new(5.0, 1.0, -2.0).is_err());
        assert!(PowerLawPdf::new(-1.0, 1.0, 2.0).is_err());
        assert!(PowerLawPdf::new(0.0, 1.0, -1.0).is_err());
        assert!(PowerLawPdf::new(0.0, 1.0, -3.0).is_err());
        assert!(PowerLawPdf::new(1.0, 2.0, f64::NAN).is_err());
    }
}
