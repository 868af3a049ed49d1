use crate::pdf::BoundedPdf;
use pp_core::{Error, Result, Support};
use pp_prob::beta::{
    ab_to_mean_variance, check_shape, ln_beta, mean_variance_to_ab, regularized_incomplete,
};
use pp_prob::math::{xlog1py, xlogy};

/// Beta distribution on `[0, 1]`: `p(x) = x^(a-1) (1-x)^(b-1) / B(a, b)`.
#[derive(Debug, Clone)]
pub struct BetaPdf {
    alpha: f64,
    beta: f64,
    ln_norm: f64,
}

impl BetaPdf {
    /// Create a Beta law with shapes `alpha > 0`, `beta > 0`.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_shape(alpha, beta)?;
        Ok(Self { alpha, beta, ln_norm: ln_beta(alpha, beta) })
    }

    /// Create a Beta law from its mean and variance.
    pub fn from_mean_variance(mean: f64, variance: f64) -> Result<Self> {
        let (a, b) = mean_variance_to_ab(mean, variance)?;
        Self::new(a, b)
    }

    /// Shape parameters `(alpha, beta)`.
    pub fn shape(&self) -> (f64, f64) {
        (self.alpha, self.beta)
    }

    /// `(mean, variance)` of the law.
    pub fn mean_variance(&self) -> (f64, f64) {
        ab_to_mean_variance(self.alpha, self.beta)
    }
}

#[inline]
fn beta_kernel(alpha: f64, beta: f64, x: f64) -> f64 {
    xlogy(alpha - 1.0, x) + xlog1py(beta - 1.0, -x)
}

impl BoundedPdf for BetaPdf {
    fn support(&self) -> Support {
        Support { min: 0.0, max: 1.0 }
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        beta_kernel(self.alpha, self.beta, x) - self.ln_norm
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        regularized_incomplete(self.alpha, self.beta, x).ln()
    }
}

/// Beta law restricted to `[0, max]` and renormalized by `I_max(a, b)`.
#[derive(Debug, Clone)]
pub struct TruncatedBetaPdf {
    alpha: f64,
    beta: f64,
    max: f64,
    mass_below_max: f64,
    ln_norm: f64,
}

impl TruncatedBetaPdf {
    /// Create a truncated Beta law with shapes `alpha, beta > 0` and upper edge `0 < max <= 1`.
    pub fn new(alpha: f64, beta: f64, max: f64) -> Result<Self> {
        check_shape(alpha, beta)?;
        if !(max > 0.0 && max <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "TruncatedBetaPdf requires 0 < max <= 1, got {max}"
            )));
        }
        let mass_below_max = regularized_incomplete(alpha, beta, max);
        if !mass_below_max.is_finite() || mass_below_max <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "TruncatedBetaPdf has no mass below max={max} for alpha={alpha}, beta={beta}"
            )));
        }
        let ln_norm = ln_beta(alpha, beta) + mass_below_max.ln();
        Ok(Self { alpha, beta, max, mass_below_max, ln_norm })
    }

    /// Shape parameters `(alpha, beta)`.
    pub fn shape(&self) -> (f64, f64) {
        (self.alpha, self.beta)
    }
}

impl BoundedPdf for TruncatedBetaPdf {
    fn support(&self) -> Support {
        Support { min: 0.0, max: self.max }
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        beta_kernel(self.alpha, self.beta, x) - self.ln_norm
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        (regularized_incomplete(self.alpha, self.beta, x) / self.mass_below_max).min(1.0).ln()
    }
}
