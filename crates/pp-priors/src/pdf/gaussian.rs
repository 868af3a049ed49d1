use crate::pdf::BoundedPdf;
use pp_core::{Error, Result, Support};
use pp_prob::normal::{LN_SQRT_2PI, interval_mass};

/// Gaussian `N(mean, sigma)` truncated to `[min, max]`.
///
/// The normalization is the Gaussian mass inside the support,
/// `0.5 * [erf((max-mean)/(sigma√2)) - erf((min-mean)/(sigma√2))]`.
#[derive(Debug, Clone)]
pub struct TruncatedGaussianPdf {
    support: Support,
    mean: f64,
    sigma: f64,
    norm: f64,
    ln_norm: f64,
    ln_sigma: f64,
}

impl TruncatedGaussianPdf {
    /// Create a truncated Gaussian. Requires `sigma > 0` and `min < max`.
    pub fn new(mean: f64, sigma: f64, min: f64, max: f64) -> Result<Self> {
        let support = Support::new(min, max)?;
        if !mean.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "TruncatedGaussianPdf mean must be finite, got {mean}"
            )));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "TruncatedGaussianPdf sigma must be finite and > 0, got {sigma}"
            )));
        }
        let norm = interval_mass(min, max, mean, sigma);
        if !norm.is_finite() || norm <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "TruncatedGaussianPdf N({mean}, {sigma}) has no mass on [{min}, {max}]"
            )));
        }
        Ok(Self { support, mean, sigma, norm, ln_norm: norm.ln(), ln_sigma: sigma.ln() })
    }

    /// Location of the untruncated Gaussian.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Scale of the untruncated Gaussian.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Gaussian mass inside the support.
    pub fn norm(&self) -> f64 {
        self.norm
    }
}

impl BoundedPdf for TruncatedGaussianPdf {
    fn support(&self) -> Support {
        self.support
    }

    #[inline]
    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sigma;
        -0.5 * z * z - self.ln_sigma - LN_SQRT_2PI - self.ln_norm
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let mass = interval_mass(self.support.min, x, self.mean, self.sigma) / self.norm;
        mass.clamp(0.0, 1.0).ln()
    }
}
