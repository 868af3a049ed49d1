//! Mixtures of power laws and truncated Gaussians.

use crate::pdf::{BoundedPdf, PowerLawPdf, TruncatedGaussianPdf};
use pp_core::{Error, Result, Support};
use pp_prob::math::{log1pexp, logaddexp, logsumexp};

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidParameter(format!("{name} must lie in [0, 1], got {value}")));
    }
    Ok(())
}

/// `(1 - λ) · PowerLaw + λ · TruncatedGaussian`, supported on the union of both supports.
#[derive(Debug, Clone)]
pub struct PowerLawGaussianPdf {
    power_law: PowerLawPdf,
    gaussian: TruncatedGaussianPdf,
    lambda_peak: f64,
    support: Support,
}

impl PowerLawGaussianPdf {
    /// Mix a power law with a Gaussian peak of weight `lambda_peak ∈ [0, 1]`.
    pub fn new(
        power_law: PowerLawPdf,
        gaussian: TruncatedGaussianPdf,
        lambda_peak: f64,
    ) -> Result<Self> {
        check_fraction("PowerLawGaussianPdf lambda_peak", lambda_peak)?;
        let support = power_law.support().union(&gaussian.support());
        Ok(Self { power_law, gaussian, lambda_peak, support })
    }

    /// Weight of the Gaussian component.
    pub fn lambda_peak(&self) -> f64 {
        self.lambda_peak
    }
}

impl BoundedPdf for PowerLawGaussianPdf {
    fn support(&self) -> Support {
        self.support
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        logaddexp(
            (-self.lambda_peak).ln_1p() + self.power_law.log_pdf(x),
            self.lambda_peak.ln() + self.gaussian.log_pdf(x),
        )
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let c = (1.0 - self.lambda_peak) * self.power_law.cdf(x)
            + self.lambda_peak * self.gaussian.cdf(x);
        c.min(1.0).ln()
    }
}

/// Two power laws joined continuously at `min + b (max - min)`.
///
/// Below the break the density follows `x^alpha_1`; above it `x^alpha_2`, rescaled so the
/// two pieces meet at the break point.
#[derive(Debug, Clone)]
pub struct BrokenPowerLawPdf {
    lower: PowerLawPdf,
    upper: PowerLawPdf,
    break_point: f64,
    log_ratio: f64,
    ln_norm: f64,
    support: Support,
}

impl BrokenPowerLawPdf {
    /// Create a broken power law with break fraction `b ∈ (0, 1)`.
    pub fn new(min: f64, max: f64, alpha_1: f64, alpha_2: f64, b: f64) -> Result<Self> {
        let support = Support::new(min, max)?;
        if !(b > 0.0 && b < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "BrokenPowerLawPdf break fraction must lie in (0, 1), got {b}"
            )));
        }
        let break_point = min + b * support.width();
        let lower = PowerLawPdf::new(min, break_point, alpha_1)?;
        let upper = PowerLawPdf::new(break_point, max, alpha_2)?;
        let log_ratio =
            lower.log_pdf_unclamped(break_point) - upper.log_pdf_unclamped(break_point);
        if !log_ratio.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "BrokenPowerLawPdf pieces cannot be matched at the break point {break_point}"
            )));
        }
        Ok(Self { lower, upper, break_point, log_ratio, ln_norm: log1pexp(log_ratio), support })
    }

    /// Location of the break.
    pub fn break_point(&self) -> f64 {
        self.break_point
    }
}

impl BoundedPdf for BrokenPowerLawPdf {
    fn support(&self) -> Support {
        self.support
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        let piece = if x <= self.break_point {
            self.lower.log_pdf_unclamped(x)
        } else {
            self.upper.log_pdf_unclamped(x) + self.log_ratio
        };
        piece - self.ln_norm
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let c = (self.lower.cdf(x) + self.upper.cdf(x) * self.log_ratio.exp())
            / self.ln_norm.exp();
        c.min(1.0).ln()
    }
}

/// Power law plus a low and a high Gaussian peak.
///
/// Weights are `1 - λ` for the power law, `λ λ_low` for the low peak and `λ (1 - λ_low)`
/// for the high peak.
#[derive(Debug, Clone)]
pub struct PowerLawTwoGaussiansPdf {
    power_law: PowerLawPdf,
    low: TruncatedGaussianPdf,
    high: TruncatedGaussianPdf,
    weights: [f64; 3],
    support: Support,
}

impl PowerLawTwoGaussiansPdf {
    /// Mix a power law with two Gaussian peaks.
    pub fn new(
        power_law: PowerLawPdf,
        low: TruncatedGaussianPdf,
        high: TruncatedGaussianPdf,
        lambda_peak: f64,
        lambda_low: f64,
    ) -> Result<Self> {
        check_fraction("PowerLawTwoGaussiansPdf lambda_peak", lambda_peak)?;
        check_fraction("PowerLawTwoGaussiansPdf lambda_low", lambda_low)?;
        let support = power_law.support().union(&low.support()).union(&high.support());
        let weights =
            [1.0 - lambda_peak, lambda_peak * lambda_low, lambda_peak * (1.0 - lambda_low)];
        Ok(Self { power_law, low, high, weights, support })
    }

    /// Component weights `[power law, low peak, high peak]`.
    pub fn weights(&self) -> [f64; 3] {
        self.weights
    }
}

impl BoundedPdf for PowerLawTwoGaussiansPdf {
    fn support(&self) -> Support {
        self.support
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        let [w_pl, w_low, w_high] = self.weights;
        logsumexp(&[
            w_pl.ln() + self.power_law.log_pdf(x),
            w_low.ln() + self.low.log_pdf(x),
            w_high.ln() + self.high.log_pdf(x),
        ])
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let [w_pl, w_low, w_high] = self.weights;
        let c = w_pl * self.power_law.cdf(x) + w_low * self.low.cdf(x) + w_high * self.high.cdf(x);
        c.min(1.0).ln()
    }
}
