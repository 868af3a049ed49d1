use crate::pdf::spline::{DEFAULT_X_RANGE, SplineWrapper};
use crate::pdf::BoundedPdf;
use pp_core::{Result, Support};
use pp_prob::normal::{standard_cdf, standard_logpdf};
use pp_prob::transforms::{AffineBijector, Bijector};
use statrs::function::erf::erf;
use std::f64::consts::SQRT_2;

/// Variable-shape density obtained by pushing a truncated standard normal through a
/// monotone spline.
///
/// A latent `x ~ N(0, 1)` truncated to `[-r, r]` is mapped by a [`SplineWrapper`] `y = s(x)`,
/// and the spline image `[y(-r), y(r)]` is mapped affinely onto `[min, max]`. For
/// `m ∈ [min, max]`:
///
/// `ln p(m) = ln φ(x) - ln |s'(x)| + ln(Δy / Δm) - ln erf(r/√2)`
///
/// with `x = s⁻¹(y)` and `y` the affine preimage of `m`. Zero slopes reproduce a Gaussian
/// centred on the interval with `sigma = (max - min) / 2r`.
#[derive(Debug, Clone)]
pub struct FlexiblePdf {
    support: Support,
    spline: SplineWrapper,
    to_latent: AffineBijector,
    ln_norm: f64,
    norm: f64,
    latent_floor: f64,
}

impl FlexiblePdf {
    /// Build from target bounds, slope parameters and latent half-width `x_range`.
    pub fn new(min: f64, max: f64, slopes: &[f64], x_range: f64) -> Result<Self> {
        let support = Support::new(min, max)?;
        let spline = SplineWrapper::new(slopes, x_range)?;
        let to_latent = AffineBijector::between(support, spline.y_range())?;
        let norm = 1.0 / erf(x_range / SQRT_2);
        Ok(Self {
            support,
            spline,
            to_latent,
            ln_norm: norm.ln(),
            norm,
            latent_floor: standard_cdf(-x_range),
        })
    }

    /// Same as [`new`](Self::new) with `x_range = 3`.
    pub fn with_default_range(min: f64, max: f64, slopes: &[f64]) -> Result<Self> {
        Self::new(min, max, slopes, DEFAULT_X_RANGE)
    }

    /// The underlying latent map.
    pub fn spline(&self) -> &SplineWrapper {
        &self.spline
    }
}

impl BoundedPdf for FlexiblePdf {
    fn support(&self) -> Support {
        self.support
    }

    fn log_pdf_unclamped(&self, m: f64) -> f64 {
        let y = self.to_latent.forward(m);
        let Some(x) = self.spline.inverse(y) else {
            return f64::NEG_INFINITY;
        };
        let Some(slope) = self.spline.derivative(x) else {
            return f64::NEG_INFINITY;
        };
        standard_logpdf(x) - slope.abs().ln() + self.to_latent.log_abs_det_jacobian(m)
            + self.ln_norm
    }

    fn log_cdf_unclamped(&self, m: f64) -> f64 {
        let y = self.to_latent.forward(m);
        let y_range = self.spline.y_range();
        let c = match self.spline.inverse(y) {
            Some(x) => (standard_cdf(x) - self.latent_floor) * self.norm,
            None if y < y_range.min => 0.0,
            None => 1.0,
        };
        c.clamp(0.0, 1.0).ln()
    }
}
