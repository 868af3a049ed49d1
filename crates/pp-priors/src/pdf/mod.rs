//! Bounded 1D and 2D population densities.
//!
//! Every 1D law implements [`BoundedPdf`]: it supplies unclamped `log_pdf`/`log_cdf` inside
//! its support and inherits the clamping, batch evaluation and inverse-CDF sampling. 2D laws
//! implement [`JointPdf2d`].

use crate::sampling::CdfTable;
use pp_core::{Error, JointSamples, Result, Support};
use rand::RngCore;

mod beta;
mod bivariate;
mod conditional;
mod flow;
mod gaussian;
mod histogram;
mod histogram_2d;
mod magnitude;
mod mixture;
mod power_law;
mod smoothed;
mod spline;

pub use beta::{BetaPdf, TruncatedBetaPdf};
pub use bivariate::{BIVARIATE_PROPOSALS, BivariateGaussianPdf};
pub use conditional::ConditionalPdf2d;
pub use flow::FlexiblePdf;
pub use gaussian::TruncatedGaussianPdf;
pub use histogram::BinnedPdf;
pub use histogram_2d::BinnedPdf2d;
pub use magnitude::MagnitudePowerLawPdf;
pub use mixture::{BrokenPowerLawPdf, PowerLawGaussianPdf, PowerLawTwoGaussiansPdf};
pub use power_law::{PowerLawPdf, power_law_norm};
pub use smoothed::{SMOOTHING_GRID_POINTS, SmoothedPdf, log_window_factor, window_factor};
pub use spline::{DEFAULT_X_RANGE, INVERSE_TABLE_POINTS, SplineWrapper};

fn check_batch_len(what: &str, n_in: usize, n_out: usize) -> Result<()> {
    if n_in != n_out {
        return Err(Error::InvalidParameter(format!(
            "{what}: output length mismatch: expected {n_in}, got {n_out}"
        )));
    }
    Ok(())
}

/// A normalized density on a closed support `[min, max]`.
///
/// Implementors only provide [`support`](Self::support) and the unclamped
/// `log_pdf_unclamped`/`log_cdf_unclamped`, which are called for `x` inside the support.
/// The provided methods apply the boundary conventions:
///
/// - `log_pdf(x) = -inf` outside `[min, max]` (and for NaN);
/// - `log_cdf(x) = -inf` below `min`, `0` above `max`.
///
/// Out-of-support evaluation is never an error.
pub trait BoundedPdf: Send + Sync {
    /// Closed support of the density.
    fn support(&self) -> Support;

    /// `ln p(x)` for `x` inside the support.
    fn log_pdf_unclamped(&self, x: f64) -> f64;

    /// `ln P(X <= x)` for `x` inside the support.
    fn log_cdf_unclamped(&self, x: f64) -> f64;

    /// `ln p(x)`, `-inf` outside the support.
    #[inline]
    fn log_pdf(&self, x: f64) -> f64 {
        if self.support().contains(x) { self.log_pdf_unclamped(x) } else { f64::NEG_INFINITY }
    }

    /// `ln P(X <= x)`: `-inf` below the support, `0` above it.
    #[inline]
    fn log_cdf(&self, x: f64) -> f64 {
        let s = self.support();
        if x > s.max {
            0.0
        } else if s.contains(x) {
            self.log_cdf_unclamped(x)
        } else {
            f64::NEG_INFINITY
        }
    }

    /// `p(x)`.
    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        self.log_pdf(x).exp()
    }

    /// `P(X <= x)`.
    #[inline]
    fn cdf(&self, x: f64) -> f64 {
        self.log_cdf(x).exp()
    }

    /// Evaluate [`log_pdf`](Self::log_pdf) elementwise. `out` must have the length of `xs`.
    fn log_pdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        check_batch_len("log_pdf_batch", xs.len(), out.len())?;
        for (o, &x) in out.iter_mut().zip(xs) {
            *o = self.log_pdf(x);
        }
        Ok(())
    }

    /// Evaluate [`log_cdf`](Self::log_cdf) elementwise. `out` must have the length of `xs`.
    fn log_cdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        check_batch_len("log_cdf_batch", xs.len(), out.len())?;
        for (o, &x) in out.iter_mut().zip(xs) {
            *o = self.log_cdf(x);
        }
        Ok(())
    }

    /// Evaluate [`pdf`](Self::pdf) elementwise. `out` must have the length of `xs`.
    fn pdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        self.log_pdf_batch(xs, out)?;
        out.iter_mut().for_each(|v| *v = v.exp());
        Ok(())
    }

    /// Evaluate [`cdf`](Self::cdf) elementwise. `out` must have the length of `xs`.
    fn cdf_batch(&self, xs: &[f64], out: &mut [f64]) -> Result<()> {
        self.log_cdf_batch(xs, out)?;
        out.iter_mut().for_each(|v| *v = v.exp());
        Ok(())
    }

    /// Draw `n_samples` values by inverting a tabulated CDF.
    ///
    /// The CDF is evaluated on [`SAMPLE_GRID_POINTS`](crate::sampling::SAMPLE_GRID_POINTS)
    /// equally spaced points over the support.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let table = CdfTable::tabulate(self.support(), |x| self.cdf(x))?;
        Ok(table.sample(n_samples, rng))
    }
}

/// A normalized density over pairs `(x1, x2)`.
pub trait JointPdf2d: Send + Sync {
    /// `ln p(x1, x2)`, `-inf` where the density vanishes.
    fn log_pdf(&self, x1: f64, x2: f64) -> f64;

    /// Draw `n_samples` pairs.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<JointSamples>;

    /// `p(x1, x2)`.
    #[inline]
    fn pdf(&self, x1: f64, x2: f64) -> f64 {
        self.log_pdf(x1, x2).exp()
    }

    /// Evaluate [`log_pdf`](Self::log_pdf) over paired coordinates.
    fn log_pdf_batch(&self, x1: &[f64], x2: &[f64], out: &mut [f64]) -> Result<()> {
        if x1.len() != x2.len() {
            return Err(Error::InvalidParameter(format!(
                "log_pdf_batch: coordinate length mismatch: x1 has {}, x2 has {}",
                x1.len(),
                x2.len()
            )));
        }
        check_batch_len("log_pdf_batch", x1.len(), out.len())?;
        for ((o, &a), &b) in out.iter_mut().zip(x1).zip(x2) {
            *o = self.log_pdf(a, b);
        }
        Ok(())
    }

    /// Evaluate [`pdf`](Self::pdf) over paired coordinates.
    fn pdf_batch(&self, x1: &[f64], x2: &[f64], out: &mut [f64]) -> Result<()> {
        self.log_pdf_batch(x1, x2, out)?;
        out.iter_mut().for_each(|v| *v = v.exp());
        Ok(())
    }
}

/// Any 1D population prior.
///
/// A closed set of the bounded 1D laws, so wrappers (smoothing, conditioning) and the JSON
/// spec can hold "some 1D distribution" by value.
#[derive(Debug, Clone)]
pub enum Prior {
    /// [`PowerLawPdf`].
    PowerLaw(PowerLawPdf),
    /// [`BetaPdf`].
    Beta(BetaPdf),
    /// [`TruncatedBetaPdf`].
    TruncatedBeta(TruncatedBetaPdf),
    /// [`TruncatedGaussianPdf`].
    TruncatedGaussian(TruncatedGaussianPdf),
    /// [`PowerLawGaussianPdf`].
    PowerLawGaussian(PowerLawGaussianPdf),
    /// [`BrokenPowerLawPdf`].
    BrokenPowerLaw(BrokenPowerLawPdf),
    /// [`PowerLawTwoGaussiansPdf`].
    PowerLawTwoGaussians(PowerLawTwoGaussiansPdf),
    /// [`MagnitudePowerLawPdf`].
    MagnitudePowerLaw(MagnitudePowerLawPdf),
    /// [`FlexiblePdf`].
    Flexible(FlexiblePdf),
    /// [`BinnedPdf`].
    Binned(BinnedPdf),
    /// [`SmoothedPdf`].
    Smoothed(Box<SmoothedPdf>),
}

macro_rules! dispatch_prior {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            Prior::PowerLaw($p) => $body,
            Prior::Beta($p) => $body,
            Prior::TruncatedBeta($p) => $body,
            Prior::TruncatedGaussian($p) => $body,
            Prior::PowerLawGaussian($p) => $body,
            Prior::BrokenPowerLaw($p) => $body,
            Prior::PowerLawTwoGaussians($p) => $body,
            Prior::MagnitudePowerLaw($p) => $body,
            Prior::Flexible($p) => $body,
            Prior::Binned($p) => $body,
            Prior::Smoothed($p) => $body,
        }
    };
}

impl Prior {
    /// Short variant name, as used in the JSON spec `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Prior::PowerLaw(_) => "power_law",
            Prior::Beta(_) => "beta",
            Prior::TruncatedBeta(_) => "truncated_beta",
            Prior::TruncatedGaussian(_) => "truncated_gaussian",
            Prior::PowerLawGaussian(_) => "power_law_gaussian",
            Prior::BrokenPowerLaw(_) => "broken_power_law",
            Prior::PowerLawTwoGaussians(_) => "power_law_two_gaussians",
            Prior::MagnitudePowerLaw(_) => "magnitude_power_law",
            Prior::Flexible(_) => "flexible",
            Prior::Binned(_) => "binned",
            Prior::Smoothed(_) => "smoothed",
        }
    }
}

impl BoundedPdf for Prior {
    fn support(&self) -> Support {
        dispatch_prior!(self, p => p.support())
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        dispatch_prior!(self, p => p.log_pdf_unclamped(x))
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        dispatch_prior!(self, p => p.log_cdf_unclamped(x))
    }

    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        dispatch_prior!(self, p => p.sample(n_samples, rng))
    }
}

macro_rules! impl_into_prior {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Prior {
                fn from(p: $ty) -> Self {
                    Prior::$variant(p)
                }
            }
        )*
    };
}

impl_into_prior!(
    PowerLaw(PowerLawPdf),
    Beta(BetaPdf),
    TruncatedBeta(TruncatedBetaPdf),
    TruncatedGaussian(TruncatedGaussianPdf),
    PowerLawGaussian(PowerLawGaussianPdf),
    BrokenPowerLaw(BrokenPowerLawPdf),
    PowerLawTwoGaussians(PowerLawTwoGaussiansPdf),
    MagnitudePowerLaw(MagnitudePowerLawPdf),
    Flexible(FlexiblePdf),
    Binned(BinnedPdf),
);

impl From<SmoothedPdf> for Prior {
    fn from(p: SmoothedPdf) -> Self {
        Prior::Smoothed(Box::new(p))
    }
}

/// Any 2D population prior.
#[derive(Debug, Clone)]
pub enum Joint2d {
    /// [`ConditionalPdf2d`] over two [`Prior`]s.
    Conditional(ConditionalPdf2d),
    /// [`BivariateGaussianPdf`].
    BivariateGaussian(BivariateGaussianPdf),
    /// [`BinnedPdf2d`].
    Binned(BinnedPdf2d),
}

impl JointPdf2d for Joint2d {
    fn log_pdf(&self, x1: f64, x2: f64) -> f64 {
        match self {
            Joint2d::Conditional(p) => p.log_pdf(x1, x2),
            Joint2d::BivariateGaussian(p) => p.log_pdf(x1, x2),
            Joint2d::Binned(p) => p.log_pdf(x1, x2),
        }
    }

    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<JointSamples> {
        match self {
            Joint2d::Conditional(p) => p.sample(n_samples, rng),
            Joint2d::BivariateGaussian(p) => p.sample(n_samples, rng),
            Joint2d::Binned(p) => p.sample(n_samples, rng),
        }
    }
}

impl From<ConditionalPdf2d> for Joint2d {
    fn from(p: ConditionalPdf2d) -> Self {
        Joint2d::Conditional(p)
    }
}

impl From<BivariateGaussianPdf> for Joint2d {
    fn from(p: BivariateGaussianPdf) -> Self {
        Joint2d::BivariateGaussian(p)
    }
}

impl From<BinnedPdf2d> for Joint2d {
    fn from(p: BinnedPdf2d) -> Self {
        Joint2d::Binned(p)
    }
}
