//! Inverse-transform sampling helpers.
//!
//! Samplers take an explicit `&mut dyn RngCore`; nothing in this crate touches a global
//! random source. Seed a `rand::rngs::StdRng` for reproducible draws.

use pp_core::{Error, Result, Support};
use pp_prob::grid::{interp, linspace};
use rand::RngCore;

/// Number of grid points used to tabulate a CDF for inverse-transform sampling.
///
/// The inverse is piecewise linear between grid nodes, so sample accuracy is bounded by
/// `support.width() / SAMPLE_GRID_POINTS`.
pub const SAMPLE_GRID_POINTS: usize = 10_000;

/// Uniform variate in `[0, 1)` built from the top 53 bits of one `u64`.
#[inline]
pub fn u01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// A CDF tabulated on a uniform grid over a support, inverted by linear interpolation.
#[derive(Debug, Clone)]
pub struct CdfTable {
    x: Vec<f64>,
    cdf: Vec<f64>,
}

impl CdfTable {
    /// Tabulate `cdf` on [`SAMPLE_GRID_POINTS`] points over `support`.
    pub fn tabulate(support: Support, cdf: impl Fn(f64) -> f64) -> Result<Self> {
        Self::tabulate_with(support, SAMPLE_GRID_POINTS, cdf)
    }

    /// Tabulate `cdf` on `n_points` points over `support`.
    ///
    /// Tabulated values are clamped into `[0, 1]` and forced non-decreasing, so quadrature
    /// noise in a numerically built CDF cannot fold the inverse back on itself.
    pub fn tabulate_with(
        support: Support,
        n_points: usize,
        cdf: impl Fn(f64) -> f64,
    ) -> Result<Self> {
        if n_points < 2 {
            return Err(Error::InvalidParameter(format!(
                "CdfTable requires at least 2 grid points, got {n_points}"
            )));
        }
        let x = linspace(support.min, support.max, n_points);
        let mut values = Vec::with_capacity(n_points);
        let mut running = 0.0f64;
        for &xi in &x {
            let c = cdf(xi);
            if c.is_nan() {
                return Err(Error::Computation(format!("CDF is NaN at x={xi}")));
            }
            running = running.max(c.clamp(0.0, 1.0));
            values.push(running);
        }
        let top = running;
        if top <= 0.0 {
            return Err(Error::Computation(format!(
                "tabulated CDF never rises above 0 on [{}, {}]",
                support.min, support.max
            )));
        }
        Ok(Self { x, cdf: values })
    }

    /// Grid abscissae.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Tabulated CDF values.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Approximate quantile function: the `x` with `CDF(x) = u`.
    #[inline]
    pub fn invert(&self, u: f64) -> f64 {
        interp(u, &self.cdf, &self.x)
    }

    /// Draw `n_samples` values by inverting uniform variates.
    pub fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..n_samples).map(|_| self.invert(u01(rng))).collect()
    }
}

/// Index `i` with `cumulative[i-1] <= target < cumulative[i]` for non-decreasing `cumulative`.
///
/// Zero-weight entries (flat runs) are never selected.
#[inline]
pub(crate) fn weighted_index(cumulative: &[f64], target: f64) -> usize {
    cumulative.partition_point(|&c| c <= target).min(cumulative.len().saturating_sub(1))
}
