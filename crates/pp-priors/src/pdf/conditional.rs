use crate::pdf::{BoundedPdf, JointPdf2d, Prior};
use crate::sampling::{CdfTable, u01};
use pp_core::{JointSamples, Result};
use rand::RngCore;

/// Joint law of an ordered pair `x2 <= x1`.
///
/// `x1` follows `outer`; given `x1`, `x2` follows `inner` truncated to `(-inf, x1]`:
///
/// `p(x1, x2) = p_outer(x1) · p_inner(x2) / CDF_inner(x1)` for `x2 <= x1`, else `0`.
///
/// Degenerate corners (`0/0` when `x1` sits below the inner support) evaluate to `-inf`.
#[derive(Debug, Clone)]
pub struct ConditionalPdf2d<O = Prior, I = Prior> {
    outer: O,
    inner: I,
}

impl<O: BoundedPdf, I: BoundedPdf> ConditionalPdf2d<O, I> {
    /// Pair an outer law for `x1` with an inner law for `x2`.
    pub fn new(outer: O, inner: I) -> Self {
        Self { outer, inner }
    }

    /// Law of `x1`.
    pub fn outer(&self) -> &O {
        &self.outer
    }

    /// Untruncated law of `x2`.
    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<O: BoundedPdf, I: BoundedPdf> JointPdf2d for ConditionalPdf2d<O, I> {
    fn log_pdf(&self, x1: f64, x2: f64) -> f64 {
        if !(x2 <= x1) {
            return f64::NEG_INFINITY;
        }
        let lp = self.outer.log_pdf(x1) + self.inner.log_pdf(x2) - self.inner.log_cdf(x1);
        if lp.is_nan() { f64::NEG_INFINITY } else { lp }
    }

    /// Draw `x1` from `outer`, then `x2` from `inner` restricted to `[min, x1]` by scaling the
    /// inner uniform with `CDF_inner(x1)`. `x2 <= x1` holds for every draw.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<JointSamples> {
        let outer = CdfTable::tabulate(self.outer.support(), |x| self.outer.cdf(x))?;
        let inner = CdfTable::tabulate(self.inner.support(), |x| self.inner.cdf(x))?;
        let mut out = JointSamples::with_capacity(n_samples);
        for _ in 0..n_samples {
            let x1 = outer.invert(u01(rng));
            let x2 = inner.invert(u01(rng) * self.inner.cdf(x1));
            out.push(x1, x2.min(x1));
        }
        Ok(out)
    }
}
