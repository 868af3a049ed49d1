use crate::pdf::BoundedPdf;
use crate::sampling::{u01, weighted_index};
use pp_core::{Error, Result, Support};
use pp_prob::grid::{cumsum, linspace};
use rand::RngCore;

/// Locate the bin of `x` on equally spaced `edges`.
///
/// Bins are half-open `[e_i, e_{i+1})`, except the last which also contains the upper edge.
/// `x` must lie inside `[edges[0], edges[last]]`.
#[inline]
pub(crate) fn bin_index(edges: &[f64], x: f64) -> usize {
    let n_bins = edges.len() - 1;
    edges.partition_point(|&e| e <= x).clamp(1, n_bins) - 1
}

/// Piecewise-constant density on `n` equal-width bins of `[min, max]`.
///
/// `p(x) = w_i / (Σ w · Δ)` inside bin `i`; the CDF is piecewise linear.
#[derive(Debug, Clone)]
pub struct BinnedPdf {
    support: Support,
    edges: Vec<f64>,
    density: Vec<f64>,
    log_density: Vec<f64>,
    /// CDF at each edge (`n + 1` values, first `0`, last `1`).
    cdf_edges: Vec<f64>,
    /// Index of the last bin with positive weight.
    last_filled: usize,
}

impl BinnedPdf {
    /// Build from non-negative bin weights with positive total.
    pub fn new(min: f64, max: f64, weights: &[f64]) -> Result<Self> {
        let support = Support::new(min, max)?;
        if weights.is_empty() {
            return Err(Error::InvalidParameter("BinnedPdf requires at least 1 bin".into()));
        }
        for (i, w) in weights.iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "BinnedPdf weight[{i}] must be finite and >= 0, got {w}"
                )));
            }
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(Error::InvalidParameter("BinnedPdf weights sum to zero".into()));
        }

        let edges = linspace(min, max, weights.len() + 1);
        let bin_width = support.width() / weights.len() as f64;
        let density: Vec<f64> = weights.iter().map(|w| w / (total * bin_width)).collect();
        let log_density = density.iter().map(|d| d.ln()).collect();

        let fractions: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let mut cdf_edges = Vec::with_capacity(edges.len());
        cdf_edges.push(0.0);
        cdf_edges.extend(cumsum(&fractions));
        if let Some(last) = cdf_edges.last_mut() {
            *last = 1.0;
        }

        let last_filled = density.iter().rposition(|&d| d > 0.0).unwrap_or(0);

        Ok(Self { support, edges, density, log_density, cdf_edges, last_filled })
    }

    /// Bin edges (`n + 1` values).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Density value in each bin.
    pub fn densities(&self) -> &[f64] {
        &self.density
    }
}

impl BoundedPdf for BinnedPdf {
    fn support(&self) -> Support {
        self.support
    }

    #[inline]
    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        self.log_density[bin_index(&self.edges, x)]
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        let i = bin_index(&self.edges, x);
        let c = self.cdf_edges[i] + self.density[i] * (x - self.edges[i]);
        c.clamp(0.0, 1.0).ln()
    }

    /// Exact inversion of the piecewise-linear CDF. Empty bins are never drawn.
    ///
    /// The cumulative sum of the weights may end just below the forced final `1`, so `u` is
    /// capped at the last filled bin. Draws stay inside their half-open bin.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        let upper = &self.cdf_edges[1..];
        let n_bins = self.density.len();
        Ok((0..n_samples)
            .map(|_| {
                let u = u01(rng);
                let i = weighted_index(upper, u).min(self.last_filled);
                let hi = if i + 1 == n_bins {
                    self.edges[i + 1]
                } else {
                    self.edges[i + 1].next_down()
                };
                let x = self.edges[i] + (u - self.cdf_edges[i]) / self.density[i];
                x.clamp(self.edges[i], hi)
            })
            .collect())
    }
}
