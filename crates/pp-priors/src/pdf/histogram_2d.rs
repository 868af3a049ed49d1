use crate::pdf::JointPdf2d;
use crate::pdf::histogram::bin_index;
use crate::sampling::{u01, weighted_index};
use pp_core::{Error, JointSamples, Result, Support};
use pp_prob::grid::linspace;
use rand::RngCore;

/// Piecewise-constant density over the triangle `x2 <= x1` of `[min, max]²`.
///
/// The square is cut into `n × n` equal cells; only cells `(i, j)` with `j <= i` (bin of `x1`
/// at or above the bin of `x2`) carry weight. Weights are stored flat in `j`-major order,
///
/// `flat(i, j) = i + n·j - j(j+1)/2`,
///
/// so `n(n+1)/2` weights describe the grid. Diagonal cells are cut in half by the line
/// `x1 = x2` and count with half their area in the normalization. The density is `0`
/// outside the square and wherever `x1 < x2`.
#[derive(Debug, Clone)]
pub struct BinnedPdf2d {
    support: Support,
    n_bins_1d: usize,
    edges: Vec<f64>,
    bin_width: f64,
    density: Vec<f64>,
    /// `(i, j)` for each flat index.
    cells: Vec<(usize, usize)>,
    /// Cumulative probability mass over flat indices.
    cumulative_mass: Vec<f64>,
}

impl BinnedPdf2d {
    /// Build from triangular weights, one per cell `j <= i`.
    ///
    /// The weight count must be a triangular number `n(n+1)/2`.
    pub fn new(min: f64, max: f64, weights: &[f64]) -> Result<Self> {
        let support = Support::new(min, max)?;
        let len = weights.len();
        let n = (((1.0 + 8.0 * len as f64).sqrt() - 1.0) / 2.0).round() as usize;
        if len == 0 || n * (n + 1) / 2 != len {
            return Err(Error::InvalidParameter(format!(
                "BinnedPdf2d requires a triangular number of weights n(n+1)/2, got {len}"
            )));
        }
        for (k, w) in weights.iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "BinnedPdf2d weight[{k}] must be finite and >= 0, got {w}"
                )));
            }
        }

        let edges = linspace(min, max, n + 1);
        let bin_width = support.width() / n as f64;
        let cell_area = bin_width * bin_width;

        let mut cells = Vec::with_capacity(len);
        for j in 0..n {
            for i in j..n {
                cells.push((i, j));
            }
        }
        let effective: Vec<f64> = cells
            .iter()
            .zip(weights)
            .map(|(&(i, j), &w)| if i == j { 0.5 * w } else { w })
            .collect();
        let total: f64 = effective.iter().sum();
        if total <= 0.0 {
            return Err(Error::InvalidParameter("BinnedPdf2d weights sum to zero".into()));
        }

        let norm = 1.0 / (total * cell_area);
        let density = weights.iter().map(|w| w * norm).collect();
        let mut acc = 0.0;
        let cumulative_mass = effective
            .iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect();

        Ok(Self { support, n_bins_1d: n, edges, bin_width, density, cells, cumulative_mass })
    }

    /// Bins per axis.
    pub fn n_bins_1d(&self) -> usize {
        self.n_bins_1d
    }

    /// Edge range of both axes.
    pub fn support(&self) -> Support {
        self.support
    }

    /// Flat weight index of cell `(i, j)`, or `None` when `j > i` or out of range.
    pub fn flat_index(&self, i: usize, j: usize) -> Option<usize> {
        (j <= i && i < self.n_bins_1d).then(|| i + self.n_bins_1d * j - j * (j + 1) / 2)
    }

    /// Cell `(i, j)` holding `(x1, x2)`, or `None` outside the square or below the diagonal.
    pub fn grid_position(&self, x1: f64, x2: f64) -> Option<(usize, usize)> {
        if !self.support.contains(x1) || !self.support.contains(x2) || x1 < x2 {
            return None;
        }
        Some((bin_index(&self.edges, x1), bin_index(&self.edges, x2)))
    }

    /// Probability mass of every cell, diagonal cells at half area. Sums to `1`.
    pub fn cell_masses(&self) -> Vec<f64> {
        let area = self.bin_width * self.bin_width;
        self.cells
            .iter()
            .zip(&self.density)
            .map(|(&(i, j), d)| if i == j { 0.5 * d * area } else { d * area })
            .collect()
    }
}

impl JointPdf2d for BinnedPdf2d {
    fn log_pdf(&self, x1: f64, x2: f64) -> f64 {
        self.grid_position(x1, x2)
            .and_then(|(i, j)| self.flat_index(i, j))
            .map_or(f64::NEG_INFINITY, |k| self.density[k].ln())
    }

    /// Pick a cell by mass, then draw uniformly inside it. Diagonal cells draw from their
    /// lower triangle so every sample has `x2 <= x1`.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<JointSamples> {
        let mut out = JointSamples::with_capacity(n_samples);
        for _ in 0..n_samples {
            let (i, j) = self.cells[weighted_index(&self.cumulative_mass, u01(rng))];
            let (a, b) = (u01(rng), u01(rng));
            let (x1, x2) = if i == j {
                let lo = self.edges[i];
                (lo + a.max(b) * self.bin_width, lo + a.min(b) * self.bin_width)
            } else {
                (self.edges[i] + a * self.bin_width, self.edges[j] + b * self.bin_width)
            };
            out.push(x1, x2);
        }
        Ok(out)
    }
}
