use crate::pdf::JointPdf2d;
use crate::sampling::{u01, weighted_index};
use pp_core::{Error, JointSamples, Result, Support};
use pp_prob::normal::{LN_SQRT_2PI, log_interval_mass};
use rand::RngCore;

/// Number of uniform proposals used by [`BivariateGaussianPdf::sample`].
pub const BIVARIATE_PROPOSALS: usize = 10_000;

/// Bivariate Gaussian truncated to a rectangle.
///
/// Factorized as the truncated marginal of `x1` times the truncated conditional of `x2`
/// given `x1`:
///
/// - `x2 | x1 ~ N(m2 + c/v1 (x1 - m1), v2 - c²/v1)` truncated to the `x2` bounds,
///   renormalized for every `x1`.
///
/// The result is a proper density on the rectangle, though not the rectangle-truncated
/// joint Gaussian.
#[derive(Debug, Clone)]
pub struct BivariateGaussianPdf {
    x1: Support,
    x2: Support,
    mean: [f64; 2],
    covariance: [[f64; 2]; 2],
    sigma1: f64,
    cond_sigma: f64,
    ln_norm1: f64,
}

impl BivariateGaussianPdf {
    /// Create from rectangle bounds, means and a symmetric covariance matrix.
    ///
    /// Requires positive variances and a positive conditional variance
    /// `v2 - c²/v1` (i.e. a positive-definite covariance).
    pub fn new(
        x1: Support,
        x2: Support,
        mean: [f64; 2],
        covariance: [[f64; 2]; 2],
    ) -> Result<Self> {
        Support::new(x1.min, x1.max)?;
        Support::new(x2.min, x2.max)?;
        if !mean.iter().all(|m| m.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "BivariateGaussianPdf means must be finite, got {mean:?}"
            )));
        }
        let [[v1, c12], [c21, v2]] = covariance;
        if !(v1.is_finite() && v1 > 0.0 && v2.is_finite() && v2 > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "BivariateGaussianPdf variances must be finite and > 0, got ({v1}, {v2})"
            )));
        }
        if !c12.is_finite() || c12 != c21 {
            return Err(Error::InvalidParameter(format!(
                "BivariateGaussianPdf covariance must be finite and symmetric, got ({c12}, {c21})"
            )));
        }
        let cond_var = v2 - c12 * c12 / v1;
        if cond_var <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "BivariateGaussianPdf covariance is not positive definite (conditional variance {cond_var})"
            )));
        }
        let sigma1 = v1.sqrt();
        let ln_norm1 = log_interval_mass(x1.min, x1.max, mean[0], sigma1);
        if !ln_norm1.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "BivariateGaussianPdf marginal has no mass on [{}, {}]",
                x1.min, x1.max
            )));
        }
        Ok(Self {
            x1,
            x2,
            mean,
            covariance,
            sigma1,
            cond_sigma: cond_var.sqrt(),
            ln_norm1,
        })
    }

    /// Bounds of the first coordinate.
    pub fn x1_support(&self) -> Support {
        self.x1
    }

    /// Bounds of the second coordinate.
    pub fn x2_support(&self) -> Support {
        self.x2
    }

    fn conditional_mean(&self, x1: f64) -> f64 {
        let [[v1, c12], _] = self.covariance;
        self.mean[1] + c12 / v1 * (x1 - self.mean[0])
    }
}

impl JointPdf2d for BivariateGaussianPdf {
    fn log_pdf(&self, x1: f64, x2: f64) -> f64 {
        if !self.x1.contains(x1) || !self.x2.contains(x2) {
            return f64::NEG_INFINITY;
        }
        let z1 = (x1 - self.mean[0]) / self.sigma1;
        let marginal = -0.5 * z1 * z1 - self.sigma1.ln() - LN_SQRT_2PI - self.ln_norm1;

        let cond_mean = self.conditional_mean(x1);
        let ln_cond_norm =
            log_interval_mass(self.x2.min, self.x2.max, cond_mean, self.cond_sigma);
        if !ln_cond_norm.is_finite() {
            return f64::NEG_INFINITY;
        }
        let z2 = (x2 - cond_mean) / self.cond_sigma;
        let conditional = -0.5 * z2 * z2 - self.cond_sigma.ln() - LN_SQRT_2PI - ln_cond_norm;

        let lp = marginal + conditional;
        if lp.is_nan() || lp == f64::INFINITY { f64::NEG_INFINITY } else { lp }
    }

    /// Weighted resampling of [`BIVARIATE_PROPOSALS`] uniform proposals over the rectangle.
    ///
    /// Draws are with replacement, so repeated pairs are expected for large `n_samples`.
    fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<JointSamples> {
        let mut proposals = Vec::with_capacity(BIVARIATE_PROPOSALS);
        let mut cumulative = Vec::with_capacity(BIVARIATE_PROPOSALS);
        let mut total = 0.0;
        for _ in 0..BIVARIATE_PROPOSALS {
            let a = self.x1.min + u01(rng) * self.x1.width();
            let b = self.x2.min + u01(rng) * self.x2.width();
            total += self.pdf(a, b);
            proposals.push((a, b));
            cumulative.push(total);
        }
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::Computation(format!(
                "BivariateGaussianPdf proposal weights sum to {total}"
            )));
        }
        let mut out = JointSamples::with_capacity(n_samples);
        for _ in 0..n_samples {
            let (a, b) = proposals[weighted_index(&cumulative, u01(rng) * total)];
            out.push(a, b);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{BoundedPdf, TruncatedGaussianPdf};
    use approx::assert_relative_eq;
    use pp_prob::grid::{linspace, trapezoid};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn unit_box() -> Support {
        Support::new(-2.0, 2.0).unwrap()
    }

    fn boxed(mean: [f64; 2], cov: [[f64; 2]; 2]) -> Result<BivariateGaussianPdf> {
        BivariateGaussianPdf::new(unit_box(), unit_box(), mean, cov)
    }

    #[test]
    fn test_independent_factorizes() {
        let p = boxed([0.0, 0.5], [[1.0, 0.0], [0.0, 0.25]]).unwrap();
        let g1 = TruncatedGaussianPdf::new(0.0, 1.0, -2.0, 2.0).unwrap();
        let g2 = TruncatedGaussianPdf::new(0.5, 0.5, -2.0, 2.0).unwrap();
        let expected = g1.log_pdf(0.3) + g2.log_pdf(-0.7);
        assert_relative_eq!(p.log_pdf(0.3, -0.7), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_integrates_to_one() {
        let p = boxed([0.2, -0.1], [[1.0, 0.6], [0.6, 0.8]]).unwrap();
        let g = linspace(-2.0, 2.0, 401);
        let inner: Vec<f64> = g
            .iter()
            .map(|&a| {
                let row: Vec<f64> = g.iter().map(|&b| p.pdf(a, b)).collect();
                trapezoid(&row, &g)
            })
            .collect();
        assert_relative_eq!(trapezoid(&inner, &g), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_outside_rectangle() {
        let p = boxed([0.0, 0.0], [[1.0, 0.3], [0.3, 1.0]]).unwrap();
        assert_eq!(p.log_pdf(2.5, 0.0), f64::NEG_INFINITY);
        assert_eq!(p.log_pdf(0.0, -2.5), f64::NEG_INFINITY);
        assert_eq!(p.log_pdf(f64::NAN, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_sample_respects_correlation_sign() {
        let p = boxed([0.0, 0.0], [[1.0, 0.8], [0.8, 1.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let s = p.sample(5_000, &mut rng).unwrap();
        assert_eq!(s.len(), 5_000);
        let cov: f64 = s.iter().map(|(a, b)| a * b).sum::<f64>() / s.len() as f64;
        assert!(cov > 0.3, "sample covariance {cov}");
        assert!(s.iter().all(|(a, b)| unit_box().contains(a) && unit_box().contains(b)));
    }

    #[test]
    fn test_conditional_far_outside_x2_box_stays_finite() {
        // At x1 = 2 the conditional mean sits ~87 conditional sigmas above the x2 box.
        let narrow = Support::new(-2.0, -1.9).unwrap();
        let cov = [[1.0, 0.999], [0.999, 1.0]];
        let p = BivariateGaussianPdf::new(unit_box(), narrow, [0.0, 0.0], cov).unwrap();
        let lp = p.log_pdf(2.0, -1.95);
        assert!(lp.is_finite(), "log_pdf = {lp}");
        assert!(p.log_pdf(2.0, -1.9) > lp);

        let g = linspace(-2.0, -1.9, 20_001);
        let row: Vec<f64> = g.iter().map(|&b| p.pdf(2.0, b)).collect();
        let marginal = TruncatedGaussianPdf::new(0.0, 1.0, -2.0, 2.0).unwrap().pdf(2.0);
        assert_relative_eq!(trapezoid(&row, &g), marginal, max_relative = 1e-3);

        let mut rng = StdRng::seed_from_u64(9);
        let s = p.sample(10, &mut rng).unwrap();
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(|(a, b)| unit_box().contains(a) && narrow.contains(b)));
    }

    #[test]
    fn test_rejects_non_positive_definite() {
        assert!(boxed([0.0, 0.0], [[1.0, 1.0], [1.0, 1.0]]).is_err());
        assert!(boxed([0.0, 0.0], [[1.0, 0.2], [0.3, 1.0]]).is_err());
        assert!(boxed([0.0, 0.0], [[0.0, 0.0], [0.0, 1.0]]).is_err());
    }
}
