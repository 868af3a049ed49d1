use crate::pdf::{BoundedPdf, PowerLawPdf};
use pp_core::{Result, Support};
use pp_prob::conversions::magnitude_to_luminosity;

/// Luminosity power law `p(L) ∝ L^alpha` expressed as a density over absolute magnitude.
///
/// The magnitude support `[m_min, m_max]` maps onto luminosities
/// `[L(m_max), L(m_min)]` (brighter is smaller magnitude). With `dL/dM = -0.4 ln10 · L`
/// the magnitude density is
///
/// `p(M) = 0.4 ln10 · L^(alpha+1) / N(alpha)`,
///
/// evaluated as a normalized `L^(alpha+1)` law times `0.4 ln10 · N(alpha+1) / N(alpha)`.
/// The CDF in magnitude is the luminosity survival function, `1 - CDF_L(L(M))`.
#[derive(Debug, Clone)]
pub struct MagnitudePowerLawPdf {
    support: Support,
    alpha: f64,
    density_law: PowerLawPdf,
    cumulative_law: PowerLawPdf,
    log_jacobian_factor: f64,
}

impl MagnitudePowerLawPdf {
    /// Create from a magnitude range and the luminosity slope `alpha`.
    pub fn new(m_min: f64, m_max: f64, alpha: f64) -> Result<Self> {
        let support = Support::new(m_min, m_max)?;
        let l_max = magnitude_to_luminosity(m_min);
        let l_min = magnitude_to_luminosity(m_max);
        let density_law = PowerLawPdf::new(l_min, l_max, alpha + 1.0)?;
        let cumulative_law = PowerLawPdf::new(l_min, l_max, alpha)?;
        let log_jacobian_factor = (0.4 * std::f64::consts::LN_10).ln() + density_law.ln_norm()
            - cumulative_law.ln_norm();
        Ok(Self { support, alpha, density_law, cumulative_law, log_jacobian_factor })
    }

    /// Luminosity slope.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl BoundedPdf for MagnitudePowerLawPdf {
    fn support(&self) -> Support {
        self.support
    }

    fn log_pdf_unclamped(&self, m: f64) -> f64 {
        self.density_law.log_pdf_unclamped(magnitude_to_luminosity(m)) + self.log_jacobian_factor
    }

    fn log_cdf_unclamped(&self, m: f64) -> f64 {
        let l = magnitude_to_luminosity(m);
        let below = self.cumulative_law.log_cdf_unclamped(l).exp();
        (-below.min(1.0)).ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pp_prob::grid::{linspace, trapezoid};

    #[test]
    fn test_normalized_over_magnitudes() {
        let p = MagnitudePowerLawPdf::new(-23.0, -19.0, -1.8).unwrap();
        let x = linspace(-23.0, -19.0, 40_001);
        let y: Vec<f64> = x.iter().map(|&v| p.pdf(v)).collect();
        assert_relative_eq!(trapezoid(&y, &x), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cdf_edges_and_monotone() {
        let p = MagnitudePowerLawPdf::new(-23.0, -19.0, -1.8).unwrap();
        assert_eq!(p.cdf(-23.0), 0.0);
        assert_relative_eq!(p.cdf(-19.0), 1.0, epsilon = 1e-12);
        let grid = linspace(-23.0, -19.0, 101);
        let c: Vec<f64> = grid.iter().map(|&m| p.cdf(m)).collect();
        assert!(c.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_density_matches_finite_difference_of_cdf() {
        let p = MagnitudePowerLawPdf::new(-23.0, -19.0, -0.5).unwrap();
        let m = -21.3;
        let h = 1e-5;
        let fd = (p.cdf(m + h) - p.cdf(m - h)) / (2.0 * h);
        assert_relative_eq!(p.pdf(m), fd, max_relative = 1e-5);
    }

    #[test]
    fn test_faint_end_dominates_for_steep_slope() {
        // With alpha < -1 faint galaxies (large M) are more common.
        let p = MagnitudePowerLawPdf::new(-23.0, -19.0, -2.0).unwrap();
        assert!(p.pdf(-19.5) > p.pdf(-22.5));
    }
}
