//! Versioned JSON description of a population prior, compiled into [`Distribution`].
//!
//! ```json
//! {
//!   "schema_version": "popprior_spec_v0",
//!   "distribution": {
//!     "type": "smoothed",
//!     "width": 4.0,
//!     "origin": { "type": "power_law", "min": 5.0, "max": 80.0, "alpha": -2.3 }
//!   }
//! }
//! ```
//!
//! The document describes parameters only; compiled objects are not serialized back.

#![allow(missing_docs)]

use pp_core::{Error, JointSamples, Result, Support};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pdf::{
    BetaPdf, BinnedPdf, BinnedPdf2d, BivariateGaussianPdf, BoundedPdf, BrokenPowerLawPdf,
    ConditionalPdf2d, DEFAULT_X_RANGE, FlexiblePdf, Joint2d, JointPdf2d, MagnitudePowerLawPdf,
    PowerLawGaussianPdf, PowerLawPdf, PowerLawTwoGaussiansPdf, Prior, SmoothedPdf,
    TruncatedBetaPdf, TruncatedGaussianPdf,
};

pub const PRIOR_SPEC_V0: &str = "popprior_spec_v0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorSpecV0 {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    pub schema_version: String,
    /// Free-form label echoed by the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distribution: DistributionSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawSpec {
    pub min: f64,
    pub max: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianSpec {
    pub mean: f64,
    pub sigma: f64,
    pub min: f64,
    pub max: f64,
}

impl PowerLawSpec {
    fn build(&self) -> Result<PowerLawPdf> {
        PowerLawPdf::new(self.min, self.max, self.alpha)
    }
}

impl GaussianSpec {
    fn build(&self) -> Result<TruncatedGaussianPdf> {
        TruncatedGaussianPdf::new(self.mean, self.sigma, self.min, self.max)
    }
}

fn default_x_range() -> f64 {
    DEFAULT_X_RANGE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionSpec {
    PowerLaw {
        min: f64,
        max: f64,
        alpha: f64,
    },
    Beta {
        alpha: f64,
        beta: f64,
    },
    TruncatedBeta {
        alpha: f64,
        beta: f64,
        max: f64,
    },
    TruncatedGaussian {
        mean: f64,
        sigma: f64,
        min: f64,
        max: f64,
    },
    PowerLawGaussian {
        power_law: PowerLawSpec,
        gaussian: GaussianSpec,
        lambda_peak: f64,
    },
    BrokenPowerLaw {
        min: f64,
        max: f64,
        alpha_1: f64,
        alpha_2: f64,
        /// Break location as a fraction of `max - min`.
        break_fraction: f64,
    },
    PowerLawTwoGaussians {
        power_law: PowerLawSpec,
        low: GaussianSpec,
        high: GaussianSpec,
        lambda_peak: f64,
        lambda_low: f64,
    },
    MagnitudePowerLaw {
        m_min: f64,
        m_max: f64,
        alpha: f64,
    },
    Flexible {
        min: f64,
        max: f64,
        slopes: Vec<f64>,
        #[serde(default = "default_x_range")]
        x_range: f64,
    },
    Binned {
        min: f64,
        max: f64,
        weights: Vec<f64>,
    },
    Smoothed {
        origin: Box<DistributionSpec>,
        width: f64,
    },
    Conditional {
        outer: Box<DistributionSpec>,
        inner: Box<DistributionSpec>,
    },
    BivariateGaussian {
        x1: [f64; 2],
        x2: [f64; 2],
        mean: [f64; 2],
        covariance: [[f64; 2]; 2],
    },
    #[serde(rename = "binned_2d")]
    Binned2d {
        min: f64,
        max: f64,
        weights: Vec<f64>,
    },
}

impl DistributionSpec {
    /// `1` or `2`.
    pub fn dimension(&self) -> usize {
        match self {
            DistributionSpec::Conditional { .. }
            | DistributionSpec::BivariateGaussian { .. }
            | DistributionSpec::Binned2d { .. } => 2,
            _ => 1,
        }
    }

    /// Build a 1D law. Fails on 2D variants.
    pub fn compile_1d(&self) -> Result<Prior> {
        let prior = match self {
            DistributionSpec::PowerLaw { min, max, alpha } => {
                PowerLawPdf::new(*min, *max, *alpha)?.into()
            }
            DistributionSpec::Beta { alpha, beta } => BetaPdf::new(*alpha, *beta)?.into(),
            DistributionSpec::TruncatedBeta { alpha, beta, max } => {
                TruncatedBetaPdf::new(*alpha, *beta, *max)?.into()
            }
            DistributionSpec::TruncatedGaussian { mean, sigma, min, max } => {
                TruncatedGaussianPdf::new(*mean, *sigma, *min, *max)?.into()
            }
            DistributionSpec::PowerLawGaussian { power_law, gaussian, lambda_peak } => {
                PowerLawGaussianPdf::new(power_law.build()?, gaussian.build()?, *lambda_peak)?
                    .into()
            }
            DistributionSpec::BrokenPowerLaw { min, max, alpha_1, alpha_2, break_fraction } => {
                BrokenPowerLawPdf::new(*min, *max, *alpha_1, *alpha_2, *break_fraction)?.into()
            }
            DistributionSpec::PowerLawTwoGaussians {
                power_law,
                low,
                high,
                lambda_peak,
                lambda_low,
            } => PowerLawTwoGaussiansPdf::new(
                power_law.build()?,
                low.build()?,
                high.build()?,
                *lambda_peak,
                *lambda_low,
            )?
            .into(),
            DistributionSpec::MagnitudePowerLaw { m_min, m_max, alpha } => {
                MagnitudePowerLawPdf::new(*m_min, *m_max, *alpha)?.into()
            }
            DistributionSpec::Flexible { min, max, slopes, x_range } => {
                FlexiblePdf::new(*min, *max, slopes, *x_range)?.into()
            }
            DistributionSpec::Binned { min, max, weights } => {
                BinnedPdf::new(*min, *max, weights)?.into()
            }
            DistributionSpec::Smoothed { origin, width } => {
                SmoothedPdf::new(origin.compile_1d()?, *width)?.into()
            }
            DistributionSpec::Conditional { .. }
            | DistributionSpec::BivariateGaussian { .. }
            | DistributionSpec::Binned2d { .. } => {
                return Err(Error::InvalidParameter(format!(
                    "expected a 1D distribution, got 2D '{}'",
                    self.type_name()
                )));
            }
        };
        Ok(prior)
    }

    /// Build a 2D law. Fails on 1D variants.
    pub fn compile_2d(&self) -> Result<Joint2d> {
        let joint = match self {
            DistributionSpec::Conditional { outer, inner } => {
                ConditionalPdf2d::new(outer.compile_1d()?, inner.compile_1d()?).into()
            }
            DistributionSpec::BivariateGaussian { x1, x2, mean, covariance } => {
                BivariateGaussianPdf::new(
                    Support::new(x1[0], x1[1])?,
                    Support::new(x2[0], x2[1])?,
                    *mean,
                    *covariance,
                )?
                .into()
            }
            DistributionSpec::Binned2d { min, max, weights } => {
                BinnedPdf2d::new(*min, *max, weights)?.into()
            }
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "expected a 2D distribution, got 1D '{}'",
                    self.type_name()
                )));
            }
        };
        Ok(joint)
    }

    /// Build the law in its natural dimension.
    pub fn compile(&self) -> Result<Distribution> {
        if self.dimension() == 2 {
            Ok(Distribution::TwoD(self.compile_2d()?))
        } else {
            Ok(Distribution::OneD(self.compile_1d()?))
        }
    }

    /// The `type` tag of this node.
    pub fn type_name(&self) -> &'static str {
        match self {
            DistributionSpec::PowerLaw { .. } => "power_law",
            DistributionSpec::Beta { .. } => "beta",
            DistributionSpec::TruncatedBeta { .. } => "truncated_beta",
            DistributionSpec::TruncatedGaussian { .. } => "truncated_gaussian",
            DistributionSpec::PowerLawGaussian { .. } => "power_law_gaussian",
            DistributionSpec::BrokenPowerLaw { .. } => "broken_power_law",
            DistributionSpec::PowerLawTwoGaussians { .. } => "power_law_two_gaussians",
            DistributionSpec::MagnitudePowerLaw { .. } => "magnitude_power_law",
            DistributionSpec::Flexible { .. } => "flexible",
            DistributionSpec::Binned { .. } => "binned",
            DistributionSpec::Smoothed { .. } => "smoothed",
            DistributionSpec::Conditional { .. } => "conditional",
            DistributionSpec::BivariateGaussian { .. } => "bivariate_gaussian",
            DistributionSpec::Binned2d { .. } => "binned_2d",
        }
    }
}

/// A compiled prior of either dimension.
#[derive(Debug, Clone)]
pub enum Distribution {
    OneD(Prior),
    TwoD(Joint2d),
}

/// Draws from a [`Distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Samples {
    OneD(Vec<f64>),
    TwoD(JointSamples),
}

impl Distribution {
    pub fn dimension(&self) -> usize {
        match self {
            Distribution::OneD(_) => 1,
            Distribution::TwoD(_) => 2,
        }
    }

    pub fn sample(&self, n_samples: usize, rng: &mut dyn RngCore) -> Result<Samples> {
        match self {
            Distribution::OneD(p) => Ok(Samples::OneD(p.sample(n_samples, rng)?)),
            Distribution::TwoD(p) => Ok(Samples::TwoD(p.sample(n_samples, rng)?)),
        }
    }
}

impl PriorSpecV0 {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let spec: PriorSpecV0 = serde_json::from_str(s)?;
        spec.check_version()?;
        Ok(spec)
    }

    pub fn compile(&self) -> Result<Distribution> {
        let dist = self.distribution.compile()?;
        log::debug!(
            "compiled {} ({}D) from {}",
            self.distribution.type_name(),
            dist.dimension(),
            self.name.as_deref().unwrap_or("<unnamed spec>")
        );
        Ok(dist)
    }

    fn check_version(&self) -> Result<()> {
        if self.schema_version != PRIOR_SPEC_V0 {
            return Err(Error::InvalidParameter(format!(
                "unsupported schema_version: {} (expected {})",
                self.schema_version, PRIOR_SPEC_V0
            )));
        }
        Ok(())
    }
}

pub fn read_prior_spec(path: &Path) -> Result<PriorSpecV0> {
    let text = std::fs::read_to_string(path)?;
    PriorSpecV0::from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wrap(distribution: &str) -> String {
        format!(r#"{{"schema_version": "popprior_spec_v0", "distribution": {distribution}}}"#)
    }

    #[test]
    fn test_parse_and_compile_smoothed_mixture() {
        let json = wrap(
            r#"{
                "type": "smoothed",
                "width": 3.0,
                "origin": {
                    "type": "power_law_gaussian",
                    "power_law": {"min": 5.0, "max": 80.0, "alpha": -2.3},
                    "gaussian": {"mean": 35.0, "sigma": 4.0, "min": 5.0, "max": 100.0},
                    "lambda_peak": 0.1
                }
            }"#,
        );
        let spec = PriorSpecV0::from_json_str(&json).unwrap();
        assert_eq!(spec.distribution.dimension(), 1);
        let Distribution::OneD(prior) = spec.compile().unwrap() else {
            panic!("expected 1D");
        };
        assert_eq!(prior.kind(), "smoothed");
        assert_eq!(prior.support(), Support { min: 5.0, max: 100.0 });
        assert_relative_eq!(prior.cdf(100.0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_flexible_default_range() {
        let json = wrap(r#"{"type": "flexible", "min": 0.0, "max": 1.0, "slopes": [0, 0, 0]}"#);
        let spec = PriorSpecV0::from_json_str(&json).unwrap();
        match &spec.distribution {
            DistributionSpec::Flexible { x_range, .. } => assert_eq!(*x_range, 3.0),
            other => panic!("unexpected {other:?}"),
        }
        assert!(spec.compile().is_ok());
    }

    #[test]
    fn test_compile_conditional() {
        let json = wrap(
            r#"{
                "type": "conditional",
                "outer": {"type": "power_law", "min": 5.0, "max": 80.0, "alpha": -2.0},
                "inner": {"type": "power_law", "min": 5.0, "max": 80.0, "alpha": 1.0}
            }"#,
        );
        let spec = PriorSpecV0::from_json_str(&json).unwrap();
        let Distribution::TwoD(joint) = spec.compile().unwrap() else {
            panic!("expected 2D");
        };
        assert_eq!(joint.log_pdf(10.0, 20.0), f64::NEG_INFINITY);
        assert!(joint.log_pdf(20.0, 10.0).is_finite());
    }

    #[test]
    fn test_dimension_mismatch() {
        let spec = DistributionSpec::Smoothed {
            origin: Box::new(DistributionSpec::Binned2d {
                min: 0.0,
                max: 1.0,
                weights: vec![1.0, 1.0, 1.0],
            }),
            width: 0.1,
        };
        assert!(matches!(spec.compile(), Err(Error::InvalidParameter(_))));
        let beta = DistributionSpec::Beta { alpha: 2.0, beta: 2.0 };
        assert!(beta.compile_2d().is_err());
    }

    #[test]
    fn test_rejects_wrong_version_and_bad_json() {
        let json = r#"{"schema_version": "v9", "distribution": {"type": "beta", "alpha": 1, "beta": 1}}"#;
        assert!(matches!(PriorSpecV0::from_json_str(json), Err(Error::InvalidParameter(_))));
        assert!(matches!(PriorSpecV0::from_json_str("{"), Err(Error::Json(_))));
        let unknown = wrap(r#"{"type": "lognormal", "mu": 1.0}"#);
        assert!(matches!(PriorSpecV0::from_json_str(&unknown), Err(Error::Json(_))));
    }

    #[test]
    fn test_invalid_parameters_surface() {
        let json = wrap(r#"{"type": "power_law", "min": 10.0, "max": 1.0, "alpha": -2.0}"#);
        let spec = PriorSpecV0::from_json_str(&json).unwrap();
        assert!(matches!(spec.compile(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_spec_serializes_with_type_tag() {
        let spec =
            DistributionSpec::TruncatedGaussian { mean: 0.0, sigma: 1.0, min: -1.0, max: 1.0 };
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["type"], "truncated_gaussian");
        let grid = DistributionSpec::Binned2d { min: 0.0, max: 1.0, weights: vec![1.0] };
        assert_eq!(serde_json::to_value(&grid).unwrap()["type"], "binned_2d");
    }
}
