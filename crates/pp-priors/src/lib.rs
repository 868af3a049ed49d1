//! # pp-priors
//!
//! Boundary-aware population prior distributions for popprior.
//!
//! This crate provides:
//! - The [`BoundedPdf`] contract for 1D laws on a closed support (clamped `log_pdf`/`log_cdf`,
//!   inverse-CDF sampling) and the [`JointPdf2d`] contract for 2D laws.
//! - Closed-form shapes (power law, Beta, truncated Beta, truncated Gaussian, bivariate
//!   Gaussian, magnitude-domain power law) and their mixtures.
//! - A boundary-smoothing wrapper, a spline-based flexible law, and binned 1D / triangular 2D
//!   laws.
//! - [`Prior`] / [`Joint2d`], closed sets of the variants above, and a JSON [`spec`] that
//!   compiles into them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pdf;
pub mod sampling;
pub mod spec;

pub use pdf::{
    BetaPdf, BinnedPdf, BinnedPdf2d, BivariateGaussianPdf, BoundedPdf, BrokenPowerLawPdf,
    ConditionalPdf2d, FlexiblePdf, Joint2d, JointPdf2d, MagnitudePowerLawPdf, PowerLawGaussianPdf,
    PowerLawPdf, PowerLawTwoGaussiansPdf, Prior, SmoothedPdf, SplineWrapper, TruncatedBetaPdf,
    TruncatedGaussianPdf,
};
pub use sampling::CdfTable;
pub use spec::{Distribution, DistributionSpec, PriorSpecV0, Samples, read_prior_spec};
