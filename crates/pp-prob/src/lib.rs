//! Numeric building blocks for popprior.
//!
//! This crate hosts the small numeric surface the distribution crate is written against:
//! - stable log/exp primitives (`log1pexp`, `logaddexp`, `log_sigmoid`, ...)
//! - standard-normal and Beta-function helpers backed by `statrs`
//! - fixed grids: `linspace`, linear `interp`, trapezoid quadrature, cumulative sums
//! - bijectors with explicit Jacobians
//! - the magnitude/luminosity conversion pair

pub mod beta;
pub mod conversions;
pub mod grid;
pub mod math;
pub mod normal;
pub mod transforms;
