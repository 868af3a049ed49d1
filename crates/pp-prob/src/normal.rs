//! Normal distribution utilities.

use statrs::function::erf::{erf, erfc};
use std::f64::consts::SQRT_2;

/// Natural log of `sqrt(2π)`.
///
/// `ln(sqrt(2π)) = 0.5*ln(2π)` (precomputed to keep this crate const-friendly).
pub const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// `log φ(z)` for the standard normal.
#[inline]
pub fn standard_logpdf(z: f64) -> f64 {
    -0.5 * z * z - LN_SQRT_2PI
}

/// `Φ(z) = 0.5 * (1 + erf(z/√2))`, evaluated through `erfc` to keep the lower tail accurate.
#[inline]
pub fn standard_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// `1 - Φ(z)`, accurate in the upper tail.
#[inline]
pub fn standard_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// Probability mass of `N(mean, sigma)` inside `[lo, hi]`.
///
/// Equals `0.5 * [erf(z_hi) - erf(z_lo)]` with `z = (x - mean)/(sigma √2)`. When both
/// edges sit in the upper tail the difference is taken between survival functions so the
/// result does not cancel to zero.
pub fn interval_mass(lo: f64, hi: f64, mean: f64, sigma: f64) -> f64 {
    let z_lo = (lo - mean) / sigma;
    let z_hi = (hi - mean) / sigma;
    if z_lo > 0.0 {
        standard_sf(z_lo) - standard_sf(z_hi)
    } else if z_hi < 0.0 {
        standard_cdf(z_hi) - standard_cdf(z_lo)
    } else {
        0.5 * (erf(z_hi / SQRT_2) - erf(z_lo / SQRT_2))
    }
}

/// Depth of the Laplace continued fraction used by [`log_standard_cdf`] in the lower tail.
const MILLS_CF_TERMS: usize = 100;

/// `ln Φ(z)`, finite far into the lower tail where `Φ(z)` itself underflows.
///
/// Below `z = -5` uses the Mills-ratio continued fraction
/// `Φ(-x) = φ(x) / (x + 1/(x + 2/(x + 3/(x + ...))))`.
pub fn log_standard_cdf(z: f64) -> f64 {
    if z.is_nan() || z > -5.0 {
        return standard_cdf(z).ln();
    }
    if z == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let x = -z;
    let mut t = x;
    for k in (1..=MILLS_CF_TERMS).rev() {
        t = x + k as f64 / t;
    }
    standard_logpdf(x) - t.ln()
}

/// `ln` of [`interval_mass`], kept finite when both edges sit deep in the same tail.
pub fn log_interval_mass(lo: f64, hi: f64, mean: f64, sigma: f64) -> f64 {
    let z_lo = (lo - mean) / sigma;
    let z_hi = (hi - mean) / sigma;
    // mass = Φ(a) - Φ(b) with b <= a <= 0; the upper tail is reflected.
    let (a, b) = if z_lo > 0.0 {
        (-z_lo, -z_hi)
    } else if z_hi < 0.0 {
        (z_hi, z_lo)
    } else {
        return interval_mass(lo, hi, mean, sigma).ln();
    };
    let la = log_standard_cdf(a);
    if la == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    la + (-(log_standard_cdf(b) - la).exp()).ln_1p()
}
