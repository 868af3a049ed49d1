//! Bijective transforms with explicit Jacobians.
//!
//! A flexible distribution is defined on an internal coordinate and mapped onto the
//! user-facing support; the density picks up `log|dθ/dz|` from every map in the chain.

use pp_core::{Error, Result, Support};

/// A bijective transform from `z` to `theta`.
pub trait Bijector: Send + Sync {
    /// Map `theta = forward(z)`.
    fn forward(&self, z: f64) -> f64;
    /// Map `z = inverse(theta)`.
    fn inverse(&self, theta: f64) -> f64;
    /// Jacobian element: `dtheta/dz`.
    fn jacobian(&self, z: f64) -> f64;
    /// Log absolute determinant of Jacobian: `log|dtheta/dz|`.
    fn log_abs_det_jacobian(&self, z: f64) -> f64 {
        self.jacobian(z).abs().ln()
    }
}

/// Affine map sending the interval `[a, b]` onto `[c, d]`.
///
/// `theta = c + (z - a) * (d - c) / (b - a)`, constant Jacobian `(d - c)/(b - a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineBijector {
    from: Support,
    to: Support,
    scale: f64,
    log_abs_scale: f64,
}

impl AffineBijector {
    /// Build the map `from -> to`.
    pub fn between(from: Support, to: Support) -> Result<Self> {
        let scale = to.width() / from.width();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "affine map requires a finite positive scale, got {scale} for {from:?} -> {to:?}"
            )));
        }
        Ok(Self { from, to, scale, log_abs_scale: scale.ln() })
    }

    /// Source interval.
    pub fn from_support(&self) -> Support {
        self.from
    }

    /// Target interval.
    pub fn to_support(&self) -> Support {
        self.to
    }
}

impl Bijector for AffineBijector {
    #[inline]
    fn forward(&self, z: f64) -> f64 {
        if z == self.from.max {
            // Land exactly on the upper edge; `c + (b-a)*s` can miss `d` by an ulp.
            return self.to.max;
        }
        self.to.min + (z - self.from.min) * self.scale
    }
    #[inline]
    fn inverse(&self, theta: f64) -> f64 {
        if theta == self.to.max {
            return self.from.max;
        }
        self.from.min + (theta - self.to.min) / self.scale
    }
    #[inline]
    fn jacobian(&self, _z: f64) -> f64 {
        self.scale
    }
    #[inline]
    fn log_abs_det_jacobian(&self, _z: f64) -> f64 {
        self.log_abs_scale
    }
}
