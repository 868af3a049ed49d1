//! Common data types for popprior

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed support interval `[min, max]` of a 1D distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Lower edge (inclusive).
    pub min: f64,
    /// Upper edge (inclusive).
    pub max: f64,
}

impl Support {
    /// Create a support, requiring finite edges with `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "support edges must be finite, got ({min}, {max})"
            )));
        }
        if min >= max {
            return Err(Error::InvalidParameter(format!(
                "support requires min < max, got ({min}, {max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// `max - min`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// True when `min <= x <= max`. NaN is never contained.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Smallest support covering both `self` and `other`.
    pub fn union(&self, other: &Support) -> Support {
        Support { min: self.min.min(other.min), max: self.max.max(other.max) }
    }
}

/// Paired draws `(x1[i], x2[i])` from a 2D distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointSamples {
    /// First coordinate.
    pub x1: Vec<f64>,
    /// Second coordinate.
    pub x2: Vec<f64>,
}

impl JointSamples {
    /// Create an empty set with room for `n` pairs.
    pub fn with_capacity(n: usize) -> Self {
        Self { x1: Vec::with_capacity(n), x2: Vec::with_capacity(n) }
    }

    /// Append one pair.
    #[inline]
    pub fn push(&mut self, x1: f64, x2: f64) {
        self.x1.push(x1);
        self.x2.push(x2);
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.x1.len()
    }

    /// True when no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.x1.is_empty()
    }

    /// Iterate over `(x1, x2)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x1.iter().copied().zip(self.x2.iter().copied())
    }
}
