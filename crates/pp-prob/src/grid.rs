//! Fixed 1-D grids: construction, linear interpolation and simple quadrature.
//!
//! Tabulated inverses and numeric normalizations in popprior are all built on these four
//! primitives, so their edge behavior is pinned down here:
//! - [`linspace`] includes both endpoints and hits `stop` exactly.
//! - [`interp`] clamps to the edge values outside the table (no extrapolation).

/// `n` equally spaced points from `start` to `stop` inclusive.
///
/// `n = 0` yields an empty grid and `n = 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be non-decreasing. Queries below `xp[0]` return `fp[0]`, queries above the last
/// abscissa return the last ordinate. Flat runs in `xp` are skipped, so tabulated CDFs with
/// zero-density stretches invert cleanly.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return f64::NAN;
    }
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // `k` is the number of abscissae <= x; 1 <= k <= n-1 here.
    let k = xp.partition_point(|&v| v <= x);
    let (x0, x1) = (xp[k - 1], xp[k]);
    let (f0, f1) = (fp[k - 1], fp[k]);
    f0 + (x - x0) * (f1 - f0) / (x1 - x0)
}

/// Trapezoid-rule integral of samples `y` over abscissae `x`.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.windows(2).zip(y.windows(2)).map(|(xw, yw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0])).sum()
}

/// Running sum: `out[i] = xs[0] + ... + xs[i]`.
pub fn cumsum(xs: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    xs.iter()
        .map(|&v| {
            acc += v;
            acc
        })
        .collect()
}

/// Midpoints of consecutive grid nodes (`len - 1` values).
pub fn midpoints(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}
