//! Small numerically-stable math utilities used across probability code.

/// Stable `log(1 + exp(x))`.
///
/// Branchless: `log(1+exp(x)) = max(x,0) + log(1+exp(-|x|))`.
#[inline]
pub fn log1pexp(x: f64) -> f64 {
    let abs_x = x.abs();
    let e = (-abs_x).exp(); // always in (0, 1], no overflow
    x.max(0.0) + e.ln_1p()
}

/// Stable sigmoid: `1 / (1 + exp(-x))`.
///
/// Saturates to exactly `0` / `1` for `x = ∓inf`; never returns NaN for non-NaN input.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    let abs_x = x.abs();
    let e = (-abs_x).exp();
    let recip = 1.0 / (1.0 + e);
    // x >= 0: sigmoid = 1/(1+exp(-x)) = recip
    // x <  0: sigmoid = exp(x)/(1+exp(x)) = e/(1+e) = e*recip
    if x >= 0.0 { recip } else { e * recip }
}

/// Stable `log(sigmoid(x))`.
#[inline]
pub fn log_sigmoid(x: f64) -> f64 {
    // log(sigmoid(x)) = -log(1 + exp(-x))
    if x >= 0.0 { -(-x).exp().ln_1p() } else { x - x.exp().ln_1p() }
}

/// `log(exp(a) + exp(b))` without overflow.
///
/// `-inf` operands are absorbing zeros of the sum, so `logaddexp(-inf, -inf) = -inf`
/// rather than NaN.
#[inline]
pub fn logaddexp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

/// `log(sum_i exp(x_i))`, stable for large magnitudes.
pub fn logsumexp(xs: &[f64]) -> f64 {
    let m = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !m.is_finite() {
        return m;
    }
    let s: f64 = xs.iter().map(|&x| (x - m).exp()).sum();
    m + s.ln()
}

/// `c * ln(x)` with the convention `0 * ln(0) = 0`.
///
/// Power-law and Beta kernels hit `x = 0` with a zero exponent at the support edge;
/// the naive product is `0 * -inf = NaN` there.
#[inline]
pub fn xlogy(c: f64, x: f64) -> f64 {
    if c == 0.0 && !x.is_nan() { 0.0 } else { c * x.ln() }
}

/// `c * ln(1 + x)` with the convention `0 * ln(0) = 0`.
#[inline]
pub fn xlog1py(c: f64, x: f64) -> f64 {
    if c == 0.0 && !x.is_nan() { 0.0 } else { c * x.ln_1p() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log1pexp_matches_naive_moderate_values() {
        let xs: [f64; 7] = [-10.0, -2.0, -0.1, 0.0, 0.1, 2.0, 10.0];
        for x in xs {
            let naive = (1.0 + x.exp()).ln();
            let stable = log1pexp(x);
            assert!((naive - stable).abs() < 1e-12, "x={}: {} vs {}", x, naive, stable);
        }
    }

    #[test]
    fn test_sigmoid_bounds_and_saturation() {
        let xs: [f64; 7] = [-50.0, -10.0, -1.0, 0.0, 1.0, 10.0, 50.0];
        for x in xs {
            let s = sigmoid(x);
            assert!((0.0..=1.0).contains(&s), "sigmoid({})={}", x, s);
            let t = sigmoid(-x);
            assert!((s + t - 1.0).abs() < 1e-15, "sigmoid symmetry failed at {}", x);
        }
        assert_eq!(sigmoid(f64::INFINITY), 1.0);
        assert_eq!(sigmoid(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_log_sigmoid_matches_naive_moderate_values() {
        let xs: [f64; 7] = [-10.0, -2.0, -0.1, 0.0, 0.1, 2.0, 10.0];
        for x in xs {
            let naive = sigmoid(x).ln();
            let stable = log_sigmoid(x);
            assert!((naive - stable).abs() < 1e-12, "x={}: {} vs {}", x, naive, stable);
        }
        assert_eq!(log_sigmoid(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(log_sigmoid(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_logaddexp_handles_neg_infinity() {
        assert_eq!(logaddexp(f64::NEG_INFINITY, f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(logaddexp(f64::NEG_INFINITY, 1.5), 1.5);
        assert_eq!(logaddexp(-2.0, f64::NEG_INFINITY), -2.0);
        let v = logaddexp(0.3_f64.ln(), 0.7_f64.ln());
        assert!(v.abs() < 1e-15);
        // No overflow for large operands.
        assert!((logaddexp(1000.0, 1000.0) - (1000.0 + 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_logsumexp_and_diff() {
        let xs = [1.0f64.ln(), 2.0f64.ln(), 3.0f64.ln()];
        assert!((logsumexp(&xs) - 6.0f64.ln()).abs() < 1e-14);
        assert_eq!(logsumexp(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_xlogy_zero_conventions() {
        assert_eq!(xlogy(0.0, 0.0), 0.0);
        assert_eq!(xlog1py(0.0, -1.0), 0.0);
        assert_eq!(xlogy(2.0, 0.0), f64::NEG_INFINITY);
        assert!((xlogy(2.0, 3.0) - 2.0 * 3.0f64.ln()).abs() < 1e-15);
        assert!(xlogy(0.0, f64::NAN).is_nan());
    }
}
