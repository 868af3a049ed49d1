//! Absolute magnitude ↔ luminosity conversion.

/// Zero-point luminosity of the absolute bolometric magnitude scale (IAU 2015 B2), in watts.
pub const ZERO_POINT_LUMINOSITY: f64 = 3.0128e28;

/// `L = L0 * 10^(-0.4 M)`.
#[inline]
pub fn magnitude_to_luminosity(m: f64) -> f64 {
    ZERO_POINT_LUMINOSITY * 10f64.powf(-0.4 * m)
}

/// `M = -2.5 * log10(L / L0)`.
#[inline]
pub fn luminosity_to_magnitude(l: f64) -> f64 {
    -2.5 * (l / ZERO_POINT_LUMINOSITY).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_magnitude_is_zero_point() {
        assert_relative_eq!(magnitude_to_luminosity(0.0), ZERO_POINT_LUMINOSITY, max_relative = 1e-15);
    }

    #[test]
    fn test_inverse_pair() {
        for m in [-25.0, -20.5, -3.0, 4.74] {
            assert_relative_eq!(luminosity_to_magnitude(magnitude_to_luminosity(m)), m, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_brighter_means_larger_luminosity() {
        // Five magnitudes is a factor 100 in luminosity.
        let ratio = magnitude_to_luminosity(-21.0) / magnitude_to_luminosity(-16.0);
        assert_relative_eq!(ratio, 100.0, max_relative = 1e-12);
    }
}
