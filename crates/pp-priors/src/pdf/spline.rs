use pp_core::{Error, Result, Support};
use pp_prob::grid::{interp, linspace};

/// Default half-width `r` of the latent interval `[-r, r]`.
pub const DEFAULT_X_RANGE: f64 = 3.0;

/// Points in the tabulated inverse of the spline.
pub const INVERSE_TABLE_POINTS: usize = 10_000;

const SLOPE_OFFSET: f64 = 0.5;

/// Strictly increasing cubic Hermite map on `[-r, r]`, built from slope parameters.
///
/// For `n` slope parameters `s_i`, knots sit at `n` equally spaced points of `[-r, r]`.
/// Knot tangents are `s_i + 0.5` divided by their mean, so the average slope is `1`. Knot
/// values are the left Riemann sum of the tangents starting at `-r`, shifted so the middle
/// knot `(n-1)/2` maps to `0`. All-zero slopes give the identity map.
///
/// Evaluation is restricted to `[-r, r]` (no extrapolation). The inverse is tabulated on
/// [`INVERSE_TABLE_POINTS`] points and interpolated linearly.
#[derive(Debug, Clone)]
pub struct SplineWrapper {
    x_range: f64,
    knots_x: Vec<f64>,
    knots_y: Vec<f64>,
    tangents: Vec<f64>,
    y_range: Support,
    table_x: Vec<f64>,
    table_y: Vec<f64>,
}

impl SplineWrapper {
    /// Build the map from `slopes` on `[-x_range, x_range]`.
    ///
    /// Needs at least two slopes, all finite with `s_i + 0.5 > 0`. An even count is accepted
    /// with a warning, since no knot then sits at the origin.
    pub fn new(slopes: &[f64], x_range: f64) -> Result<Self> {
        let n = slopes.len();
        if n < 2 {
            return Err(Error::InvalidParameter(format!(
                "SplineWrapper requires at least 2 slope parameters, got {n}"
            )));
        }
        if !x_range.is_finite() || x_range <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "SplineWrapper x_range must be finite and > 0, got {x_range}"
            )));
        }
        if n % 2 == 0 {
            log::warn!(
                "SplineWrapper got an even number of slope parameters ({n}); \
                 an odd count keeps a knot at the origin"
            );
        }

        let mut tangents = Vec::with_capacity(n);
        for (i, &s) in slopes.iter().enumerate() {
            let t = s + SLOPE_OFFSET;
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "SplineWrapper slope[{i}] + {SLOPE_OFFSET} must be finite and > 0, got {t}"
                )));
            }
            tangents.push(t);
        }
        let mean = tangents.iter().sum::<f64>() / n as f64;
        tangents.iter_mut().for_each(|t| *t /= mean);

        let knots_x = linspace(-x_range, x_range, n);
        let dx = knots_x[1] - knots_x[0];
        let mut knots_y = Vec::with_capacity(n);
        knots_y.push(knots_x[0]);
        for i in 1..n {
            knots_y.push(knots_y[i - 1] + dx * tangents[i - 1]);
        }
        let shift = knots_y[(n - 1) / 2];
        knots_y.iter_mut().for_each(|y| *y -= shift);

        let mut spline = Self {
            x_range,
            knots_x,
            knots_y,
            tangents,
            y_range: Support { min: 0.0, max: 0.0 },
            table_x: Vec::new(),
            table_y: Vec::new(),
        };

        let table_x = linspace(-x_range, x_range, INVERSE_TABLE_POINTS);
        let table_y: Vec<f64> = table_x.iter().map(|&x| spline.eval_inside(x)).collect();
        if let Some(i) = table_y.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(Error::InvalidParameter(format!(
                "SplineWrapper is not strictly increasing near x={} for slopes {slopes:?}",
                table_x[i]
            )));
        }
        spline.y_range = Support::new(table_y[0], table_y[INVERSE_TABLE_POINTS - 1])?;
        log::debug!(
            "SplineWrapper: {n} knots on [-{x_range}, {x_range}], y-range [{:.6}, {:.6}]",
            spline.y_range.min,
            spline.y_range.max
        );
        spline.table_x = table_x;
        spline.table_y = table_y;
        Ok(spline)
    }

    /// Half-width `r` of the latent interval.
    pub fn x_range(&self) -> f64 {
        self.x_range
    }

    /// Image `[y(-r), y(r)]` of the latent interval.
    pub fn y_range(&self) -> Support {
        self.y_range
    }

    /// Knot positions and values.
    pub fn knots(&self) -> (&[f64], &[f64]) {
        (&self.knots_x, &self.knots_y)
    }

    /// Normalized knot tangents (mean `1`).
    pub fn tangents(&self) -> &[f64] {
        &self.tangents
    }

    #[inline]
    fn contains(&self, x: f64) -> bool {
        x >= -self.x_range && x <= self.x_range
    }

    #[inline]
    fn segment(&self, x: f64) -> (usize, f64, f64) {
        let k = self.knots_x.len();
        let i = self.knots_x.partition_point(|&v| v <= x).clamp(1, k - 1) - 1;
        let h = self.knots_x[i + 1] - self.knots_x[i];
        (i, h, (x - self.knots_x[i]) / h)
    }

    fn eval_inside(&self, x: f64) -> f64 {
        let (i, h, t) = self.segment(x);

        // Cubic Hermite basis.
        let h00 = (1.0 + 2.0 * t) * (1.0 - t) * (1.0 - t);
        let h10 = t * (1.0 - t) * (1.0 - t);
        let h01 = t * t * (3.0 - 2.0 * t);
        let h11 = t * t * (t - 1.0);

        h00 * self.knots_y[i]
            + h10 * h * self.tangents[i]
            + h01 * self.knots_y[i + 1]
            + h11 * h * self.tangents[i + 1]
    }

    fn derivative_inside(&self, x: f64) -> f64 {
        let (i, h, t) = self.segment(x);

        let d00 = 6.0 * t * t - 6.0 * t;
        let d10 = 3.0 * t * t - 4.0 * t + 1.0;
        let d01 = -d00;
        let d11 = 3.0 * t * t - 2.0 * t;

        (d00 * self.knots_y[i] + d01 * self.knots_y[i + 1]) / h
            + d10 * self.tangents[i]
            + d11 * self.tangents[i + 1]
    }

    /// `y(x)`, or `None` outside `[-r, r]`.
    pub fn eval(&self, x: f64) -> Option<f64> {
        self.contains(x).then(|| self.eval_inside(x))
    }

    /// `dy/dx`, or `None` outside `[-r, r]`.
    pub fn derivative(&self, x: f64) -> Option<f64> {
        self.contains(x).then(|| self.derivative_inside(x))
    }

    /// `x(y)` from the tabulated inverse, or `None` outside the achieved range.
    ///
    /// Values within `1e-9` of the range width past either edge snap to the edge.
    pub fn inverse(&self, y: f64) -> Option<f64> {
        let tol = 1e-9 * self.y_range.width();
        if !(y >= self.y_range.min - tol && y <= self.y_range.max + tol) {
            return None;
        }
        Some(interp(y, &self.table_y, &self.table_x))
    }
}
