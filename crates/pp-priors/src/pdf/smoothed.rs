use crate::pdf::{BoundedPdf, Prior};
use pp_core::{Error, Result, Support};
use pp_prob::grid::{interp, linspace, midpoints, trapezoid};
use pp_prob::math::{log_sigmoid, sigmoid};

/// Quadrature points spanning the smoothing window `[min, min + width]`.
pub const SMOOTHING_GRID_POINTS: usize = 1000;

#[inline]
fn window_exponent(x: f64, bottom: f64, width: f64) -> f64 {
    let m = x - bottom;
    width / m + width / (m - width)
}

/// Planck-taper window rising from `0` at `bottom` to `1` at `bottom + width`.
///
/// `S(x) = 1 / (1 + exp(w/m + w/(m - w)))` with `m = x - bottom` inside the window, `0` below
/// it and `1` above it. Computed as `sigmoid(-(w/m + w/(m-w)))`, which saturates cleanly
/// where the exponent blows up at the window edges.
pub fn window_factor(x: f64, bottom: f64, width: f64) -> f64 {
    if x < bottom {
        0.0
    } else if x >= bottom + width {
        1.0
    } else {
        sigmoid(-window_exponent(x, bottom, width))
    }
}

/// `ln S(x)`; `-inf` below the window, `0` above it.
pub fn log_window_factor(x: f64, bottom: f64, width: f64) -> f64 {
    if x < bottom {
        f64::NEG_INFINITY
    } else if x >= bottom + width {
        0.0
    } else {
        log_sigmoid(-window_exponent(x, bottom, width))
    }
}

/// A 1D law whose lower cutoff is tapered by [`window_factor`].
///
/// `p(x) = p_origin(x) · S(x) / N` with `N = 1 - ∫_win p_origin + ∫_win p_origin · S`. The
/// first window integral comes from the origin CDF, the tapered one from the trapezoid rule on
/// [`SMOOTHING_GRID_POINTS`] points.
///
/// The origin is owned by value: later changes to the caller's copy cannot leak in.
/// A zero width leaves the origin unchanged.
#[derive(Debug, Clone)]
pub struct SmoothedPdf {
    origin: Prior,
    width: f64,
    norm: f64,
    ln_norm: f64,
    integral_before: f64,
    integral_now: f64,
    window_top: f64,
    origin_cdf_top: f64,
    table_x: Vec<f64>,
    table_cdf: Vec<f64>,
}

impl SmoothedPdf {
    /// Taper the lower edge of `origin` over `width`, with `0 <= width <= max - min`.
    pub fn new(origin: impl Into<Prior>, width: f64) -> Result<Self> {
        let origin = origin.into();
        let support = origin.support();
        if !width.is_finite() || width < 0.0 || width > support.width() {
            return Err(Error::InvalidParameter(format!(
                "SmoothedPdf width must lie in [0, {}], got {width}",
                support.width()
            )));
        }
        let bottom = support.min;
        let window_top = bottom + width;
        if width == 0.0 {
            return Ok(Self {
                origin,
                width,
                norm: 1.0,
                ln_norm: 0.0,
                integral_before: 0.0,
                integral_now: 0.0,
                window_top,
                origin_cdf_top: 0.0,
                table_x: Vec::new(),
                table_cdf: Vec::new(),
            });
        }

        let grid = linspace(bottom, window_top, SMOOTHING_GRID_POINTS);
        // The window vanishes at `bottom`, where the origin density may diverge.
        let tapered: Vec<f64> = grid
            .iter()
            .map(|&x| {
                let s = window_factor(x, bottom, width);
                if s == 0.0 { 0.0 } else { origin.pdf(x) * s }
            })
            .collect();
        let integral_before = origin.cdf(window_top) - origin.cdf(bottom);
        let integral_now = trapezoid(&tapered, &grid);
        let norm = 1.0 - integral_before + integral_now;
        if !norm.is_finite() || norm <= 0.0 {
            return Err(Error::Computation(format!(
                "SmoothedPdf normalization is not finite and positive: {norm} \
                 (before={integral_before}, now={integral_now})"
            )));
        }
        let ln_norm = norm.ln();

        // Midpoint-rule CDF on the window grid, anchored at C(bottom) = 0.
        let mut table_cdf = Vec::with_capacity(grid.len());
        table_cdf.push(0.0);
        let mut acc = 0.0;
        for (w, mid) in grid.windows(2).zip(midpoints(&grid)) {
            let lp = origin.log_pdf(mid) + log_window_factor(mid, bottom, width) - ln_norm;
            if lp.is_finite() {
                acc += lp.exp() * (w[1] - w[0]);
            }
            table_cdf.push(acc);
        }

        log::debug!(
            "SmoothedPdf({}): width={width} norm={norm:.6} before={integral_before:.6} now={integral_now:.6}",
            origin.kind()
        );

        Ok(Self {
            origin_cdf_top: origin.cdf(window_top),
            origin,
            width,
            norm,
            ln_norm,
            integral_before,
            integral_now,
            window_top,
            table_x: grid,
            table_cdf,
        })
    }

    /// The wrapped law.
    pub fn origin(&self) -> &Prior {
        &self.origin
    }

    /// Smoothing width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Normalization `N`.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Window integrals `(∫ p_origin, ∫ p_origin · S)` over the smoothing window.
    pub fn window_integrals(&self) -> (f64, f64) {
        (self.integral_before, self.integral_now)
    }
}

impl BoundedPdf for SmoothedPdf {
    fn support(&self) -> Support {
        self.origin.support()
    }

    fn log_pdf_unclamped(&self, x: f64) -> f64 {
        if self.width == 0.0 {
            return self.origin.log_pdf_unclamped(x);
        }
        let bottom = self.origin.support().min;
        let lp = self.origin.log_pdf(x) + log_window_factor(x, bottom, self.width) - self.ln_norm;
        // An infinite origin density at the edge meets a zero window: the product vanishes.
        if lp.is_nan() { f64::NEG_INFINITY } else { lp }
    }

    fn log_cdf_unclamped(&self, x: f64) -> f64 {
        if self.width == 0.0 {
            return self.origin.log_cdf_unclamped(x);
        }
        let c = if x <= self.window_top {
            interp(x, &self.table_x, &self.table_cdf)
        } else {
            (self.integral_now + self.origin.cdf(x) - self.origin_cdf_top) / self.norm
        };
        c.clamp(0.0, 1.0).ln()
    }
}
