//! Scalar escape-time iteration: the interior fast-rejection tests and the
//! smooth (continuous) iteration count shared by every precision mode.
//!
//! Each precision mode supplies its own complex type and escape radius, but
//! the loop shape and the cardioid/bulb tests are identical everywhere —
//! kept as one scalar kernel here instead of three near-duplicates.

use crate::complex::{Complex, ComplexQuad};
use crate::limits::SCALAR_ESCAPE_RADIUS_SQ;
use crate::quad::Quad;

/// Outcome of iterating a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationResult {
    pub iterations: u32,
    pub escaped: bool,
    /// Continuous iteration count, usable for smooth coloring. Equal to
    /// `iterations as f64` when the point never escaped.
    pub smooth: f64,
}

/// True when `c` lies in the main cardioid.
#[inline]
pub fn in_main_cardioid(c_re: f64, c_im: f64) -> bool {
    let x_minus_quarter = c_re - 0.25;
    let q = x_minus_quarter * x_minus_quarter + c_im * c_im;
    q * (q + x_minus_quarter) < 0.25 * c_im * c_im
}

/// True when `c` lies in the period-2 bulb.
#[inline]
pub fn in_period2_bulb(c_re: f64, c_im: f64) -> bool {
    let x_plus_one = c_re + 1.0;
    x_plus_one * x_plus_one + c_im * c_im < 0.0625
}

/// Fast interior test combining the cardioid and period-2 bulb checks.
/// Applied uniformly across every kernel (scalar and perturbation alike)
/// so a point classified as interior never differs between precision modes.
#[inline]
pub fn is_known_interior(c_re: f64, c_im: f64) -> bool {
    in_main_cardioid(c_re, c_im) || in_period2_bulb(c_re, c_im)
}

/// Continuous iteration count from the final escaped iteration index and
/// squared modulus, `μ = i + 1 − log(log|Z|²) / log 2`.
#[inline]
pub fn smooth_iteration_count(iterations: u32, norm_sq: f64) -> f64 {
    iterations as f64 + 1.0 - (norm_sq.ln().ln() / f64::ln(2.0))
}

/// Iterate `z ↦ z² + c` from `z = 0` in plain `f64`, up to `max_iterations`,
/// escaping once `|z|² > `[`SCALAR_ESCAPE_RADIUS_SQ`].
pub fn iterate_scalar(c: Complex, max_iterations: u32) -> IterationResult {
    if is_known_interior(c.re, c.im) {
        return IterationResult {
            iterations: max_iterations,
            escaped: false,
            smooth: max_iterations as f64,
        };
    }

    let mut z = Complex::ZERO;
    for i in 0..max_iterations {
        z = z.square().add(c);
        let norm_sq = z.norm_sq();
        if norm_sq > SCALAR_ESCAPE_RADIUS_SQ {
            return IterationResult {
                iterations: i,
                escaped: true,
                smooth: smooth_iteration_count(i, norm_sq),
            };
        }
    }

    IterationResult {
        iterations: max_iterations,
        escaped: false,
        smooth: max_iterations as f64,
    }
}

/// Iterate `z ↦ z² + c` in [`Quad`] (double-double) precision: the Extended
/// kernel. The interior fast-rejection test is still evaluated in `f64` —
/// it is a cheap pre-filter, not a precision-critical computation.
pub fn iterate_extended(c: ComplexQuad, max_iterations: u32) -> IterationResult {
    let (c_re_f64, c_im_f64) = c.to_f64_pair();
    if is_known_interior(c_re_f64, c_im_f64) {
        return IterationResult {
            iterations: max_iterations,
            escaped: false,
            smooth: max_iterations as f64,
        };
    }

    let mut z = ComplexQuad::ZERO;
    let escape_radius_sq = Quad::from_f64(SCALAR_ESCAPE_RADIUS_SQ);
    for i in 0..max_iterations {
        z = z.square().add(c);
        let norm_sq = z.norm_sq();
        if norm_sq > escape_radius_sq {
            return IterationResult {
                iterations: i,
                escaped: true,
                smooth: smooth_iteration_count(i, norm_sq.to_f64()),
            };
        }
    }

    IterationResult {
        iterations: max_iterations,
        escaped: false,
        smooth: max_iterations as f64,
    }
}
