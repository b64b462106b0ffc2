//! The perturbation kernel: the hot path for deep-zoom frames. Every pixel
//! iterates a low-precision delta relative to one shared high-precision
//! reference orbit, `δ_{n+1} = 2·X_n·δ_n + δ_n² + δc`, vectorized across
//! `SIMD_LANES` pixels at a time with `wide::f64x4`.
//!
//! Escape is checked only every [`UNROLL_FACTOR`] iterations to amortize
//! the per-lane mask update; this can report an escape index up to
//! `UNROLL_FACTOR - 1` steps late, which is invisible in rendered output
//! (see the module-level note in the reference orbit's clamp behavior).
//! Glitch detection and rebasing (Pauldelbrot's technique) are not
//! implemented: a pixel whose true orbit diverges sharply from the
//! reference can render with a wrong smooth value. Accepted limitation,
//! not a bug.

use wide::f64x4;

use deepzoom_core::complex::{Complex, ComplexQuad};
use deepzoom_core::error::EngineError;
use deepzoom_core::kernels::{is_known_interior, smooth_iteration_count};
use deepzoom_core::limits::{PERTURBATION_ESCAPE_RADIUS_SQ, SIMD_LANES, UNROLL_FACTOR};
use deepzoom_core::quad::Quad;

use crate::driver::RowKernel;
use crate::linear_approx::{self, LinearApprox};
use crate::reference_orbit::ReferenceOrbit;

/// Everything the perturbation kernel needs per frame: the reference
/// orbit, the linear-approximation preamble, and the pixel-to-plane
/// mapping.
pub struct PerturbationKernel {
    orbit: ReferenceOrbit,
    approx: LinearApprox,
    center_re: f64,
    center_im: f64,
    dx: f64,
    dy: f64,
    width: u32,
    height: u32,
    max_iter: u32,
}

/// Build the reference orbit and linear approximation for one frame and
/// assemble the kernel that renders it.
pub fn build(
    xmin: Quad,
    xmax: Quad,
    ymin: Quad,
    ymax: Quad,
    width: u32,
    height: u32,
    max_iter: u32,
) -> Result<PerturbationKernel, EngineError> {
    let two = Quad::from_f64(2.0);
    let center_quad_re = xmin.add(xmax).div(two);
    let center_quad_im = ymin.add(ymax).div(two);
    let center = ComplexQuad::new(center_quad_re, center_quad_im);

    let orbit = ReferenceOrbit::build(center, max_iter)?;

    let dx = xmax.sub(xmin).to_f64() / width as f64;
    let dy = ymax.sub(ymin).to_f64() / height as f64;
    let r_view = ((width as f64 * dx / 2.0).powi(2) + (height as f64 * dy / 2.0).powi(2)).sqrt();

    let approx = linear_approx::compute(&orbit, r_view);
    log::debug!(
        "perturbation kernel: ref_iter={}, skip_iter={}",
        orbit.ref_iter(),
        approx.skip_iter
    );

    let (center_re, center_im) = center.to_f64_pair();

    Ok(PerturbationKernel {
        orbit,
        approx,
        center_re,
        center_im,
        dx,
        dy,
        width,
        height,
        max_iter,
    })
}

impl PerturbationKernel {
    /// Iterate one SIMD-width group of pixels sharing the same row (same
    /// `δc_im`), starting from `skip_iter` with `δ = B·δc`.
    fn iterate_group(&self, dc_re: [f64; SIMD_LANES], dc_im: [f64; SIMD_LANES]) -> [f64; SIMD_LANES] {
        let mut delta_re_init = [0.0f64; SIMD_LANES];
        let mut delta_im_init = [0.0f64; SIMD_LANES];
        if self.approx.skip_iter > 0 {
            for lane in 0..SIMD_LANES {
                let dc = Complex::new(dc_re[lane], dc_im[lane]);
                let d0 = self.approx.b.mul(dc);
                delta_re_init[lane] = d0.re;
                delta_im_init[lane] = d0.im;
            }
        }

        let mut delta_re = f64x4::from(delta_re_init);
        let mut delta_im = f64x4::from(delta_im_init);
        let dcv_re = f64x4::from(dc_re);
        let dcv_im = f64x4::from(dc_im);

        let mut active = [true; SIMD_LANES];
        let mut smooth = [-(self.max_iter as f64); SIMD_LANES];

        let mut n = self.approx.skip_iter;
        while n < self.max_iter && active.iter().any(|a| *a) {
            let block_end = (n + UNROLL_FACTOR as u32).min(self.max_iter);
            while n < block_end {
                let (xr, xi) = self.orbit.f64_at_clamped(n);
                let xr_v = f64x4::splat(xr);
                let xi_v = f64x4::splat(xi);
                let two = f64x4::splat(2.0);

                let two_x_delta_re = (xr_v * delta_re - xi_v * delta_im) * two;
                let two_x_delta_im = (xr_v * delta_im + xi_v * delta_re) * two;
                let delta_sq_re = delta_re * delta_re - delta_im * delta_im;
                let delta_sq_im = delta_re * delta_im * two;

                delta_re = two_x_delta_re + delta_sq_re + dcv_re;
                delta_im = two_x_delta_im + delta_sq_im + dcv_im;
                n += 1;
            }

            // Escape check: |X_n + delta_n|^2 > 4, against the *next*
            // reference point (the orbit after this block's steps).
            let (xr_next, xi_next) = self.orbit.f64_at_clamped(n);
            let delta_re_arr = *delta_re.as_array();
            let delta_im_arr = *delta_im.as_array();
            for lane in 0..SIMD_LANES {
                if !active[lane] {
                    continue;
                }
                let zr = xr_next + delta_re_arr[lane];
                let zi = xi_next + delta_im_arr[lane];
                let norm_sq = zr * zr + zi * zi;
                if norm_sq > PERTURBATION_ESCAPE_RADIUS_SQ {
                    smooth[lane] = smooth_iteration_count(n, norm_sq);
                    active[lane] = false;
                }
            }

            if active.iter().any(|a| *a) {
                // Retire escaped lanes: zero their delta so the next
                // vectorized multiply does not propagate an exploded value.
                let mut re_arr = *delta_re.as_array();
                let mut im_arr = *delta_im.as_array();
                for lane in 0..SIMD_LANES {
                    if !active[lane] {
                        re_arr[lane] = 0.0;
                        im_arr[lane] = 0.0;
                    }
                }
                delta_re = f64x4::from(re_arr);
                delta_im = f64x4::from(im_arr);
            }
        }

        smooth
    }

    /// Scalar fallback for the `width mod SIMD_LANES` tail pixels of a row,
    /// and for rows narrower than one SIMD group.
    fn iterate_scalar_tail(&self, dc_re: f64, dc_im: f64) -> f64 {
        let mut delta = if self.approx.skip_iter > 0 {
            self.approx.b.mul(Complex::new(dc_re, dc_im))
        } else {
            Complex::ZERO
        };

        let mut n = self.approx.skip_iter;
        while n < self.max_iter {
            let (xr, xi) = self.orbit.f64_at_clamped(n);
            let x_n = Complex::new(xr, xi);
            let two_x_delta = x_n.mul(delta).scale(2.0);
            let delta_sq = delta.square();
            delta = two_x_delta.add(delta_sq).add(Complex::new(dc_re, dc_im));
            n += 1;

            let (xr_next, xi_next) = self.orbit.f64_at_clamped(n);
            let zr = xr_next + delta.re;
            let zi = xi_next + delta.im;
            let norm_sq = zr * zr + zi * zi;
            if norm_sq > PERTURBATION_ESCAPE_RADIUS_SQ {
                return smooth_iteration_count(n, norm_sq);
            }
        }

        -(self.max_iter as f64)
    }
}

impl RowKernel for PerturbationKernel {
    fn compute_row(&self, py: u32, row_out: &mut [f64]) {
        let dc_im = (py as f64 - self.height as f64 / 2.0) * self.dy;
        let ci = self.center_im + dc_im;

        let lanes = SIMD_LANES;
        let width = self.width as usize;
        let mut px = 0usize;

        while px + lanes <= width {
            let mut dc_re = [0.0f64; SIMD_LANES];
            let mut interior = [false; SIMD_LANES];
            for lane in 0..lanes {
                let p = (px + lane) as f64;
                dc_re[lane] = (p - self.width as f64 / 2.0) * self.dx;
                let cr = self.center_re + dc_re[lane];
                interior[lane] = is_known_interior(cr, ci);
            }

            if interior.iter().all(|i| *i) {
                for lane in 0..lanes {
                    row_out[px + lane] = -(self.max_iter as f64);
                }
            } else {
                let dc_im_arr = [dc_im; SIMD_LANES];
                let smooth = self.iterate_group(dc_re, dc_im_arr);
                for lane in 0..lanes {
                    row_out[px + lane] = if interior[lane] {
                        -(self.max_iter as f64)
                    } else {
                        smooth[lane]
                    };
                }
            }
            px += lanes;
        }

        while px < width {
            let dc_re = (px as f64 - self.width as f64 / 2.0) * self.dx;
            let cr = self.center_re + dc_re;
            row_out[px] = if is_known_interior(cr, ci) {
                -(self.max_iter as f64)
            } else {
                self.iterate_scalar_tail(dc_re, dc_im)
            };
            px += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturbation_agrees_with_naive_f64_when_skip_iter_is_zero() {
        // A shallow region where skip_iter will be 0 (r_view too large to
        // trust any linear skip), so the pixel orbit is just the reference
        // orbit's own recurrence restated per-pixel.
        let xmin = Quad::parse("-2.0").unwrap();
        let xmax = Quad::parse("1.0").unwrap();
        let ymin = Quad::parse("-1.0").unwrap();
        let ymax = Quad::parse("1.0").unwrap();
        let kernel = build(xmin, xmax, ymin, ymax, 16, 16, 200).unwrap();
        assert_eq!(kernel.approx.skip_iter, 0);

        let mut row = vec![0.0; 16];
        kernel.compute_row(0, &mut row);

        // Compare against direct f64 iteration on the same grid-aligned
        // pixel mapping the kernel itself uses: c = center + (idx - extent/2) * d.
        let dx = 3.0 / 16.0;
        let dy = 2.0 / 16.0;
        let ci = 0.0 + (0.0 - 16.0 / 2.0) * dy;
        for (px, &value) in row.iter().enumerate() {
            let cr = -0.5 + (px as f64 - 16.0 / 2.0) * dx;
            let naive = deepzoom_core::kernels::iterate_scalar(Complex::new(cr, ci), 200);
            let naive_value = if naive.escaped {
                naive.smooth
            } else {
                -200.0
            };
            if naive_value > 0.0 && value > 0.0 {
                assert!((naive_value - value).abs() < 1.0, "cr={cr}: {naive_value} vs {value}");
            } else {
                assert_eq!(naive_value.is_sign_negative(), value.is_sign_negative());
            }
        }
    }

    #[test]
    fn interior_pixels_are_sentinel() {
        let xmin = Quad::from_f64(-0.1);
        let xmax = Quad::from_f64(0.1);
        let ymin = Quad::from_f64(-0.1);
        let ymax = Quad::from_f64(0.1);
        let kernel = build(xmin, xmax, ymin, ymax, 8, 8, 300).unwrap();
        let mut row = vec![0.0; 8];
        kernel.compute_row(4, &mut row);
        for cell in row {
            assert_eq!(cell, -300.0);
        }
    }

    #[test]
    fn scalar_tail_matches_group_path_on_same_pixel() {
        let xmin = Quad::parse("-1.8").unwrap();
        let xmax = Quad::parse("1.2").unwrap();
        let ymin = Quad::parse("-1.3").unwrap();
        let ymax = Quad::parse("1.3").unwrap();
        // width = 5 forces a 4-lane group plus one scalar tail pixel.
        let kernel = build(xmin, xmax, ymin, ymax, 5, 5, 256).unwrap();
        let mut row = vec![0.0; 5];
        kernel.compute_row(0, &mut row);
        assert_eq!(row.len(), 5);
    }
}
