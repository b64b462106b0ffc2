//! Whole-frame Double and Extended kernels: per-pixel iteration with no
//! reference orbit, used when the view is wide enough that plain `f64`
//! (Double) or [`Quad`] (Extended) arithmetic stays faithful on its own.
//!
//! Pixels are mapped to the plane the same way the perturbation kernel
//! maps them (`c = center + (px − width/2, py − height/2) · (dx, dy)`),
//! not by a separate pixel-center convention — the three kernel families
//! must sample the same (px, py) → c grid or Mode Agreement (spec.md §8)
//! breaks near escape-boundary detail.

use deepzoom_core::complex::{Complex, ComplexQuad};
use deepzoom_core::kernels::{iterate_extended, iterate_scalar};
use deepzoom_core::quad::Quad;

use crate::driver::RowKernel;

#[inline]
fn sentinel_or_smooth(result: deepzoom_core::kernels::IterationResult, max_iter: u32) -> f64 {
    if result.escaped {
        result.smooth
    } else {
        -(max_iter as f64)
    }
}

/// Plain `f64` scalar kernel (`PrecisionMode::Double`).
pub struct DoubleKernel {
    center_re: f64,
    center_im: f64,
    dx: f64,
    dy: f64,
    width: u32,
    height: u32,
    max_iter: u32,
}

impl DoubleKernel {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, width: u32, height: u32, max_iter: u32) -> Self {
        Self {
            center_re: (xmin + xmax) / 2.0,
            center_im: (ymin + ymax) / 2.0,
            dx: (xmax - xmin) / width as f64,
            dy: (ymax - ymin) / height as f64,
            width,
            height,
            max_iter,
        }
    }
}

impl RowKernel for DoubleKernel {
    fn compute_row(&self, py: u32, row_out: &mut [f64]) {
        let ci = self.center_im + (py as f64 - self.height as f64 / 2.0) * self.dy;
        for (px, cell) in row_out.iter_mut().enumerate().take(self.width as usize) {
            let cr = self.center_re + (px as f64 - self.width as f64 / 2.0) * self.dx;
            let result = iterate_scalar(Complex::new(cr, ci), self.max_iter);
            *cell = sentinel_or_smooth(result, self.max_iter);
        }
    }
}

/// [`Quad`]-precision scalar kernel (`PrecisionMode::Extended`): the
/// portable stand-in for 80-bit extended precision.
pub struct ExtendedKernel {
    center_re: Quad,
    center_im: Quad,
    dx: Quad,
    dy: Quad,
    width: u32,
    height: u32,
    max_iter: u32,
}

impl ExtendedKernel {
    pub fn new(xmin: Quad, xmax: Quad, ymin: Quad, ymax: Quad, width: u32, height: u32, max_iter: u32) -> Self {
        let two = Quad::from_f64(2.0);
        let dx = xmax.sub(xmin).div(Quad::from_f64(width as f64));
        let dy = ymax.sub(ymin).div(Quad::from_f64(height as f64));
        Self {
            center_re: xmin.add(xmax).div(two),
            center_im: ymin.add(ymax).div(two),
            dx,
            dy,
            width,
            height,
            max_iter,
        }
    }
}

impl RowKernel for ExtendedKernel {
    fn compute_row(&self, py: u32, row_out: &mut [f64]) {
        let dc_im = self.dy.mul_f64(py as f64 - self.height as f64 / 2.0);
        let ci = self.center_im.add(dc_im);
        for (px, cell) in row_out.iter_mut().enumerate().take(self.width as usize) {
            let dc_re = self.dx.mul_f64(px as f64 - self.width as f64 / 2.0);
            let cr = self.center_re.add(dc_re);
            let c = ComplexQuad::new(cr, ci);
            let result = iterate_extended(c, self.max_iter);
            *cell = sentinel_or_smooth(result, self.max_iter);
        }
    }
}
