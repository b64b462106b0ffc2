//! Linear (series/BLA) approximation coefficient: the scalar `B_n` sequence
//! that lets a pixel's delta iteration start at `skip_iter` instead of at
//! iteration 0.

use deepzoom_core::complex::Complex;
use deepzoom_core::limits::LINEAR_SKIP_THRESHOLD;

use crate::reference_orbit::ReferenceOrbit;

/// Result of the linear-approximation preamble: the coefficient `B` at
/// `skip_iter`, and `skip_iter` itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearApprox {
    pub b: Complex,
    pub skip_iter: u32,
}

/// Compute `B_n = 2·X_n·B_{n-1} + 1` up to the largest `n` for which
/// `|B_n| · r_view` stays below [`LINEAR_SKIP_THRESHOLD`].
///
/// `r_view` is the half-diagonal of one pixel step's delta, i.e. the
/// largest `|δc|` any pixel in the frame can have.
pub fn compute(orbit: &ReferenceOrbit, r_view: f64) -> LinearApprox {
    let mut b = Complex::ZERO;
    let mut skip_iter: u32 = 0;

    for n in 0..orbit.ref_iter() {
        let b_mag = b.norm_sq().sqrt();
        if b_mag * r_view >= LINEAR_SKIP_THRESHOLD {
            break;
        }
        skip_iter = n;

        let (xr, xi) = orbit.f64_at_clamped(n);
        let x_n = Complex::new(xr, xi);
        b = x_n.mul(b).scale(2.0).add(Complex::new(1.0, 0.0));
    }

    LinearApprox { b, skip_iter }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepzoom_core::complex::ComplexQuad;

    #[test]
    fn zero_r_view_never_breaks_until_ref_iter() {
        let orbit = ReferenceOrbit::build(ComplexQuad::from_f64(-0.75, 0.1), 200).unwrap();
        let approx = compute(&orbit, 0.0);
        assert_eq!(approx.skip_iter, orbit.ref_iter().saturating_sub(1));
    }

    #[test]
    fn huge_r_view_skips_nothing() {
        let orbit = ReferenceOrbit::build(ComplexQuad::from_f64(-0.75, 0.1), 200).unwrap();
        let approx = compute(&orbit, 1e20);
        assert_eq!(approx.skip_iter, 0);
        assert_eq!(approx.b, Complex::ZERO);
    }

    #[test]
    fn skip_iter_never_exceeds_ref_iter() {
        let orbit = ReferenceOrbit::build(ComplexQuad::from_f64(-1.25, 0.0), 500).unwrap();
        let approx = compute(&orbit, 1e-15);
        assert!(approx.skip_iter <= orbit.ref_iter());
    }
}
