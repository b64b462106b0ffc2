//! Complex number types for the two arithmetic domains the kernels run in:
//! plain `f64` (scalar Double/Extended-adjacent math, and perturbation
//! deltas) and [`Quad`] (reference-orbit and Extended-mode math).
//!
//! Shaped after the donor's `ComplexDelta` trait: a small, `Copy`-friendly
//! value type with the arithmetic the kernels need and nothing else.

use crate::quad::Quad;

/// A plain `f64` complex number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.re - other.re, self.im - other.im)
    }

    #[inline]
    pub fn mul(self, other: Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }

    #[inline]
    pub fn square(self) -> Self {
        Self::new(
            self.re * self.re - self.im * self.im,
            2.0 * self.re * self.im,
        )
    }

    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// A [`Quad`]-precision complex number, used for the reference orbit and
/// for whole-frame Extended-mode rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComplexQuad {
    pub re: Quad,
    pub im: Quad,
}

impl ComplexQuad {
    pub const ZERO: Self = Self {
        re: Quad::ZERO,
        im: Quad::ZERO,
    };

    #[inline]
    pub fn new(re: Quad, im: Quad) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn from_f64(re: f64, im: f64) -> Self {
        Self::new(Quad::from_f64(re), Quad::from_f64(im))
    }

    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.re.add(other.re), self.im.add(other.im))
    }

    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.re.sub(other.re), self.im.sub(other.im))
    }

    #[inline]
    pub fn mul(self, other: Self) -> Self {
        Self::new(
            self.re.mul(other.re).sub(self.im.mul(other.im)),
            self.re.mul(other.im).add(self.im.mul(other.re)),
        )
    }

    #[inline]
    pub fn square(self) -> Self {
        Self::new(
            self.re.mul(self.re).sub(self.im.mul(self.im)),
            self.re.mul(self.im).mul_f64(2.0),
        )
    }

    #[inline]
    pub fn norm_sq(self) -> Quad {
        self.re.mul(self.re).add(self.im.mul(self.im))
    }

    #[inline]
    pub fn to_f64_pair(self) -> (f64, f64) {
        (self.re.to_f64(), self.im.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_square_matches_definition() {
        let z = Complex::new(3.0, 4.0);
        // (3+4i)^2 = 9 - 16 + 24i = -7 + 24i
        let sq = z.square();
        assert_eq!(sq.re, -7.0);
        assert_eq!(sq.im, 24.0);
    }

    #[test]
    fn complex_norm_sq_is_magnitude_squared() {
        let z = Complex::new(3.0, 4.0);
        assert_eq!(z.norm_sq(), 25.0);
    }

    #[test]
    fn complex_quad_matches_f64_at_low_precision() {
        let a = ComplexQuad::from_f64(1.5, -2.0);
        let b = ComplexQuad::from_f64(0.5, 1.0);
        let prod = a.mul(b);
        let (re, im) = prod.to_f64_pair();
        // (1.5 - 2i)(0.5 + i) = 0.75 + 1.5i - 1i - 2i^2 = 0.75 + 0.5i + 2 = 2.75 + 0.5i
        assert!((re - 2.75).abs() < 1e-12);
        assert!((im - 0.5).abs() < 1e-12);
    }

    #[test]
    fn complex_quad_square_matches_mul_self() {
        let a = ComplexQuad::from_f64(0.3, 0.7);
        let squared = a.square();
        let mul_self = a.mul(a);
        assert_eq!(squared.re, mul_self.re);
        assert_eq!(squared.im, mul_self.im);
    }
}
