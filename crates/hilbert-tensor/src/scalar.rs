//! Scalar trait for array element types.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use faer_traits::ComplexField;

use crate::field::FieldKind;

pub use faer::c64;

/// Trait for scalar types supported by hilbert-tensor.
///
/// This wraps faer's `ComplexField` with the arithmetic and conversion
/// helpers the arrays need. Each implementor belongs to exactly one
/// [`FieldKind`], which is how arrays check that their element type matches
/// the base field of their space.
pub trait Scalar:
    ComplexField
    + Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The field this element type represents.
    const KIND: FieldKind;

    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;

    /// Embed a real number.
    fn from_f64(x: f64) -> Self;

    /// Convert a complex number, returning `None` when the imaginary part
    /// exceeds `tol` and this type cannot hold it.
    fn try_from_c64(z: c64, tol: f64) -> Option<Self>;

    /// Widen to a complex number.
    fn to_c64(self) -> c64;

    /// Complex conjugate (identity for reals).
    fn conjugate(self) -> Self;

    /// Absolute value.
    fn modulus(self) -> f64 {
        self.modulus_sqr().sqrt()
    }

    /// Squared absolute value.
    fn modulus_sqr(self) -> f64;

    /// Real part.
    fn re_part(self) -> f64;

    /// Imaginary part.
    fn im_part(self) -> f64;
}

impl Scalar for f64 {
    const KIND: FieldKind = FieldKind::Real;

    fn one() -> Self {
        1.0
    }

    fn from_f64(x: f64) -> Self {
        x
    }

    fn try_from_c64(z: c64, tol: f64) -> Option<Self> {
        if z.im.abs() <= tol { Some(z.re) } else { None }
    }

    fn to_c64(self) -> c64 {
        c64::new(self, 0.0)
    }

    fn conjugate(self) -> Self {
        self
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn modulus_sqr(self) -> f64 {
        self * self
    }

    fn re_part(self) -> f64 {
        self
    }

    fn im_part(self) -> f64 {
        0.0
    }
}

impl Scalar for c64 {
    const KIND: FieldKind = FieldKind::Complex;

    fn one() -> Self {
        c64::new(1.0, 0.0)
    }

    fn from_f64(x: f64) -> Self {
        c64::new(x, 0.0)
    }

    fn try_from_c64(z: c64, _tol: f64) -> Option<Self> {
        Some(z)
    }

    fn to_c64(self) -> c64 {
        self
    }

    fn conjugate(self) -> Self {
        c64::new(self.re, -self.im)
    }

    fn modulus(self) -> f64 {
        self.re.hypot(self.im)
    }

    fn modulus_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    fn re_part(self) -> f64 {
        self.re
    }

    fn im_part(self) -> f64 {
        self.im
    }
}

/// Principal branch of `ln z`.
pub(crate) fn complex_ln(z: c64) -> c64 {
    c64::new(z.re.hypot(z.im).ln(), z.im.atan2(z.re))
}

/// Principal branch of `sqrt z`.
pub(crate) fn complex_sqrt(z: c64) -> c64 {
    let r = z.re.hypot(z.im).sqrt();
    let theta = z.im.atan2(z.re) / 2.0;
    c64::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faer_traits::ComplexField;

    #[test]
    fn test_f64_is_real() {
        assert!(<f64 as ComplexField>::IS_REAL);
        assert_eq!(f64::KIND, FieldKind::Real);
    }

    #[test]
    fn test_c64_is_not_real() {
        assert!(!<c64 as ComplexField>::IS_REAL);
        assert_eq!(c64::KIND, FieldKind::Complex);
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(<f64 as Scalar>::zero(), 0.0);
        assert_eq!(<f64 as Scalar>::one(), 1.0);
        assert_eq!(<c64 as Scalar>::zero(), c64::new(0.0, 0.0));
        assert_eq!(<c64 as Scalar>::one(), c64::new(1.0, 0.0));
    }

    #[test]
    fn test_real_cast_rejects_imaginary() {
        assert_eq!(f64::try_from_c64(c64::new(2.0, 1e-15), 1e-12), Some(2.0));
        assert_eq!(f64::try_from_c64(c64::new(2.0, 0.5), 1e-12), None);
    }

    #[test]
    fn test_conjugate_and_modulus() {
        let z = c64::new(3.0, 4.0);
        assert_eq!(z.conjugate(), c64::new(3.0, -4.0));
        assert_relative_eq!(z.modulus(), 5.0);
        assert_relative_eq!((-2.0f64).modulus(), 2.0);
    }

    #[test]
    fn test_complex_functions() {
        let l = complex_ln(c64::new(-1.0, 0.0));
        assert_relative_eq!(l.im, std::f64::consts::PI, epsilon = 1e-12);

        let s = complex_sqrt(c64::new(-4.0, 0.0));
        assert_relative_eq!(s.re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.im, 2.0, epsilon = 1e-12);
    }
}
