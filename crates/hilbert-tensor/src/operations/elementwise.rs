//! Element-wise array algebra.
//!
//! Binary operators between arrays return `Result` because both operands must
//! live over the same space; scalar operators cannot fail.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::{Scalar, c64};

impl<T: Scalar> HilbertArray<T> {
    fn assert_same_space(&self, other: &HilbertArray<T>) -> Result<()> {
        if self.space() == other.space() {
            Ok(())
        } else {
            Err(HilbertError::LabelMismatch(format!(
                "mismatched spaces {} and {}",
                self.space(),
                other.space()
            )))
        }
    }

    fn zip_with(&self, other: &HilbertArray<T>, f: impl Fn(T, T) -> T) -> Result<Self> {
        self.assert_same_space(other)?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::from_parts(self.space().clone(), data))
    }

    /// Apply `f` to every element.
    pub fn map(&self, f: impl Fn(T) -> T) -> Self {
        let data = self.data().iter().map(|&x| f(x)).collect();
        Self::from_parts(self.space().clone(), data)
    }

    /// Add `other` into this array.
    pub fn add_assign(&mut self, other: &HilbertArray<T>) -> Result<()> {
        self.assert_same_space(other)?;
        for (a, &b) in self.data_mut().iter_mut().zip(other.data()) {
            *a = *a + b;
        }
        Ok(())
    }

    /// Subtract `other` from this array.
    pub fn sub_assign(&mut self, other: &HilbertArray<T>) -> Result<()> {
        self.assert_same_space(other)?;
        for (a, &b) in self.data_mut().iter_mut().zip(other.data()) {
            *a = *a - b;
        }
        Ok(())
    }

    /// Multiply by a scalar.
    pub fn scale(&self, s: T) -> Self {
        self.map(|x| x * s)
    }

    /// Multiply by a scalar in place.
    pub fn scale_mut(&mut self, s: T) {
        for x in self.data_mut() {
            *x = *x * s;
        }
    }

    /// Element-wise complex conjugate over the same space.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.space().array(vec![c64::new(1.0, 2.0), c64::new(0.0, -1.0)]).unwrap();
    /// assert_eq!(x.conj().data(), &[c64::new(1.0, -2.0), c64::new(0.0, 1.0)]);
    /// ```
    pub fn conj(&self) -> Self {
        self.map(T::conjugate)
    }

    /// Divide in place by the Frobenius norm.
    ///
    /// A zero array is left unchanged.
    pub fn normalize(&mut self) {
        let n = self.norm();
        if n > 0.0 {
            self.scale_mut(T::from_f64(1.0 / n));
        }
    }

    /// A copy divided by its Frobenius norm.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.normalize();
        out
    }
}

impl<T: Scalar> Add for &HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn add(self, other: &HilbertArray<T>) -> Self::Output {
        self.zip_with(other, |a, b| a + b)
    }
}

impl<T: Scalar> Add for HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn add(self, other: HilbertArray<T>) -> Self::Output {
        &self + &other
    }
}

impl<T: Scalar> Sub for &HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn sub(self, other: &HilbertArray<T>) -> Self::Output {
        self.zip_with(other, |a, b| a - b)
    }
}

impl<T: Scalar> Sub for HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn sub(self, other: HilbertArray<T>) -> Self::Output {
        &self - &other
    }
}

impl<T: Scalar> Neg for &HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn neg(self) -> HilbertArray<T> {
        self.map(|x| -x)
    }
}

impl<T: Scalar> Neg for HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn neg(self) -> HilbertArray<T> {
        -&self
    }
}

impl<T: Scalar> Mul<T> for &HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn mul(self, s: T) -> HilbertArray<T> {
        self.scale(s)
    }
}

impl<T: Scalar> Mul<T> for HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn mul(mut self, s: T) -> HilbertArray<T> {
        self.scale_mut(s);
        self
    }
}

impl<T: Scalar> Div<T> for &HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn div(self, s: T) -> HilbertArray<T> {
        self.map(|x| x / s)
    }
}

impl<T: Scalar> Div<T> for HilbertArray<T> {
    type Output = HilbertArray<T>;

    fn div(self, s: T) -> HilbertArray<T> {
        &self / s
    }
}

macro_rules! impl_left_scalar_mul {
    ($($t:ty),*) => {$(
        impl Mul<&HilbertArray<$t>> for $t {
            type Output = HilbertArray<$t>;

            fn mul(self, a: &HilbertArray<$t>) -> HilbertArray<$t> {
                a.scale(self)
            }
        }

        impl Mul<HilbertArray<$t>> for $t {
            type Output = HilbertArray<$t>;

            fn mul(self, a: HilbertArray<$t>) -> HilbertArray<$t> {
                a * self
            }
        }
    )*};
}

impl_left_scalar_mul!(f64, c64);
