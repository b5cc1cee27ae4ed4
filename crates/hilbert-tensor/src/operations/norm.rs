//! Entry-wise array norms.

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;

impl<T: Scalar> HilbertArray<T> {
    /// Frobenius norm: `sqrt(sum |x_i|^2)`.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.space().array(vec![c64::new(3.0, 0.0), c64::new(0.0, 4.0)]).unwrap();
    /// assert!((x.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Squared Frobenius norm.
    pub fn norm_sqr(&self) -> f64 {
        self.data().iter().map(|x| x.modulus_sqr()).sum()
    }

    /// Entry-wise p-norm, `p` in `[1, inf]`.
    pub fn norm_p(&self, p: f64) -> Result<f64> {
        if p.is_nan() || p < 1.0 {
            return Err(HilbertError::InvalidNormOrder(p));
        }
        if p == f64::INFINITY {
            return Ok(self.data().iter().map(|x| x.modulus()).fold(0.0, f64::max));
        }
        if p == 2.0 {
            return Ok(self.norm());
        }
        let sum: f64 = self.data().iter().map(|x| x.modulus().powf(p)).sum();
        Ok(sum.powf(1.0 / p))
    }
}

#[cfg(test)]
mod tests {
    use crate::atom::qudit;
    use crate::error::HilbertError;
    use crate::scalar::c64;
    use approx::assert_relative_eq;

    #[test]
    fn test_norms() {
        let s = qudit("nrm", 3).unwrap().space();
        let x = s
            .array(vec![c64::new(1.0, 0.0), c64::new(0.0, -2.0), c64::new(-2.0, 0.0)])
            .unwrap();
        assert_relative_eq!(x.norm(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(x.norm_sqr(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(x.norm_p(1.0).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(x.norm_p(f64::INFINITY).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(
            x.norm_p(3.0).unwrap(),
            17.0f64.powf(1.0 / 3.0),
            epsilon = 1e-12
        );
        assert!(matches!(
            x.norm_p(0.5),
            Err(HilbertError::InvalidNormOrder(_))
        ));
    }
}
