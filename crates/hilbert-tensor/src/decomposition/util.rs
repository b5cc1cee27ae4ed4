//! Matrix-view helpers shared by the decompositions.

use faer::{Mat, MatRef};
use tracing::debug;

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::{Scalar, c64};

/// Relative size of an imaginary part that still counts as rounding noise
/// when a complex result is cast back to a real field.
const IMAG_NOISE: f64 = 1e-10;

impl<T: Scalar> HilbertArray<T> {
    /// Square matrix view, or `NonSquare`.
    pub(crate) fn square_matrix(&self, routine: &str) -> Result<Mat<T>> {
        self.space().require_square()?;
        debug!(routine, n = self.space().ket_dim(), space = %self.space(), "decomposition dispatch");
        Ok(self.to_faer_mat())
    }

    /// Whether the array equals its adjoint within `tol` (square arrays only).
    pub fn is_hermitian(&self, tol: f64) -> bool {
        if !self.space().is_square() {
            return false;
        }
        let n = self.space().ket_dim();
        let data = self.data();
        (0..n).all(|i| {
            (i..n).all(|j| (data[i * n + j] - data[j * n + i].conjugate()).modulus() <= tol)
        })
    }
}

pub(crate) fn identity<T: Scalar>(n: usize) -> Mat<T> {
    Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
}

pub(crate) fn to_complex<T: Scalar>(mat: MatRef<'_, T>) -> Mat<c64> {
    Mat::from_fn(mat.nrows(), mat.ncols(), |i, j| mat[(i, j)].to_c64())
}

/// Cast a complex matrix back to `T`, rejecting genuinely complex entries
/// when `T` is real.
pub(crate) fn from_complex<T: Scalar>(mat: MatRef<'_, c64>, routine: &str) -> Result<Mat<T>> {
    let mut scale: f64 = 1.0;
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            scale = scale.max(mat[(i, j)].modulus());
        }
    }
    let tol = IMAG_NOISE * scale;

    let mut out = Mat::<T>::zeros(mat.nrows(), mat.ncols());
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            out[(i, j)] = T::try_from_c64(mat[(i, j)], tol)
                .ok_or_else(|| HilbertError::unsupported(&format!("{routine} with a complex result"), T::KIND))?;
        }
    }
    Ok(out)
}

/// `V diag(values) W` for square `V`, `W`.
pub(crate) fn reconstruct(v: MatRef<'_, c64>, values: &[c64], w: MatRef<'_, c64>) -> Mat<c64> {
    let n = values.len();
    let scaled = Mat::from_fn(n, n, |i, j| v[(i, j)] * values[j]);
    scaled * w
}

/// Fail with `Decomposition` if any entry is NaN or infinite.
pub(crate) fn check_finite<T: Scalar>(mat: MatRef<'_, T>, routine: &str) -> Result<()> {
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            let x = mat[(i, j)];
            if !x.re_part().is_finite() || !x.im_part().is_finite() {
                return Err(HilbertError::Decomposition {
                    routine: routine.to_string(),
                    message: format!("non-finite entry at ({i}, {j})"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::qubit;

    #[test]
    fn test_is_hermitian() {
        let a = qubit("uh").unwrap();
        let y = a
            .o()
            .array(vec![
                c64::new(0.0, 0.0),
                c64::new(0.0, -1.0),
                c64::new(0.0, 1.0),
                c64::new(0.0, 0.0),
            ])
            .unwrap();
        assert!(y.is_hermitian(1e-12));
        let ket = a.space().zeros::<c64>().unwrap();
        assert!(!ket.is_hermitian(1e-12));
    }

    #[test]
    fn test_from_complex_rejects_imaginary_for_reals() {
        let m = Mat::from_fn(2, 2, |i, j| c64::new((i + j) as f64, if i == j { 0.5 } else { 0.0 }));
        assert!(from_complex::<f64>(m.as_ref(), "test").is_err());
        let noisy = Mat::from_fn(1, 1, |_, _| c64::new(2.0, 1e-14));
        let real = from_complex::<f64>(noisy.as_ref(), "test").unwrap();
        assert_eq!(real[(0, 0)], 2.0);
    }

    #[test]
    fn test_check_finite() {
        let m = Mat::from_fn(1, 2, |_, j| if j == 0 { 1.0 } else { f64::NAN });
        assert!(matches!(
            check_finite(m.as_ref(), "inverse"),
            Err(HilbertError::Decomposition { .. })
        ));
    }
}
