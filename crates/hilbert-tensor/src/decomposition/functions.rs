//! Matrix functions through the eigen-decomposition.

use faer::Mat;
use faer::linalg::solvers::Solve;

use crate::array::HilbertArray;
use crate::backend::row_major_from_mat;
use crate::config;
use crate::decomposition::util::{check_finite, from_complex, identity, reconstruct, to_complex};
use crate::error::Result;
use crate::scalar::{Scalar, c64, complex_ln, complex_sqrt};

impl<T: Scalar> HilbertArray<T> {
    /// `V diag(f(lambda)) V^H` for a Hermitian array and real `f`.
    pub(crate) fn hermitian_function(&self, f: impl Fn(f64) -> f64) -> Result<Vec<T>> {
        let (values, vectors) = self.eig_hermitian()?;
        let v = vectors.to_faer_mat();
        let n = values.len();
        let scaled = Mat::from_fn(n, n, |i, j| v[(i, j)] * T::from_f64(f(values[j])));
        let vh = Mat::from_fn(n, n, |i, j| v[(j, i)].conjugate());
        let out = &scaled * &vh;
        Ok(row_major_from_mat(out.as_ref()))
    }

    /// Apply `f` to the eigenvalues of a square array.
    ///
    /// Hermitian arrays are diagonalized by a unitary; anything else goes
    /// through the general eigen-decomposition and an LU inverse of the
    /// eigenvector matrix, which fails with `Decomposition` for defective
    /// matrices.
    fn matrix_function(&self, routine: &str, f: impl Fn(c64) -> c64) -> Result<Self> {
        self.square_matrix(routine)?;
        let out = if self.is_hermitian(config::tolerance()) {
            let (values, vectors) = self.eig_hermitian()?;
            let v = to_complex(vectors.to_faer_mat().as_ref());
            let mapped: Vec<c64> = values.iter().map(|&x| f(c64::new(x, 0.0))).collect();
            let n = mapped.len();
            let vh = Mat::from_fn(n, n, |i, j| v[(j, i)].conjugate());
            reconstruct(v.as_ref(), &mapped, vh.as_ref())
        } else {
            let (values, vectors) = self.eig()?;
            let v = vectors.to_faer_mat();
            let mut v_inv = identity::<c64>(values.len());
            v.as_ref().partial_piv_lu().solve_in_place(&mut v_inv);
            check_finite(v_inv.as_ref(), routine)?;
            let mapped: Vec<c64> = values.into_iter().map(f).collect();
            reconstruct(v.as_ref(), &mapped, v_inv.as_ref())
        };
        check_finite(out.as_ref(), routine)?;
        let out = from_complex::<T>(out.as_ref(), routine)?;
        Ok(Self::from_parts(
            self.space().clone(),
            row_major_from_mat(out.as_ref()),
        ))
    }

    /// Principal matrix logarithm.
    ///
    /// # Errors
    ///
    /// * `NonSquare` for non-operators.
    /// * `Decomposition` for singular or defective input.
    /// * `UnsupportedField` when a real array has a complex logarithm.
    pub fn logm(&self) -> Result<Self> {
        self.matrix_function("logm", complex_ln)
    }

    /// Principal matrix square root.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.o().array(vec![
    ///     c64::new(4.0, 0.0), c64::new(0.0, 0.0),
    ///     c64::new(0.0, 0.0), c64::new(9.0, 0.0),
    /// ]).unwrap();
    /// let r = x.sqrtm().unwrap();
    /// assert!((r.get(&[1, 1]).unwrap().re - 3.0).abs() < 1e-10);
    /// ```
    pub fn sqrtm(&self) -> Result<Self> {
        self.matrix_function("sqrtm", complex_sqrt)
    }
}
