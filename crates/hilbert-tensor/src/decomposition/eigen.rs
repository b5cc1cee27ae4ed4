//! Eigenvalue decompositions of square arrays.
//!
//! Eigenvectors come back as an array over the input's own operator space:
//! column `j` of its matrix view (bra coordinates `j`) is the eigenvector
//! belonging to the `j`-th eigenvalue.

use faer::linalg::solvers::EvdError;

use crate::array::HilbertArray;
use crate::backend::row_major_from_mat;
use crate::decomposition::util::to_complex;
use crate::error::{HilbertError, Result};
use crate::field::BaseField;
use crate::scalar::{Scalar, c64};

impl<T: Scalar> HilbertArray<T> {
    /// Eigen-decomposition of a Hermitian array.
    ///
    /// Returns the real eigenvalues in nondecreasing order together with
    /// the unitary whose columns are the eigenvectors. Only the lower
    /// triangle of the matrix view is read.
    ///
    /// # Errors
    ///
    /// * `NonSquare` for arrays that are not operators.
    /// * `Decomposition` if the backend fails to converge.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let z = a.o().array(vec![
    ///     c64::new(1.0, 0.0), c64::new(0.0, 0.0),
    ///     c64::new(0.0, 0.0), c64::new(-1.0, 0.0),
    /// ]).unwrap();
    /// let (values, _) = z.eig_hermitian().unwrap();
    /// assert!((values[0] + 1.0).abs() < 1e-12);
    /// assert!((values[1] - 1.0).abs() < 1e-12);
    /// ```
    pub fn eig_hermitian(&self) -> Result<(Vec<f64>, HilbertArray<T>)> {
        let mat = self.square_matrix("eig_hermitian")?;
        let evd = mat
            .as_ref()
            .self_adjoint_eigen(faer::Side::Lower)
            .map_err(|e: EvdError| HilbertError::decomposition("eig_hermitian", e))?;

        let s = evd.S().column_vector();
        let values = (0..s.nrows()).map(|i| s[i].re_part()).collect();
        let vectors = Self::from_parts(self.space().clone(), row_major_from_mat(evd.U()));
        Ok((values, vectors))
    }

    /// Eigenvalues of a Hermitian array, nondecreasing.
    pub fn eigvals_hermitian(&self) -> Result<Vec<f64>> {
        self.eig_hermitian().map(|(values, _)| values)
    }

    /// Eigen-decomposition of a general square array.
    ///
    /// Eigenvalues and eigenvectors are complex even for real input, so the
    /// eigenvector array lives over the complex version of the space.
    pub fn eig(&self) -> Result<(Vec<c64>, HilbertArray<c64>)> {
        let mat = to_complex(self.square_matrix("eig")?.as_ref());
        let evd = mat
            .as_ref()
            .eigen()
            .map_err(|e: EvdError| HilbertError::decomposition("eig", e))?;

        let s = evd.S().column_vector();
        let values = (0..s.nrows()).map(|i| s[i]).collect();
        let space = self.space().with_field(&BaseField::complex());
        let vectors = HilbertArray::from_parts(space, row_major_from_mat(evd.U()));
        Ok((values, vectors))
    }

    /// Eigenvalues of a general square array.
    pub fn eigvals(&self) -> Result<Vec<c64>> {
        self.eig().map(|(values, _)| values)
    }
}
