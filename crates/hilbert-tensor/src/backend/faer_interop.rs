//! Conversion between row-major buffers and faer matrices.
//!
//! faer stores matrices column-major while arrays keep row-major data, so
//! every conversion copies.

use faer::linalg::matmul::matmul;
use faer::{Accum, Mat, MatRef, Par};
use tracing::trace;

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

/// Copy a row-major buffer into an owned faer matrix.
///
/// `data.len()` must equal `rows * cols`.
pub(crate) fn mat_from_row_major<T: Scalar>(data: &[T], rows: usize, cols: usize) -> Mat<T> {
    debug_assert_eq!(data.len(), rows * cols);
    Mat::from_fn(rows, cols, |i, j| data[i * cols + j])
}

/// Copy a faer matrix into a row-major buffer.
pub(crate) fn row_major_from_mat<T: Scalar>(mat: MatRef<'_, T>) -> Vec<T> {
    let rows = mat.nrows();
    let cols = mat.ncols();
    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        for j in 0..cols {
            data.push(mat[(i, j)]);
        }
    }
    data
}

/// `C(m,n) = A(m,k) * B(k,n)` on row-major buffers.
pub(crate) fn matmul_row_major<T: Scalar>(
    a: &[T],
    b: &[T],
    m: usize,
    k: usize,
    n: usize,
) -> Vec<T> {
    trace!(m, k, n, "gemm");
    let a_mat = mat_from_row_major(a, m, k);
    let b_mat = mat_from_row_major(b, k, n);
    let mut c_mat = Mat::<T>::zeros(m, n);
    matmul(
        c_mat.as_mut(),
        Accum::Replace,
        a_mat.as_ref(),
        b_mat.as_ref(),
        T::one(),
        Par::Seq,
    );
    row_major_from_mat(c_mat.as_ref())
}

impl<T: Scalar> HilbertArray<T> {
    /// Copy the array into its matrix view: rows are indexed by the ket
    /// axes, columns by the bra axes.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qubit("b").unwrap();
    /// let op = a.space().product(&b.h().space()).unwrap().zeros::<c64>().unwrap();
    /// let m = op.to_faer_mat();
    /// assert_eq!((m.nrows(), m.ncols()), (2, 2));
    /// ```
    pub fn to_faer_mat(&self) -> Mat<T> {
        mat_from_row_major(
            self.data(),
            self.space().ket_dim(),
            self.space().bra_dim(),
        )
    }

    /// Wrap a matrix back into an array over `space`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` unless the matrix is `ket_dim x bra_dim` of `space`;
    /// `UnsupportedField` if `T` doesn't belong to the space's field.
    pub fn from_faer_mat(space: &HilbertSpace, mat: MatRef<'_, T>) -> Result<Self> {
        if mat.nrows() != space.ket_dim() || mat.ncols() != space.bra_dim() {
            return Err(HilbertError::ShapeMismatch {
                expected: space.dim(),
                actual: mat.nrows() * mat.ncols(),
            });
        }
        Self::new(space, row_major_from_mat(mat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{qubit, qudit};
    use crate::scalar::c64;

    #[test]
    fn test_row_major_round_trip() {
        let data: Vec<f64> = (0..6).map(f64::from).collect();
        let mat = mat_from_row_major(&data, 2, 3);
        assert_eq!(mat[(1, 0)], 3.0);
        assert_eq!(mat[(0, 2)], 2.0);
        assert_eq!(row_major_from_mat(mat.as_ref()), data);
    }

    #[test]
    fn test_matmul_row_major() {
        // [[1,2],[3,4]] * [[5],[6]] = [[17],[39]]
        let c = matmul_row_major(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0], 2, 2, 1);
        assert_eq!(c, vec![17.0, 39.0]);
    }

    #[test]
    fn test_matrix_view_rows_are_kets() {
        let a = qubit("fa").unwrap();
        let b = qudit("fb", 3).unwrap();
        let s = a.space().product(&b.h().space()).unwrap();
        let x = s
            .array((0..6).map(|i| c64::new(i as f64, 0.0)).collect())
            .unwrap();
        let m = x.to_faer_mat();
        assert_eq!((m.nrows(), m.ncols()), (2, 3));
        assert_eq!(m[(1, 2)], c64::new(5.0, 0.0));

        let back = HilbertArray::from_faer_mat(&s, m.as_ref()).unwrap();
        assert_eq!(back, x);
        assert!(HilbertArray::from_faer_mat(&a.o(), m.as_ref()).is_err());
    }
}
