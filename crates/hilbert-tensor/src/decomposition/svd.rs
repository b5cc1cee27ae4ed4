//! Singular value decomposition and the norms built on it.

use faer::Mat;
use faer::linalg::solvers::{Svd, SvdError};

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::backend::row_major_from_mat;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

/// Thin SVD `A = U S V^H` with an explicit inner atom.
#[derive(Debug, Clone)]
pub struct SvdResult<T: Scalar> {
    /// Isometry over `|kets><inner|`.
    pub u: HilbertArray<T>,
    /// Diagonal over `|inner><inner|`, singular values nonincreasing.
    pub s: HilbertArray<T>,
    /// Co-isometry over `|inner><bras|`.
    pub vh: HilbertArray<T>,
}

fn thin_svd<T: Scalar>(mat: &Mat<T>) -> Result<Svd<T>> {
    Svd::new_thin(mat.as_ref()).map_err(|e: SvdError| HilbertError::decomposition("svd", e))
}

impl<T: Scalar> HilbertArray<T> {
    /// Thin singular value decomposition.
    ///
    /// The matrix view (kets x bras) is factored as `U S V^H`; the summed
    /// index becomes the atom `inner`, whose dimension must equal
    /// `min(ket_dim, bra_dim)`. `inner` may be given in either direction.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if `inner` has the wrong dimension.
    /// * `DuplicateAxis` or `MismatchedDimension` if `inner` clashes with
    ///   the array's own atoms.
    /// * `Decomposition` if the backend fails.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit, qudit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qudit("b", 3).unwrap();
    /// let k = qubit("k").unwrap();
    /// let x = a.space().product(&b.h().space()).unwrap()
    ///     .array((0..6).map(|i| c64::new(i as f64, 0.0)).collect()).unwrap();
    /// let svd = x.svd(&k).unwrap();
    /// let back = (&(&svd.u * &svd.s).unwrap() * &svd.vh).unwrap();
    /// assert!(back.approx_eq(&x, 1e-10));
    /// ```
    pub fn svd(&self, inner: &HilbertAtom) -> Result<SvdResult<T>> {
        let space = self.space();
        let (m, n) = (space.ket_dim(), space.bra_dim());
        let rank = m.min(n);
        let inner = inner.as_ket();
        if inner.dim() != rank {
            return Err(HilbertError::DimensionMismatch {
                label: inner.label().to_string(),
                left: rank,
                right: inner.dim(),
            });
        }

        let u_space = HilbertSpace::from_atoms(
            space.field(),
            &space.kets().iter().cloned().chain([inner.h()]).collect::<Vec<_>>(),
        )?;
        let vh_space = HilbertSpace::from_atoms(
            space.field(),
            &[inner.clone()].into_iter().chain(space.bras().iter().cloned()).collect::<Vec<_>>(),
        )?;

        tracing::debug!(m, n, inner = %inner, "svd");
        let svd = thin_svd(&self.to_faer_mat())?;
        let s_col = svd.S().column_vector();

        // U is m x rank with the inner atom as its only bra, so its row-major
        // matrix is already the canonical buffer.
        let u = Self::from_parts(u_space, row_major_from_mat(svd.U()));
        let mut s_data = vec![T::zero(); rank * rank];
        for i in 0..rank {
            s_data[i * rank + i] = T::from_f64(s_col[i].re_part());
        }
        let s = Self::from_parts(inner.o(), s_data);
        let v = svd.V();
        let vh = Mat::from_fn(rank, n, |i, j| v[(j, i)].conjugate());
        let vh = Self::from_parts(vh_space, row_major_from_mat(vh.as_ref()));

        Ok(SvdResult { u, s, vh })
    }

    /// Singular values of the matrix view, nonincreasing.
    pub fn singular_values(&self) -> Result<Vec<f64>> {
        let svd = thin_svd(&self.to_faer_mat())?;
        let s = svd.S().column_vector();
        let mut values: Vec<f64> = (0..s.nrows()).map(|i| s[i].re_part().abs()).collect();
        values.sort_by(|a, b| b.total_cmp(a));
        Ok(values)
    }

    /// Sum of the singular values.
    pub fn trace_norm(&self) -> Result<f64> {
        Ok(self.singular_values()?.iter().sum())
    }

    /// Schatten p-norm: the p-norm of the singular values, `p` in `(0, inf]`.
    ///
    /// `p = 1` is the trace norm, `p = 2` the Frobenius norm and `p = inf`
    /// the operator norm.
    pub fn schatten_norm(&self, p: f64) -> Result<f64> {
        if p.is_nan() || p <= 0.0 {
            return Err(HilbertError::InvalidNormOrder(p));
        }
        let values = self.singular_values()?;
        if p == f64::INFINITY {
            return Ok(values.first().copied().unwrap_or(0.0));
        }
        let sum: f64 = values.iter().map(|s| s.powf(p)).sum();
        Ok(sum.powf(1.0 / p))
    }
}
