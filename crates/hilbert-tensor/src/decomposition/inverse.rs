//! Inverse, pseudo-inverse and determinant.

use faer::linalg::solvers::{PartialPivLu, Solve, Svd, SvdError};
use faer::{Mat, MatRef};

use crate::array::HilbertArray;
use crate::backend::row_major_from_mat;
use crate::decomposition::util::{check_finite, identity};
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;

/// Smallest `|u_ii| / max |u_ii|` of the LU factor, per unit of dimension,
/// accepted as nonsingular.
const PIVOT_RTOL: f64 = f64::EPSILON;

/// Reject an LU factorization whose pivots are zero or negligible relative
/// to the largest one.
fn check_pivots<T: Scalar>(u: MatRef<'_, T>, routine: &str) -> Result<()> {
    let n = u.nrows();
    let pivots = (0..n).map(|i| u[(i, i)].modulus());
    let (min, max) = pivots.fold((f64::INFINITY, 0.0f64), |(lo, hi), p| (lo.min(p), hi.max(p)));
    if n > 0 && !(min > PIVOT_RTOL * n as f64 * max) {
        return Err(HilbertError::Decomposition {
            routine: routine.to_string(),
            message: format!("matrix is singular to working precision (pivot ratio {:e})", min / max),
        });
    }
    Ok(())
}

/// Sign of a permutation given as its forward index array.
fn permutation_sign(forward: &[usize]) -> f64 {
    let mut seen = vec![false; forward.len()];
    let mut transpositions = 0;
    for start in 0..forward.len() {
        let mut i = start;
        let mut len = 0;
        while !seen[i] {
            seen[i] = true;
            i = forward[i];
            len += 1;
        }
        if len > 0 {
            transpositions += len - 1;
        }
    }
    if transpositions % 2 == 0 { 1.0 } else { -1.0 }
}

impl<T: Scalar> HilbertArray<T> {
    /// Matrix inverse of a square array.
    ///
    /// # Errors
    ///
    /// * `NonSquare` for non-operators.
    /// * `Decomposition` when the matrix is singular or its smallest LU
    ///   pivot is negligible next to the largest.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.o().array(vec![
    ///     c64::new(2.0, 0.0), c64::new(1.0, 0.0),
    ///     c64::new(1.0, 0.0), c64::new(1.0, 0.0),
    /// ]).unwrap();
    /// let inv = x.inverse().unwrap();
    /// assert!((&x * &inv).unwrap().approx_eq(&a.o().eye().unwrap(), 1e-12));
    /// ```
    pub fn inverse(&self) -> Result<Self> {
        let mat = self.square_matrix("inverse")?;
        let lu = PartialPivLu::new(mat.as_ref());
        check_pivots(lu.U(), "inverse")?;
        let mut x = identity::<T>(mat.nrows());
        lu.solve_in_place(&mut x);
        check_finite(x.as_ref(), "inverse")?;
        Ok(Self::from_parts(
            self.space().clone(),
            row_major_from_mat(x.as_ref()),
        ))
    }

    /// Determinant of a square array from its partially pivoted LU
    /// factors: the signed product of the pivots.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.o().array(vec![
    ///     c64::new(0.0, 0.0), c64::new(2.0, 0.0),
    ///     c64::new(3.0, 0.0), c64::new(1.0, 0.0),
    /// ]).unwrap();
    /// assert!((x.det().unwrap() - c64::new(-6.0, 0.0)).norm() < 1e-12);
    /// ```
    pub fn det(&self) -> Result<T> {
        let mat = self.square_matrix("det")?;
        let lu = PartialPivLu::new(mat.as_ref());
        let u = lu.U();
        let (forward, _) = lu.P().arrays();
        let pivots = (0..u.nrows()).fold(T::one(), |acc, i| acc * u[(i, i)]);
        Ok(pivots * T::from_f64(permutation_sign(forward)))
    }

    /// Moore-Penrose pseudo-inverse over the dual space.
    ///
    /// Singular values at or below `rcond` times the largest one are
    /// treated as zero. Works for any array, not just operators: the result
    /// of an array over `|k><b|` lives over `|b><k|`.
    pub fn pinv(&self, rcond: f64) -> Result<Self> {
        let space = self.space();
        let (m, n) = (space.ket_dim(), space.bra_dim());
        let svd = Svd::new_thin(self.to_faer_mat().as_ref())
            .map_err(|e: SvdError| HilbertError::decomposition("pinv", e))?;
        let s = svd.S().column_vector();
        let rank = m.min(n);
        let s_max = (0..rank).map(|i| s[i].re_part()).fold(0.0, f64::max);
        let cutoff = rcond * s_max;
        let s_inv: Vec<T> = (0..rank)
            .map(|i| {
                let v = s[i].re_part();
                if v > cutoff { T::from_f64(1.0 / v) } else { T::zero() }
            })
            .collect();

        let u = svd.U();
        let v = svd.V();
        // A+ = V S^-1 U^H
        let v_scaled = Mat::from_fn(n, rank, |i, j| v[(i, j)] * s_inv[j]);
        let uh = Mat::from_fn(rank, m, |i, j| u[(j, i)].conjugate());
        let out = &v_scaled * &uh;
        Ok(Self::from_parts(space.h(), row_major_from_mat(out.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use crate::atom::{qubit, qudit};
    use crate::error::HilbertError;
    use crate::field::BaseField;
    use crate::scalar::c64;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverse_singular() {
        let a = qubit("is").unwrap();
        let x = a
            .o()
            .array(vec![
                c64::new(1.0, 0.0),
                c64::new(2.0, 0.0),
                c64::new(2.0, 0.0),
                c64::new(4.0, 0.0),
            ])
            .unwrap();
        assert!(matches!(
            x.inverse(),
            Err(HilbertError::Decomposition { .. })
        ));
    }

    #[test]
    fn test_inverse_nearly_singular() {
        let a = qubit("ns").unwrap();
        let x = a
            .o()
            .array(vec![
                c64::new(1.0, 0.0),
                c64::new(1.0, 0.0),
                c64::new(1.0, 0.0),
                c64::new(1.0 + f64::EPSILON, 0.0),
            ])
            .unwrap();
        assert!(matches!(
            x.inverse(),
            Err(HilbertError::Decomposition { .. })
        ));
        // badly scaled but well conditioned relative to its largest pivot
        let y = a
            .o()
            .array(vec![
                c64::new(1e-200, 0.0),
                c64::new(0.0, 0.0),
                c64::new(0.0, 0.0),
                c64::new(1e-200, 0.0),
            ])
            .unwrap();
        assert!(y.inverse().is_ok());
    }

    #[test]
    fn test_det_pivot_sign() {
        // anti-diagonal permutation matrices: the LU pivots are all 1
        let a = qudit("dp", 3).unwrap().with_field(&BaseField::real());
        let swap_two = a
            .o()
            .array(vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0])
            .unwrap();
        assert_relative_eq!(swap_two.det().unwrap(), -1.0, epsilon = 1e-14);
        let cycle = a
            .o()
            .array(vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap();
        assert_relative_eq!(cycle.det().unwrap(), 1.0, epsilon = 1e-14);
        let singular = a
            .o()
            .array(vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0])
            .unwrap();
        assert_relative_eq!(singular.det().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_det_complex() {
        let a = qubit("dc").unwrap();
        let i = c64::new(0.0, 1.0);
        let x = a
            .o()
            .array(vec![i, c64::new(1.0, 0.0), c64::new(2.0, 0.0), i])
            .unwrap();
        // i*i - 2 = -3
        let d = x.det().unwrap();
        assert_relative_eq!(d.re, -3.0, epsilon = 1e-12);
        assert_relative_eq!(d.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_det_real() {
        let a = qudit("dr", 3).unwrap().with_field(&BaseField::real());
        let x = a
            .o()
            .array(vec![2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 1.0])
            .unwrap();
        // 2*(3-0) - 0 + 1*(1-0) = 7
        assert_relative_eq!(x.det().unwrap(), 7.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pinv_of_column() {
        let a = qubit("pc").unwrap();
        let ket = a
            .space()
            .array(vec![c64::new(3.0, 0.0), c64::new(0.0, 4.0)])
            .unwrap();
        let p = ket.pinv(1e-12).unwrap();
        assert_eq!(p.space(), &a.h().space());
        // pinv of a vector is its adjoint over |v|^2
        let expected = ket.adjoint() / c64::new(25.0, 0.0);
        assert!(p.approx_eq(&expected, 1e-12));
        let one = (&p * &ket).unwrap();
        assert_relative_eq!(one.to_scalar().unwrap().re, 1.0, epsilon = 1e-12);
    }
}
