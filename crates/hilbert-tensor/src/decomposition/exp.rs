//! Matrix exponential.

use faer::Mat;
use faer::linalg::solvers::Solve;
use tracing::trace;

use crate::array::HilbertArray;
use crate::backend::row_major_from_mat;
use crate::config;
use crate::decomposition::util::{check_finite, identity};
use crate::error::Result;
use crate::scalar::Scalar;

/// Padé [13/13] coefficients (Higham 2005).
const PADE_13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

/// 1-norm bound below which [13/13] needs no scaling.
const THETA_13: f64 = 5.37;

impl<T: Scalar> HilbertArray<T> {
    /// `e^A` of a square array.
    ///
    /// Hermitian input goes through the eigen-decomposition
    /// `V diag(e^lambda) V^H`; everything else uses scaling and squaring
    /// around a [13/13] Padé approximant.
    ///
    /// # Errors
    ///
    /// * `NonSquare` for non-operators.
    /// * `Decomposition` if an entry of the input or the result is NaN or
    ///   infinite.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let zero = a.o().zeros::<c64>().unwrap();
    /// assert!(zero.expm().unwrap().approx_eq(&a.o().eye().unwrap(), 1e-12));
    /// ```
    pub fn expm(&self) -> Result<Self> {
        let mat = self.square_matrix("expm")?;
        check_finite(mat.as_ref(), "expm")?;
        let n = mat.nrows();
        let out = if self.is_hermitian(config::tolerance()) {
            self.hermitian_function(|x| x.exp())?
        } else {
            let e = expm_pade(&mat, n)?;
            check_finite(e.as_ref(), "expm")?;
            row_major_from_mat(e.as_ref())
        };
        Ok(Self::from_parts(self.space().clone(), out))
    }
}

fn expm_pade<T: Scalar>(a: &Mat<T>, n: usize) -> Result<Mat<T>> {
    let norm1 = one_norm(a);
    let s = if norm1 > THETA_13 {
        (norm1 / THETA_13).log2().ceil() as u32
    } else {
        0
    };
    trace!(n, norm1, squarings = s, "pade expm");

    let scaled = scale(a, 0.5f64.powi(s as i32));
    let mut result = pade_13(&scaled, n)?;
    for _ in 0..s {
        result = &result * &result;
    }
    Ok(result)
}

fn pade_13<T: Scalar>(a: &Mat<T>, n: usize) -> Result<Mat<T>> {
    let b = PADE_13;
    let eye = identity::<T>(n);
    let a2 = a * a;
    let a4 = &a2 * &a2;
    let a6 = &a2 * &a4;

    let u_inner = {
        let high = combine(&[(b[13], &a6), (b[11], &a4), (b[9], &a2)]);
        let low = combine(&[(b[7], &a6), (b[5], &a4), (b[3], &a2), (b[1], &eye)]);
        add(&(&a6 * &high), &low)
    };
    let u = a * &u_inner;

    let v = {
        let high = combine(&[(b[12], &a6), (b[10], &a4), (b[8], &a2)]);
        let low = combine(&[(b[6], &a6), (b[4], &a4), (b[2], &a2), (b[0], &eye)]);
        add(&(&a6 * &high), &low)
    };

    // (V - U) X = (V + U)
    let p = add(&v, &u);
    let q = combine(&[(1.0, &v), (-1.0, &u)]);
    let lu = q.as_ref().partial_piv_lu();
    let mut x = p;
    lu.solve_in_place(&mut x);
    Ok(x)
}

fn one_norm<T: Scalar>(a: &Mat<T>) -> f64 {
    (0..a.ncols())
        .map(|j| (0..a.nrows()).map(|i| a[(i, j)].modulus()).sum::<f64>())
        .fold(0.0, f64::max)
}

fn scale<T: Scalar>(a: &Mat<T>, factor: f64) -> Mat<T> {
    let factor = T::from_f64(factor);
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)] * factor)
}

fn add<T: Scalar>(a: &Mat<T>, b: &Mat<T>) -> Mat<T> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[(i, j)] + b[(i, j)])
}

/// `sum_k c_k M_k`.
fn combine<T: Scalar>(terms: &[(f64, &Mat<T>)]) -> Mat<T> {
    let (rows, cols) = (terms[0].1.nrows(), terms[0].1.ncols());
    Mat::from_fn(rows, cols, |i, j| {
        terms
            .iter()
            .fold(T::zero(), |acc, (c, m)| acc + m[(i, j)] * T::from_f64(*c))
    })
}

#[cfg(test)]
mod tests {
    use crate::atom::{qubit, qudit};
    use crate::error::HilbertError;
    use crate::field::BaseField;
    use crate::scalar::c64;
    use approx::assert_relative_eq;

    #[test]
    fn test_expm_diagonal_real() {
        let a = qudit("xd", 3).unwrap().with_field(&BaseField::real());
        let x = a
            .o()
            .array(vec![1.0, 0.0, 0.0, 0.0, -2.0, 0.0, 0.0, 0.0, 0.5])
            .unwrap();
        let e = x.expm().unwrap();
        assert_relative_eq!(e.get(&[0, 0]).unwrap(), 1f64.exp(), epsilon = 1e-10);
        assert_relative_eq!(e.get(&[1, 1]).unwrap(), (-2f64).exp(), epsilon = 1e-10);
        assert_relative_eq!(e.get(&[0, 1]).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expm_rejects_non_finite_input() {
        let a = qubit("xf").unwrap();
        for bad in [f64::NAN, f64::INFINITY] {
            let x = a
                .o()
                .array(vec![
                    c64::new(0.0, 0.0),
                    c64::new(bad, 0.0),
                    c64::new(0.0, 0.0),
                    c64::new(1.0, 0.0),
                ])
                .unwrap();
            assert!(matches!(
                x.expm(),
                Err(HilbertError::Decomposition { .. })
            ));
        }
    }

    #[test]
    fn test_expm_nilpotent_pade() {
        // exp([[0, t], [0, 0]]) = [[1, t], [0, 1]]; not Hermitian
        let a = qubit("xn").unwrap();
        let x = a
            .o()
            .array(vec![
                c64::new(0.0, 0.0),
                c64::new(7.5, 0.0),
                c64::new(0.0, 0.0),
                c64::new(0.0, 0.0),
            ])
            .unwrap();
        let e = x.expm().unwrap();
        assert_relative_eq!(e.get(&[0, 1]).unwrap().re, 7.5, epsilon = 1e-9);
        assert_relative_eq!(e.get(&[0, 0]).unwrap().re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(e.get(&[1, 0]).unwrap().re, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_expm_rotation_with_scaling() {
        // exp(t [[0, -1], [1, 0]]) = [[cos t, -sin t], [sin t, cos t]]
        let a = qubit("xr").unwrap().with_field(&BaseField::real());
        let t = 20.0;
        let x = a.o().array(vec![0.0, -t, t, 0.0]).unwrap();
        let e = x.expm().unwrap();
        assert_relative_eq!(e.get(&[0, 0]).unwrap(), t.cos(), epsilon = 1e-8);
        assert_relative_eq!(e.get(&[1, 0]).unwrap(), t.sin(), epsilon = 1e-8);
    }

    #[test]
    fn test_expm_unitary_from_hermitian() {
        let a = qubit("xu").unwrap();
        let y = a
            .o()
            .array(vec![
                c64::new(0.0, 0.0),
                c64::new(0.0, -1.0),
                c64::new(0.0, 1.0),
                c64::new(0.0, 0.0),
            ])
            .unwrap();
        let u = (&y * c64::new(0.0, 0.3)).expm().unwrap();
        let uu = (&u.adjoint() * &u).unwrap();
        assert!(uu.approx_eq(&a.o().eye().unwrap(), 1e-10));
    }
}
