//! Label-driven tensor contraction.
//!
//! `a.contract(&b, over)` sums the bra axes of `a` against the ket axes of
//! `b` that carry the same labels. Both operands are permuted so the summed
//! axes are adjacent, the problem is handed to faer as one matrix product,
//! and the result is reordered into its canonical space:
//!
//! ```text
//! A[free_a..., mid...] (dleft x dmid)  *  B[mid..., free_b...] (dmid x dright)
//!     -> C[free_a..., free_b...] (dleft x dright)  -> canonical order
//! ```
//!
//! `&a * &b` is `a.contract(&b, None)`: it contracts every shared label and
//! is the plain tensor product when nothing is shared.
//!
//! # Example
//!
//! ```
//! use hilbert_tensor::{c64, qubit};
//!
//! let a = qubit("a").unwrap();
//! let x = a.o().array(vec![
//!     c64::new(0.0, 0.0), c64::new(1.0, 0.0),
//!     c64::new(1.0, 0.0), c64::new(0.0, 0.0),
//! ]).unwrap();
//! let xx = (&x * &x).unwrap();
//! assert_eq!(xx, a.o().eye::<c64>().unwrap());
//! ```

mod plan;

use std::ops::Mul;

use tracing::debug;

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::backend::matmul_row_major;
use crate::error::Result;
use crate::scalar::Scalar;

pub use plan::ContractionPlan;

impl<T: Scalar> HilbertArray<T> {
    /// Contract `self` with `other`.
    ///
    /// `over = None` contracts every label that is a bra of `self` and a
    /// ket of `other`; `Some(atoms)` contracts exactly those labels, and
    /// `Some(&[])` is the tensor product.
    ///
    /// # Errors
    ///
    /// * `IncompatibleField` if the operands live over different fields.
    /// * `LabelMismatch` if a listed label is missing from either side.
    /// * `DimensionMismatch` if paired axes differ in dimension.
    /// * `DuplicateAxis` if the result would hold the same atom twice.
    pub fn contract(&self, other: &HilbertArray<T>, over: Option<&[HilbertAtom]>) -> Result<Self> {
        self.field().assert_same(other.field())?;
        let plan = ContractionPlan::compute(self.space(), other.space(), over)?;
        debug!(
            left = %self.space(),
            right = %other.space(),
            contracted = ?plan.contracted.iter().map(|(b, _)| b.label()).collect::<Vec<_>>(),
            dleft = plan.dleft,
            dmid = plan.dmid,
            dright = plan.dright,
            "contraction plan"
        );

        let a = self.data_along(&plan.left_order());
        let b = other.data_along(&plan.right_order());

        let data = if plan.is_full_contraction() {
            vec![a.iter().zip(&b).fold(T::zero(), |acc, (&x, &y)| acc + x * y)]
        } else if plan.is_outer_product() {
            a.iter()
                .flat_map(|&x| b.iter().map(move |&y| x * y))
                .collect()
        } else {
            matmul_row_major(&a, &b, plan.dleft, plan.dmid, plan.dright)
        };

        Self::from_axes(self.field(), &plan.output_axes(), data)
    }

    /// `other * self`, for writing circuits in chronological order.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    /// use hilbert_tensor::circuits::{pauli_x, pauli_z};
    ///
    /// let a = qubit("a").unwrap();
    /// let psi = a.space().basis_vec::<c64>(&[0]).unwrap();
    /// let x = pauli_x::<c64>(&a).unwrap();
    /// let z = pauli_z::<c64>(&a).unwrap();
    /// let direct = (&z * &(&x * &psi).unwrap()).unwrap();
    /// assert_eq!(psi.lmul(&x).unwrap().lmul(&z).unwrap(), direct);
    /// ```
    pub fn lmul(&self, other: &HilbertArray<T>) -> Result<Self> {
        other.contract(self, None)
    }
}

impl<T: Scalar> Mul for &HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.contract(rhs, None)
    }
}

impl<T: Scalar> Mul for HilbertArray<T> {
    type Output = Result<HilbertArray<T>>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.contract(&rhs, None)
    }
}

#[cfg(test)]
mod tests {
    use crate::array::HilbertArray;
    use crate::atom::{qubit, qudit};
    use crate::error::HilbertError;
    use crate::scalar::c64;
    use crate::space::HilbertSpace;
    use approx::assert_relative_eq;

    fn c(re: f64) -> c64 {
        c64::new(re, 0.0)
    }

    fn counting(space: &HilbertSpace) -> HilbertArray<c64> {
        space
            .array((0..space.dim()).map(|i| c64::new(i as f64, 0.5 * i as f64)).collect())
            .unwrap()
    }

    #[test]
    fn test_matrix_multiply() {
        let a = qubit("ma").unwrap();
        let x = a.o().array(vec![c(1.0), c(2.0), c(3.0), c(4.0)]).unwrap();
        let y = a.o().array(vec![c(5.0), c(6.0), c(7.0), c(8.0)]).unwrap();
        let z = (&x * &y).unwrap();
        assert_eq!(z.space(), &a.o());
        assert_eq!(z.data(), &[c(19.0), c(22.0), c(43.0), c(50.0)]);
    }

    #[test]
    fn test_inner_product() {
        let a = qudit("ip", 3).unwrap();
        let ket = a.space().array(vec![c(1.0), c(2.0), c(3.0)]).unwrap();
        let bra = ket.adjoint();
        let s = (&bra * &ket).unwrap();
        assert!(s.space().is_empty());
        assert_relative_eq!(s.to_scalar().unwrap().re, 14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tensor_product_when_nothing_shared() {
        let a = qubit("oa").unwrap();
        let b = qudit("ob", 3).unwrap();
        let x = a.space().array(vec![c(1.0), c(2.0)]).unwrap();
        let y = b.space().array(vec![c(1.0), c(10.0), c(100.0)]).unwrap();
        let z = (&x * &y).unwrap();
        assert_eq!(z.space(), &a.space().product(&b.space()).unwrap());
        assert_eq!(z.get(&[1, 2]).unwrap(), c(200.0));

        // operand order does not change a tensor product
        let w = (&y * &x).unwrap();
        assert_eq!(w, z);
        assert_eq!(x.contract(&y, Some(&[])).unwrap(), z);
    }

    #[test]
    fn test_partial_contraction_with_reordering() {
        let a = qubit("ra").unwrap();
        let b = qudit("rb", 3).unwrap();
        let cc = qubit("rc").unwrap();
        // x over |a><b,c|, y over |c><a|
        let x = counting(&HilbertSpace::combine(&[a.clone(), b.h(), cc.h()]).unwrap());
        let y = counting(&HilbertSpace::combine(&[cc.clone(), a.h()]).unwrap());
        let z = (&x * &y).unwrap();
        assert_eq!(z.space().to_string(), "|ra><ra,rb|");

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..3 {
                    let mut expected = c(0.0);
                    for m in 0..2 {
                        expected = expected + x.get(&[i, k, m]).unwrap() * y.get(&[m, j]).unwrap();
                    }
                    let got = z.get(&[i, j, k]).unwrap();
                    assert_relative_eq!(got.re, expected.re, epsilon = 1e-12);
                    assert_relative_eq!(got.im, expected.im, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_explicit_labels_must_be_shared() {
        let a = qubit("la").unwrap();
        let b = qubit("lb").unwrap();
        let x = a.space().zeros::<c64>().unwrap();
        let y = b.space().zeros::<c64>().unwrap();
        assert!(matches!(
            x.contract(&y, Some(&[a.clone()])),
            Err(HilbertError::LabelMismatch(_))
        ));
    }

    #[test]
    fn test_duplicate_free_axes() {
        let a = qubit("da").unwrap();
        let x = a.space().zeros::<c64>().unwrap();
        assert!(matches!(
            &x * &x,
            Err(HilbertError::DuplicateAxis { .. })
        ));
    }
}
