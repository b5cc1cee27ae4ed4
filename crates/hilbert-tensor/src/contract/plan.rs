//! Contraction planning.
//!
//! A contraction `C = A * B` sums the bra axes of `A` against ket axes of
//! `B` carrying the same labels. The plan records which atoms pair up and
//! the GEMM dimensions of the reshaped problem:
//!
//! - `dleft` = product of `A`'s free dimensions
//! - `dmid` = product of the contracted dimensions
//! - `dright` = product of `B`'s free dimensions
//!
//! so that `C(dleft, dright) = A(dleft, dmid) * B(dmid, dright)`.

use crate::atom::{Direction, HilbertAtom};
use crate::error::{HilbertError, Result};
use crate::space::HilbertSpace;

/// Axis bookkeeping for one contraction.
#[derive(Debug, Clone)]
pub struct ContractionPlan {
    /// Contracted pairs: (bra atom of the left operand, ket atom of the right operand).
    pub contracted: Vec<(HilbertAtom, HilbertAtom)>,

    /// Left operand axes that survive, in canonical order.
    pub left_free: Vec<HilbertAtom>,

    /// Right operand axes that survive, in canonical order.
    pub right_free: Vec<HilbertAtom>,

    /// GEMM dimension: product of the left free dimensions.
    pub dleft: usize,

    /// GEMM dimension: product of the contracted dimensions.
    pub dmid: usize,

    /// GEMM dimension: product of the right free dimensions.
    pub dright: usize,
}

impl ContractionPlan {
    /// Pair up the axes of `left` and `right`.
    ///
    /// With `over = None` every bra label of `left` that is also a ket label
    /// of `right` is contracted. Otherwise exactly the listed labels are
    /// (atoms may be given in either direction).
    ///
    /// # Errors
    ///
    /// * `LabelMismatch` if a listed label is not a bra of `left` and a ket
    ///   of `right`.
    /// * `DimensionMismatch` if paired atoms have different dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::contract::ContractionPlan;
    /// use hilbert_tensor::{HilbertSpace, qubit, qudit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qudit("b", 3).unwrap();
    /// let left = HilbertSpace::combine(&[a.clone(), b.h()]).unwrap();
    /// let right = b.space();
    /// let plan = ContractionPlan::compute(&left, &right, None).unwrap();
    /// assert_eq!((plan.dleft, plan.dmid, plan.dright), (2, 3, 1));
    /// ```
    pub fn compute(
        left: &HilbertSpace,
        right: &HilbertSpace,
        over: Option<&[HilbertAtom]>,
    ) -> Result<Self> {
        let mut contracted: Vec<(HilbertAtom, HilbertAtom)> = Vec::new();
        match over {
            None => {
                for bra in left.bras() {
                    if let Some(ket) = right.find(bra.label(), Direction::Ket) {
                        contracted.push((bra.clone(), ket.clone()));
                    }
                }
            }
            Some(atoms) => {
                for atom in atoms {
                    let label = atom.label();
                    if contracted.iter().any(|(b, _)| b.label() == label) {
                        continue;
                    }
                    let bra = left.find(label, Direction::Bra);
                    let ket = right.find(label, Direction::Ket);
                    match (bra, ket) {
                        (Some(bra), Some(ket)) => contracted.push((bra.clone(), ket.clone())),
                        _ => {
                            return Err(HilbertError::LabelMismatch(format!(
                                "cannot contract {} between {} and {}",
                                label, left, right
                            )));
                        }
                    }
                }
            }
        }

        for (bra, ket) in &contracted {
            if bra.dim() != ket.dim() {
                return Err(HilbertError::DimensionMismatch {
                    label: bra.label().to_string(),
                    left: bra.dim(),
                    right: ket.dim(),
                });
            }
        }

        let left_free: Vec<HilbertAtom> = left
            .axes()
            .iter()
            .filter(|x| !contracted.iter().any(|(b, _)| b == *x))
            .cloned()
            .collect();
        let right_free: Vec<HilbertAtom> = right
            .axes()
            .iter()
            .filter(|x| !contracted.iter().any(|(_, k)| k == *x))
            .cloned()
            .collect();

        let dleft = left_free.iter().map(HilbertAtom::dim).product();
        let dmid = contracted.iter().map(|(b, _)| b.dim()).product();
        let dright = right_free.iter().map(HilbertAtom::dim).product();

        Ok(Self {
            contracted,
            left_free,
            right_free,
            dleft,
            dmid,
            dright,
        })
    }

    /// Left operand axis order for the GEMM: `[free..., contracted...]`.
    pub fn left_order(&self) -> Vec<HilbertAtom> {
        self.left_free
            .iter()
            .cloned()
            .chain(self.contracted.iter().map(|(b, _)| b.clone()))
            .collect()
    }

    /// Right operand axis order for the GEMM: `[contracted..., free...]`.
    pub fn right_order(&self) -> Vec<HilbertAtom> {
        self.contracted
            .iter()
            .map(|(_, k)| k.clone())
            .chain(self.right_free.iter().cloned())
            .collect()
    }

    /// Axes of the GEMM output, before canonical reordering.
    pub fn output_axes(&self) -> Vec<HilbertAtom> {
        self.left_free
            .iter()
            .chain(self.right_free.iter())
            .cloned()
            .collect()
    }

    /// No contracted axes.
    pub fn is_outer_product(&self) -> bool {
        self.contracted.is_empty()
    }

    /// Every axis contracted (scalar result).
    pub fn is_full_contraction(&self) -> bool {
        self.left_free.is_empty() && self.right_free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{qubit, qudit};

    #[test]
    fn test_operator_times_state() {
        let a = qubit("cpa").unwrap();
        let plan = ContractionPlan::compute(&a.o(), &a.space(), None).unwrap();
        assert_eq!(plan.contracted, vec![(a.h(), a.clone())]);
        assert_eq!(plan.left_free, vec![a.clone()]);
        assert!(plan.right_free.is_empty());
        assert_eq!((plan.dleft, plan.dmid, plan.dright), (2, 2, 1));
    }

    #[test]
    fn test_inner_product_is_full() {
        let a = qudit("cpi", 3).unwrap();
        let plan = ContractionPlan::compute(&a.h().space(), &a.space(), None).unwrap();
        assert!(plan.is_full_contraction());
        assert_eq!(plan.dmid, 3);
    }

    #[test]
    fn test_nothing_shared_is_outer() {
        let a = qubit("cpo").unwrap();
        let b = qubit("cpp").unwrap();
        let plan = ContractionPlan::compute(&a.space(), &b.space(), None).unwrap();
        assert!(plan.is_outer_product());
        assert_eq!(plan.output_axes(), vec![a.clone(), b.clone()]);

        let err = ContractionPlan::compute(&a.space(), &b.space(), Some(&[a.clone()]));
        assert!(matches!(err, Err(HilbertError::LabelMismatch(_))));
    }

    #[test]
    fn test_explicit_subset() {
        let a = qubit("csa").unwrap();
        let b = qubit("csb").unwrap();
        let ab = a.space().product(&b.space()).unwrap();
        let plan = ContractionPlan::compute(&ab.o(), &ab, Some(&[b.h()])).unwrap();
        assert_eq!(plan.contracted.len(), 1);
        assert_eq!(plan.left_order().last(), Some(&b.h()));
        assert_eq!(plan.right_order()[0], b);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a2 = qudit("cdm", 2).unwrap();
        let a3 = qudit("cdm", 3).unwrap();
        let err = ContractionPlan::compute(&a2.h().space(), &a3.space(), None);
        assert!(matches!(err, Err(HilbertError::DimensionMismatch { .. })));
    }
}
