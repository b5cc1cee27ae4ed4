//! Axis-moving operations: transposes, adjoint and relabeling.
//!
//! All of these reinterpret the same elements under a different set of
//! atoms and then permute the buffer into the new canonical order.

use std::collections::HashMap;

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;

impl<T: Scalar> HilbertArray<T> {
    /// Transpose over the listed atoms, or over every axis when `over` is
    /// `None`.
    ///
    /// Each listed atom may be given as ket or bra; both copies present in
    /// the array flip direction.
    ///
    /// # Errors
    ///
    /// `LabelMismatch` if a listed atom is absent in both directions.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{HilbertSpace, c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qubit("b").unwrap();
    /// let y = a.space().product(&b.space()).unwrap().zeros::<c64>().unwrap();
    /// assert_eq!(y.transpose(Some(&[a.clone()])).unwrap().space().to_string(), "|b><a|");
    /// assert_eq!(y.transpose(None).unwrap().space().to_string(), "<a,b|");
    /// ```
    pub fn transpose(&self, over: Option<&[HilbertAtom]>) -> Result<Self> {
        let Some(over) = over else {
            return Ok(self.full_transpose());
        };

        let mut flip = Vec::with_capacity(over.len());
        for atom in over {
            if !self.space().contains(atom) && !self.space().contains(&atom.h()) {
                return Err(HilbertError::LabelMismatch(format!(
                    "{} is not part of {}",
                    atom,
                    self.space()
                )));
            }
            flip.push(atom.as_ket());
        }

        let relabeled: Vec<HilbertAtom> = self
            .space()
            .axes()
            .iter()
            .map(|x| {
                if flip.contains(&x.as_ket()) {
                    x.h()
                } else {
                    x.clone()
                }
            })
            .collect();
        Self::from_axes(self.field(), &relabeled, self.data().to_vec())
    }

    fn full_transpose(&self) -> Self {
        let rows = self.space().ket_dim();
        let cols = self.space().bra_dim();
        let src = self.data();
        let mut data = Vec::with_capacity(src.len());
        for j in 0..cols {
            for i in 0..rows {
                data.push(src[i * cols + j]);
            }
        }
        Self::from_parts(self.space().h(), data)
    }

    /// Conjugate transpose over the dual space.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let ket = a.space().array(vec![c64::new(0.0, 1.0), c64::new(1.0, 0.0)]).unwrap();
    /// let bra = ket.adjoint();
    /// assert_eq!(bra.space().to_string(), "<a|");
    /// assert_eq!(bra.data(), &[c64::new(0.0, -1.0), c64::new(1.0, 0.0)]);
    /// ```
    pub fn adjoint(&self) -> Self {
        let mut out = self.full_transpose();
        for x in out.data_mut() {
            *x = x.conjugate();
        }
        out
    }

    /// Shorthand for [`adjoint`](Self::adjoint).
    pub fn h(&self) -> Self {
        self.adjoint()
    }

    /// Rename labels, ket and bra copies alike. The mapping is applied
    /// simultaneously, so swaps are allowed.
    ///
    /// # Errors
    ///
    /// * `LabelMismatch` if a source label is absent or listed twice.
    /// * `Collision` if two resulting axes coincide.
    /// * `InvalidAtom` for an empty target label.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{HilbertSpace, c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qubit("b").unwrap();
    /// let x = a.space().product(&b.space()).unwrap().zeros::<c64>().unwrap();
    /// assert_eq!(x.relabel(&[("b", "c")]).unwrap().space().to_string(), "|a,c>");
    /// assert!(x.relabel(&[("a", "b")]).is_err());
    /// ```
    pub fn relabel(&self, mapping: &[(&str, &str)]) -> Result<Self> {
        let mut table: HashMap<&str, &str> = HashMap::with_capacity(mapping.len());
        for &(from, to) in mapping {
            if !self.space().axes().iter().any(|a| a.label() == from) {
                return Err(HilbertError::LabelMismatch(format!(
                    "label {:?} is not part of {}",
                    from,
                    self.space()
                )));
            }
            if to.is_empty() {
                return Err(HilbertError::InvalidAtom {
                    label: to.to_string(),
                    reason: "label must not be empty".into(),
                });
            }
            if table.insert(from, to).is_some() {
                return Err(HilbertError::LabelMismatch(format!(
                    "label {:?} mapped twice",
                    from
                )));
            }
        }

        let renamed: Vec<HilbertAtom> = self
            .space()
            .axes()
            .iter()
            .map(|x| match table.get(x.label()) {
                Some(&to) => x.with_label(to.to_string()),
                None => x.clone(),
            })
            .collect();
        self.rebuild(&renamed)
    }

    /// Replace specific atoms by atoms of the same direction and dimension.
    ///
    /// Unlike [`relabel`](Self::relabel), only the listed atom moves; its
    /// dual (if present) keeps its label.
    pub fn relabel_atoms(&self, mapping: &[(HilbertAtom, HilbertAtom)]) -> Result<Self> {
        for (from, to) in mapping {
            if !self.space().contains(from) {
                return Err(HilbertError::LabelMismatch(format!(
                    "{} is not part of {}",
                    from,
                    self.space()
                )));
            }
            if from.direction() != to.direction() {
                return Err(HilbertError::LabelMismatch(format!(
                    "cannot relabel {} as {}: ket/bra mixture",
                    from, to
                )));
            }
            if from.dim() != to.dim() {
                return Err(HilbertError::DimensionMismatch {
                    label: to.label().to_string(),
                    left: from.dim(),
                    right: to.dim(),
                });
            }
        }

        let renamed: Vec<HilbertAtom> = self
            .space()
            .axes()
            .iter()
            .map(|x| {
                mapping
                    .iter()
                    .find(|(from, _)| from == x)
                    .map_or_else(|| x.clone(), |(_, to)| to.clone())
            })
            .collect();
        self.rebuild(&renamed)
    }

    fn rebuild(&self, renamed: &[HilbertAtom]) -> Result<Self> {
        // Same label and direction is a collision whatever the dimensions.
        for (i, x) in renamed.iter().enumerate() {
            if renamed[..i]
                .iter()
                .any(|y| y.label() == x.label() && y.direction() == x.direction())
            {
                return Err(HilbertError::Collision(x.to_string()));
            }
        }
        Self::from_axes(self.field(), renamed, self.data().to_vec()).map_err(|e| match e {
            HilbertError::DuplicateAxis { axis, .. } => HilbertError::Collision(axis),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::array::HilbertArray;
    use crate::atom::{qubit, qudit};
    use crate::error::HilbertError;
    use crate::scalar::c64;
    use crate::space::HilbertSpace;

    fn c(re: f64) -> c64 {
        c64::new(re, 0.0)
    }

    fn counting(space: &HilbertSpace) -> HilbertArray<c64> {
        space
            .array((0..space.dim()).map(|i| c(i as f64)).collect())
            .unwrap()
    }

    #[test]
    fn test_full_transpose_matrix() {
        let a = qubit("ta").unwrap();
        let x = a.o().array(vec![c(1.0), c(2.0), c(3.0), c(4.0)]).unwrap();
        let t = x.transpose(None).unwrap();
        assert_eq!(t.data(), &[c(1.0), c(3.0), c(2.0), c(4.0)]);
        assert_eq!(t.transpose(None).unwrap(), x);
    }

    #[test]
    fn test_partial_transpose_either_direction() {
        let a = qubit("pa").unwrap();
        let b = qudit("pb", 3).unwrap();
        let x = counting(&a.space().product(&b.space()).unwrap());
        let t1 = x.transpose(Some(&[a.clone()])).unwrap();
        let t2 = x.transpose(Some(&[a.h()])).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(t1.space().to_string(), "|pb><pa|");
        // old (a=1, b=2) is now (b=2, a=1)
        assert_eq!(t1.get(&[2, 1]).unwrap(), x.get(&[1, 2]).unwrap());

        let z = qubit("pz").unwrap();
        assert!(matches!(
            x.transpose(Some(&[z])),
            Err(HilbertError::LabelMismatch(_))
        ));
    }

    #[test]
    fn test_partial_transpose_of_operator() {
        let a = qubit("oa").unwrap();
        let x = a.o().array(vec![c(1.0), c(2.0), c(3.0), c(4.0)]).unwrap();
        assert_eq!(
            x.transpose(Some(&[a.clone()])).unwrap(),
            x.transpose(None).unwrap()
        );
    }

    #[test]
    fn test_adjoint() {
        let a = qubit("ad").unwrap();
        let x = a
            .o()
            .array(vec![c64::new(1.0, 1.0), c(2.0), c64::new(0.0, 3.0), c(4.0)])
            .unwrap();
        let h = x.adjoint();
        assert_eq!(h.space(), x.space());
        assert_eq!(
            h.data(),
            &[c64::new(1.0, -1.0), c64::new(0.0, -3.0), c(2.0), c(4.0)]
        );
        assert_eq!(h.h(), x);
    }

    #[test]
    fn test_relabel_inverse_is_identity() {
        let a = qubit("ra").unwrap();
        let b = qudit("rb", 3).unwrap();
        let s = HilbertSpace::combine(&[a.clone(), b.clone(), a.h()]).unwrap();
        let x = counting(&s);
        let y = x.relabel(&[("ra", "rz")]).unwrap();
        assert_eq!(y.space().to_string(), "|rb,rz><rz|");
        assert_eq!(y.relabel(&[("rz", "ra")]).unwrap(), x);
    }

    #[test]
    fn test_relabel_swap() {
        let a = qubit("sa").unwrap();
        let b = qubit("sb").unwrap();
        let x = counting(&a.space().product(&b.space()).unwrap());
        let y = x.relabel(&[("sa", "sb"), ("sb", "sa")]).unwrap();
        assert_eq!(y.space(), x.space());
        assert_eq!(y.get(&[0, 1]).unwrap(), x.get(&[1, 0]).unwrap());
    }

    #[test]
    fn test_relabel_errors() {
        let a = qubit("ea").unwrap();
        let b = qubit("eb").unwrap();
        let x = counting(&a.space().product(&b.space()).unwrap());
        assert!(matches!(
            x.relabel(&[("ea", "eb")]),
            Err(HilbertError::Collision(_))
        ));
        assert!(matches!(
            x.relabel(&[("nope", "z")]),
            Err(HilbertError::LabelMismatch(_))
        ));
        assert!(matches!(
            x.relabel(&[("ea", "")]),
            Err(HilbertError::InvalidAtom { .. })
        ));
    }

    #[test]
    fn test_relabel_collision_with_mixed_dimensions() {
        let a = qubit("ma").unwrap();
        let b = qudit("mb", 3).unwrap();
        let x = counting(&a.space().product(&b.space()).unwrap());
        assert!(matches!(
            x.relabel(&[("ma", "mb")]),
            Err(HilbertError::Collision(_))
        ));
        assert!(matches!(
            x.relabel(&[("mb", "ma")]),
            Err(HilbertError::Collision(_))
        ));
        // a bra and a ket may share a label even with distinct dimensions
        let y = counting(&HilbertSpace::combine(&[a.clone(), b.h()]).unwrap());
        assert!(matches!(
            y.relabel(&[("mb", "ma")]),
            Err(HilbertError::MismatchedDimension { .. })
        ));
    }

    #[test]
    fn test_relabel_atoms_only_moves_listed_atom() {
        let a = qubit("la").unwrap();
        let x = counting(&a.o());
        let y = x.relabel_atoms(&[(a.h(), a.prime().h())]).unwrap();
        assert_eq!(y.space().to_string(), "|la><la'|");
        let z = y.transpose(Some(&[a.prime()])).unwrap();
        assert_eq!(z.space().to_string(), "|la,la'>");

        let c3 = qudit("lc", 3).unwrap();
        assert!(matches!(
            x.relabel_atoms(&[(a.clone(), c3)]),
            Err(HilbertError::DimensionMismatch { .. })
        ));
    }
}
