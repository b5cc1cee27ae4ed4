//! Addressing arrays by atom instead of by canonical position.

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::error::{HilbertError, Result};
use crate::iter::IndexIter;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;
use crate::strides::cartesian_to_linear;

/// Fixed coordinate per canonical axis (`None` for free axes).
fn resolve<T: Scalar>(
    array: &HilbertArray<T>,
    fixed: &[(HilbertAtom, usize)],
) -> Result<Vec<Option<usize>>> {
    let mut pinned = vec![None; array.ndim()];
    for (atom, index) in fixed {
        let Some(axis) = array.space().axis_of(atom) else {
            return Err(HilbertError::SliceUsage(format!(
                "{} is not part of {}",
                atom,
                array.space()
            )));
        };
        if pinned[axis].is_some() {
            return Err(HilbertError::SliceUsage(format!(
                "{} addressed more than once",
                atom
            )));
        }
        if *index >= atom.dim() {
            return Err(HilbertError::IndexOutOfBounds {
                index: *index,
                dim_size: atom.dim(),
            });
        }
        pinned[axis] = Some(*index);
    }
    Ok(pinned)
}

/// Linear offsets of every element of the slice, in the slice's own
/// canonical order.
fn slice_offsets<T: Scalar>(array: &HilbertArray<T>, pinned: &[Option<usize>]) -> Vec<usize> {
    let free_shape: Vec<usize> = array
        .shape()
        .iter()
        .zip(pinned)
        .filter(|(_, p)| p.is_none())
        .map(|(&d, _)| d)
        .collect();

    let mut coords = vec![0usize; pinned.len()];
    IndexIter::new(&free_shape)
        .map(|free| {
            let mut free = free.into_iter();
            for (c, p) in coords.iter_mut().zip(pinned) {
                *c = match p {
                    Some(v) => *v,
                    None => free.next().unwrap_or_default(),
                };
            }
            cartesian_to_linear(&coords, array.strides())
        })
        .collect()
}

impl<T: Scalar> HilbertArray<T> {
    fn sliced_space(&self, fixed: &[(HilbertAtom, usize)]) -> HilbertSpace {
        let atoms: Vec<HilbertAtom> = fixed.iter().map(|(a, _)| a.clone()).collect();
        self.space().without(&atoms)
    }

    /// Element addressed by `(atom, index)` pairs covering every axis.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.o().array(vec![
    ///     c64::new(1.0, 0.0), c64::new(2.0, 0.0),
    ///     c64::new(3.0, 0.0), c64::new(4.0, 0.0),
    /// ]).unwrap();
    /// assert_eq!(x.get_at(&[(a.h(), 0), (a.clone(), 1)]).unwrap(), c64::new(3.0, 0.0));
    /// ```
    pub fn get_at(&self, fixed: &[(HilbertAtom, usize)]) -> Result<T> {
        let pinned = resolve(self, fixed)?;
        let coords = full_coords(&pinned)?;
        self.get(&coords)
    }

    /// Overwrite the element addressed by `(atom, index)` pairs.
    pub fn set_at(&mut self, fixed: &[(HilbertAtom, usize)], value: T) -> Result<()> {
        let pinned = resolve(self, fixed)?;
        let coords = full_coords(&pinned)?;
        self.set(&coords, value)
    }

    /// Fix some axes and return the sub-array over the others.
    ///
    /// # Errors
    ///
    /// * `SliceUsage` if an atom is absent or addressed twice.
    /// * `IndexOutOfBounds` for an index past the atom's dimension.
    pub fn slice(&self, fixed: &[(HilbertAtom, usize)]) -> Result<Self> {
        let pinned = resolve(self, fixed)?;
        let data = slice_offsets(self, &pinned)
            .into_iter()
            .map(|i| self.data()[i])
            .collect();
        Ok(Self::from_parts(self.sliced_space(fixed), data))
    }

    /// Write `value` into the sub-array selected by `fixed`.
    ///
    /// # Errors
    ///
    /// As [`slice`](Self::slice), plus `SliceUsage` when `value` does not
    /// live over the sliced space.
    pub fn assign_slice(&mut self, fixed: &[(HilbertAtom, usize)], value: &HilbertArray<T>) -> Result<()> {
        let pinned = resolve(self, fixed)?;
        let target = self.sliced_space(fixed);
        if *value.space() != target {
            return Err(HilbertError::SliceUsage(format!(
                "cannot assign an array over {} to a slice over {}",
                value.space(),
                target
            )));
        }
        let offsets = slice_offsets(self, &pinned);
        let data = self.data_mut();
        for (i, &v) in offsets.into_iter().zip(value.data()) {
            data[i] = v;
        }
        Ok(())
    }
}

fn full_coords(pinned: &[Option<usize>]) -> Result<Vec<usize>> {
    let given = pinned.iter().filter(|p| p.is_some()).count();
    pinned
        .iter()
        .map(|p| {
            p.ok_or(HilbertError::WrongNumberOfIndices {
                expected: pinned.len(),
                actual: given,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::atom::{qubit, qudit};
    use crate::error::HilbertError;
    use crate::scalar::c64;
    use crate::space::HilbertSpace;

    fn c(re: f64) -> c64 {
        c64::new(re, 0.0)
    }

    #[test]
    fn test_slice_and_assign() {
        let a = qubit("sa").unwrap();
        let b = qudit("sb", 3).unwrap();
        let s = HilbertSpace::combine(&[a.clone(), b.clone()]).unwrap();
        let mut x = s.array((0..6).map(|i| c(i as f64)).collect()).unwrap();

        let row = x.slice(&[(a.clone(), 1)]).unwrap();
        assert_eq!(row.space(), &b.space());
        assert_eq!(row.data(), &[c(3.0), c(4.0), c(5.0)]);

        let col = x.slice(&[(b.clone(), 2)]).unwrap();
        assert_eq!(col.data(), &[c(2.0), c(5.0)]);

        let fresh = b.space().array(vec![c(-1.0); 3]).unwrap();
        x.assign_slice(&[(a.clone(), 0)], &fresh).unwrap();
        assert_eq!(x.data()[..3], [c(-1.0); 3]);
        assert_eq!(x.data()[3], c(3.0));
    }

    #[test]
    fn test_slice_usage_errors() {
        let a = qubit("ua").unwrap();
        let b = qubit("ub").unwrap();
        let s = HilbertSpace::combine(&[a.clone(), b.clone()]).unwrap();
        let mut x = s.zeros::<c64>().unwrap();

        assert!(matches!(
            x.slice(&[(a.clone(), 0), (a.clone(), 1)]),
            Err(HilbertError::SliceUsage(_))
        ));
        assert!(matches!(
            x.slice(&[(a.h(), 0)]),
            Err(HilbertError::SliceUsage(_))
        ));
        assert!(matches!(
            x.slice(&[(a.clone(), 2)]),
            Err(HilbertError::IndexOutOfBounds { .. })
        ));
        let wrong = a.space().zeros::<c64>().unwrap();
        assert!(matches!(
            x.assign_slice(&[(a.clone(), 0)], &wrong),
            Err(HilbertError::SliceUsage(_))
        ));
    }

    #[test]
    fn test_get_set_at() {
        let a = qubit("ga").unwrap();
        let b = qubit("gb").unwrap();
        let s = HilbertSpace::combine(&[a.clone(), b.clone()]).unwrap();
        let mut x = s.zeros::<c64>().unwrap();
        x.set_at(&[(b.clone(), 1), (a.clone(), 0)], c(7.0)).unwrap();
        assert_eq!(x.get(&[0, 1]).unwrap(), c(7.0));
        assert_eq!(x.get_at(&[(a.clone(), 0), (b.clone(), 1)]).unwrap(), c(7.0));
        assert!(matches!(
            x.get_at(&[(a.clone(), 0)]),
            Err(HilbertError::WrongNumberOfIndices { .. })
        ));
    }
}
