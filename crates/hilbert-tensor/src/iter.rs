//! Lazy iterators over coordinates and basis arrays of a space.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::array::HilbertArray;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

/// Coordinate tuples of a shape in row-major order.
///
/// Call [`HilbertSpace::index_iter`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct IndexIter {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl IndexIter {
    pub(crate) fn new(shape: &[usize]) -> Self {
        let remaining = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            next: (remaining > 0).then(|| vec![0; shape.len()]),
            remaining,
        }
    }
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        self.remaining -= 1;

        let mut succ = current.clone();
        let mut carried_out = true;
        for axis in (0..succ.len()).rev() {
            succ[axis] += 1;
            if succ[axis] < self.shape[axis] {
                carried_out = false;
                break;
            }
            succ[axis] = 0;
        }
        if !carried_out {
            self.next = Some(succ);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for IndexIter {}

impl FusedIterator for IndexIter {}

/// Standard basis arrays of a space, in [`IndexIter`] order.
#[derive(Debug, Clone)]
pub struct BasisIter<T> {
    space: HilbertSpace,
    linear: usize,
    _marker: PhantomData<T>,
}

impl<T: Scalar> BasisIter<T> {
    pub(crate) fn new(space: HilbertSpace) -> Self {
        Self {
            space,
            linear: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: Scalar> Iterator for BasisIter<T> {
    type Item = HilbertArray<T>;

    fn next(&mut self) -> Option<HilbertArray<T>> {
        if self.linear >= self.space.dim() {
            return None;
        }
        let mut data = vec![T::zero(); self.space.dim()];
        data[self.linear] = T::one();
        self.linear += 1;
        Some(HilbertArray::from_parts(self.space.clone(), data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.space.dim() - self.linear;
        (n, Some(n))
    }
}

impl<T: Scalar> ExactSizeIterator for BasisIter<T> {}
