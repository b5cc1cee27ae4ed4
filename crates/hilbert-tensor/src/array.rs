//! Dense arrays addressed by the axes of a Hilbert space.

use std::any::Any;

use tracing::trace;

use crate::atom::HilbertAtom;
use crate::config;
use crate::error::{HilbertError, Result};
use crate::field::BaseField;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;
use crate::strides::{cartesian_to_linear, compute_strides, permute};

/// A dense array over a [`HilbertSpace`].
///
/// The buffer is row-major over the space's canonical axes (sorted kets,
/// then sorted bras) and always holds `space.dim()` elements, so the scalar
/// space carries exactly one. Read as a matrix, rows run over the ket axes
/// and columns over the bra axes.
#[derive(Clone, Debug)]
pub struct HilbertArray<T: Scalar> {
    space: HilbertSpace,
    data: Vec<T>,
    strides: Vec<usize>,
}

impl<T: Scalar> HilbertArray<T> {
    /// Create an array from row-major data.
    ///
    /// # Errors
    ///
    /// * `UnsupportedField` if `T` is not the element type of the space's field.
    /// * `ShapeMismatch` if `data.len() != space.dim()`.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{HilbertArray, c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = HilbertArray::new(&a.o(), vec![
    ///     c64::new(0.0, 0.0), c64::new(1.0, 0.0),
    ///     c64::new(1.0, 0.0), c64::new(0.0, 0.0),
    /// ]).unwrap();
    /// assert_eq!(x.get(&[0, 1]).unwrap(), c64::new(1.0, 0.0));
    /// ```
    pub fn new(space: &HilbertSpace, data: Vec<T>) -> Result<Self> {
        space.field().check_scalar::<T>("array construction")?;
        if data.len() != space.dim() {
            return Err(HilbertError::ShapeMismatch {
                expected: space.dim(),
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(space.clone(), data))
    }

    /// Zero array over `space`.
    pub fn zeros(space: &HilbertSpace) -> Result<Self> {
        space.field().check_scalar::<T>("array construction")?;
        Ok(Self::from_parts(space.clone(), vec![T::zero(); space.dim()]))
    }

    pub(crate) fn from_parts(space: HilbertSpace, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), space.dim());
        let strides = compute_strides(space.shape());
        Self {
            space,
            data,
            strides,
        }
    }

    /// Build an array from data laid out row-major over `axes` in the given
    /// order rather than the canonical one.
    pub fn from_axes(field: &BaseField, axes: &[HilbertAtom], data: Vec<T>) -> Result<Self> {
        let space = HilbertSpace::from_atoms(field, axes)?;
        field.check_scalar::<T>("array construction")?;
        if data.len() != space.dim() {
            return Err(HilbertError::ShapeMismatch {
                expected: space.dim(),
                actual: data.len(),
            });
        }
        let shape: Vec<usize> = axes.iter().map(HilbertAtom::dim).collect();
        // canonical axis i comes from position perm[i] of `axes`
        let perm: Vec<usize> = space
            .axes()
            .iter()
            .map(|a| axes.iter().position(|b| b == a).unwrap_or_default())
            .collect();
        let data = permute(&data, &shape, &perm);
        Ok(Self::from_parts(space, data))
    }

    /// The buffer permuted to row-major order over `axes`.
    ///
    /// `axes` must be a permutation of this array's axes.
    pub(crate) fn data_along(&self, axes: &[HilbertAtom]) -> Vec<T> {
        debug_assert_eq!(axes.len(), self.ndim());
        let perm: Vec<usize> = axes
            .iter()
            .map(|a| self.space.axis_of(a).unwrap_or_default())
            .collect();
        trace!(from = %self.space, ?perm, "permuting array axes");
        permute(&self.data, self.space.shape(), &perm)
    }

    #[inline]
    pub fn space(&self) -> &HilbertSpace {
        &self.space
    }

    #[inline]
    pub fn field(&self) -> &BaseField {
        self.space.field()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.space.shape()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.space.ndim()
    }

    /// Number of elements.
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    fn linear_index(&self, coords: &[usize]) -> Result<usize> {
        if coords.len() != self.ndim() {
            return Err(HilbertError::WrongNumberOfIndices {
                expected: self.ndim(),
                actual: coords.len(),
            });
        }
        for (&index, &dim_size) in coords.iter().zip(self.shape()) {
            if index >= dim_size {
                return Err(HilbertError::IndexOutOfBounds { index, dim_size });
            }
        }
        Ok(cartesian_to_linear(coords, &self.strides))
    }

    /// Element at canonical coordinates.
    pub fn get(&self, coords: &[usize]) -> Result<T> {
        Ok(self.data[self.linear_index(coords)?])
    }

    /// Overwrite the element at canonical coordinates.
    pub fn set(&mut self, coords: &[usize], value: T) -> Result<()> {
        let i = self.linear_index(coords)?;
        self.data[i] = value;
        Ok(())
    }

    /// The single element of an array over the scalar space.
    pub fn to_scalar(&self) -> Result<T> {
        self.get(&[])
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Move the array to the field of `U`.
    ///
    /// # Errors
    ///
    /// `UnsupportedField` when an entry has an imaginary part that `U`
    /// cannot hold.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let x = a.space().array(vec![c64::new(1.0, 0.0), c64::new(2.0, 0.0)]).unwrap();
    /// let r = x.cast::<f64>().unwrap();
    /// assert_eq!(r.data(), &[1.0, 2.0]);
    /// assert!(r.field().is_real());
    /// ```
    pub fn cast<U: Scalar>(&self) -> Result<HilbertArray<U>> {
        let field = BaseField::of::<U>();
        let tol = config::tolerance();
        let data = self
            .data
            .iter()
            .map(|x| {
                U::try_from_c64(x.to_c64(), tol)
                    .ok_or_else(|| HilbertError::unsupported("cast", field.kind()))
            })
            .collect::<Result<Vec<U>>>()?;
        Ok(HilbertArray::from_parts(self.space.with_field(&field), data))
    }

    /// Same space and every element within `tol`.
    pub fn approx_eq(&self, other: &HilbertArray<T>, tol: f64) -> bool {
        self.space == other.space
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(&a, &b)| (a - b).modulus() <= tol)
    }

    /// [`approx_eq`](Self::approx_eq) with the configured default tolerance.
    pub fn approx_eq_default(&self, other: &HilbertArray<T>) -> bool {
        self.approx_eq(other, config::tolerance())
    }

    /// Equality against an arbitrary value: false unless `other` is an array
    /// with the same element type, space and data.
    pub fn eq_any(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<HilbertArray<T>>()
            .is_some_and(|o| self == o)
    }

    /// Exact symbolic simplification.
    ///
    /// Only fields with a symbolic backend support this, and none ships with
    /// this crate.
    pub fn simplify(&self) -> Result<Self> {
        if !self.field().supports_symbolic() {
            return Err(HilbertError::unsupported("simplify", self.field().kind()));
        }
        Ok(self.clone())
    }
}

impl<T: Scalar> PartialEq for HilbertArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.space == other.space && self.data == other.data
    }
}
