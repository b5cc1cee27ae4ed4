//! Linear maps between operator spaces.
//!
//! A [`Superoperator`] from `in` to `out` acts on arrays over `in.o()` and
//! produces arrays over `out.o()`. It is stored as the
//! `(dim_out^2 x dim_in^2)` matrix acting on row-major vectorized
//! operators, with rows and columns in canonical axis order.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use faer::{Mat, MatRef};
use rand::Rng;
use tracing::debug;

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::backend::{mat_from_row_major, matmul_row_major, row_major_from_mat};
use crate::config;
use crate::error::{HilbertError, Result};
use crate::random::RandomNormal;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

/// A linear map from operators on `in_space` to operators on `out_space`.
#[derive(Clone, Debug)]
pub struct Superoperator<T: Scalar> {
    in_space: HilbertSpace,
    out_space: HilbertSpace,
    /// Row-major `(dim_out^2 x dim_in^2)`.
    data: Vec<T>,
}

/// Ket version of a ket, bra or operator space.
pub(crate) fn to_ket_space(space: &HilbertSpace) -> Result<HilbertSpace> {
    if space.bras().is_empty() {
        Ok(space.clone())
    } else if space.kets().is_empty() {
        Ok(space.h())
    } else if space.is_square() {
        Ok(space.ket_space())
    } else {
        Err(HilbertError::LabelMismatch(format!(
            "need a bra, ket or operator space, not {}",
            space
        )))
    }
}

impl<T: Scalar> Superoperator<T> {
    /// Wrap a `(dim_out^2 x dim_in^2)` matrix.
    ///
    /// `in_space` and `out_space` may be ket, bra or operator spaces; only
    /// their ket atoms matter.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the matrix has the wrong size.
    pub fn new(in_space: &HilbertSpace, out_space: &HilbertSpace, matrix: MatRef<'_, T>) -> Result<Self> {
        let in_space = to_ket_space(in_space)?;
        let out_space = to_ket_space(out_space)?;
        in_space.field().check_scalar::<T>("superoperator")?;
        in_space.field().assert_same(out_space.field())?;
        let rows = out_space.dim() * out_space.dim();
        let cols = in_space.dim() * in_space.dim();
        if matrix.nrows() != rows || matrix.ncols() != cols {
            return Err(HilbertError::ShapeMismatch {
                expected: rows * cols,
                actual: matrix.nrows() * matrix.ncols(),
            });
        }
        Ok(Self {
            in_space,
            out_space,
            data: row_major_from_mat(matrix),
        })
    }

    fn rows(&self) -> usize {
        self.out_space.dim() * self.out_space.dim()
    }

    fn cols(&self) -> usize {
        self.in_space.dim() * self.in_space.dim()
    }

    /// Domain, as a ket space.
    pub fn in_space(&self) -> &HilbertSpace {
        &self.in_space
    }

    /// Codomain, as a ket space.
    pub fn out_space(&self) -> &HilbertSpace {
        &self.out_space
    }

    /// The `(dim_out^2 x dim_in^2)` matrix.
    pub fn matrix(&self) -> Mat<T> {
        mat_from_row_major(&self.data, self.rows(), self.cols())
    }

    /// Apply the map to `rho`.
    ///
    /// `rho` must contain every axis of the domain's operator space; any
    /// other axes are carried along untouched.
    ///
    /// # Errors
    ///
    /// * `LabelMismatch` if `rho` lacks part of the domain.
    /// * `DuplicateAxis` if a carried axis collides with the codomain.
    pub fn apply(&self, rho: &HilbertArray<T>) -> Result<HilbertArray<T>> {
        let domain = self.in_space.o();
        if let Some(missing) = domain.axes().iter().find(|a| !rho.space().contains(a)) {
            return Err(HilbertError::LabelMismatch(format!(
                "argument space {} lacks {} of superoperator domain {}",
                rho.space(),
                missing,
                domain
            )));
        }
        let rest: Vec<HilbertAtom> = rho
            .space()
            .axes()
            .iter()
            .filter(|a| !domain.contains(a))
            .cloned()
            .collect();
        let order: Vec<HilbertAtom> = domain.axes().iter().chain(&rest).cloned().collect();
        let cols: usize = rest.iter().map(HilbertAtom::dim).product();

        let y = matmul_row_major(&self.data, &rho.data_along(&order), self.rows(), self.cols(), cols);

        let codomain = self.out_space.o();
        let axes: Vec<HilbertAtom> = codomain.axes().iter().chain(&rest).cloned().collect();
        HilbertArray::from_axes(rho.field(), &axes, y)
    }

    /// The dual map under the Hilbert-Schmidt inner product; its matrix is
    /// the conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let (rows, cols) = (self.rows(), self.cols());
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..cols {
            for i in 0..rows {
                data.push(self.data[i * cols + j].conjugate());
            }
        }
        Self {
            in_space: self.out_space.clone(),
            out_space: self.in_space.clone(),
            data,
        }
    }

    /// Multiply the map by a scalar.
    pub fn scale(&self, factor: T) -> Self {
        Self {
            in_space: self.in_space.clone(),
            out_space: self.out_space.clone(),
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    /// The identity map on operators over `space`.
    pub fn identity(space: &HilbertSpace) -> Result<Self> {
        let space = to_ket_space(space)?;
        let n = space.dim() * space.dim();
        let eye = Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() });
        Self::new(&space, &space, eye.as_ref())
    }

    fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        if self.in_space != other.in_space || self.out_space != other.out_space {
            return Err(HilbertError::LabelMismatch(format!(
                "spaces do not match: {} vs {}",
                self, other
            )));
        }
        Ok(Self {
            in_space: self.in_space.clone(),
            out_space: self.out_space.clone(),
            data: self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect(),
        })
    }
}

impl<T: RandomNormal> Superoperator<T> {
    /// Tabulate a linear function on the operator basis of `in_space`.
    ///
    /// The output space is read off `f(I)` and must be an operator space.
    /// The result is then checked against `f` on a random density operator.
    ///
    /// # Errors
    ///
    /// * `NonSquare` if `f` doesn't return operators.
    /// * `LabelMismatch` if `f` returns arrays over different spaces.
    /// * `NotLinear` if the tabulated map disagrees with `f`.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{Superoperator, c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let t = Superoperator::<c64>::from_function(&a.space(), |x| x.transpose(None)).unwrap();
    /// assert_eq!(t.to_string(), "Superoperator( |a><a| to |a><a| )");
    ///
    /// let squared = Superoperator::<c64>::from_function(&a.space(), |x| &*x * &*x);
    /// assert!(squared.is_err());
    /// ```
    pub fn from_function<F>(in_space: &HilbertSpace, f: F) -> Result<Self>
    where
        F: Fn(&HilbertArray<T>) -> Result<HilbertArray<T>>,
    {
        let in_space = to_ket_space(in_space)?;
        let domain = in_space.o();
        let image_of_eye = f(&domain.eye::<T>()?)?;
        image_of_eye.space().require_square()?;
        let codomain = image_of_eye.space().clone();
        let out_space = codomain.ket_space();

        let rows = codomain.dim();
        let cols = domain.dim();
        let mut matrix = Mat::<T>::zeros(rows, cols);
        for (j, basis) in domain.basis::<T>()?.enumerate() {
            let image = f(&basis)?;
            if *image.space() != codomain {
                return Err(HilbertError::LabelMismatch(format!(
                    "function returned {} and {}",
                    codomain,
                    image.space()
                )));
            }
            for (i, &v) in image.data().iter().enumerate() {
                matrix[(i, j)] = v;
            }
        }
        let map = Self::new(&in_space, &out_space, matrix.as_ref())?;

        let rho = domain.random_density::<T>()?;
        let expected = f(&rho)?;
        let residual = (&map.apply(&rho)? - &expected)?.norm();
        debug!(map = %map, residual, "tabulated superoperator");
        if residual > config::tolerance() * (1.0 + expected.norm()) * cols as f64 {
            return Err(HilbertError::NotLinear { residual });
        }
        Ok(map)
    }

    /// `self` after `other`.
    ///
    /// Domain atoms of `self` not produced by `other` pass straight through,
    /// so the composite acts on `other`'s domain plus those.
    pub fn compose(&self, other: &Self) -> Result<Self> {
        let mut atoms: Vec<HilbertAtom> = self
            .in_space
            .kets()
            .iter()
            .filter(|a| !other.out_space.contains(a))
            .cloned()
            .collect();
        for a in other.in_space.kets() {
            if !atoms.contains(a) {
                atoms.push(a.clone());
            }
        }
        let in_space = HilbertSpace::from_atoms(self.in_space.field(), &atoms)?;
        Self::from_function(&in_space, |x| self.apply(&other.apply(x)?))
    }

    /// Partial transpose on operators over `space`.
    pub fn transposer(space: &HilbertSpace) -> Result<Self> {
        Self::from_function(space, |x| x.transpose(None))
    }

    /// Map with standard normal matrix entries.
    pub fn random(in_space: &HilbertSpace, out_space: &HilbertSpace) -> Result<Self> {
        Self::random_with_rng(in_space, out_space, &mut rand::rng())
    }

    /// [`random`](Self::random) with an explicit RNG.
    pub fn random_with_rng<R: Rng>(
        in_space: &HilbertSpace,
        out_space: &HilbertSpace,
        rng: &mut R,
    ) -> Result<Self> {
        let in_space = to_ket_space(in_space)?;
        let out_space = to_ket_space(out_space)?;
        let rows = out_space.dim() * out_space.dim();
        let cols = in_space.dim() * in_space.dim();
        let matrix = Mat::from_fn(rows, cols, |_, _| T::sample_normal(rng));
        Self::new(&in_space, &out_space, matrix.as_ref())
    }
}

impl<T: Scalar> fmt::Display for Superoperator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Superoperator( {} to {} )", self.in_space.o(), self.out_space.o())
    }
}

impl<T: Scalar> Add for &Superoperator<T> {
    type Output = Result<Superoperator<T>>;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Sub for &Superoperator<T> {
    type Output = Result<Superoperator<T>>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Neg for &Superoperator<T> {
    type Output = Superoperator<T>;

    fn neg(self) -> Self::Output {
        self.scale(-T::one())
    }
}

impl<T: Scalar> Mul<T> for &Superoperator<T> {
    type Output = Superoperator<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

impl<T: Scalar> PartialEq for Superoperator<T> {
    fn eq(&self, other: &Self) -> bool {
        self.in_space == other.in_space && self.out_space == other.out_space && self.data == other.data
    }
}
