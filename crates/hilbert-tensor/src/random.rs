//! Random arrays over a space.
//!
//! Every constructor comes in two flavors: one drawing from the thread-local
//! RNG and a `_with_rng` variant for reproducible results with a seeded RNG.

use faer::linalg::solvers::Qr;
use faer::{Mat, MatRef};
use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::{Scalar, c64};
use crate::space::HilbertSpace;

/// Trait for types that can be randomly sampled from a uniform distribution.
pub trait RandomUniform: Scalar {
    /// Sample a random value from the uniform distribution [0, 1).
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self;
}

impl RandomUniform for f64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardUniform)
    }
}

impl RandomUniform for c64 {
    fn sample_uniform<R: Rng>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }
}

/// Trait for types that can be randomly sampled from a normal distribution.
pub trait RandomNormal: Scalar {
    /// Sample a random value from the standard normal distribution.
    fn sample_normal<R: Rng>(rng: &mut R) -> Self;
}

impl RandomNormal for f64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        rng.sample(StandardNormal)
    }
}

impl RandomNormal for c64 {
    fn sample_normal<R: Rng>(rng: &mut R) -> Self {
        // real and imaginary parts are independent N(0, 1/2), so E|z|^2 = 1
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

impl HilbertSpace {
    /// Array with uniform random entries in [0, 1) (both parts, for complex).
    pub fn random_array<T: RandomUniform>(&self) -> Result<HilbertArray<T>> {
        self.random_array_with_rng(&mut rand::rng())
    }

    /// [`random_array`](Self::random_array) with an explicit RNG.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let s = qubit("a").unwrap().o();
    /// let x = s.random_array_with_rng::<c64, _>(&mut StdRng::seed_from_u64(42)).unwrap();
    /// let y = s.random_array_with_rng::<c64, _>(&mut StdRng::seed_from_u64(42)).unwrap();
    /// assert_eq!(x, y);
    /// ```
    pub fn random_array_with_rng<T: RandomUniform, R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<HilbertArray<T>> {
        let data = (0..self.dim()).map(|_| T::sample_uniform(rng)).collect();
        self.array(data)
    }

    /// Array with standard normal entries.
    pub fn randn_array<T: RandomNormal>(&self) -> Result<HilbertArray<T>> {
        self.randn_array_with_rng(&mut rand::rng())
    }

    /// [`randn_array`](Self::randn_array) with an explicit RNG.
    pub fn randn_array_with_rng<T: RandomNormal, R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<HilbertArray<T>> {
        let data = (0..self.dim()).map(|_| T::sample_normal(rng)).collect();
        self.array(data)
    }

    /// Haar-random isometry from the bra side into the ket side.
    pub fn random_isometry<T: RandomNormal>(&self) -> Result<HilbertArray<T>> {
        self.random_isometry_with_rng(&mut rand::rng())
    }

    /// [`random_isometry`](Self::random_isometry) with an explicit RNG.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the bra dimension exceeds the ket dimension.
    pub fn random_isometry_with_rng<T: RandomNormal, R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<HilbertArray<T>> {
        let (m, n) = (self.ket_dim(), self.bra_dim());
        if n > m {
            return Err(HilbertError::DimensionMismatch {
                label: self.to_string(),
                left: m,
                right: n,
            });
        }
        let g = self.randn_array_with_rng::<T, R>(rng)?;
        let q = haar_columns(g.to_faer_mat().as_ref());
        HilbertArray::from_faer_mat(self, q.as_ref())
    }

    /// Haar-random unitary over a square space.
    pub fn random_unitary<T: RandomNormal>(&self) -> Result<HilbertArray<T>> {
        self.random_unitary_with_rng(&mut rand::rng())
    }

    /// [`random_unitary`](Self::random_unitary) with an explicit RNG.
    ///
    /// # Errors
    ///
    /// `NonSquare` unless the space is an operator space.
    pub fn random_unitary_with_rng<T: RandomNormal, R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<HilbertArray<T>> {
        self.require_square()?;
        self.random_isometry_with_rng(rng)
    }

    /// Random density operator `G G^H / tr(G G^H)` with Gaussian `G`.
    pub fn random_density<T: RandomNormal>(&self) -> Result<HilbertArray<T>> {
        self.random_density_with_rng(&mut rand::rng())
    }

    /// [`random_density`](Self::random_density) with an explicit RNG.
    ///
    /// # Errors
    ///
    /// `NonSquare` unless the space is an operator space.
    pub fn random_density_with_rng<T: RandomNormal, R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<HilbertArray<T>> {
        self.require_square()?;
        let g = self.randn_array_with_rng::<T, R>(rng)?;
        let rho = (&g * &g.adjoint())?;
        let tr = rho.trace_full()?;
        Ok(rho / tr)
    }
}

/// Orthonormal columns of `g` from its thin QR factorization.
///
/// Column `j` of `Q` is rotated by the phase of `R[j, j]` so that `R` has a
/// positive diagonal; this makes the result Haar distributed when `g` is
/// Gaussian.
fn haar_columns<T: Scalar>(g: MatRef<'_, T>) -> Mat<T> {
    let qr: Qr<T> = Qr::new(g);
    let mut q = qr.compute_thin_Q();
    let r = qr.thin_R();
    for j in 0..q.ncols() {
        let rjj = r[(j, j)];
        let modulus = rjj.modulus();
        if modulus == 0.0 {
            continue;
        }
        let phase = rjj * T::from_f64(1.0 / modulus);
        for i in 0..q.nrows() {
            q[(i, j)] = q[(i, j)] * phase;
        }
    }
    q
}
