//! Completely positive maps in Stinespring form.
//!
//! A [`CpMap`] from `in` to `out` is stored as an array `J` over
//! `|out, env><in|`. The map is `rho -> tr_env(J rho J^H)`, and the slices of
//! `J` at each environment index are its Kraus operators. The tabulated
//! [`Superoperator`] is kept alongside for application and comparison.
//!
//! ```
//! use hilbert_tensor::{c64, qubit};
//! use hilbert_tensor::channel::{CpMap, Environment};
//!
//! let a = qubit("a").unwrap();
//! let e = CpMap::<c64>::decohere(&a.space(), Environment::Label("e")).unwrap();
//! assert!(e.is_cptp().unwrap());
//! assert_eq!(e.krauses().unwrap().len(), 2);
//! assert_eq!(e.to_string(), "CpMap( |a><a| to |a><a| )");
//! ```

use std::fmt;

use faer::linalg::solvers::EvdError;
use faer::{Mat, MatRef};
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::config;
use crate::error::{HilbertError, Result};
use crate::field::BaseField;
use crate::random::RandomNormal;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;
use crate::superop::{Superoperator, to_ket_space};

/// Length of the random suffix in generated `env_` labels.
const FRESH_SUFFIX_LEN: usize = 6;

/// How a channel constructor picks a space it has to create (usually the
/// environment).
#[derive(Clone, Copy, Debug, Default)]
pub enum Environment<'a> {
    /// A qudit with a random `env_XXXXXX` label.
    #[default]
    Fresh,
    /// A qudit with this label and the required dimension.
    Label(&'a str),
    /// An existing ket, bra or operator space at least as large as needed.
    Space(&'a HilbertSpace),
}

impl Environment<'_> {
    fn resolve(self, field: &BaseField, dim: usize) -> Result<HilbertSpace> {
        match self {
            Environment::Fresh => {
                let suffix: String = rand::rng()
                    .sample_iter(Alphanumeric)
                    .take(FRESH_SUFFIX_LEN)
                    .map(char::from)
                    .collect();
                Ok(HilbertAtom::ket(format!("env_{suffix}"), dim, field)?.space())
            }
            Environment::Label(label) => Ok(HilbertAtom::ket(label, dim, field)?.space()),
            Environment::Space(space) => {
                let space = to_ket_space(space)?;
                field.assert_same(space.field())?;
                if space.dim() < dim {
                    return Err(HilbertError::DimensionMismatch {
                        label: space.to_string(),
                        left: dim,
                        right: space.dim(),
                    });
                }
                Ok(space)
            }
        }
    }
}

/// `(atom, index)` pairs pinning every atom of a ket space.
fn pin(space: &HilbertSpace, coords: Vec<usize>) -> Vec<(HilbertAtom, usize)> {
    space.kets().iter().cloned().zip(coords).collect()
}

/// Axes `[out kets, env kets, in bras]`, the layout channel arrays are
/// built in.
fn stinespring_axes(out_space: &HilbertSpace, env: &HilbertSpace, in_space: &HilbertSpace) -> Vec<HilbertAtom> {
    out_space
        .kets()
        .iter()
        .chain(env.kets())
        .cloned()
        .chain(in_space.kets().iter().map(HilbertAtom::h))
        .collect()
}

fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(HilbertError::InvalidProbability(p))
    }
}

/// A completely positive map with an explicit environment.
#[derive(Clone, Debug)]
pub struct CpMap<T: Scalar> {
    map: Superoperator<T>,
    j: HilbertArray<T>,
    env: HilbertSpace,
}

impl<T: Scalar> CpMap<T> {
    /// Channel with Stinespring array `j` over `|out, env><in|`.
    ///
    /// The input space is read off the bras of `j`, the output space is
    /// whatever kets remain after removing `env`.
    ///
    /// # Errors
    ///
    /// * `LabelMismatch` if `env` is not part of the kets of `j`.
    pub fn new(j: &HilbertArray<T>, env: &HilbertSpace) -> Result<Self> {
        let env = to_ket_space(env)?;
        if let Some(missing) = env.kets().iter().find(|a| !j.space().contains(a)) {
            return Err(HilbertError::LabelMismatch(format!(
                "environment atom {} is not an output of {}",
                missing,
                j.space()
            )));
        }
        let in_space = j.space().bra_space().h();
        let out_space = j.space().ket_space().without(env.kets());
        let (din, dout, denv) = (in_space.dim(), out_space.dim(), env.dim());

        let flat = j.data_along(&stinespring_axes(&out_space, &env, &in_space));
        let at = |b: usize, e: usize, a: usize| flat[(b * denv + e) * din + a];
        // M[(b1, b2), (a1, a2)] = sum_e J[b1, e, a1] conj(J[b2, e, a2])
        let matrix = Mat::from_fn(dout * dout, din * din, |r, c| {
            let (b1, b2) = (r / dout, r % dout);
            let (a1, a2) = (c / din, c % din);
            (0..denv).fold(T::zero(), |acc, e| acc + at(b1, e, a1) * at(b2, e, a2).conjugate())
        });
        let map = Superoperator::new(&in_space, &out_space, matrix.as_ref())?;
        Ok(Self {
            map,
            j: j.clone(),
            env,
        })
    }

    /// Channel with the given Kraus operators, all over the same `|out><in|`.
    ///
    /// The environment has one basis state per operator.
    ///
    /// # Errors
    ///
    /// * `EmptyInput` for an empty list.
    /// * `LabelMismatch` if the operators live over different spaces.
    /// * `DuplicateAxis` if the environment clashes with the operators.
    pub fn from_kraus(ops: &[HilbertArray<T>], env: Environment<'_>) -> Result<Self> {
        let Some(first) = ops.first() else {
            return Err(HilbertError::EmptyInput("Kraus operator list".into()));
        };
        let space = first.space();
        if let Some(other) = ops.iter().find(|k| k.space() != space) {
            return Err(HilbertError::LabelMismatch(format!(
                "Kraus operators over {} and {}",
                space,
                other.space()
            )));
        }
        let env = env.resolve(space.field(), ops.len())?;
        let mut j = space.product(&env)?.zeros::<T>()?;
        for (coords, op) in env.index_iter().zip(ops) {
            j.assign_slice(&pin(&env, coords), op)?;
        }
        Self::new(&j, &env)
    }

    /// Channel from a superoperator matrix, through the eigen-decomposition
    /// of its Choi matrix.
    ///
    /// Eigenvalues at or below the tolerance are dropped, so the
    /// environment dimension is the Choi rank.
    ///
    /// # Errors
    ///
    /// * `ShapeMismatch` if `matrix` is not `(dim_out^2 x dim_in^2)`.
    /// * `NotCompletelyPositive` if the Choi matrix is not Hermitian or has
    ///   a negative eigenvalue.
    pub fn from_matrix(
        matrix: MatRef<'_, T>,
        in_space: &HilbertSpace,
        out_space: &HilbertSpace,
        env: Environment<'_>,
    ) -> Result<Self> {
        let in_space = to_ket_space(in_space)?;
        let out_space = to_ket_space(out_space)?;
        let (da, db) = (in_space.dim(), out_space.dim());
        if matrix.nrows() != db * db || matrix.ncols() != da * da {
            return Err(HilbertError::ShapeMismatch {
                expected: db * db * da * da,
                actual: matrix.nrows() * matrix.ncols(),
            });
        }

        let n = db * da;
        let choi = Mat::from_fn(n, n, |r, c| {
            let (b1, a1) = (r / da, r % da);
            let (b2, a2) = (c / da, c % da);
            matrix[(b1 * db + b2, a1 * da + a2)]
        });
        let mut scale: f64 = 1.0;
        for c in 0..n {
            for r in 0..n {
                scale = scale.max(choi[(r, c)].modulus());
            }
        }
        let tol = config::tolerance() * scale;
        for r in 0..n {
            for c in r..n {
                if (choi[(r, c)] - choi[(c, r)].conjugate()).modulus() > tol {
                    return Err(HilbertError::NotCompletelyPositive(
                        "Choi matrix is not Hermitian".into(),
                    ));
                }
            }
        }

        let evd = choi
            .as_ref()
            .self_adjoint_eigen(faer::Side::Lower)
            .map_err(|e: EvdError| HilbertError::decomposition("cp_map", e))?;
        let s = evd.S().column_vector();
        let u = evd.U();
        let values: Vec<f64> = (0..n).map(|i| s[i].re_part()).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        if min < -tol {
            return Err(HilbertError::NotCompletelyPositive(format!(
                "Choi matrix has eigenvalue {min:e}"
            )));
        }
        let kept: Vec<usize> = (0..n).filter(|&i| values[i] > tol).collect();

        let env = env.resolve(in_space.field(), kept.len().max(1))?;
        let denv = env.dim();
        let mut data = vec![T::zero(); db * denv * da];
        for (e, &k) in kept.iter().enumerate() {
            let weight = T::from_f64(values[k].sqrt());
            for b in 0..db {
                for a in 0..da {
                    data[(b * denv + e) * da + a] = u[(b * da + a, k)] * weight;
                }
            }
        }
        debug!(rank = kept.len(), env = %env, "cp map from superoperator matrix");
        let axes = stinespring_axes(&out_space, &env, &in_space);
        let j = HilbertArray::from_axes(in_space.field(), &axes, data)?;
        Self::new(&j, &env)
    }

    /// `rho -> U rho U^H` for an operator (or isometry) `u`.
    pub fn unitary(u: &HilbertArray<T>, env: Environment<'_>) -> Result<Self> {
        let env = env.resolve(u.field(), 1)?;
        let mut e0 = env.zeros::<T>()?;
        e0.data_mut()[0] = T::one();
        let j = u.contract(&e0, Some(&[]))?;
        Self::new(&j, &env)
    }

    /// The identity channel on `space`.
    pub fn identity(space: &HilbertSpace, env: Environment<'_>) -> Result<Self> {
        let space = to_ket_space(space)?;
        Self::unitary(&space.o().eye::<T>()?, env)
    }

    /// `rho -> tr(rho) I / d`, with Kraus operators `|k><j| / sqrt(d)`.
    pub fn totally_noisy(space: &HilbertSpace, env: Environment<'_>) -> Result<Self> {
        let space = to_ket_space(space)?;
        let d = space.dim();
        let env = env.resolve(space.field(), d * d)?;
        let denv = env.dim();
        let w = T::from_f64(1.0 / (d as f64).sqrt());
        let mut data = vec![T::zero(); d * denv * d];
        for j in 0..d {
            for k in 0..d {
                data[(k * denv + j * d + k) * d + j] = w;
            }
        }
        let j = HilbertArray::from_axes(space.field(), &stinespring_axes(&space, &env, &space), data)?;
        Self::new(&j, &env)
    }

    /// `p` times the totally noisy channel plus `1 - p` times the identity.
    ///
    /// # Errors
    ///
    /// `InvalidProbability` unless `0 <= p <= 1`.
    pub fn noisy(space: &HilbertSpace, p: f64, env: Environment<'_>) -> Result<Self> {
        check_probability(p)?;
        let noise = Self::totally_noisy(space, Environment::Fresh)?.scale(p)?;
        let clean = Self::identity(space, Environment::Fresh)?.scale(1.0 - p)?;
        noise.direct_sum(&clean, env)
    }

    /// Complete dephasing in the computational basis.
    pub fn decohere(space: &HilbertSpace, env: Environment<'_>) -> Result<Self> {
        let space = to_ket_space(space)?;
        let d = space.dim();
        let env = env.resolve(space.field(), d)?;
        let denv = env.dim();
        let mut data = vec![T::zero(); d * denv * d];
        for a in 0..d {
            data[(a * denv + a) * d + a] = T::one();
        }
        let j = HilbertArray::from_axes(space.field(), &stinespring_axes(&space, &env, &space), data)?;
        Self::new(&j, &env)
    }

    /// Erasure channel: with probability `p` the output is the flag state
    /// `|d>` of a `(d + 1)`-dimensional output, otherwise the input passes
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidProbability` unless `0 <= p <= 1`.
    pub fn erasure(space: &HilbertSpace, p: f64, output: Environment<'_>, env: Environment<'_>) -> Result<Self> {
        check_probability(p)?;
        let in_space = to_ket_space(space)?;
        let d = in_space.dim();
        let out_space = output.resolve(in_space.field(), d + 1)?;
        let env = env.resolve(in_space.field(), d + 1)?;
        let (dout, denv) = (out_space.dim(), env.dim());
        let (erased, kept) = (T::from_f64(p.sqrt()), T::from_f64((1.0 - p).sqrt()));
        let mut data = vec![T::zero(); dout * denv * d];
        for a in 0..d {
            // erased: out = flag, env remembers the input
            data[(d * denv + a) * d + a] = erased;
            // transmitted: env = flag
            data[(a * denv + d) * d + a] = kept;
        }
        let axes = stinespring_axes(&out_space, &env, &in_space);
        let j = HilbertArray::from_axes(in_space.field(), &axes, data)?;
        Self::new(&j, &env)
    }

    /// Domain, as a ket space.
    pub fn in_space(&self) -> &HilbertSpace {
        self.map.in_space()
    }

    /// Codomain, as a ket space.
    pub fn out_space(&self) -> &HilbertSpace {
        self.map.out_space()
    }

    /// Environment, as a ket space.
    pub fn env_space(&self) -> &HilbertSpace {
        &self.env
    }

    /// The Stinespring array over `|out, env><in|`.
    pub fn stinespring(&self) -> &HilbertArray<T> {
        &self.j
    }

    /// The tabulated map.
    pub fn superoperator(&self) -> &Superoperator<T> {
        &self.map
    }

    /// The `(dim_out^2 x dim_in^2)` superoperator matrix.
    pub fn matrix(&self) -> Mat<T> {
        self.map.matrix()
    }

    /// Apply the channel; see [`Superoperator::apply`].
    pub fn apply(&self, rho: &HilbertArray<T>) -> Result<HilbertArray<T>> {
        self.map.apply(rho)
    }

    /// Kraus operators over `|out><in|`, one per environment basis state.
    pub fn krauses(&self) -> Result<Vec<HilbertArray<T>>> {
        self.env
            .index_iter()
            .map(|coords| self.j.slice(&pin(&self.env, coords)))
            .collect()
    }

    fn trace_residual(&self) -> Result<f64> {
        let gram = (&self.j.adjoint() * &self.j)?;
        let eye = self.in_space().o().eye::<T>()?;
        Ok((&gram - &eye)?.norm())
    }

    /// Whether `J^H J` is the identity on the input, i.e. the channel
    /// preserves traces.
    pub fn is_cptp(&self) -> Result<bool> {
        let tol = config::tolerance() * self.in_space().dim() as f64;
        Ok(self.trace_residual()? <= tol)
    }

    /// `NotTracePreserving` unless [`is_cptp`](Self::is_cptp).
    pub fn assert_cptp(&self) -> Result<()> {
        let residual = self.trace_residual()?;
        if residual <= config::tolerance() * self.in_space().dim() as f64 {
            Ok(())
        } else {
            Err(HilbertError::NotTracePreserving { residual })
        }
    }

    /// The complementary channel: the roles of output and environment swap.
    pub fn complementary(&self) -> Result<Self> {
        Self::new(&self.j, self.out_space())
    }

    /// The adjoint (Heisenberg picture) channel, with Kraus operators
    /// `K^H`.
    pub fn adjoint(&self) -> Result<Self> {
        let jh = self.j.adjoint().transpose(Some(self.env.kets()))?;
        Self::new(&jh, &self.env)
    }

    /// The channel ket `|in, out, env>`.
    ///
    /// # Errors
    ///
    /// `LabelMismatch` if the input shares atoms with the output or the
    /// environment.
    pub fn channel_ket(&self) -> Result<HilbertArray<T>> {
        if let Some(shared) = self.in_space().kets().iter().find(|a| self.j.space().contains(a)) {
            return Err(HilbertError::LabelMismatch(format!(
                "channel ket needs an input disjoint from output and environment, {} is both",
                shared
            )));
        }
        self.j.transpose(Some(self.in_space().kets()))
    }

    /// Multiply the map by a non-negative weight, scaling `J` by its square
    /// root.
    ///
    /// # Errors
    ///
    /// `NotCompletelyPositive` for a negative or non-finite weight.
    pub fn scale(&self, weight: f64) -> Result<Self> {
        if !(weight >= 0.0 && weight.is_finite()) {
            return Err(HilbertError::NotCompletelyPositive(format!(
                "weight {weight} is not a non-negative number"
            )));
        }
        Self::new(&self.j.scale(T::from_f64(weight.sqrt())), &self.env)
    }

    /// `self + other` with the Kraus operators of both, over an
    /// environment of dimension `dim(env_1) + dim(env_2)`.
    ///
    /// # Errors
    ///
    /// `LabelMismatch` unless both maps share input and output spaces.
    pub fn direct_sum(&self, other: &Self, env: Environment<'_>) -> Result<Self> {
        if self.in_space() != other.in_space() || self.out_space() != other.out_space() {
            return Err(HilbertError::LabelMismatch(format!(
                "spaces do not match: {} vs {}",
                self, other
            )));
        }
        let mut ops = self.krauses()?;
        ops.extend(other.krauses()?);
        Self::from_kraus(&ops, env)
    }
}

impl<T: RandomNormal> CpMap<T> {
    /// Channel built by tabulating `f`; see [`Superoperator::from_function`].
    pub fn from_function<F>(in_space: &HilbertSpace, f: F, env: Environment<'_>) -> Result<Self>
    where
        F: Fn(&HilbertArray<T>) -> Result<HilbertArray<T>>,
    {
        Superoperator::from_function(in_space, f)?.upgrade_to_cp_map(env)
    }

    /// `self` after `other`.
    ///
    /// When the two environments share no label the Stinespring arrays are
    /// multiplied and the environments combined; otherwise the composite
    /// superoperator is decomposed again over a fresh environment.
    pub fn compose(&self, other: &Self) -> Result<Self> {
        let clashes = |env: &HilbertSpace, j: &HilbertArray<T>| {
            env.kets()
                .iter()
                .any(|e| j.space().axes().iter().any(|x| x.label() == e.label()))
        };
        if !clashes(&self.env, &other.j) && !clashes(&other.env, &self.j) {
            let env = self.env.product(&other.env)?;
            let j = (&self.j * &other.j)?;
            return Self::new(&j, &env);
        }
        debug!(left = %self, right = %other, "environments overlap, decomposing the composite");
        self.map.compose(&other.map)?.upgrade_to_cp_map(Environment::Fresh)
    }

    /// Random channel from a Haar isometry. The environment defaults to
    /// dimension `dim_in * dim_out`.
    pub fn random(in_space: &HilbertSpace, out_space: &HilbertSpace, env: Environment<'_>) -> Result<Self> {
        Self::random_with_rng(in_space, out_space, env, &mut rand::rng())
    }

    /// [`random`](Self::random) with an explicit RNG.
    pub fn random_with_rng<R: Rng>(
        in_space: &HilbertSpace,
        out_space: &HilbertSpace,
        env: Environment<'_>,
        rng: &mut R,
    ) -> Result<Self> {
        let in_space = to_ket_space(in_space)?;
        let out_space = to_ket_space(out_space)?;
        let env = env.resolve(in_space.field(), in_space.dim() * out_space.dim())?;
        let full = out_space.product(&env)?.product(&in_space.h())?;
        let j = full.random_isometry_with_rng::<T, R>(rng)?;
        Self::new(&j, &env)
    }
}

impl<T: Scalar> Superoperator<T> {
    /// Decompose into a [`CpMap`]; see [`CpMap::from_matrix`].
    pub fn upgrade_to_cp_map(&self, env: Environment<'_>) -> Result<CpMap<T>> {
        CpMap::from_matrix(self.matrix().as_ref(), self.in_space(), self.out_space(), env)
    }

    /// As [`upgrade_to_cp_map`](Self::upgrade_to_cp_map), additionally
    /// requiring the result to preserve traces.
    pub fn upgrade_to_cptp_map(&self, env: Environment<'_>) -> Result<CpMap<T>> {
        let map = self.upgrade_to_cp_map(env)?;
        map.assert_cptp()?;
        Ok(map)
    }
}

impl<T: Scalar> fmt::Display for CpMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CpMap( {} to {} )", self.in_space().o(), self.out_space().o())
    }
}
