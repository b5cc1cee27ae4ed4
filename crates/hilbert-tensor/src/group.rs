//! Representations of the cyclic group on a single atom.
//!
//! On a `d`-dimensional atom, [`shift`] sends `|i>` to `|i + k mod d>` and
//! [`clock`] multiplies `|i>` by `w^{ik}` with `w = e^{2 pi i / d}`. Together
//! they generate the Weyl-Heisenberg group, `Z X = w X Z`.

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::circuits;
use crate::error::Result;
use crate::scalar::Scalar;

/// `X^k`, the regular representation of `k` in `Z_d`.
pub fn shift<T: Scalar>(atom: &HilbertAtom, k: i64) -> Result<HilbertArray<T>> {
    let atom = atom.as_ket();
    let d = atom.dim();
    let mut out = atom.o().zeros::<T>()?;
    for i in 0..d {
        let target = (i as i64 + k).rem_euclid(d as i64) as usize;
        out.set(&[target, i], T::one())?;
    }
    Ok(out)
}

/// `Z^k`, the generalized Pauli Z: `diag(w^{ik})`.
///
/// On the real field only exponents giving `+1`/`-1` phases are allowed.
pub fn clock<T: Scalar>(atom: &HilbertAtom, k: i64) -> Result<HilbertArray<T>> {
    let atom = atom.as_ket();
    let d = atom.dim();
    let field = atom.field();
    let mut out = atom.o().zeros::<T>()?;
    for i in 0..d {
        let phase = field.fractional_phase(i as i64 * k, d)?;
        out.set(&[i, i], field.cast::<T>(phase)?)?;
    }
    Ok(out)
}

/// Weyl operator `X^a Z^b`.
///
/// ```
/// use hilbert_tensor::{c64, qudit};
/// use hilbert_tensor::group::{clock, shift, weyl};
///
/// let a = qudit("a", 3).unwrap();
/// let w = weyl::<c64>(&a, 1, 2).unwrap();
/// let direct = (&shift::<c64>(&a, 1).unwrap() * &clock::<c64>(&a, 2).unwrap()).unwrap();
/// assert_eq!(w, direct);
/// ```
pub fn weyl<T: Scalar>(atom: &HilbertAtom, a: i64, b: i64) -> Result<HilbertArray<T>> {
    &shift::<T>(atom, a)? * &clock::<T>(atom, b)?
}

/// Fourier transform over `Z_d`; conjugating `shift` by it gives `clock`.
pub fn cyclic_fourier<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    circuits::fourier(std::slice::from_ref(atom))
}

/// Hadamard on every listed qubit.
pub fn hadamard_n<T: Scalar>(atoms: &[HilbertAtom]) -> Result<HilbertArray<T>> {
    let Some((first, rest)) = atoms.split_first() else {
        return Err(crate::error::HilbertError::InvalidAtom {
            label: String::new(),
            reason: "hadamard_n needs at least one atom".into(),
        });
    };
    rest.iter().try_fold(circuits::hadamard::<T>(first)?, |acc, atom| {
        acc.contract(&circuits::hadamard::<T>(atom)?, Some(&[]))
    })
}
