//! Named gates and states for quantum circuits.
//!
//! Each factory builds an array over the operator space of the atoms it is
//! given (their ket versions), in the atoms' own field. Gates whose entries
//! are complex fail with `UnsupportedField` over the real field; qubit-only
//! gates fail with `DimensionMismatch` for other dimensions.
//!
//! ```
//! use hilbert_tensor::{c64, qubit};
//! use hilbert_tensor::circuits::{cnot, hadamard};
//!
//! let a = qubit("a").unwrap();
//! let b = qubit("b").unwrap();
//! let zero = a.space().product(&b.space()).unwrap().basis_vec::<c64>(&[0, 0]).unwrap();
//! let bell = zero
//!     .lmul(&hadamard(&a).unwrap()).unwrap()
//!     .lmul(&cnot(&a, &b).unwrap()).unwrap();
//! assert!((bell.get(&[1, 1]).unwrap().re - 0.5f64.sqrt()).abs() < 1e-12);
//! ```

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::error::{HilbertError, Result};
use crate::scalar::{Scalar, c64};
use crate::space::HilbertSpace;

fn require_qubit(atom: &HilbertAtom, gate: &str) -> Result<()> {
    if atom.dim() == 2 {
        Ok(())
    } else {
        Err(HilbertError::DimensionMismatch {
            label: format!("{} ({gate})", atom.label()),
            left: 2,
            right: atom.dim(),
        })
    }
}

/// Operator over `space` from row-major complex entries, cast into the
/// space's field.
fn from_entries<T: Scalar>(space: &HilbertSpace, entries: &[c64]) -> Result<HilbertArray<T>> {
    let field = space.field();
    let data = entries
        .iter()
        .map(|&z| field.cast::<T>(z))
        .collect::<Result<Vec<T>>>()?;
    space.array(data)
}

fn diagonal<T: Scalar>(space: &HilbertSpace, diag: &[c64]) -> Result<HilbertArray<T>> {
    let n = diag.len();
    let mut entries = vec![c64::new(0.0, 0.0); n * n];
    for (i, &z) in diag.iter().enumerate() {
        entries[i * n + i] = z;
    }
    from_entries(space, &entries)
}

fn re(x: f64) -> c64 {
    c64::new(x, 0.0)
}

/// Pauli X, generalized to the cyclic shift `|i> -> |i+1 mod d>` on a
/// `d`-dimensional atom.
pub fn pauli_x<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    crate::group::shift(atom, 1)
}

/// Pauli Y (qubits only, complex field). Qudits have no single
/// generalization; use [`crate::group::weyl`] instead.
pub fn pauli_y<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    require_qubit(atom, "pauli_y")?;
    let j = atom.field().complex_unit()?;
    from_entries(&atom.o(), &[re(0.0), -j, j, re(0.0)])
}

/// Pauli Z, generalized to `diag(w^k)` with `w = e^{2 pi i / d}` on a
/// `d`-dimensional atom.
pub fn pauli_z<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    crate::group::clock(atom, 1)
}

/// Hadamard (qubits only).
pub fn hadamard<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    require_qubit(atom, "hadamard")?;
    let h = std::f64::consts::FRAC_1_SQRT_2;
    from_entries(&atom.o(), &[re(h), re(h), re(h), re(-h)])
}

/// S gate, `diag(1, i)`.
pub fn gate_s<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    require_qubit(atom, "gate_s")?;
    let j = atom.field().complex_unit()?;
    diagonal(&atom.o(), &[re(1.0), j])
}

/// T gate, `diag(1, e^{i pi / 4})`.
pub fn gate_t<T: Scalar>(atom: &HilbertAtom) -> Result<HilbertArray<T>> {
    require_qubit(atom, "gate_t")?;
    let ph = atom.field().fractional_phase(1, 8)?;
    diagonal(&atom.o(), &[re(1.0), ph])
}

/// Phase gate, `diag(1, e^{i theta})`.
pub fn phase<T: Scalar>(atom: &HilbertAtom, theta: f64) -> Result<HilbertArray<T>> {
    require_qubit(atom, "phase")?;
    diagonal(&atom.o(), &[re(1.0), c64::new(theta.cos(), theta.sin())])
}

/// `U` conditioned on `control`: applies `u` when the control is in its
/// last basis state `|d-1>` and the identity otherwise.
///
/// For a qubit control this is `|0><0| (x) I + |1><1| (x) U`.
///
/// # Errors
///
/// * `NonSquare` if `u` is not an operator.
/// * `DuplicateAxis` if `control` is one of `u`'s atoms.
pub fn controlled_u<T: Scalar>(control: &HilbertAtom, u: &HilbertArray<T>) -> Result<HilbertArray<T>> {
    u.space().require_square()?;
    let control = control.as_ket();
    let c_op = control.o().with_field(u.field());
    let d = control.dim();

    let mut on = c_op.zeros::<T>()?;
    on.set(&[d - 1, d - 1], T::one())?;
    let off = (&c_op.eye::<T>()? - &on)?;

    let idle = off.contract(&u.space().eye::<T>()?, Some(&[]))?;
    let active = on.contract(u, Some(&[]))?;
    &idle + &active
}

/// Controlled-NOT. A qudit target gets the controlled cyclic shift.
pub fn cnot<T: Scalar>(control: &HilbertAtom, target: &HilbertAtom) -> Result<HilbertArray<T>> {
    controlled_u(control, &pauli_x(target)?)
}

/// Controlled phase, `diag(1, 1, 1, e^{i theta})` on two qubits.
pub fn cphase<T: Scalar>(control: &HilbertAtom, target: &HilbertAtom, theta: f64) -> Result<HilbertArray<T>> {
    controlled_u(control, &phase(target, theta)?)
}

/// Exchange of two atoms of equal dimension.
pub fn swap<T: Scalar>(a: &HilbertAtom, b: &HilbertAtom) -> Result<HilbertArray<T>> {
    let (a, b) = (a.as_ket(), b.as_ket());
    if a.dim() != b.dim() {
        return Err(HilbertError::DimensionMismatch {
            label: format!("{}/{}", a.label(), b.label()),
            left: a.dim(),
            right: b.dim(),
        });
    }
    let space = HilbertSpace::combine(&[a.clone(), b.clone()])?.o();
    let mut out = space.zeros::<T>()?;
    for i in 0..a.dim() {
        for j in 0..b.dim() {
            out.set_at(&[(a.clone(), i), (b.clone(), j), (a.h(), j), (b.h(), i)], T::one())?;
        }
    }
    Ok(out)
}

/// Toffoli (controlled-controlled-NOT).
pub fn toffoli<T: Scalar>(
    control1: &HilbertAtom,
    control2: &HilbertAtom,
    target: &HilbertAtom,
) -> Result<HilbertArray<T>> {
    controlled_u(control1, &cnot(control2, target)?)
}

/// Fredkin (controlled swap).
pub fn fredkin<T: Scalar>(control: &HilbertAtom, a: &HilbertAtom, b: &HilbertAtom) -> Result<HilbertArray<T>> {
    controlled_u(control, &swap(a, b)?)
}

/// Discrete Fourier transform over the joint space of `atoms`,
/// `F[j, k] = w^{jk} / sqrt(N)` with `w = e^{2 pi i / N}` and `j`, `k`
/// the canonical linear indices.
pub fn fourier<T: Scalar>(atoms: &[HilbertAtom]) -> Result<HilbertArray<T>> {
    let kets: Vec<HilbertAtom> = atoms.iter().map(HilbertAtom::as_ket).collect();
    let space = HilbertSpace::combine(&kets)?.o();
    let n = space.ket_dim();
    let norm = 1.0 / (n as f64).sqrt();
    let field = space.field();
    let mut entries = Vec::with_capacity(n * n);
    for j in 0..n {
        for k in 0..n {
            let w = field.fractional_phase(((j * k) % n) as i64, n)?;
            entries.push(w * norm);
        }
    }
    from_entries(&space, &entries)
}

/// Maximally entangled state `sum_i |i>|i> / sqrt(d)`.
pub fn max_entangled<T: Scalar>(a: &HilbertAtom, b: &HilbertAtom) -> Result<HilbertArray<T>> {
    let (a, b) = (a.as_ket(), b.as_ket());
    if a.dim() != b.dim() {
        return Err(HilbertError::DimensionMismatch {
            label: format!("{}/{}", a.label(), b.label()),
            left: a.dim(),
            right: b.dim(),
        });
    }
    let space = HilbertSpace::combine(&[a.clone(), b.clone()])?;
    let mut out = space.zeros::<T>()?;
    let amp = T::from_f64(1.0 / (a.dim() as f64).sqrt());
    for i in 0..a.dim() {
        out.set_at(&[(a.clone(), i), (b.clone(), i)], amp)?;
    }
    Ok(out)
}
