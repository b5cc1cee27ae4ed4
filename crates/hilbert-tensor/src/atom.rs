//! Hilbert atoms: single named, dimensioned tensor axes.
//!
//! An atom is a ket (output-like) or bra (input-like) axis with a label and a
//! dimension over a base field. Atoms are interned on
//! `(label, dimension, direction, field)`, so equality is a pointer
//! comparison.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::field::{BaseField, FieldKind};
use crate::intern::Interner;
use crate::scalar::Scalar;
use crate::space::HilbertSpace;

/// Whether an atom is a ket or a bra axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Ket,
    Bra,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Direction::Ket => Direction::Bra,
            Direction::Bra => Direction::Ket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AtomKey {
    label: String,
    dim: usize,
    direction: Direction,
    field: FieldKind,
}

#[derive(Debug)]
struct AtomInner {
    label: String,
    dim: usize,
    direction: Direction,
    field: BaseField,
}

static ATOMS: LazyLock<Interner<AtomKey, AtomInner>> = LazyLock::new(|| Interner::new("atoms"));

/// An interned tensor axis.
#[derive(Clone)]
pub struct HilbertAtom(Arc<AtomInner>);

impl HilbertAtom {
    /// Return the cached atom for the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAtom` for an empty label or a zero dimension.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{BaseField, Direction, HilbertAtom};
    ///
    /// let a = HilbertAtom::new("a", 2, Direction::Ket, &BaseField::complex()).unwrap();
    /// let b = HilbertAtom::new("a", 2, Direction::Ket, &BaseField::complex()).unwrap();
    /// assert!(a.same_instance(&b));
    /// assert_eq!(a.h().direction(), Direction::Bra);
    /// ```
    pub fn new(
        label: impl Into<String>,
        dim: usize,
        direction: Direction,
        field: &BaseField,
    ) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(HilbertError::InvalidAtom {
                label,
                reason: "label must not be empty".into(),
            });
        }
        if dim == 0 {
            return Err(HilbertError::InvalidAtom {
                label,
                reason: "dimension must be positive".into(),
            });
        }
        Ok(Self::intern(label, dim, direction, field))
    }

    /// Ket atom.
    pub fn ket(label: impl Into<String>, dim: usize, field: &BaseField) -> Result<Self> {
        Self::new(label, dim, Direction::Ket, field)
    }

    /// Bra atom.
    pub fn bra(label: impl Into<String>, dim: usize, field: &BaseField) -> Result<Self> {
        Self::new(label, dim, Direction::Bra, field)
    }

    fn intern(label: String, dim: usize, direction: Direction, field: &BaseField) -> Self {
        let key = AtomKey {
            label,
            dim,
            direction,
            field: field.kind(),
        };
        let field = field.clone();
        HilbertAtom(ATOMS.intern(key, move |k| AtomInner {
            label: k.label.clone(),
            dim: k.dim,
            direction: k.direction,
            field,
        }))
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.0.label
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.0.dim
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.0.direction
    }

    #[inline]
    pub fn is_ket(&self) -> bool {
        self.0.direction == Direction::Ket
    }

    #[inline]
    pub fn is_bra(&self) -> bool {
        self.0.direction == Direction::Bra
    }

    #[inline]
    pub fn field(&self) -> &BaseField {
        &self.0.field
    }

    /// Pointer identity of the interned instance.
    pub fn same_instance(&self, other: &HilbertAtom) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The dual atom (same label and dimension, opposite direction).
    pub fn h(&self) -> HilbertAtom {
        Self::intern(
            self.0.label.clone(),
            self.0.dim,
            self.0.direction.flip(),
            &self.0.field,
        )
    }

    /// The ket version of this atom.
    pub fn as_ket(&self) -> HilbertAtom {
        if self.is_ket() { self.clone() } else { self.h() }
    }

    /// The bra version of this atom.
    pub fn as_bra(&self) -> HilbertAtom {
        if self.is_bra() { self.clone() } else { self.h() }
    }

    /// Same atom with an apostrophe appended to the label.
    ///
    /// ```
    /// use hilbert_tensor::qubit;
    ///
    /// let a = qubit("a").unwrap();
    /// assert_eq!(a.prime().label(), "a'");
    /// assert_eq!(a.prime().prime().to_string(), "|a''>");
    /// ```
    pub fn prime(&self) -> HilbertAtom {
        self.with_label(format!("{}'", self.0.label))
    }

    /// Same dimension, direction and field under another label.
    pub(crate) fn with_label(&self, label: String) -> HilbertAtom {
        Self::intern(label, self.0.dim, self.0.direction, &self.0.field)
    }

    /// Same label, dimension and direction over another field.
    pub fn with_field(&self, field: &BaseField) -> HilbertAtom {
        Self::intern(self.0.label.clone(), self.0.dim, self.0.direction, field)
    }

    /// The one-atom space.
    pub fn space(&self) -> HilbertSpace {
        HilbertSpace::from_atom(self)
    }

    /// The operator space `|a><a|`.
    pub fn o(&self) -> HilbertSpace {
        self.space().o()
    }

    /// Ket basis vector `|idx>` over this atom's ket version.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qudit};
    ///
    /// let a = qudit("a", 3).unwrap();
    /// let v = a.h().ket_at::<c64>(2).unwrap();
    /// assert_eq!(v.space().to_string(), "|a>");
    /// assert_eq!(v.get(&[2]).unwrap(), c64::new(1.0, 0.0));
    /// ```
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `idx >= dim`.
    pub fn ket_at<T: Scalar>(&self, idx: usize) -> Result<HilbertArray<T>> {
        self.as_ket().space().basis_vec(&[idx])
    }

    /// Bra basis vector `<idx|` over this atom's bra version.
    pub fn bra_at<T: Scalar>(&self, idx: usize) -> Result<HilbertArray<T>> {
        self.as_bra().space().basis_vec(&[idx])
    }

    fn sort_key(&self) -> (&str, Direction, usize, FieldKind) {
        (
            &self.0.label,
            self.0.direction,
            self.0.dim,
            self.0.field.kind(),
        )
    }
}

impl PartialEq for HilbertAtom {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for HilbertAtom {}

impl Hash for HilbertAtom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for HilbertAtom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HilbertAtom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for HilbertAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self, self.0.dim)
    }
}

impl fmt::Display for HilbertAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.direction {
            Direction::Ket => write!(f, "|{}>", self.0.label),
            Direction::Bra => write!(f, "<{}|", self.0.label),
        }
    }
}

/// A two-dimensional ket atom over the default field.
pub fn qubit(label: impl Into<String>) -> Result<HilbertAtom> {
    qudit(label, 2)
}

/// A `dim`-dimensional ket atom over the default field.
pub fn qudit(label: impl Into<String>, dim: usize) -> Result<HilbertAtom> {
    HilbertAtom::ket(label, dim, &BaseField::default_field())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memoized() {
        let f = BaseField::complex();
        let a = HilbertAtom::new("m", 3, Direction::Ket, &f).unwrap();
        let b = HilbertAtom::new(String::from("m"), 3, Direction::Ket, &f).unwrap();
        assert!(a.same_instance(&b));
        assert_eq!(a, b);

        let c = HilbertAtom::new("m", 3, Direction::Bra, &f).unwrap();
        assert_ne!(a, c);
        assert_eq!(a.h(), c);
        assert_eq!(c.h(), a);
    }

    #[test]
    fn test_field_is_part_of_identity() {
        let a = HilbertAtom::ket("fa", 2, &BaseField::complex()).unwrap();
        let b = HilbertAtom::ket("fa", 2, &BaseField::real()).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.with_field(&BaseField::real()), b);
    }

    #[test]
    fn test_invalid_atoms() {
        let f = BaseField::complex();
        assert!(matches!(
            HilbertAtom::ket("", 2, &f),
            Err(HilbertError::InvalidAtom { .. })
        ));
        assert!(matches!(
            HilbertAtom::ket("z", 0, &f),
            Err(HilbertError::InvalidAtom { .. })
        ));
    }

    #[test]
    fn test_ordering_kets_by_label() {
        let f = BaseField::complex();
        let a = HilbertAtom::ket("a", 2, &f).unwrap();
        let b = HilbertAtom::ket("b", 2, &f).unwrap();
        assert!(a < b);
        assert!(a < a.h());
        assert!(a.h() < b);
    }

    #[test]
    fn test_display() {
        let a = qubit("q").unwrap();
        assert_eq!(a.to_string(), "|q>");
        assert_eq!(a.h().to_string(), "<q|");
        assert_eq!(format!("{:?}", a), "|q>[2]");
    }

    #[test]
    fn test_basis_vectors() {
        use crate::scalar::c64;

        let a = qudit("bv", 3).unwrap();
        let ket = a.ket_at::<c64>(1).unwrap();
        assert_eq!(ket.space(), &a.space());
        assert_eq!(ket.data(), &[c64::new(0.0, 0.0), c64::new(1.0, 0.0), c64::new(0.0, 0.0)]);
        assert_eq!(a.h().ket_at::<c64>(1).unwrap(), ket);

        let bra = a.bra_at::<c64>(1).unwrap();
        assert_eq!(bra.space(), &a.h().space());
        assert_eq!(bra, ket.adjoint());

        let proj = (&ket * &bra).unwrap();
        assert_eq!(proj.get(&[1, 1]).unwrap(), c64::new(1.0, 0.0));
        assert!(matches!(
            a.ket_at::<c64>(3),
            Err(HilbertError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_prime() {
        let a = qudit("p", 3).unwrap();
        let ap = a.prime();
        assert_eq!(ap.label(), "p'");
        assert_eq!(ap.dim(), 3);
        assert!(ap.is_ket());
        assert_eq!(a.h().prime(), ap.h());
    }
}
