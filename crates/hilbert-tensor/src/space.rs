//! Hilbert spaces: interned sets of ket and bra atoms over one field.
//!
//! The canonical axis order of a space is its sorted kets followed by its
//! sorted bras. Array buffers, shapes, coordinate tuples and the matrix view
//! used by the decompositions all follow this order.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use crate::array::HilbertArray;
use crate::atom::{Direction, HilbertAtom};
use crate::error::{HilbertError, Result};
use crate::field::{BaseField, FieldKind};
use crate::intern::Interner;
use crate::iter::{BasisIter, IndexIter};
use crate::scalar::Scalar;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SpaceKey {
    kets: Vec<HilbertAtom>,
    bras: Vec<HilbertAtom>,
    field: FieldKind,
}

#[derive(Debug)]
struct SpaceInner {
    kets: Vec<HilbertAtom>,
    bras: Vec<HilbertAtom>,
    field: BaseField,
    axes: Vec<HilbertAtom>,
    shape: Vec<usize>,
    ket_dim: usize,
    bra_dim: usize,
}

static SPACES: LazyLock<Interner<SpaceKey, SpaceInner>> =
    LazyLock::new(|| Interner::new("spaces"));

/// An interned tensor-product space.
#[derive(Clone)]
pub struct HilbertSpace(Arc<SpaceInner>);

impl HilbertSpace {
    /// The scalar space (no atoms) over `field`.
    pub fn empty(field: &BaseField) -> Self {
        Self::from_sorted(Vec::new(), Vec::new(), field)
    }

    pub(crate) fn from_atom(atom: &HilbertAtom) -> Self {
        match atom.direction() {
            Direction::Ket => Self::from_sorted(vec![atom.clone()], Vec::new(), atom.field()),
            Direction::Bra => Self::from_sorted(Vec::new(), vec![atom.clone()], atom.field()),
        }
    }

    /// Combine atoms into a space.
    ///
    /// The order of `atoms` doesn't matter. An empty slice yields the scalar
    /// space over the default field.
    ///
    /// # Errors
    ///
    /// * `DuplicateAxis` if the same atom appears twice.
    /// * `MismatchedDimension` if a label is used with two dimensions.
    /// * `IncompatibleField` if the atoms don't share a field.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{HilbertSpace, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qubit("b").unwrap();
    /// let ab = HilbertSpace::combine(&[b.clone(), a.h(), a.clone()]).unwrap();
    /// assert_eq!(ab.to_string(), "|a,b><a|");
    /// assert_eq!(ab.shape(), &[2, 2, 2]);
    ///
    /// assert!(HilbertSpace::combine(&[a.clone(), a]).is_err());
    /// ```
    pub fn combine(atoms: &[HilbertAtom]) -> Result<Self> {
        let field = atoms
            .first()
            .map(|a| a.field().clone())
            .unwrap_or_else(BaseField::default_field);
        Self::from_atoms(&field, atoms)
    }

    /// Combine atoms into a space over an explicit field.
    pub fn from_atoms(field: &BaseField, atoms: &[HilbertAtom]) -> Result<Self> {
        let mut dims: HashMap<&str, usize> = HashMap::with_capacity(atoms.len());
        for atom in atoms {
            field.assert_same(atom.field())?;
            let first = *dims.entry(atom.label()).or_insert(atom.dim());
            if first != atom.dim() {
                return Err(HilbertError::MismatchedDimension {
                    label: atom.label().to_string(),
                    first,
                    second: atom.dim(),
                });
            }
        }

        let (mut kets, mut bras): (Vec<HilbertAtom>, Vec<HilbertAtom>) =
            atoms.iter().cloned().partition(HilbertAtom::is_ket);
        kets.sort();
        bras.sort();
        for group in [&kets, &bras] {
            if let Some(pair) = group.windows(2).find(|w| w[0] == w[1]) {
                return Err(HilbertError::DuplicateAxis {
                    axis: pair[0].to_string(),
                    context: format_atoms(atoms),
                });
            }
        }
        Ok(Self::from_sorted(kets, bras, field))
    }

    /// Intern a space from already validated, sorted atom lists.
    pub(crate) fn from_sorted(
        kets: Vec<HilbertAtom>,
        bras: Vec<HilbertAtom>,
        field: &BaseField,
    ) -> Self {
        let key = SpaceKey {
            kets,
            bras,
            field: field.kind(),
        };
        let field = field.clone();
        HilbertSpace(SPACES.intern(key, move |k| {
            let axes: Vec<HilbertAtom> = k.kets.iter().chain(k.bras.iter()).cloned().collect();
            let shape = axes.iter().map(HilbertAtom::dim).collect();
            SpaceInner {
                kets: k.kets.clone(),
                bras: k.bras.clone(),
                field,
                axes,
                shape,
                ket_dim: k.kets.iter().map(HilbertAtom::dim).product(),
                bra_dim: k.bras.iter().map(HilbertAtom::dim).product(),
            }
        }))
    }

    /// Tensor product of two spaces.
    ///
    /// Same failure modes as [`HilbertSpace::combine`].
    pub fn product(&self, other: &HilbertSpace) -> Result<Self> {
        self.field().assert_same(other.field())?;
        let atoms: Vec<HilbertAtom> = self.axes().iter().chain(other.axes()).cloned().collect();
        Self::from_atoms(self.field(), &atoms)
    }

    #[inline]
    pub fn kets(&self) -> &[HilbertAtom] {
        &self.0.kets
    }

    #[inline]
    pub fn bras(&self) -> &[HilbertAtom] {
        &self.0.bras
    }

    /// All atoms in canonical axis order.
    #[inline]
    pub fn axes(&self) -> &[HilbertAtom] {
        &self.0.axes
    }

    #[inline]
    pub fn field(&self) -> &BaseField {
        &self.0.field
    }

    /// Dimensions in canonical axis order.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.0.shape
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.axes.len()
    }

    /// Product of all atom dimensions (1 for the scalar space).
    #[inline]
    pub fn dim(&self) -> usize {
        self.0.ket_dim * self.0.bra_dim
    }

    /// Rows of the matrix view.
    #[inline]
    pub fn ket_dim(&self) -> usize {
        self.0.ket_dim
    }

    /// Columns of the matrix view.
    #[inline]
    pub fn bra_dim(&self) -> usize {
        self.0.bra_dim
    }

    /// True for the scalar space.
    pub fn is_empty(&self) -> bool {
        self.0.axes.is_empty()
    }

    pub fn is_ket(&self) -> bool {
        self.0.bras.is_empty()
    }

    pub fn is_bra(&self) -> bool {
        self.0.kets.is_empty()
    }

    /// True when the flipped ket atoms are exactly the bra atoms.
    pub fn is_square(&self) -> bool {
        self.0.kets.len() == self.0.bras.len()
            && self
                .0
                .kets
                .iter()
                .zip(self.0.bras.iter())
                .all(|(k, b)| k.h() == *b)
    }

    pub(crate) fn require_square(&self) -> Result<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(HilbertError::NonSquare {
                space: self.to_string(),
            })
        }
    }

    pub fn contains(&self, atom: &HilbertAtom) -> bool {
        self.axis_of(atom).is_some()
    }

    /// Position of `atom` in the canonical axis order.
    pub fn axis_of(&self, atom: &HilbertAtom) -> Option<usize> {
        self.0.axes.iter().position(|a| a == atom)
    }

    /// Atom with the given label and direction, if any.
    pub fn find(&self, label: &str, direction: Direction) -> Option<&HilbertAtom> {
        let group = match direction {
            Direction::Ket => &self.0.kets,
            Direction::Bra => &self.0.bras,
        };
        group.iter().find(|a| a.label() == label)
    }

    pub fn same_instance(&self, other: &HilbertSpace) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn ket_space(&self) -> HilbertSpace {
        Self::from_sorted(self.0.kets.clone(), Vec::new(), &self.0.field)
    }

    pub fn bra_space(&self) -> HilbertSpace {
        Self::from_sorted(Vec::new(), self.0.bras.clone(), &self.0.field)
    }

    /// The dual space: every ket becomes a bra and vice versa.
    pub fn h(&self) -> HilbertSpace {
        let kets = self.0.bras.iter().map(HilbertAtom::h).collect();
        let bras = self.0.kets.iter().map(HilbertAtom::h).collect();
        Self::from_sorted(kets, bras, &self.0.field)
    }

    /// The operator space: this space's kets times their duals.
    ///
    /// ```
    /// use hilbert_tensor::qubit;
    ///
    /// let a = qubit("a").unwrap();
    /// assert_eq!(a.space().o().to_string(), "|a><a|");
    /// assert!(a.space().o().is_square());
    /// ```
    pub fn o(&self) -> HilbertSpace {
        let bras = self.0.kets.iter().map(HilbertAtom::h).collect();
        Self::from_sorted(self.0.kets.clone(), bras, &self.0.field)
    }

    /// The same atoms moved to another field.
    pub fn with_field(&self, field: &BaseField) -> HilbertSpace {
        if self.field() == field {
            return self.clone();
        }
        let kets = self.0.kets.iter().map(|a| a.with_field(field)).collect();
        let bras = self.0.bras.iter().map(|a| a.with_field(field)).collect();
        Self::from_sorted(kets, bras, field)
    }

    /// This space with the listed atoms removed.
    pub(crate) fn without(&self, atoms: &[HilbertAtom]) -> HilbertSpace {
        let keep = |a: &&HilbertAtom| !atoms.contains(a);
        let kets = self.0.kets.iter().filter(keep).cloned().collect();
        let bras = self.0.bras.iter().filter(keep).cloned().collect();
        Self::from_sorted(kets, bras, &self.0.field)
    }

    /// Coordinate tuples in row-major order over the canonical axes.
    pub fn index_iter(&self) -> IndexIter {
        IndexIter::new(self.shape())
    }

    /// Standard basis arrays, one per coordinate tuple.
    pub fn basis<T: Scalar>(&self) -> Result<BasisIter<T>> {
        self.field().check_scalar::<T>("basis")?;
        Ok(BasisIter::new(self.clone()))
    }

    /// Zero array over this space.
    pub fn zeros<T: Scalar>(&self) -> Result<HilbertArray<T>> {
        HilbertArray::zeros(self)
    }

    /// Array over this space from row-major data.
    pub fn array<T: Scalar>(&self, data: Vec<T>) -> Result<HilbertArray<T>> {
        HilbertArray::new(self, data)
    }

    /// Identity operator.
    ///
    /// # Errors
    ///
    /// `NonSquare` unless the space is square.
    pub fn eye<T: Scalar>(&self) -> Result<HilbertArray<T>> {
        self.require_square()?;
        let mut out = HilbertArray::zeros(self)?;
        let n = self.ket_dim();
        let data = out.data_mut();
        for i in 0..n {
            data[i * n + i] = T::one();
        }
        Ok(out)
    }

    /// Array with a single one at the given canonical coordinates.
    pub fn basis_vec<T: Scalar>(&self, coords: &[usize]) -> Result<HilbertArray<T>> {
        let mut out = HilbertArray::zeros(self)?;
        out.set(coords, T::one())?;
        Ok(out)
    }

    fn key_parts(&self) -> (&[HilbertAtom], &[HilbertAtom], FieldKind) {
        (&self.0.kets, &self.0.bras, self.0.field.kind())
    }
}

fn format_atoms(atoms: &[HilbertAtom]) -> String {
    let parts: Vec<String> = atoms.iter().map(ToString::to_string).collect();
    parts.join(" * ")
}

impl PartialEq for HilbertSpace {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for HilbertSpace {}

impl Hash for HilbertSpace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_parts().hash(state);
    }
}

impl fmt::Display for HilbertSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = |atoms: &[HilbertAtom]| {
            atoms
                .iter()
                .map(HilbertAtom::label)
                .collect::<Vec<_>>()
                .join(",")
        };
        match (self.0.kets.is_empty(), self.0.bras.is_empty()) {
            (true, true) => write!(f, "|>"),
            (false, true) => write!(f, "|{}>", labels(&self.0.kets)),
            (true, false) => write!(f, "<{}|", labels(&self.0.bras)),
            (false, false) => write!(
                f,
                "|{}><{}|",
                labels(&self.0.kets),
                labels(&self.0.bras)
            ),
        }
    }
}

impl fmt::Debug for HilbertSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HilbertSpace({}, shape={:?})", self, self.shape())
    }
}
