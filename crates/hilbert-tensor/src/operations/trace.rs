//! Full and partial traces.

use tracing::debug;

use crate::array::HilbertArray;
use crate::atom::HilbertAtom;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;

impl<T: Scalar> HilbertArray<T> {
    /// Sum over matched ket/bra pairs of the listed atoms.
    ///
    /// Atoms may be given in either direction.
    ///
    /// # Errors
    ///
    /// `LabelMismatch` unless each atom is present both as ket and bra.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    ///
    /// let a = qubit("a").unwrap();
    /// let b = qubit("b").unwrap();
    /// let rho = a.space().product(&b.space()).unwrap().o().eye::<c64>().unwrap();
    /// let reduced = rho.trace(&[b]).unwrap();
    /// assert_eq!(reduced.space(), &a.o());
    /// assert_eq!(reduced.get(&[0, 0]).unwrap(), c64::new(2.0, 0.0));
    /// ```
    pub fn trace(&self, over: &[HilbertAtom]) -> Result<Self> {
        let mut kets: Vec<HilbertAtom> = Vec::with_capacity(over.len());
        for atom in over {
            let ket = atom.as_ket();
            if !self.space().contains(&ket) || !self.space().contains(&ket.h()) {
                return Err(HilbertError::LabelMismatch(format!(
                    "{} is not a ket/bra pair of {}",
                    ket.label(),
                    self.space()
                )));
            }
            if !kets.contains(&ket) {
                kets.push(ket);
            }
        }
        let bras: Vec<HilbertAtom> = kets.iter().map(HilbertAtom::h).collect();

        let traced: Vec<HilbertAtom> = kets.iter().chain(bras.iter()).cloned().collect();
        let remaining = self.space().without(&traced);
        debug!(space = %self.space(), result = %remaining, "partial trace");

        let order: Vec<HilbertAtom> = remaining
            .axes()
            .iter()
            .chain(traced.iter())
            .cloned()
            .collect();
        let data = self.data_along(&order);

        let t: usize = kets.iter().map(HilbertAtom::dim).product();
        let block = t * t;
        let out = data
            .chunks_exact(block)
            .map(|chunk| {
                (0..t).fold(T::zero(), |acc, i| acc + chunk[i * t + i])
            })
            .collect();
        Ok(Self::from_parts(remaining, out))
    }

    /// Scalar trace of a square array.
    ///
    /// # Errors
    ///
    /// `NonSquare` unless the ket and bra atoms mirror each other.
    pub fn trace_full(&self) -> Result<T> {
        self.space().require_square()?;
        let n = self.space().ket_dim();
        Ok((0..n).fold(T::zero(), |acc, i| acc + self.data()[i * n + i]))
    }
}
