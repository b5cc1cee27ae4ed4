//! Versioned JSON documents for spaces and arrays.
//!
//! Every document carries a `format_version` field. It is read on its own
//! before the rest of the document, so a document from another version is
//! reported as `UnsupportedFormat` rather than as a decoding error.
//!
//! ```
//! use hilbert_tensor::{c64, qubit};
//! use hilbert_tensor::persist::{self, Persist};
//!
//! let a = qubit("a").unwrap();
//! let x = a.o().eye::<c64>().unwrap();
//! let json = persist::to_json(&x).unwrap();
//! let back: hilbert_tensor::HilbertArray<c64> = persist::from_json(&json).unwrap();
//! assert_eq!(back, x);
//! assert!(back.space().same_instance(x.space()));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::array::HilbertArray;
use crate::atom::{Direction, HilbertAtom};
use crate::config;
use crate::error::{HilbertError, Result};
use crate::field::{BaseField, FieldKind};
use crate::scalar::{Scalar, c64};
use crate::space::HilbertSpace;

/// Version written by this crate and the only one it reads.
pub const FORMAT_VERSION: u32 = 2;

/// Types with a JSON document form.
pub trait Persist: Sized {
    /// Encode as a JSON document.
    fn to_json(&self) -> Result<String>;

    /// Decode a JSON document, re-interning atoms and spaces.
    fn from_json(json: &str) -> Result<Self>;
}

/// Encode `value` as a JSON document.
pub fn to_json<P: Persist>(value: &P) -> Result<String> {
    value.to_json()
}

/// Decode a JSON document.
pub fn from_json<P: Persist>(json: &str) -> Result<P> {
    P::from_json(json)
}

#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}

#[derive(Serialize, Deserialize)]
struct AtomDoc {
    label: String,
    dim: usize,
    direction: Direction,
}

#[derive(Serialize, Deserialize)]
struct SpaceBody {
    field: FieldKind,
    atoms: Vec<AtomDoc>,
}

#[derive(Serialize, Deserialize)]
struct SpaceDoc {
    format_version: u32,
    #[serde(flatten)]
    space: SpaceBody,
}

#[derive(Serialize, Deserialize)]
struct ArrayDoc {
    format_version: u32,
    space: SpaceBody,
    /// `[re, im]` per element, row-major over the canonical axes.
    data: Vec<[f64; 2]>,
}

fn check_version(json: &str) -> Result<()> {
    let header: VersionHeader = serde_json::from_str(json)?;
    if header.format_version != FORMAT_VERSION {
        return Err(HilbertError::UnsupportedFormat {
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(())
}

impl SpaceBody {
    fn of(space: &HilbertSpace) -> Self {
        Self {
            field: space.field().kind(),
            atoms: space
                .axes()
                .iter()
                .map(|a| AtomDoc {
                    label: a.label().to_string(),
                    dim: a.dim(),
                    direction: a.direction(),
                })
                .collect(),
        }
    }

    fn build(&self) -> Result<HilbertSpace> {
        let field = BaseField::lookup(self.field);
        let atoms = self
            .atoms
            .iter()
            .map(|a| HilbertAtom::new(a.label.clone(), a.dim, a.direction, &field))
            .collect::<Result<Vec<_>>>()?;
        HilbertSpace::from_atoms(&field, &atoms)
    }
}

impl Persist for HilbertSpace {
    fn to_json(&self) -> Result<String> {
        let doc = SpaceDoc {
            format_version: FORMAT_VERSION,
            space: SpaceBody::of(self),
        };
        Ok(serde_json::to_string(&doc)?)
    }

    fn from_json(json: &str) -> Result<Self> {
        check_version(json)?;
        let doc: SpaceDoc = serde_json::from_str(json)?;
        let space = doc.space.build()?;
        debug!(space = %space, "loaded space");
        Ok(space)
    }
}

impl<T: Scalar> Persist for HilbertArray<T> {
    /// # Errors
    ///
    /// `Persist` if an entry is NaN or infinite; JSON has no encoding for
    /// them.
    fn to_json(&self) -> Result<String> {
        if let Some(pos) = self
            .data()
            .iter()
            .position(|x| !x.re_part().is_finite() || !x.im_part().is_finite())
        {
            return Err(HilbertError::Persist(format!(
                "non-finite entry at flat index {pos} of {}",
                self.space()
            )));
        }
        let doc = ArrayDoc {
            format_version: FORMAT_VERSION,
            space: SpaceBody::of(self.space()),
            data: self.data().iter().map(|x| [x.re_part(), x.im_part()]).collect(),
        };
        Ok(serde_json::to_string(&doc)?)
    }

    fn from_json(json: &str) -> Result<Self> {
        check_version(json)?;
        let doc: ArrayDoc = serde_json::from_str(json)?;
        let space = doc.space.build()?;
        space.field().check_scalar::<T>("load")?;
        let tol = config::tolerance();
        let data = doc
            .data
            .iter()
            .map(|&[re, im]| {
                T::try_from_c64(c64::new(re, im), tol)
                    .ok_or_else(|| HilbertError::unsupported("load", space.field().kind()))
            })
            .collect::<Result<Vec<T>>>()?;
        debug!(space = %space, len = data.len(), "loaded array");
        HilbertArray::new(&space, data)
    }
}
