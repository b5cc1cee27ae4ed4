//! hilbert-tensor - labeled tensors for finite dimensional quantum mechanics
//!
//! Arrays live over a [`HilbertSpace`], a set of labeled ket and bra axes
//! ([`HilbertAtom`]s). Axes are addressed by atom rather than by position,
//! and contraction pairs a bra of one array with the matching ket of the
//! other, so products, traces and transposes follow bra-ket notation.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Interned values (field, atom, space)
//!     → structural equality, process-wide caches
//!
//! Level 2: Arrays (array, operations, contract, decomposition)
//!     → row-major buffers over canonical axis order
//!
//! Level 3: Backend (backend module)
//!     → faer matrices for gemm, eigen, SVD and LU
//!
//! Factories: circuits, group, random, superop, channel
//! ```
//!
//! # Example
//!
//! ```
//! use hilbert_tensor::{c64, circuits, qubit};
//!
//! let a = qubit("a").unwrap();
//! let b = qubit("b").unwrap();
//!
//! // |00> -> (|00> + |11>)/sqrt(2)
//! let zero = a.space().product(&b.space()).unwrap().basis_vec::<c64>(&[0, 0]).unwrap();
//! let h = circuits::hadamard::<c64>(&a).unwrap();
//! let cnot = circuits::cnot::<c64>(&a, &b).unwrap();
//! let bell = (&cnot * &(&h * &zero).unwrap()).unwrap();
//!
//! let rho = (&bell * &bell.adjoint()).unwrap();
//! let reduced = rho.trace(&[b]).unwrap();
//! assert!((reduced.get(&[0, 0]).unwrap().re - 0.5).abs() < 1e-12);
//! ```

pub mod array;
pub mod atom;
pub(crate) mod backend;
pub mod channel;
pub mod circuits;
pub mod config;
pub mod contract;
pub mod decomposition;
pub mod error;
pub mod field;
pub mod group;
mod intern;
pub mod iter;
pub mod operations;
pub mod persist;
pub mod random;
pub mod render;
pub mod scalar;
pub mod space;
pub mod strides;
pub mod superop;

pub use array::HilbertArray;
pub use atom::{Direction, HilbertAtom, qubit, qudit};
pub use channel::{CpMap, Environment};
pub use contract::ContractionPlan;
pub use decomposition::SvdResult;
pub use error::{HilbertError, Result};
pub use field::{BaseField, FieldKind};
pub use iter::{BasisIter, IndexIter};
pub use random::{RandomNormal, RandomUniform};
pub use scalar::{Scalar, c64};
pub use space::HilbertSpace;
pub use superop::Superoperator;
