//! Array operations.
//!
//! Each submodule adds an `impl<T: Scalar> HilbertArray<T>` block:
//!
//! ```text
//! elementwise  arithmetic operators, scaling, conjugation
//! norm         entry-wise norms
//! permutedims  transpose, adjoint, relabel
//! slice        addressing by (atom, index) pairs
//! trace        full and partial traces
//! measure      basis-outcome sampling
//! ```

mod elementwise;
mod measure;
mod norm;
mod permutedims;
mod slice;
mod trace;
