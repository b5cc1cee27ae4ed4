//! Linear algebra on the matrix view.
//!
//! Every routine here reads an array as the `(ket_dim x bra_dim)` matrix
//! its buffer already is, hands it to faer, and wraps the result back into
//! a labeled array. Square-only routines require the ket and bra atoms to
//! mirror each other and fail with `NonSquare` otherwise.
//!
//! | routine                                  | backend                      |
//! |------------------------------------------|------------------------------|
//! | `eig_hermitian`, `eigvals_hermitian`     | `self_adjoint_eigen`         |
//! | `eig`, `eigvals`, `det`                  | `eigen`                      |
//! | `svd`, `singular_values`, `pinv`, norms  | `Svd::new_thin`              |
//! | `expm`                                   | Padé [13/13] or eigen        |
//! | `logm`, `sqrtm`                          | eigen + LU                   |
//! | `inverse`                                | `partial_piv_lu`             |

mod eigen;
mod exp;
mod functions;
mod inverse;
mod svd;
mod util;

pub use svd::SvdResult;
