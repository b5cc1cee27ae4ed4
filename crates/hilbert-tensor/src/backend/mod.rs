//! Numeric backend glue.
//!
//! Arrays store their elements row-major over canonical axes, so the buffer
//! of an array over `|kets><bras|` already is the `(ket_dim x bra_dim)`
//! matrix view. This module copies such buffers in and out of faer's
//! column-major matrices.

mod faer_interop;

pub(crate) use faer_interop::{mat_from_row_major, matmul_row_major, row_major_from_mat};
