//! Process-wide defaults with atomic access.
//!
//! Two knobs are exposed: the comparison tolerance used by approximate
//! equality, real casts and linearity checks, and the base field picked by
//! the `qubit`/`qudit` shorthands.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::error::{HilbertError, Result};
use crate::field::FieldKind;

/// A global default f64 value with atomic access.
///
/// # Example
///
/// ```
/// use hilbert_tensor::config::GlobalDefault;
///
/// static MY_TOL: GlobalDefault = GlobalDefault::new(1e-12);
///
/// assert_eq!(MY_TOL.get(), 1e-12);
/// MY_TOL.set(1e-10).unwrap();
/// assert_eq!(MY_TOL.get(), 1e-10);
/// ```
pub struct GlobalDefault {
    value: AtomicU64,
}

impl GlobalDefault {
    /// Create a new global default with the given initial value.
    #[must_use]
    pub const fn new(initial: f64) -> Self {
        Self {
            value: AtomicU64::new(initial.to_bits()),
        }
    }

    /// Get the current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Set a new value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTolerance` if the value is not finite or is negative.
    pub fn set(&self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(HilbertError::InvalidTolerance(value));
        }
        self.value.store(value.to_bits(), Ordering::Relaxed);
        Ok(())
    }
}

/// Tolerance for approximate comparisons.
pub static DEFAULT_TOLERANCE: GlobalDefault = GlobalDefault::new(1e-12);

static DEFAULT_FIELD: AtomicU8 = AtomicU8::new(FieldKind::Complex as u8);

/// Current comparison tolerance.
pub fn tolerance() -> f64 {
    DEFAULT_TOLERANCE.get()
}

/// Field used by [`crate::atom::qubit`] and [`crate::atom::qudit`].
pub fn default_field_kind() -> FieldKind {
    FieldKind::from_u8(DEFAULT_FIELD.load(Ordering::Relaxed))
}

/// Change the field used by the `qubit`/`qudit` shorthands.
pub fn set_default_field_kind(kind: FieldKind) {
    DEFAULT_FIELD.store(kind as u8, Ordering::Relaxed);
}
