//! Base fields: the scalar domains array entries live in.
//!
//! A [`BaseField`] is interned per [`FieldKind`], so two lookups of the same
//! kind hand back the same instance and compare equal by identity. The kind
//! is resolved once at construction; arrays check their element type against
//! it instead of inspecting values at each call.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{HilbertError, Result};
use crate::intern::Interner;
use crate::scalar::{Scalar, c64};

/// Scalar domain selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FieldKind {
    /// Real floating point (`f64`).
    Real = 0,
    /// Complex floating point (`c64`).
    Complex = 1,
}

impl FieldKind {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => FieldKind::Real,
            _ => FieldKind::Complex,
        }
    }
}

#[derive(Debug)]
struct FieldInner {
    kind: FieldKind,
}

static FIELDS: LazyLock<Interner<FieldKind, FieldInner>> =
    LazyLock::new(|| Interner::new("fields"));

/// An interned scalar domain.
#[derive(Clone)]
pub struct BaseField(Arc<FieldInner>);

impl BaseField {
    /// Return the cached field for `kind`.
    ///
    /// # Example
    ///
    /// ```
    /// use hilbert_tensor::{BaseField, FieldKind};
    ///
    /// let a = BaseField::lookup(FieldKind::Complex);
    /// let b = BaseField::lookup(FieldKind::Complex);
    /// assert!(a.same_instance(&b));
    /// ```
    pub fn lookup(kind: FieldKind) -> Self {
        BaseField(FIELDS.intern(kind, |&kind| FieldInner { kind }))
    }

    /// The real field.
    pub fn real() -> Self {
        Self::lookup(FieldKind::Real)
    }

    /// The complex field.
    pub fn complex() -> Self {
        Self::lookup(FieldKind::Complex)
    }

    /// The field currently configured as default.
    pub fn default_field() -> Self {
        Self::lookup(config::default_field_kind())
    }

    /// The field for element type `T`.
    pub fn of<T: Scalar>() -> Self {
        Self::lookup(T::KIND)
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.0.kind
    }

    #[inline]
    pub fn is_real(&self) -> bool {
        self.0.kind == FieldKind::Real
    }

    /// Whether exact symbolic simplification is available.
    ///
    /// No symbolic backend ships with this crate, so this is false for every
    /// field.
    pub fn supports_symbolic(&self) -> bool {
        false
    }

    /// Pointer identity of the interned instance.
    pub fn same_instance(&self, other: &BaseField) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Fail with `IncompatibleField` unless both fields are the same.
    pub fn assert_same(&self, other: &BaseField) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(HilbertError::IncompatibleField {
                left: self.kind(),
                right: other.kind(),
            })
        }
    }

    /// Fail with `UnsupportedField` unless `T` is this field's element type.
    pub fn check_scalar<T: Scalar>(&self, op: &str) -> Result<()> {
        if T::KIND == self.kind() {
            Ok(())
        } else {
            Err(HilbertError::unsupported(op, self.kind()))
        }
    }

    pub fn zero<T: Scalar>(&self) -> Result<T> {
        self.check_scalar::<T>("zero")?;
        Ok(T::zero())
    }

    pub fn one<T: Scalar>(&self) -> Result<T> {
        self.check_scalar::<T>("one")?;
        Ok(T::one())
    }

    pub fn conj<T: Scalar>(&self, x: T) -> T {
        x.conjugate()
    }

    /// Cast a complex value into this field's element type.
    ///
    /// Fails with `UnsupportedField` when `T` doesn't belong to this field,
    /// or when the field is real and `z` has a non-negligible imaginary part.
    pub fn cast<T: Scalar>(&self, z: c64) -> Result<T> {
        self.check_scalar::<T>("cast")?;
        T::try_from_c64(z, config::tolerance()).ok_or_else(|| {
            HilbertError::unsupported(&format!("cast of {}{:+}i", z.re, z.im), self.kind())
        })
    }

    /// The imaginary unit.
    pub fn complex_unit(&self) -> Result<c64> {
        if self.is_real() {
            return Err(HilbertError::unsupported("complex_unit", self.kind()));
        }
        Ok(c64::new(0.0, 1.0))
    }

    /// `exp(2 pi i a / n)`.
    ///
    /// On the real field only the phases `+1` and `-1` are available.
    pub fn fractional_phase(&self, a: i64, n: usize) -> Result<c64> {
        let n = n.max(1) as i64;
        let k = a.rem_euclid(n);
        if self.is_real() {
            return if k == 0 {
                Ok(c64::new(1.0, 0.0))
            } else if 2 * k == n {
                Ok(c64::new(-1.0, 0.0))
            } else {
                Err(HilbertError::unsupported("fractional_phase", self.kind()))
            };
        }
        // exact values on the real and imaginary axes
        Ok(match (4 * k) % n {
            0 => match 4 * k / n {
                0 => c64::new(1.0, 0.0),
                1 => c64::new(0.0, 1.0),
                2 => c64::new(-1.0, 0.0),
                _ => c64::new(0.0, -1.0),
            },
            _ => {
                let theta = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                c64::new(theta.cos(), theta.sin())
            }
        })
    }
}

impl PartialEq for BaseField {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for BaseField {}

impl Hash for BaseField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
    }
}

impl fmt::Debug for BaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseField({:?})", self.kind())
    }
}

impl fmt::Display for BaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            FieldKind::Real => write!(f, "real"),
            FieldKind::Complex => write!(f, "complex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_is_memoized() {
        let a = BaseField::lookup(FieldKind::Real);
        let b = BaseField::real();
        assert!(a.same_instance(&b));
        assert_eq!(a, b);
        assert_ne!(a, BaseField::complex());
    }

    #[test]
    fn test_assert_same() {
        assert!(BaseField::real().assert_same(&BaseField::real()).is_ok());
        let err = BaseField::real()
            .assert_same(&BaseField::complex())
            .unwrap_err();
        assert!(matches!(err, HilbertError::IncompatibleField { .. }));
    }

    #[test]
    fn test_cast() {
        let real = BaseField::real();
        assert_eq!(real.cast::<f64>(c64::new(1.5, 0.0)).unwrap(), 1.5);
        assert!(matches!(
            real.cast::<f64>(c64::new(1.5, 1.0)),
            Err(HilbertError::UnsupportedField { .. })
        ));
        assert!(real.cast::<c64>(c64::new(1.0, 0.0)).is_err());

        let complex = BaseField::complex();
        assert_eq!(
            complex.cast::<c64>(c64::new(1.5, 1.0)).unwrap(),
            c64::new(1.5, 1.0)
        );
    }

    #[test]
    fn test_complex_unit() {
        assert_eq!(
            BaseField::complex().complex_unit().unwrap(),
            c64::new(0.0, 1.0)
        );
        assert!(BaseField::real().complex_unit().is_err());
    }

    #[test]
    fn test_fractional_phase() {
        let f = BaseField::complex();
        assert_eq!(f.fractional_phase(1, 4).unwrap(), c64::new(0.0, 1.0));
        assert_eq!(f.fractional_phase(2, 4).unwrap(), c64::new(-1.0, 0.0));
        assert_eq!(f.fractional_phase(-1, 4).unwrap(), c64::new(0.0, -1.0));

        let t = f.fractional_phase(1, 8).unwrap();
        assert_relative_eq!(t.re, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(t.im, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);

        let r = BaseField::real();
        assert_eq!(r.fractional_phase(1, 2).unwrap(), c64::new(-1.0, 0.0));
        assert!(r.fractional_phase(1, 4).is_err());
    }

    #[test]
    fn test_no_symbolic_backend() {
        assert!(!BaseField::real().supports_symbolic());
        assert!(!BaseField::complex().supports_symbolic());
    }
}
