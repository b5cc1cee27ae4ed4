//! Error types for hilbert-tensor.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors that can occur when building spaces or operating on arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HilbertError {
    /// Atom parameters are invalid (empty label, zero dimension).
    #[error("invalid atom {label:?}: {reason}")]
    InvalidAtom { label: String, reason: String },

    /// The same atom appears twice in one space.
    #[error("duplicate axis {axis} in {context}")]
    DuplicateAxis { axis: String, context: String },

    /// Two atoms share label and direction but not dimension.
    #[error("atom {label:?} used with dimensions {first} and {second}")]
    MismatchedDimension {
        label: String,
        first: usize,
        second: usize,
    },

    /// Operands live over different base fields.
    #[error("incompatible base fields: {left:?} vs {right:?}")]
    IncompatibleField { left: FieldKind, right: FieldKind },

    /// Data length doesn't match the size of the space.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Axes matched for contraction or trace have different dimensions.
    #[error("dimension mismatch on {label:?}: {left} vs {right}")]
    DimensionMismatch {
        label: String,
        left: usize,
        right: usize,
    },

    /// A referenced label or atom is not part of the operand's space.
    #[error("label mismatch: {0}")]
    LabelMismatch(String),

    /// Square-only operation applied to a non-square array.
    #[error("operation requires a square space, got {space}")]
    NonSquare { space: String },

    /// Operation is not defined over the array's base field.
    #[error("{op} is not supported over the {field:?} field")]
    UnsupportedField { op: String, field: FieldKind },

    /// Disallowed partial-array addressing.
    #[error("slice usage error: {0}")]
    SliceUsage(String),

    /// Relabeling would produce coinciding axes.
    #[error("relabel collision on axis {0}")]
    Collision(String),

    /// Coordinate out of range.
    #[error("index out of bounds: index {index} is out of range for dimension {dim_size}")]
    IndexOutOfBounds { index: usize, dim_size: usize },

    /// Wrong number of coordinates provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// The numeric backend failed to produce a decomposition.
    #[error("{routine} failed: {message}")]
    Decomposition { routine: String, message: String },

    /// A function handed to a superoperator constructor was not linear.
    #[error("function was not linear (residual {residual:e})")]
    NotLinear { residual: f64 },

    /// A channel constructor was handed a map that is not completely
    /// positive, or a negative weight.
    #[error("map is not completely positive: {0}")]
    NotCompletelyPositive(String),

    /// A channel required to be trace preserving is not.
    #[error("channel is not trace preserving (residual {residual:e})")]
    NotTracePreserving { residual: f64 },

    /// Probability outside `[0, 1]`.
    #[error("invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    /// A list argument that needs at least one element was empty.
    #[error("{0} must not be empty")]
    EmptyInput(String),

    /// Persisted document written by an unsupported format version.
    #[error("unsupported persisted format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    /// Persisted document could not be decoded.
    #[error("persist error: {0}")]
    Persist(String),

    /// Norm order outside `[1, inf]` (or `(0, inf]` for Schatten norms).
    #[error("invalid norm order {0}")]
    InvalidNormOrder(f64),

    /// Invalid configuration value.
    #[error("invalid tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),
}

impl HilbertError {
    /// True for the errors raised while constructing atoms, spaces or arrays.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            HilbertError::InvalidAtom { .. }
                | HilbertError::DuplicateAxis { .. }
                | HilbertError::MismatchedDimension { .. }
                | HilbertError::IncompatibleField { .. }
                | HilbertError::ShapeMismatch { .. }
        )
    }

    pub(crate) fn unsupported(op: &str, field: FieldKind) -> Self {
        HilbertError::UnsupportedField {
            op: op.to_string(),
            field,
        }
    }

    pub(crate) fn decomposition(routine: &str, err: impl std::fmt::Debug) -> Self {
        HilbertError::Decomposition {
            routine: routine.to_string(),
            message: format!("{:?}", err),
        }
    }
}

impl From<serde_json::Error> for HilbertError {
    fn from(err: serde_json::Error) -> Self {
        HilbertError::Persist(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HilbertError>;
