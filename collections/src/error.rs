use crate::kind::ElementKind;
use thiserror::Error;

/// Failures reported by the range containers.
///
/// All of them are raised synchronously by the offending call and none is recoverable internally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// A required value is missing, not comparable, or the bounds are out of order.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// No default step is registered for this kind of element.
    #[error("unsupported element kind `{0}`: no default step, an explicit step function is required")]
    UnsupportedType(ElementKind),
    /// Mutation attempted on a read-only range.
    #[error("operation `{0}` is not supported by a read-only range")]
    UnsupportedOperation(&'static str),
}

impl RangeError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RangeError::InvalidArgument(_))
    }

    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self, RangeError::UnsupportedOperation(_))
    }
}
