//! Error types for the attention-state classifier
//!
//! The classifier can fail in exactly one way: it was handed a value it
//! cannot reason about. The error works in `no_std` environments and
//! carries the offending field and value without allocating.

use core::fmt;

use serde::Serialize;

/// Errors raised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClassifyError {
    /// A band power or classifier parameter is negative, NaN or infinite
    InvalidInput {
        /// Band name or parameter name
        field: &'static str,
        /// The rejected value
        value: f64,
    },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, value } => {
                write!(f, "Invalid input: {field} = {value} (must be finite and >= 0)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClassifyError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = ClassifyError::InvalidInput { field: "Delta", value: -1.0 };
        let text = std::format!("{err}");
        assert!(text.contains("Delta"));
        assert!(text.contains("-1"));
    }
}
