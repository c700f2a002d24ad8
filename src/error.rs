//! Error types for filter conditions

use thiserror::Error;

/// Errors raised while building or decoding conditions.
///
/// Simplification and evaluation never fail; only validation and the
/// serialized form report errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Non-comparable value: {0}")]
    NonComparable(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Deserialization(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<FilterError> for pyo3::PyErr {
    fn from(err: FilterError) -> pyo3::PyErr {
        use pyo3::exceptions::PyValueError;

        match err {
            FilterError::InvalidCondition(msg) => {
                PyValueError::new_err(format!("Invalid condition: {}", msg))
            }
            FilterError::NonComparable(msg) => {
                PyValueError::new_err(format!("Non-comparable value: {}", msg))
            }
            FilterError::Deserialization(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
        }
    }
}

/// Result type alias for filter conditions
pub type Result<T> = std::result::Result<T, FilterError>;
