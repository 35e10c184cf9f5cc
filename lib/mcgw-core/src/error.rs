use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid selector in custom weight {index} of {gateway} ({selector}): {source}")]
    InvalidSelector {
        /// Name of the Gateway whose policy holds the selector
        gateway: String,
        /// Position of the custom weight in the policy
        index: usize,
        /// The selector as written in the policy
        selector: String,
        source: SelectorError,
    },
}

impl CoreError {
    /// Short machine-readable reason, suitable for a status condition
    pub fn reason(&self) -> &'static str {
        match self {
            CoreError::InvalidSelector { .. } => "InvalidSelector",
        }
    }
}

/// Why a label selector could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("{0:?} is not a valid label selector operator")]
    InvalidOperator(String),

    #[error("invalid label key {key:?}: {message}")]
    InvalidKey { key: String, message: String },

    #[error("invalid label value {value:?} for key {key:?}: {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("values for key {0:?} must be non-empty for In and NotIn")]
    MissingValues(String),

    #[error("values for key {0:?} must be empty for Exists and DoesNotExist")]
    UnexpectedValues(String),
}
