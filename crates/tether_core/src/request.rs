//! Call request envelope

use crate::{BridgeError, Scalar};
use serde::{Deserialize, Serialize};

/// A named function plus its arguments, in the caller's representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub function: String,
    #[serde(default)]
    pub arguments: Vec<Scalar>,
}

impl CallRequest {
    pub fn new(function: impl Into<String>, arguments: Vec<Scalar>) -> Self {
        Self {
            function: function.into(),
            arguments,
        }
    }

    /// Request with no arguments.
    pub fn named(function: impl Into<String>) -> Self {
        Self::new(function, Vec::new())
    }

    /// Checks the envelope itself. Argument values are checked later, during marshaling.
    pub fn validate(&self) -> Result<(), BridgeError> {
        validate_function_name(&self.function)
    }
}

/// A function name must be non-empty and free of whitespace and NUL bytes.
pub fn validate_function_name(name: &str) -> Result<(), BridgeError> {
    if name.is_empty() {
        return Err(BridgeError::malformed("function name is empty"));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '\0') {
        return Err(BridgeError::malformed(format!(
            "function name {name:?} contains whitespace or NUL"
        )));
    }
    Ok(())
}
