use thiserror::Error;

/// Classification of a failed cross-runtime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NotCallable,
    ModuleUnavailable,
    MalformedRequest,
    UnsupportedValue,
    ForeignException,
}

/// Errors surfaced to the caller of a cross-runtime call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("function '{name}' does not exist")]
    FunctionNotFound { name: String },

    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    #[error("module '{module}' is unavailable: {reason}")]
    ModuleUnavailable { module: String, reason: String },

    #[error("malformed call request: {reason}")]
    MalformedRequest { reason: String },

    #[error("{}", unsupported_message(.kind, .argument))]
    UnsupportedValueKind {
        kind: String,
        argument: Option<usize>,
    },

    /// A failure raised inside the foreign runtime, carried as its rendered message.
    #[error("{message}")]
    ForeignException { message: String },
}

fn unsupported_message(kind: &str, argument: &Option<usize>) -> String {
    match argument {
        Some(index) => format!(
            "argument list could not be marshaled: argument {index} has unsupported value kind '{kind}'"
        ),
        None => format!("unsupported value kind '{kind}'"),
    }
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::FunctionNotFound { .. } => ErrorKind::NotFound,
            BridgeError::NotCallable { .. } => ErrorKind::NotCallable,
            BridgeError::ModuleUnavailable { .. } => ErrorKind::ModuleUnavailable,
            BridgeError::MalformedRequest { .. } => ErrorKind::MalformedRequest,
            BridgeError::UnsupportedValueKind { .. } => ErrorKind::UnsupportedValue,
            BridgeError::ForeignException { .. } => ErrorKind::ForeignException,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        BridgeError::FunctionNotFound { name: name.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        BridgeError::MalformedRequest {
            reason: reason.into(),
        }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        BridgeError::UnsupportedValueKind {
            kind: kind.into(),
            argument: None,
        }
    }

    pub fn foreign(message: impl Into<String>) -> Self {
        BridgeError::ForeignException {
            message: message.into(),
        }
    }

    /// Attributes an unsupported-kind failure to a position in an argument list.
    ///
    /// Other errors pass through untouched, as does a failure that already names
    /// its argument.
    pub fn at_argument(self, index: usize) -> Self {
        match self {
            BridgeError::UnsupportedValueKind {
                kind,
                argument: None,
            } => BridgeError::UnsupportedValueKind {
                kind,
                argument: Some(index),
            },
            other => other,
        }
    }
}

/// Errors that can occur while registering a host function.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("host function '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("'{name}' is not a valid host function name")]
    InvalidName { name: String },
}
