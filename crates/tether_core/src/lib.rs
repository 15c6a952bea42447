//! Tether Core
//!
//! Runtime-independent half of the call bridge:
//! - Scalar values and the kind probe order
//! - Argument list packing and unpacking
//! - Host function registry
//! - Error taxonomy and bridge configuration
//!
//! The script engine side lives in `tether_script`, which implements
//! [`ScalarCodec`] for its own value representation.

pub mod config;
pub mod error;
pub mod marshal;
pub mod registry;
pub mod request;
pub mod value;

pub use config::{BridgeConfig, ConfigError};
pub use error::{BridgeError, ErrorKind, RegistrationError};
pub use marshal::{pack, unpack, ArgList};
pub use registry::{HostFn, HostRegistry, ScriptCaller};
pub use request::CallRequest;
pub use value::{classify, Scalar, ScalarCodec, ValueKind, PROBE_ORDER};

/// Bridge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
