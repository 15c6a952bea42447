//! Tether Script Side
//!
//! JavaScript half of the call bridge, running on QuickJS.
//!
//! ## Architecture
//!
//! - **Host → script:** the well-known module is evaluated once when the bridge
//!   is built, and the requested export is called with packed arguments
//!   ([`dispatch::call_script`]). Calls never run queued promise jobs.
//! - **Script → host:** scripts call `host.call(name, ...args)`, which looks the
//!   name up in the [`tether_core::HostRegistry`] ([`dispatch::call_host`]).
//! - **Exceptions:** a pending JS exception is drained and returned as
//!   `BridgeError::ForeignException`; a host error is thrown into JS as an `Error`.
//!
//! Nested calls in either direction reuse the context that is already entered.

pub mod bridge;
pub mod convert;
pub mod dispatch;
pub mod exception;
pub mod host;
pub mod resolve;
pub mod runtime;

pub use bridge::{Bridge, BridgeBuilder, SetupError};
pub use convert::JsCodec;

pub use rquickjs;
