//! Exception bridge
//!
//! QuickJS keeps one pending-exception slot per context. Whoever observes
//! `rquickjs::Error::Exception` takes the value out of that slot with
//! [`Ctx::catch`] before doing anything else with the engine, so a stale
//! exception can never be picked up by an unrelated call.

use rquickjs::convert::Coerced;
use rquickjs::{Ctx, Error, Exception, Value};
use tether_core::BridgeError;

/// Message used when the thrown value cannot be rendered.
pub const UNPRINTABLE: &str = "<unprintable exception>";

/// Converts the result of a call into the script into a bridge result.
///
/// On failure the pending exception is drained and rendered into
/// `BridgeError::ForeignException`; no result value survives.
pub fn settle<'js, T>(ctx: &Ctx<'js>, result: rquickjs::Result<T>) -> Result<T, BridgeError> {
    result.map_err(|err| translate(ctx, err))
}

/// Maps an engine error onto the bridge taxonomy, draining the exception slot if needed.
pub fn translate<'js>(ctx: &Ctx<'js>, err: Error) -> BridgeError {
    BridgeError::foreign(describe_error(ctx, err))
}

/// Renders an engine error. A thrown exception is taken out of the context.
pub fn describe_error<'js>(ctx: &Ctx<'js>, err: Error) -> String {
    match err {
        Error::Exception => {
            let thrown = ctx.catch();
            describe_thrown(ctx, &thrown)
        }
        other => other.to_string(),
    }
}

/// Renders a thrown value: `Name: message` for error objects, the text of a
/// thrown string, or the value's `toString()` for anything else.
pub fn describe_thrown<'js>(ctx: &Ctx<'js>, thrown: &Value<'js>) -> String {
    if let Some(exception) = thrown.as_exception() {
        return describe_exception(exception);
    }

    if let Some(text) = thrown.as_string() {
        if let Ok(text) = text.to_string() {
            return text;
        }
    }

    match thrown.get::<Coerced<String>>() {
        Ok(Coerced(text)) => text,
        Err(err) => {
            if matches!(err, Error::Exception) {
                // toString() threw; drop that exception as well
                let _ = ctx.catch();
            }
            UNPRINTABLE.to_string()
        }
    }
}

fn describe_exception(exception: &Exception<'_>) -> String {
    let message = exception.message().unwrap_or_default();
    let name = exception
        .get::<_, Option<String>>("name")
        .ok()
        .flatten()
        .unwrap_or_default();

    match (name.is_empty(), message.is_empty()) {
        (false, false) => format!("{name}: {message}"),
        (false, true) => name,
        (true, false) => message,
        (true, true) => UNPRINTABLE.to_string(),
    }
}

/// Throws a generic `Error` carrying `message` into the script.
///
/// The returned error must be handed back to the engine unchanged so it picks
/// up the pending exception.
pub fn raise_in_script<'js>(ctx: &Ctx<'js>, message: &str) -> Error {
    tracing::debug!(%message, "raising host failure in script");
    Exception::throw_message(ctx, message)
}
