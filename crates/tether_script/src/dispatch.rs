//! Call dispatch in both directions
//!
//! Each direction runs the same steps: validate the envelope, resolve the
//! callable, marshal the arguments, invoke exactly once, check for a failure,
//! convert the result. Any step that fails ends the call; nothing before the
//! invocation step has side effects in the callee, and nothing is retried.

use crate::convert::JsCodec;
use crate::exception;
use crate::host::ContextCaller;
use crate::resolve::{self, ScriptModule};
use rquickjs::function::Rest;
use rquickjs::{Ctx, Value};
use tether_core::{marshal, BridgeError, CallRequest, HostRegistry, Scalar, ScalarCodec};

/// Host → script: calls an export of `module` inside an entered context.
pub fn call_script<'js>(
    ctx: &Ctx<'js>,
    module: &ScriptModule,
    request: &CallRequest,
) -> Result<Scalar, BridgeError> {
    request.validate()?;
    tracing::debug!(
        function = %request.function,
        arity = request.arguments.len(),
        "dispatching call into script"
    );

    let function = resolve::resolve_export(ctx, module, &request.function)?;
    let codec = JsCodec::new(ctx);
    let arguments = marshal::pack(&codec, &request.arguments)?;

    let returned = function.call::<_, Value<'js>>((Rest(arguments.into_vec()),));
    let value = exception::settle(ctx, returned).map_err(|err| {
        tracing::warn!(function = %request.function, error = %err, "script raised an exception");
        err
    })?;

    codec.from_foreign(&value)
}

/// Script → host: handles `host.call(name, ...args)`.
///
/// `arguments` is the raw JS argument list; the first element names the host
/// function. The caller throws any returned error into the script.
pub fn call_host<'js>(
    ctx: &Ctx<'js>,
    registry: &HostRegistry,
    module: &ScriptModule,
    arguments: Vec<Value<'js>>,
) -> Result<Value<'js>, BridgeError> {
    let (name, arguments) = parse_envelope(arguments)?;
    tracing::debug!(function = %name, arity = arguments.len(), "dispatching call into host");

    let function = registry.resolve(&name)?;
    let codec = JsCodec::new(ctx);
    let arguments = marshal::unpack(&codec, &arguments)?;

    let caller = ContextCaller::new(ctx, module);
    match function(&caller, &arguments) {
        Ok(value) => codec.to_foreign(&value),
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(function = %name, error = %message, "host function failed");
            Err(BridgeError::foreign(message))
        }
    }
}

/// Invokes a registered host function from the host side, with script re-entry
/// available to it, the same way a script call would.
pub fn invoke_host<'js>(
    ctx: &Ctx<'js>,
    registry: &HostRegistry,
    module: &ScriptModule,
    request: &CallRequest,
) -> Result<Scalar, BridgeError> {
    request.validate()?;
    let function = registry.resolve(&request.function)?;
    let caller = ContextCaller::new(ctx, module);
    function(&caller, &request.arguments).map_err(|err| BridgeError::foreign(format!("{err:#}")))
}

/// Splits `[name, ...args]`, checking that the name is a string.
fn parse_envelope<'js>(
    mut arguments: Vec<Value<'js>>,
) -> Result<(String, Vec<Value<'js>>), BridgeError> {
    if arguments.is_empty() {
        return Err(BridgeError::malformed("missing function name"));
    }

    let rest = arguments.split_off(1);
    let name = arguments
        .pop()
        .and_then(|value| value.as_string().and_then(|name| name.to_string().ok()))
        .ok_or_else(|| BridgeError::malformed("function name must be a string"))?;
    tether_core::request::validate_function_name(&name)?;

    Ok((name, rest))
}
