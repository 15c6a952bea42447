//! Host access from scripts
//!
//! Installs the global host object (`host.call(name, ...args)`) and provides
//! the [`ScriptCaller`] handed to host functions for nested calls.

use crate::dispatch;
use crate::exception;
use crate::resolve::ScriptModule;
use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Value};
use std::rc::Rc;
use tether_core::{BridgeError, CallRequest, HostRegistry, Scalar, ScriptCaller};

/// Script re-entry through a context that is already entered.
pub struct ContextCaller<'a, 'js> {
    ctx: &'a Ctx<'js>,
    module: &'a ScriptModule,
}

impl<'a, 'js> ContextCaller<'a, 'js> {
    pub fn new(ctx: &'a Ctx<'js>, module: &'a ScriptModule) -> Self {
        Self { ctx, module }
    }
}

impl ScriptCaller for ContextCaller<'_, '_> {
    fn call_script(&self, request: &CallRequest) -> Result<Scalar, BridgeError> {
        dispatch::call_script(self.ctx, self.module, request)
    }
}

/// Defines the global `object_name` with a `call` method bound to `registry`.
pub fn install<'js>(
    ctx: &Ctx<'js>,
    object_name: &str,
    module: Rc<ScriptModule>,
    registry: Rc<HostRegistry>,
) -> rquickjs::Result<()> {
    let call = Function::new(
        ctx.clone(),
        move |ctx: Ctx<'js>, arguments: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
            dispatch::call_host(&ctx, &registry, &module, arguments.0)
                .map_err(|err| exception::raise_in_script(&ctx, &err.to_string()))
        },
    )?;

    let host = Object::new(ctx.clone())?;
    host.set("call", call)?;
    ctx.globals().set(object_name, host)?;

    tracing::debug!(object = object_name, "installed host object");
    Ok(())
}
