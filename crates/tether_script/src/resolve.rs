//! Callable lookup by module attribute
//!
//! Three checks, in order, each with its own failure:
//! the module must be loaded, the export must exist, and it must be a function.
//!
//! The module is evaluated once when the bridge is built. Its namespace is kept
//! so that calls never drive the engine's job queue; exports are still looked up
//! on every call.

use crate::exception;
use rquickjs::{Ctx, Function, Module, Object, Persistent, Value};
use std::cell::RefCell;
use tether_core::BridgeError;

enum ModuleState {
    Unloaded,
    Loaded(Persistent<Object<'static>>),
    Unavailable(String),
}

/// The well-known script module and its evaluated namespace.
pub struct ScriptModule {
    name: String,
    state: RefCell<ModuleState>,
}

impl ScriptModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RefCell::new(ModuleState::Unloaded),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Imports and evaluates the module, keeping its namespace or the reason it
    /// failed. Jobs queued by the module body run here, before any call.
    pub fn load(&self, ctx: &Ctx<'_>) {
        let state = match import_module(ctx, &self.name) {
            Ok(namespace) => ModuleState::Loaded(Persistent::save(ctx, namespace)),
            Err(reason) => {
                tracing::warn!(module = %self.name, %reason, "script module unavailable");
                ModuleState::Unavailable(reason)
            }
        };
        // No borrow across the import: the module body may call into the host.
        *self.state.borrow_mut() = state;
    }

    /// Drops the saved namespace. Must run before the engine runtime is freed.
    pub fn release(&self) {
        *self.state.borrow_mut() = ModuleState::Unloaded;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.borrow(), ModuleState::Loaded(_))
    }

    pub fn namespace<'js>(&self, ctx: &Ctx<'js>) -> Result<Object<'js>, BridgeError> {
        let saved = match &*self.state.borrow() {
            ModuleState::Loaded(namespace) => namespace.clone(),
            ModuleState::Unavailable(reason) => return Err(self.unavailable(reason.clone())),
            ModuleState::Unloaded => return Err(self.unavailable("module is not loaded".into())),
        };
        saved
            .restore(ctx)
            .map_err(|err| self.unavailable(exception::describe_error(ctx, err)))
    }

    fn unavailable(&self, reason: String) -> BridgeError {
        BridgeError::ModuleUnavailable {
            module: self.name.clone(),
            reason,
        }
    }
}

fn import_module<'js>(ctx: &Ctx<'js>, module: &str) -> Result<Object<'js>, String> {
    Module::import(ctx, module)
        .and_then(|promise| promise.finish::<Object<'js>>())
        .map_err(|err| exception::describe_error(ctx, err))
}

/// Resolves `name` to a callable export of `module`.
pub fn resolve_export<'js>(
    ctx: &Ctx<'js>,
    module: &ScriptModule,
    name: &str,
) -> Result<Function<'js>, BridgeError> {
    let namespace = module.namespace(ctx)?;

    let present = exception::settle(ctx, namespace.contains_key(name))?;
    if !present {
        return Err(BridgeError::not_found(name));
    }

    let export: Value<'js> = exception::settle(ctx, namespace.get(name))?;
    export.into_function().ok_or_else(|| BridgeError::NotCallable {
        name: name.to_string(),
    })
}
