//! Bridge assembly and the host-facing call API

use crate::convert::JsCodec;
use crate::resolve::ScriptModule;
use crate::runtime::ScriptRuntime;
use crate::{dispatch, exception, host};
use rquickjs::Value;
use std::path::PathBuf;
use std::rc::Rc;
use tether_core::request::validate_function_name;
use tether_core::{BridgeConfig, BridgeError, CallRequest, HostRegistry, Scalar, ScalarCodec};
use thiserror::Error;

/// Errors that can occur while assembling a bridge.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to start script engine: {0}")]
    Engine(#[from] rquickjs::Error),

    #[error("failed to read module source {}: {source}", .path.display())]
    ModuleSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install host object '{name}': {reason}")]
    HostObject { name: String, reason: String },
}

/// Collects configuration, module sources and host functions before the engine starts.
pub struct BridgeBuilder {
    config: BridgeConfig,
    modules: Vec<(String, String)>,
    registry: HostRegistry,
}

impl BridgeBuilder {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            modules: Vec::new(),
            registry: HostRegistry::new(),
        }
    }

    /// Serves `name` from in-memory source. Takes precedence over the search paths.
    pub fn module(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.modules.push((name.into(), source.into()));
        self
    }

    pub fn with_registry(mut self, registry: HostRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<Bridge, SetupError> {
        let Self {
            config,
            mut modules,
            registry,
        } = self;

        if let Err(err) = validate_function_name(&config.host_object) {
            return Err(SetupError::HostObject {
                name: config.host_object.clone(),
                reason: err.to_string(),
            });
        }

        if !modules.iter().any(|(name, _)| *name == config.module) {
            match config.locate_module() {
                Some(path) => {
                    let source = std::fs::read_to_string(&path).map_err(|source| {
                        SetupError::ModuleSource {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    tracing::info!(module = %config.module, path = %path.display(), "loaded script module");
                    modules.push((config.module.clone(), source));
                }
                None => tracing::warn!(
                    module = %config.module,
                    search_paths = ?config.search_paths,
                    "script module not found; calls into the script will fail"
                ),
            }
        }

        let runtime = ScriptRuntime::new(
            modules
                .iter()
                .map(|(name, source)| (name.as_str(), source.as_str())),
        )?;

        let registry = Rc::new(registry);
        let module = Rc::new(ScriptModule::new(config.module.as_str()));
        runtime
            .context
            .with(|ctx| -> rquickjs::Result<()> {
                host::install(
                    &ctx,
                    &config.host_object,
                    Rc::clone(&module),
                    Rc::clone(&registry),
                )?;
                module.load(&ctx);
                Ok(())
            })
            .map_err(|err| SetupError::HostObject {
                name: config.host_object.clone(),
                reason: err.to_string(),
            })?;

        tracing::info!(
            module = %config.module,
            host_object = %config.host_object,
            host_functions = registry.len(),
            module_loaded = module.is_loaded(),
            "bridge ready"
        );

        Ok(Bridge {
            runtime,
            config,
            registry,
            module,
        })
    }
}

/// A host process bridged to one script engine.
///
/// Single-threaded: every call blocks until the callee returns or raises.
pub struct Bridge {
    runtime: ScriptRuntime,
    config: BridgeConfig,
    registry: Rc<HostRegistry>,
    module: Rc<ScriptModule>,
}

impl Bridge {
    pub fn builder(config: BridgeConfig) -> BridgeBuilder {
        BridgeBuilder::new(config)
    }

    /// Calls an export of the configured module.
    pub fn call_script(&self, request: &CallRequest) -> Result<Scalar, BridgeError> {
        self.runtime
            .context
            .with(|ctx| dispatch::call_script(&ctx, &self.module, request))
    }

    /// Calls a registered host function with script re-entry available, the
    /// way `host.call` does from inside a script.
    pub fn call_host(&self, request: &CallRequest) -> Result<Scalar, BridgeError> {
        self.runtime.context.with(|ctx| {
            dispatch::invoke_host(&ctx, &self.registry, &self.module, request)
        })
    }

    /// Evaluates a global script and converts its completion value.
    pub fn eval(&self, source: &str) -> Result<Scalar, BridgeError> {
        self.runtime.context.with(|ctx| {
            let value = exception::settle(&ctx, ctx.eval::<Value, _>(source))?;
            JsCodec::new(&ctx).from_foreign(&value)
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        // The host object shares the module; its saved namespace must go
        // before the runtime does.
        self.module.release();
    }
}
