use crate::request::validate_function_name;
use crate::{BridgeError, CallRequest, RegistrationError, Scalar};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Re-entry point into the script runtime, handed to every host function.
///
/// Calls made through it run on the current call stack, inside the engine
/// context that invoked the host function.
pub trait ScriptCaller {
    fn call_script(&self, request: &CallRequest) -> Result<Scalar, BridgeError>;
}

/// A host function callable from scripts by name.
pub type HostFn = Rc<dyn Fn(&dyn ScriptCaller, &[Scalar]) -> anyhow::Result<Scalar>>;

/// Host functions registered ahead of time under string names.
#[derive(Clone, Default)]
pub struct HostRegistry {
    functions: HashMap<String, HostFn>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> Result<(), RegistrationError>
    where
        F: Fn(&dyn ScriptCaller, &[Scalar]) -> anyhow::Result<Scalar> + 'static,
    {
        let name = name.into();
        if validate_function_name(&name).is_err() {
            return Err(RegistrationError::InvalidName { name });
        }
        if self.functions.contains_key(&name) {
            return Err(RegistrationError::DuplicateName { name });
        }

        tracing::debug!(function = %name, "registered host function");
        self.functions.insert(name, Rc::new(function));
        Ok(())
    }

    /// Looks a function up by its registered name.
    pub fn resolve(&self, name: &str) -> Result<HostFn, BridgeError> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("HostRegistry").field("functions", &names).finish()
    }
}
