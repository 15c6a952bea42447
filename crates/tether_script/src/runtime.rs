//! Script runtime management
//!
//! Owns the QuickJS runtime and its single context. Module sources are handed
//! over up front and served by the builtin resolver/loader pair, so an import
//! of any other name fails inside the engine.

use rquickjs::loader::{BuiltinLoader, BuiltinResolver};
use rquickjs::{Context, Runtime};

/// Script execution context
pub struct ScriptRuntime {
    #[allow(dead_code)] // Kept alive for context lifetime
    runtime: Runtime,
    pub context: Context,
}

impl ScriptRuntime {
    pub fn new<'a, I>(modules: I) -> rquickjs::Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let runtime = Runtime::new()?;

        let (resolver, loader) = modules.into_iter().fold(
            (BuiltinResolver::default(), BuiltinLoader::default()),
            |(resolver, loader), (name, source)| {
                (resolver.with_module(name), loader.with_module(name, source))
            },
        );
        runtime.set_loader(resolver, loader);

        let context = Context::full(&runtime)?;
        Ok(Self { runtime, context })
    }
}
