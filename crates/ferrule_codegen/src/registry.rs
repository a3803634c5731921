//! The table of modules being assembled in this process.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::error::SignatureError;
use crate::function::{FunctionDef, FunctionOptions, FunctionSpec};
use crate::module::ModuleSpec;

/// A function accepted into a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredFunction {
    /// The module the function was added to.
    pub module: String,
    /// The host function name.
    pub name: String,
    /// The symbol to look up in the built module.
    pub symbol: String,
}

/// Modules keyed by name, shared by every registration in the process.
///
/// Create one at startup and pass it to whatever registers functions.
#[derive(Debug, Default)]
pub struct Registry {
    modules: Mutex<IndexMap<String, ModuleSpec>>,
    free_threaded: bool,
}

impl Registry {
    /// Creates an empty registry. New modules inherit `free_threaded`.
    pub fn new(free_threaded: bool) -> Self {
        Self {
            modules: Mutex::new(IndexMap::new()),
            free_threaded,
        }
    }

    /// Translates a function and appends it to `module`.
    ///
    /// Translation finishes before the module is touched, so a function that
    /// fails to translate leaves the module exactly as it was.
    pub fn register(
        &self,
        module: &str,
        def: &FunctionDef,
        options: &FunctionOptions,
    ) -> Result<RegisteredFunction, SignatureError> {
        let (spec, headers) = FunctionSpec::translate(def, options)?;
        let registered = RegisteredFunction {
            module: module.to_string(),
            name: spec.name.clone(),
            symbol: spec.qualified_name(),
        };
        log::debug!("registering {module}_ext.{module}.{}", registered.name);

        self.modules
            .lock()
            .entry(module.to_string())
            .or_insert_with(|| ModuleSpec::new(self.free_threaded))
            .add_function(spec, headers, options);
        Ok(registered)
    }

    /// A copy of the module's current state.
    pub fn snapshot(&self, module: &str) -> Option<ModuleSpec> {
        self.modules.lock().get(module).cloned()
    }

    /// Names of all modules with at least one function, in creation order.
    pub fn module_names(&self) -> Vec<String> {
        self.modules.lock().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn def(name: &str, sig: &str) -> FunctionDef {
        FunctionDef::parse(name, sig, "return 0;").unwrap()
    }

    #[test]
    fn register_creates_module() {
        let registry = Registry::new(false);
        let f = registry
            .register("demo", &def("f", "(x: int) -> int"), &FunctionOptions::default())
            .unwrap();
        assert_eq!(f.module, "demo");
        assert_eq!(f.symbol, "_f");
        assert_eq!(registry.module_names(), vec!["demo"]);
        assert_eq!(registry.snapshot("demo").unwrap().functions().len(), 1);
        assert!(registry.snapshot("other").is_none());
    }

    #[test]
    fn failed_registration_leaves_module_untouched() {
        let registry = Registry::new(false);
        let options = FunctionOptions::default();
        registry.register("demo", &def("f", "(x: int) -> int"), &options).unwrap();
        let before = registry.snapshot("demo").unwrap();

        let bad = FunctionOptions {
            extra_includes: vec!["<vector>".to_string()],
            compile_args: vec!["-O3".to_string()],
            ..FunctionOptions::default()
        };
        let err = registry
            .register("demo", &def("g", "(x: list[Widget]) -> int"), &bad)
            .unwrap_err();
        assert!(matches!(err, SignatureError::Type { .. }));
        assert_eq!(registry.snapshot("demo").unwrap(), before);

        registry.register("demo", &def("h", "(x: str) -> int"), &options).unwrap();
        let after = registry.snapshot("demo").unwrap();
        let names: Vec<&str> = after.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f", "h"]);
    }

    #[test]
    fn failed_first_registration_creates_nothing() {
        let registry = Registry::new(false);
        assert!(registry
            .register("demo", &def("g", "(x: Widget) -> int"), &FunctionOptions::default())
            .is_err());
        assert!(registry.module_names().is_empty());
    }

    #[test]
    fn modules_inherit_free_threading() {
        let registry = Registry::new(true);
        registry
            .register("demo", &def("f", "() -> int"), &FunctionOptions::default())
            .unwrap();
        assert!(registry.snapshot("demo").unwrap().free_threaded());
    }

    #[test]
    fn concurrent_registration() {
        let registry = Arc::new(Registry::new(false));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .register("demo", &def(&format!("f{i}"), "() -> int"), &FunctionOptions::default())
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.snapshot("demo").unwrap().functions().len(), 8);
    }
}
