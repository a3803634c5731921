//! Registering host functions and resolving them to compiled symbols.

use std::path::PathBuf;
use std::sync::Arc;

use ferrule_codegen::{FunctionDef, FunctionOptions, RegisteredFunction, Registry, SignatureError};
use ferrule_config::FerruleConfig;

use crate::cache::{BuildCache, LoadedModule};
use crate::error::BuildError;

/// A host function redirected to its compiled counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    /// Dotted import path of the module exporting the function.
    pub import_path: String,
    /// The exported symbol.
    pub symbol: String,
    /// The built extension module.
    pub artifact: PathBuf,
}

/// A module registry paired with the build cache that compiles it.
///
/// Functions are registered up front; compilation is deferred until a
/// function of the module is first resolved.
pub struct Session {
    registry: Registry,
    cache: BuildCache,
}

impl Session {
    /// Creates a session using the configured toolchain.
    pub fn new(config: &FerruleConfig) -> Self {
        Self::with_cache(config, BuildCache::new(config))
    }

    /// Creates a session around an existing cache.
    pub fn with_cache(config: &FerruleConfig, cache: BuildCache) -> Self {
        Self {
            registry: Registry::new(config.free_threading()),
            cache,
        }
    }

    /// The module registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The build cache.
    pub fn cache(&self) -> &BuildCache {
        &self.cache
    }

    /// Adds a function to a module. Nothing is compiled yet.
    pub fn register(
        &self,
        module: &str,
        def: &FunctionDef,
        options: &FunctionOptions,
    ) -> Result<RegisteredFunction, SignatureError> {
        self.registry.register(module, def, options)
    }

    /// Returns the loaded module, building it if this is the first request.
    pub fn module(&self, name: &str) -> Result<Arc<LoadedModule>, BuildError> {
        if let Some(loaded) = self.cache.get_loaded(name) {
            return Ok(loaded);
        }
        let spec = self
            .registry
            .snapshot(name)
            .ok_or_else(|| BuildError::UnknownModule {
                module: name.to_string(),
            })?;
        self.cache.get(name, &spec)
    }

    /// Resolves a registered function to its compiled symbol.
    pub fn resolve(&self, function: &RegisteredFunction) -> Result<CompiledFunction, BuildError> {
        let module = self.module(&function.module)?;
        if module.symbol(&function.name) != Some(function.symbol.as_str()) {
            return Err(BuildError::MissingSymbol {
                module: module.import_path.clone(),
                symbol: function.symbol.clone(),
            });
        }
        log::info!(
            "redirected {}.{} to compiled function {}.{}",
            function.module,
            function.name,
            module.import_path,
            function.symbol
        );
        Ok(CompiledFunction {
            import_path: module.import_path.clone(),
            symbol: function.symbol.clone(),
            artifact: module.artifact.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_module_errors() {
        let session = Session::new(&FerruleConfig::default());
        let err = session.module("nothing").unwrap_err();
        assert!(matches!(err, BuildError::UnknownModule { .. }));
    }

    #[test]
    fn registration_error_surfaces() {
        let session = Session::new(&FerruleConfig::default());
        let def = FunctionDef::parse("f", "(x: Widget) -> int", "return 0;").unwrap();
        assert!(session.register("demo", &def, &FunctionOptions::default()).is_err());
        assert!(session.registry().module_names().is_empty());
    }

    #[test]
    fn free_threading_flows_into_modules() {
        let config = FerruleConfig {
            free_threaded: true,
            ..FerruleConfig::default()
        };
        let session = Session::new(&config);
        let def = FunctionDef::parse("f", "() -> int", "return 0;").unwrap();
        session.register("demo", &def, &FunctionOptions::default()).unwrap();
        let source = session.registry().snapshot("demo").unwrap().make_source("demo");
        assert!(source.text.contains("py::mod_gil_not_used()"));
    }
}
