//! The per-process build cache.
//!
//! Each module name goes through `unchecked -> missing | stale | fresh ->
//! loaded` at most once per process. The first request does the work; every
//! later request, from any thread, gets the same [`LoadedModule`] back. A
//! failed request leaves the module unchecked so a later request retries.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use ferrule_common::ContentHash;
use ferrule_codegen::{GeneratedSource, ModuleSpec, CHECKSUM_ATTRIBUTE};
use ferrule_config::FerruleConfig;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::BuildError;
use crate::format::{format_or_original, ClangFormat, Formatter};
use crate::includes::{resolve_or_warn, IncludeResolver, PythonIncludes};
use crate::layout::ModuleLayout;
use crate::probe::{ArtifactLoader, IsolatedCheck, ModuleLoader, PythonCheck};
use crate::toolchain::{CommandToolchain, CompileRequest, Toolchain};

/// What the staleness check found before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// No built module was found; it was built.
    Missing,
    /// A built module had a different checksum; it was rebuilt.
    Stale,
    /// A built module had the current checksum and was reused.
    Fresh,
}

impl ModuleState {
    /// Returns `true` if the module was compiled during this request.
    pub fn was_built(self) -> bool {
        !matches!(self, ModuleState::Fresh)
    }
}

/// A module that has been checked, built if needed, and loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    /// The module name.
    pub name: String,
    /// Dotted import path.
    pub import_path: String,
    /// The built extension module.
    pub artifact: PathBuf,
    /// Checksum of the module source, as embedded in the module.
    pub checksum: ContentHash,
    /// What the staleness check found.
    pub state: ModuleState,
    /// Exported symbol for each host function name.
    pub symbols: IndexMap<String, String>,
}

impl LoadedModule {
    /// The exported symbol for a host function, if the module has it.
    pub fn symbol(&self, function: &str) -> Option<&str> {
        self.symbols.get(function).map(String::as_str)
    }
}

type Slot = Arc<OnceCell<Arc<LoadedModule>>>;

/// Checks, builds and loads modules, remembering each loaded module for the
/// rest of the process.
pub struct BuildCache {
    root: PathBuf,
    ext_suffix: String,
    include_dirs: Vec<PathBuf>,
    format_style: Option<String>,
    toolchain: Arc<dyn Toolchain>,
    check: Arc<dyn IsolatedCheck>,
    loader: Arc<dyn ModuleLoader>,
    formatter: Arc<dyn Formatter>,
    loaded: Mutex<HashMap<String, Slot>>,
}

impl BuildCache {
    /// Creates a cache backed by the configured compiler, interpreter and
    /// formatter.
    ///
    /// The interpreter is asked once for the pybind11 and numpy include
    /// directories.
    pub fn new(config: &FerruleConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(CommandToolchain::new(&config.compiler, &config.ext_suffix)),
            Arc::new(PythonCheck::new(&config.python, &config.extmodule_root)),
            Arc::new(ArtifactLoader),
            Arc::new(ClangFormat::new(&config.formatter)),
        )
        .with_include_resolver(&PythonIncludes::new(&config.python))
    }

    /// Creates a cache with explicit backends.
    pub fn with_backends(
        config: &FerruleConfig,
        toolchain: Arc<dyn Toolchain>,
        check: Arc<dyn IsolatedCheck>,
        loader: Arc<dyn ModuleLoader>,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        Self {
            root: config.extmodule_root.clone(),
            ext_suffix: config.ext_suffix.clone(),
            include_dirs: config.include_dirs.clone(),
            format_style: config.format_style().map(str::to_string),
            toolchain,
            check,
            loader,
            formatter,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Puts the resolver's directories ahead of the configured ones. A failed
    /// resolution is logged and adds nothing.
    pub fn with_include_resolver(mut self, resolver: &dyn IncludeResolver) -> Self {
        let mut include_dirs = resolve_or_warn(resolver);
        include_dirs.append(&mut self.include_dirs);
        self.include_dirs = include_dirs;
        self
    }

    /// The on-disk layout of a module.
    pub fn layout(&self, name: &str) -> ModuleLayout {
        ModuleLayout::new(&self.root, name, &self.ext_suffix)
    }

    /// Returns the loaded module, checking and building it on first request.
    ///
    /// `spec` is only consulted the first time a module is requested
    /// successfully; afterwards the remembered module is returned as is.
    /// Concurrent first requests block until one of them finishes.
    pub fn get(&self, name: &str, spec: &ModuleSpec) -> Result<Arc<LoadedModule>, BuildError> {
        let slot = Arc::clone(self.loaded.lock().entry(name.to_string()).or_default());
        slot.get_or_try_init(|| self.check_build_load(name, spec).map(Arc::new))
            .map(Arc::clone)
    }

    /// Returns the module if it has already been loaded in this process.
    pub fn get_loaded(&self, name: &str) -> Option<Arc<LoadedModule>> {
        self.loaded.lock().get(name).and_then(|slot| slot.get().cloned())
    }

    fn check_build_load(&self, name: &str, spec: &ModuleSpec) -> Result<LoadedModule, BuildError> {
        let layout = self.layout(name);
        let source = spec.make_source(name);

        let state = self.state(&layout, &source);
        if state.was_built() {
            self.rebuild(&layout, &source, spec)?;
        }

        self.loader
            .load(&layout.import_path, &layout.artifact)
            .map_err(|reason| BuildError::Load {
                module: layout.import_path.clone(),
                reason,
            })?;
        log::info!("imported compiled module {}", layout.import_path);

        let symbols = spec
            .functions()
            .iter()
            .map(|f| (f.name.clone(), f.qualified_name()))
            .collect();
        Ok(LoadedModule {
            name: name.to_string(),
            import_path: layout.import_path,
            artifact: layout.artifact,
            checksum: source.hash,
            state,
            symbols,
        })
    }

    fn state(&self, layout: &ModuleLayout, source: &GeneratedSource) -> ModuleState {
        let hash = source.hash_hex();
        match self.check.check_attribute(&layout.import_path, CHECKSUM_ATTRIBUTE) {
            Ok(Some(found)) if source.hash.matches_hex(&found) => {
                log::info!("module is up-to-date ({hash})");
                ModuleState::Fresh
            }
            Ok(Some(found)) => {
                log::info!("module is outdated ({hash}, found {})", found.trim());
                ModuleState::Stale
            }
            Ok(None) => {
                log::info!("module {} not found", layout.import_path);
                ModuleState::Missing
            }
            Err(e) => {
                log::warn!("checksum check for {} failed, rebuilding: {e}", layout.import_path);
                ModuleState::Missing
            }
        }
    }

    fn rebuild(
        &self,
        layout: &ModuleLayout,
        source: &GeneratedSource,
        spec: &ModuleSpec,
    ) -> Result<(), BuildError> {
        log::info!("(re)building module {}", layout.import_path);
        std::fs::create_dir_all(&layout.dir).map_err(BuildError::io(&layout.dir))?;

        let text = format_or_original(
            self.formatter.as_ref(),
            source.stamped(),
            self.format_style.as_deref(),
        );
        std::fs::write(&layout.source, text).map_err(BuildError::io(&layout.source))?;
        log::info!("wrote {}", layout.source.display());

        let mut include_dirs = self.include_dirs.clone();
        include_dirs.extend(spec.include_paths().iter().map(PathBuf::from));
        let request = CompileRequest {
            module: layout.name.clone(),
            working_dir: layout.dir.clone(),
            sources: vec![layout.source.clone()],
            log: layout.log.clone(),
            macros: spec.macros(),
            include_dirs,
            compile_args: spec.compile_args().iter().cloned().collect(),
            link_args: spec.link_args().iter().cloned().collect(),
            cxx_std: spec.cxx_std(),
        };
        self.toolchain
            .compile(&request)
            .map_err(|failure| BuildError::Compilation {
                module: layout.import_path.clone(),
                diagnostics: failure.output,
            })?;

        self.loader.invalidate_cache();
        log::info!("built {}", layout.import_path);
        Ok(())
    }
}
