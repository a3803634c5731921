//! `ferrule source`: print the module generated from a stub manifest.

use std::path::Path;

use ferrule_codegen::{GeneratedSource, Registry};

use crate::manifest::StubManifest;
use crate::{GlobalArgs, ManifestArgs};

/// Runs `ferrule source`.
///
/// The stamped source goes to stdout and its checksum to stderr, so the
/// output can be redirected straight into a `.cpp` file.
pub fn run(args: &ManifestArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let (module, source) = generate(&args.manifest, args.module.as_deref(), config.free_threading())?;

    print!("{}", source.stamped());
    if !global.quiet {
        eprintln!("   Module {module}: checksum {}", source.hash_hex());
    }
    Ok(0)
}

/// Registers every manifest function into a fresh registry and generates the
/// module source.
pub(crate) fn generate(
    manifest_path: &Path,
    module: Option<&str>,
    free_threaded: bool,
) -> Result<(String, GeneratedSource), Box<dyn std::error::Error>> {
    let manifest = StubManifest::load(manifest_path)?;
    let module = manifest.module_name(module, manifest_path)?;

    let registry = Registry::new(free_threaded);
    for (def, options) in manifest.definitions()? {
        registry.register(&module, &def, &options)?;
    }
    let spec = registry
        .snapshot(&module)
        .ok_or_else(|| format!("manifest {} defines no functions", manifest_path.display()))?;
    Ok((module.clone(), spec.make_source(&module)))
}
