//! `ferrule build`: compile a stub manifest through the module cache.

use ferrule_build::{ModuleState, Session};

use crate::manifest::StubManifest;
use crate::{GlobalArgs, ManifestArgs};

/// Runs `ferrule build`.
///
/// Registers every function in the manifest, then resolves each one. The
/// first resolution builds the module (or reuses an up-to-date artifact);
/// later ones hit the in-process cache.
pub fn run(args: &ManifestArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let manifest = StubManifest::load(&args.manifest)?;
    let module = manifest.module_name(args.module.as_deref(), &args.manifest)?;
    let definitions = manifest.definitions()?;
    if definitions.is_empty() {
        return Err(format!("manifest {} defines no functions", args.manifest.display()).into());
    }

    let session = Session::new(&config);
    let mut registered = Vec::with_capacity(definitions.len());
    for (def, options) in &definitions {
        registered.push(session.register(&module, def, options)?);
    }

    let mut compiled = Vec::with_capacity(registered.len());
    for function in &registered {
        compiled.push(session.resolve(function)?);
    }

    let loaded = session.module(&module)?;
    if !global.quiet {
        eprintln!(
            "   {} {} ({})",
            state_label(loaded.state),
            loaded.import_path,
            loaded.artifact.display()
        );
        for function in &compiled {
            eprintln!("     {}.{}", function.import_path, function.symbol);
        }
    }
    println!("{}", loaded.artifact.display());
    Ok(0)
}

/// A short verb describing what happened to the module.
fn state_label(state: ModuleState) -> &'static str {
    match state {
        ModuleState::Missing => "Built",
        ModuleState::Stale => "Rebuilt",
        ModuleState::Fresh => "Up-to-date",
    }
}
