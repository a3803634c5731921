//! Ferrule CLI: translate annotated stubs into pybind11 modules.
//!
//! Provides `ferrule type` and `ferrule sig` for inspecting translations,
//! `ferrule source` for printing the module generated from a stub manifest,
//! and `ferrule build` for building it through the module cache.

#![warn(missing_docs)]

mod build;
mod manifest;
mod sig;
mod source;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ferrule_config::FerruleConfig;

/// Ferrule: compiled C++ implementations for annotated host functions.
#[derive(Parser, Debug)]
#[command(name = "ferrule", version, about = "Ferrule pybind11 module builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing `ferrule.toml` (default: current directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a single type annotation.
    Type {
        /// Annotation text, e.g. `dict[str, list[float]]`.
        annotation: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Translate a function signature.
    Sig(SigArgs),
    /// Print the module source generated from a stub manifest.
    Source(ManifestArgs),
    /// Build the module described by a stub manifest.
    Build(ManifestArgs),
}

/// Arguments for the `ferrule sig` subcommand.
#[derive(Parser, Debug)]
pub struct SigArgs {
    /// Signature text, e.g. `(a: int, *, b: bool = True) -> float`.
    pub signature: String,

    /// Function name used in error messages.
    #[arg(short, long, default_value = "f")]
    pub name: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for subcommands reading a stub manifest.
#[derive(Parser, Debug)]
pub struct ManifestArgs {
    /// Path to the stub manifest (TOML).
    pub manifest: PathBuf,

    /// Module name (default: the manifest's `module` key, else its file stem).
    #[arg(short, long)]
    pub module: Option<String>,
}

/// Output format for translation reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional directory holding `ferrule.toml`.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// The log level implied by the flags. `RUST_LOG` overrides it.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Loads `ferrule.toml` from `--config`, or the current directory.
    pub fn load_config(&self) -> Result<FerruleConfig, Box<dyn std::error::Error>> {
        let dir = match &self.config {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        log::debug!("loading configuration from {}", dir.display());
        Ok(ferrule_config::load_config(&dir)?)
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_level()))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Type { ref annotation, format } => sig::run_type(annotation, format),
        Command::Sig(ref args) => sig::run(args),
        Command::Source(ref args) => source::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
