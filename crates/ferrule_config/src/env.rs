//! `FERRULE_*` environment overrides.

use std::path::PathBuf;

use crate::types::FerruleConfig;

/// Overrides `extmodule_root`.
pub const EXTMODULE_ROOT_VAR: &str = "FERRULE_EXTMODULE_ROOT";
/// Overrides `cpp_format`.
pub const CPP_FORMAT_VAR: &str = "FERRULE_CPP_FORMAT";
/// Sets `disable_ft` when present, whatever its value.
pub const DISABLE_FT_VAR: &str = "FERRULE_DISABLE_FT";
/// Overrides `python`.
pub const PYTHON_VAR: &str = "FERRULE_PYTHON";
/// Overrides `compiler`.
pub const CXX_VAR: &str = "FERRULE_CXX";

/// Applies overrides from the process environment.
pub fn apply_env(config: FerruleConfig) -> FerruleConfig {
    apply_env_with(config, |var| std::env::var(var).ok())
}

/// Applies overrides using `lookup` to read variables.
pub fn apply_env_with<F>(mut config: FerruleConfig, lookup: F) -> FerruleConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup(EXTMODULE_ROOT_VAR) {
        log::debug!("{EXTMODULE_ROOT_VAR} overrides extmodule_root: {root}");
        config.extmodule_root = PathBuf::from(root);
    }
    if let Some(style) = lookup(CPP_FORMAT_VAR) {
        config.cpp_format = style;
    }
    if lookup(DISABLE_FT_VAR).is_some() {
        config.disable_ft = true;
    }
    if let Some(python) = lookup(PYTHON_VAR) {
        config.python = python;
    }
    if let Some(cxx) = lookup(CXX_VAR) {
        config.compiler = cxx;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(vars: &[(&str, &str)]) -> FerruleConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        apply_env_with(FerruleConfig::default(), |var| vars.get(var).cloned())
    }

    #[test]
    fn no_variables_keep_config() {
        assert_eq!(with(&[]), FerruleConfig::default());
    }

    #[test]
    fn overrides_applied() {
        let config = with(&[
            ("FERRULE_EXTMODULE_ROOT", "/tmp/mods"),
            ("FERRULE_CPP_FORMAT", "none"),
            ("FERRULE_PYTHON", "/usr/bin/python3.13t"),
            ("FERRULE_CXX", "clang++"),
        ]);
        assert_eq!(config.extmodule_root, PathBuf::from("/tmp/mods"));
        assert_eq!(config.format_style(), None);
        assert_eq!(config.python, "/usr/bin/python3.13t");
        assert_eq!(config.compiler, "clang++");
    }

    #[test]
    fn disable_ft_set_by_presence() {
        let config = with(&[("FERRULE_DISABLE_FT", "")]);
        assert!(config.disable_ft);
    }
}
