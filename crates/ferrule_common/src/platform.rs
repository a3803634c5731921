//! Operating-system selection for platform-specific build settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A host platform that settings can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Linux.
    Linux,
    /// macOS.
    Darwin,
    /// Windows.
    Windows,
}

impl Platform {
    /// Returns the platform this binary was built for, if it is one we know.
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else if cfg!(target_os = "macos") {
            Some(Platform::Darwin)
        } else if cfg!(target_os = "windows") {
            Some(Platform::Windows)
        } else {
            None
        }
    }
}

/// Returns the entry for the running platform, if one was given.
pub fn platform_specific<T>(settings: &BTreeMap<Platform, T>) -> Option<&T> {
    settings.get(&Platform::current()?)
}
