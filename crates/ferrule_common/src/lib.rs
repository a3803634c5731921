//! Shared foundational types used across the ferrule code generator.
//!
//! This crate provides content hashing for the build cache, order-preserving
//! deduplication for aggregated build options, and platform selection for
//! platform-specific settings.

#![warn(missing_docs)]

pub mod dedup;
pub mod hash;
pub mod platform;

pub use dedup::dedup;
pub use hash::ContentHash;
pub use platform::{platform_specific, Platform};
