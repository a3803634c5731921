//! Module checksums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// XXH3-128 digest of a generated module source.
///
/// The hex form is what gets compiled into a module as its `__checksum__`
/// string: a later run reads that string back out of the built artifact and
/// compares it with the digest of the source it would generate now. Equal
/// digests mean the artifact can be reused as is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Digest of raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data).to_le_bytes())
    }

    /// Digest of a source text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Compares against a checksum read back from a built module.
    ///
    /// The value usually arrives as a line of process output, so surrounding
    /// whitespace is ignored.
    pub fn matches_hex(&self, hex: &str) -> bool {
        hex.trim() == self.to_string()
    }
}

/// 32 lowercase hex digits.
impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_string();
        write!(f, "ContentHash({}..)", &hex[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_source_same_checksum() {
        let a = ContentHash::from_text("int f() { return 1; }");
        let b = ContentHash::from_text("int f() { return 1; }");
        assert_eq!(a, b);
        assert_eq!(a, ContentHash::from_bytes(b"int f() { return 1; }"));
    }

    #[test]
    fn changed_body_changes_checksum() {
        let a = ContentHash::from_text("return 1;");
        let b = ContentHash::from_text("return 2;");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_form() {
        let s = ContentHash::from_text("module").to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn matches_checksum_line() {
        let h = ContentHash::from_text("module");
        assert!(h.matches_hex(&format!("{h}\n")));
        assert!(!h.matches_hex(&h.to_string().to_uppercase()));
        assert!(!h.matches_hex("deadbeef"));
    }

    #[test]
    fn debug_shows_prefix() {
        let h = ContentHash::from_text("x");
        let s = format!("{h:?}");
        assert_eq!(s, format!("ContentHash({}..)", &h.to_string()[..8]));
    }

    #[test]
    fn serializes_through_json() {
        let h = ContentHash::from_text("serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
