//! Content hashing for edit bases
//!
//! [`ContentHash`] identifies the exact text an edit was computed from, so
//! the I/O layer can detect that a file changed between read and replace.

use std::fmt::{self, Display, Formatter};

/// A 32-byte Blake3 hash of file text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Hash text
    #[inline]
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        Self::compute(text.as_bytes())
    }

    /// First 16 hex chars, for log lines
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_is_deterministic() {
        assert_eq!(
            ContentHash::of_text("drinks:\n"),
            ContentHash::of_text("drinks:\n")
        );
        assert_ne!(
            ContentHash::of_text("drinks:\n"),
            ContentHash::of_text("drinks:")
        );
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ContentHash::of_text("fav = lemonade");
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with(&hash.short()));
        assert_eq!(hash.short().len(), 16);
    }

    #[test]
    fn bom_is_part_of_hashed_text() {
        assert_ne!(
            ContentHash::of_text("\u{feff}a:\n"),
            ContentHash::of_text("a:\n")
        );
    }
}
