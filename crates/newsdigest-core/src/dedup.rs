//! Title fingerprints and the per-run set of already seen items.
//!
//! The key is the title alone: two outlets publishing the same headline for
//! different stories collapse into one item. Link and source are not part of
//! the digest.

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

/// SHA-256 digest of an item's title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Fingerprint the exact bytes of a title. No normalization is applied.
pub fn compute_fingerprint(title: &str) -> Fingerprint {
    let digest = Sha256::digest(title.as_bytes());
    Fingerprint(digest.into())
}

/// Fingerprints seen during one collection run
#[derive(Debug, Default)]
pub struct SeenSet {
    seen: Mutex<HashSet<Fingerprint>>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and record in one step.
    ///
    /// Returns `true` when the fingerprint was already recorded (the set is
    /// left unchanged). Otherwise records it and returns `false`. The lock is
    /// held across both steps, so concurrent callers with the same fingerprint
    /// see exactly one `false`.
    pub fn is_duplicate_and_record(&self, fingerprint: Fingerprint) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        !seen.insert(fingerprint)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
