//! Content fingerprints for revalidating build results without regenerating code.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

/// A 128-bit content hash computed using XXH3.
///
/// Providers hand the hex rendering of this hash to the result cache as their
/// revalidation string. Two artifacts with the same `ContentHash` are assumed
/// to produce identical code units.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the first eight hex characters, used to make synthetic
    /// assembly names unique.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental hasher for artifacts assembled from several inputs
/// (a template plus every file it includes).
pub struct Fingerprinter {
    state: Xxh3,
}

impl Fingerprinter {
    /// Creates an empty fingerprinter.
    pub fn new() -> Self {
        Self { state: Xxh3::new() }
    }

    /// Feeds a chunk of input into the fingerprint.
    pub fn update(&mut self, data: &[u8]) {
        // Length prefix keeps ("ab", "c") distinct from ("a", "bc").
        self.state.update(&(data.len() as u64).to_le_bytes());
        self.state.update(data);
    }

    /// Returns the fingerprint of everything fed so far.
    pub fn finish(&self) -> ContentHash {
        ContentHash(self.state.digest128().to_le_bytes())
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}
