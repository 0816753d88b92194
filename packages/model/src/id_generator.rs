use crc32fast::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};

// Process-wide counter so generators seeded with the same document name
// still mint distinct ids.
static NEXT_COUNT: AtomicU64 = AtomicU64::new(1);

/// Stable document identifier derived from the document name using CRC32.
pub fn document_id(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Node id generator: `<crc32(seed)>-<n>`.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: document_id(name),
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed }
    }

    /// Generate the next unique id.
    pub fn new_id(&mut self) -> String {
        let count = NEXT_COUNT.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.seed, count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
