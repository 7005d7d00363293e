use sha2::{Digest, Sha256};
use std::time::Instant;

// Cached model answer with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub answer: String,
    pub created_at: Instant,
}

// Create a cache key (hash of model + question)
pub fn make_cache_key(model: &str, question: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model);
    hasher.update(question);
    format!("{:x}", hasher.finalize())
}
