//! Extractor trait
//!
//! Narrow seam for pulling a single scalar string out of a structured
//! response body. The concrete query language is an implementation detail of
//! the extractor, not part of the engine's contract.

use async_trait::async_trait;

/// Trait for structured-data extraction strategies
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract the first scalar string the query yields from `payload`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: the first yielded string, or an empty string when the
    ///   query matched nothing (callers decide whether that is acceptable)
    /// - `Err(Error)`: empty payload/query, malformed payload, invalid query,
    ///   evaluation failure or timeout, or a non-string first result
    async fn extract(&self, payload: &[u8], query: &str) -> Result<String, crate::Error>;
}
