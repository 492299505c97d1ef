// # JSON Extraction Engine
//
// This crate provides the structured-data extraction strategy for the
// address detection system.
//
// ## Purpose
//
// Third-party IP services frequently return JSON rather than a bare address
// (e.g. `{"ip": "1.2.3.4"}` from ipify's JSON endpoint). The detector hands
// such payloads here together with a configured query expression and gets
// back a single scalar string.
//
// ## Contract
//
// `extract(payload, query)`:
// - empty payload / empty query fail explicitly
// - the payload must parse as JSON
// - the query must compile as a dot-path expression (see `query` module)
// - evaluation runs under a bounded time budget (3 seconds)
// - only the first yielded value is taken; a path that matches nothing
//   returns an empty string; a first value that is not a JSON string is an
//   error, never silently coerced

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use pubip_core::traits::Extractor;
use pubip_core::{Error, Result};

mod query;

pub use query::Query;

/// Time budget for a single query evaluation
const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Extraction strategy over JSON payloads using dot-path queries
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExtractor;

impl JsonExtractor {
    /// Create a new JSON extractor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for JsonExtractor {
    async fn extract(&self, payload: &[u8], query: &str) -> Result<String> {
        if payload.is_empty() {
            return Err(Error::EmptyPayload);
        }
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let document: Value = serde_json::from_slice(payload)?;
        let compiled = Query::compile(query)?;

        tracing::debug!(query = %query, "evaluating query against JSON payload");

        // The walk is cheap, but evaluation still runs off the async thread
        // under a hard deadline so a pathological document cannot stall the
        // detection cycle. On timeout the blocking task is not aborted; it
        // finishes in the background, bounded by one linear pass over the
        // document. A query language with loops or recursion would need a
        // cooperative deadline check inside the walk instead.
        let result = tokio::time::timeout(
            QUERY_TIMEOUT,
            tokio::task::spawn_blocking(move || compiled.first(&document)),
        )
        .await
        .map_err(|_| Error::QueryTimeout)?
        .map_err(|err| Error::query_eval(format!("query evaluation aborted: {err}")))??;

        match result {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(Error::non_scalar(other.to_string())),
            None => Ok(String::new()),
        }
    }
}
