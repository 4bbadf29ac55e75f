//! Request fingerprints and the latest-request-wins guard.
//!
//! Overlapping calls that feed the same display slot (a user switching
//! listing tabs quickly, say) can complete out of order. [`LatestOnly`]
//! hands out increasing generations so a slow, superseded response is
//! dropped instead of overwriting newer data.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fingerprint of one catalog request: endpoint path plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestKey {
    /// Creates a key for `path` relative to the API root.
    #[must_use]
    pub fn new(path: &str, query: &[(&str, String)]) -> Self {
        Self {
            path: String::from(path),
            query: query
                .iter()
                .map(|(k, v)| (String::from(*k), v.clone()))
                .collect(),
        }
    }

    /// Endpoint path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Proof that a request was started at a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    key: RequestKey,
}

impl Ticket {
    /// Generation this ticket was issued at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Request this ticket belongs to.
    #[must_use]
    pub const fn key(&self) -> &RequestKey {
        &self.key
    }
}

/// Generation counter for one display slot.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LatestOnly {
    current: Arc<AtomicU64>,
}

impl LatestOnly {
    /// Creates a guard with no request started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding every earlier ticket.
    #[must_use]
    pub fn begin(&self, key: RequestKey) -> Ticket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        Ticket { generation, key }
    }

    /// Whether no request has started since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.generation
    }

    /// Runs `fut` as the newest request for this slot.
    ///
    /// Resolves to `None` if another request began before `fut` finished.
    pub async fn run<F, T>(&self, key: RequestKey, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin(key);
        let output = fut.await;
        if self.is_current(&ticket) {
            Some(output)
        } else {
            tracing::debug!(
                request = %ticket.key,
                generation = ticket.generation,
                "Discarding superseded response"
            );
            None
        }
    }
}
