//! TTL Policy Module
//!
//! Static operation -> expiry mapping, fixed when the process starts.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::Operation;

impl Operation {
    /// Default expiry for cached responses of this operation, in seconds.
    pub fn default_ttl_secs(&self) -> u64 {
        match self {
            Operation::UpcomingMovies => 3_600,
            Operation::LatestMovie => 21_600,
            Operation::PopularMovies => 10_800,
            Operation::TopRatedMovies => 14_400,
            Operation::SearchMovies => 3_600,
            Operation::MovieDetails => 86_400,
            Operation::SimilarMovies => 21_600,
        }
    }
}

// == TTL Policy ==
/// Expiry per cached operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    ttls: HashMap<Operation, Duration>,
}

impl TtlPolicy {
    /// Replaces the expiry of one operation.
    pub fn with_ttl(mut self, operation: Operation, ttl: Duration) -> Self {
        self.ttls.insert(operation, ttl);
        self
    }

    /// Expiry assigned to `operation`.
    pub fn ttl_for(&self, operation: Operation) -> Duration {
        self.ttls
            .get(&operation)
            .copied()
            .unwrap_or_else(|| Duration::from_secs(operation.default_ttl_secs()))
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        let ttls = Operation::ALL
            .iter()
            .map(|op| (*op, Duration::from_secs(op.default_ttl_secs())))
            .collect();
        Self { ttls }
    }
}
