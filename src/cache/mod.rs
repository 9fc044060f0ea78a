//! Cache Module
//!
//! Read-through response caching in front of the catalog provider: key
//! construction, TTL policy, a failure-containing adapter over the remote
//! key-value backend, and the read-through algorithm itself.

mod backend;
mod entry;
mod keys;
mod memory;
mod policy;
mod read_through;
mod redis_backend;
mod stats;
mod store;


// Re-export public types
pub use backend::{BackendError, BackendState, KeyValueBackend};
pub use entry::{CacheEntry, Clock, ManualClock, SystemClock};
pub use keys::{build_key, KeyPart, Operation, KEY_SEPARATOR};
pub use memory::MemoryBackend;
pub use policy::TtlPolicy;
pub use read_through::ReadThroughCache;
pub use redis_backend::{RedisBackend, RedisSettings};
pub use stats::{CacheStats, StatsRecorder};
pub use store::{CacheStore, SetOutcome};
