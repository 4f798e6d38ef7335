// Service exports
pub mod cache;
pub mod event_store;
pub mod postgres;

pub use cache::{CacheManager, CacheKey, CacheError};
pub use event_store::{EventStore, EventStoreError};
pub use postgres::{PostgresClient, PostgresError};
