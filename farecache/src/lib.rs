pub mod cache;
pub mod compression;
pub mod config;
pub mod keys;
pub mod metrics_defs;
pub mod serializer;
pub mod store;

pub use cache::TokenCache;
pub use compression::Compression;
pub use config::CacheConfig;
pub use store::{ByteStore, MemoryStore};
