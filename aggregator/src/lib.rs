pub mod api;
pub mod cache;
pub mod config;
pub mod metrics_defs;
pub mod provider;
pub mod service;
pub mod sro;
pub mod stub;
pub mod trip;
pub mod trips;

pub use cache::{CacheError, TripsCache};
pub use provider::{Provider, ProviderError};
pub use service::{SearchError, SearchService};
pub use sro::Sro;
pub use trip::Trip;
pub use trips::Trips;
