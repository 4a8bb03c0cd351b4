#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Compatibility layer for std/no_std
mod compat;

// Internal modules (not public API)
mod error;
mod helpers;
mod percent_encode;

mod cache;
pub mod codec;
mod history;
mod history_with_query;
mod location;
mod location_with_query;
mod memory_history;
mod options;
mod query;
mod query_params;

// Public API
pub use cache::StableQueryCache;
pub use error::{LocationError, Result};
pub use history::{Action, LocationSource, Navigator};
pub use history_with_query::{HistoryWithQuery, history_with_query, serialize_query_target};
pub use location::{Location, NavigationTarget, PartialLocation};
pub use location_with_query::{LocationWithQuery, location_with_query, with_parsed_query};
pub use memory_history::{ListenerId, MemoryHistory};
pub use options::{ArrayFormat, QueryOptions};
pub use query::{Query, QueryValue};
pub use query_params::{QueryActions, QueryParams};
