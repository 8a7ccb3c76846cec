//! Resource query catalog
//!
//! Static, per-resource configuration: which path to hit, how the endpoint
//! names its offset and page-size parameters, how it wants dates encoded,
//! when its pagination ends, and how its payload is reshaped. Pure data;
//! the engine does the fetching.

mod resources;
mod types;

pub use resources::{FetchOptions, Resource, DEFAULT_INVENTORY};
pub use types::{DateParams, ResourceQuery};
