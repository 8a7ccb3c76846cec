//! # blaze-partner
//!
//! A client for the BLAZE retail partner API that extracts each resource
//! into a flat Arrow table.
//!
//! ## Features
//!
//! - **Skip/limit pagination**: pages are fetched until the server-reported
//!   total is exhausted, bounded by a page cap and an optional deadline
//! - **Nested list explosion**: cart and purchase-order line items become one
//!   row each, joined back to their parent
//! - **Inventory lookup**: inventory names resolve to ids once per client
//! - **Arrow output**: tables with columns in first-seen order, writable as
//!   Parquet or JSON lines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blaze_partner::{BlazeClient, ClientConfig, FetchOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env();
//!     let client = BlazeClient::connect(&config).await?;
//!
//!     let sales = client.item_sales(&FetchOptions::new()).await?;
//!     println!("{} line items", sales.num_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       BlazeClient                         │
//! │  products() vendors() ... item_sales() po_line_items()    │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬──────────┬──────┴─────┬───────────┬───────────┐
//! │ Catalog  │  Engine  │  Flatten   │ Inventory │  Output   │
//! ├──────────┼──────────┼────────────┼───────────┼───────────┤
//! │ paths    │ cursor   │ explode    │ name → id │ Arrow     │
//! │ params   │ guards   │ join keys  │           │ Parquet   │
//! │ dates    │          │ normalise  │           │ JSON lines│
//! └──────────┴──────────┴────────────┴───────────┴───────────┘
//!                              │
//!                    Session (reqwest + governor)
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation
)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and header placement
pub mod auth;

/// Authenticated HTTP session with rate limiting
pub mod http;

/// Envelope parsing and skip/limit cursors
pub mod pagination;

/// Nested list explosion and record normalisation
pub mod flatten;

/// Inventory name→id lookup
pub mod inventory;

/// Per-resource query configuration
pub mod catalog;

/// Pagination loop
pub mod engine;

/// Arrow tables and writers
pub mod output;

/// Client configuration
pub mod config;

/// The public client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use catalog::{FetchOptions, Resource};
pub use client::BlazeClient;
pub use config::ClientConfig;
pub use engine::{FetchEngine, FetchLimits, FetchOutcome};
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
