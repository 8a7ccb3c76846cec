//! Pagination module
//!
//! Skip/limit/total pagination as spoken by the partner API.
//!
//! # Overview
//!
//! Every paginated endpoint answers with the same envelope:
//!
//! ```json
//! { "values": [ ... ], "skip": 0, "limit": 100, "total": 250 }
//! ```
//!
//! `SkipPaginator` turns a `Cursor` into query parameters and decides, from
//! each envelope, whether another page is needed. Endpoints disagree on when
//! the sequence ends, so the rule is configured per resource through
//! `TerminationRule`.

mod strategies;
mod types;

pub use strategies::{Pagination, SkipPaginator, TerminationRule};
pub use types::{Cursor, Envelope, NextPage};
