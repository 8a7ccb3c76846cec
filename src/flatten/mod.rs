//! Nested list flattening
//!
//! Some resources carry their interesting rows one level down: a transaction
//! holds its cart line items, a purchase order its product requests. The
//! flattener explodes such a list into one row per child, copies selected
//! parent fields onto every child row, and re-associates children with their
//! parent through a derived join key.
//!
//! `normalize` is the companion reshaping step: nested objects become dotted
//! column names (`cart.total`), the flat layout the tabular output expects.

mod flattener;
mod types;

pub use flattener::{flatten, get_path, normalize, normalize_all};
pub use types::{CarriedField, FlattenSpec, JoinKeyRule};
