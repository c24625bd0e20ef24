//! Table store
//!
//! A store is a set of named tables, each an ordered sequence of
//! schema-less rows, mirrored to one JSON snapshot file.
//!
//! Invariants:
//! - After `open`, `reload`, or any successful mutating call, the snapshot
//!   on disk equals the in-memory mapping.
//! - Insertion order is preserved by every operation; sorting produces a
//!   new sequence and is never persisted.
//! - Row `id` values are expected to be unique within a table. This is not
//!   enforced: point lookups take the first match.
//!
//! Access is single-threaded. Mutating calls take `&mut self`, and nothing
//! guards the snapshot against other processes.

mod errors;
mod row;
mod selection;
mod snapshot;
mod table_store;

pub use errors::{StoreError, StoreResult};
pub use row::{
    compare_values, has_id, is_blank, matches_condition, oversized_integer, row_from_value, row_id,
    values_equal, Row, ID_FIELD,
};
pub use selection::Selection;
pub use snapshot::{SnapshotFile, Tables};
pub use table_store::TableStore;
