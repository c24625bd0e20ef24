//! docstore - a minimal JSON document store
//!
//! Named tables of schema-less rows, held in memory and mirrored to a
//! single snapshot file that is rewritten after every mutation.
//!
//! ```no_run
//! use docstore::store::{Selection, TableStore};
//! use serde_json::json;
//!
//! let mut db = TableStore::open("inventory")?;
//! db.create_table("items")?;
//! db.insert_row("items", json!({"id": 1, "name": "bolt"}).as_object().cloned().unwrap())?;
//! let sorted = db.select_rows("items", &Selection::all().sort_by_field("name"))?;
//! # Ok::<(), docstore::store::StoreError>(())
//! ```

pub mod api;
pub mod blob;
pub mod cli;
pub mod config;
pub mod display;
pub mod store;
