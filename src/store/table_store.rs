//! TableStore: named tables of schema-less rows mirrored to one snapshot
//!
//! Every successful mutating call leaves the snapshot on disk equal to the
//! in-memory mapping. Reads never touch the disk.
//!
//! If `persist` fails after a mutation has been applied in memory, the
//! in-memory state is NOT rolled back: the store and its snapshot disagree
//! until the next successful persist or a `reload`.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{StoreError, StoreResult};
use super::row::{has_id, is_blank, matches_condition, Row};
use super::selection::Selection;
use super::snapshot::{SnapshotFile, Tables};
use crate::config::StoreConfig;

/// A named collection of tables persisted as a single snapshot file
#[derive(Debug)]
pub struct TableStore {
    name: String,
    snapshot: SnapshotFile,
    tables: Tables,
}

impl TableStore {
    /// Open the store `name` with the default layout (`./<name>.json`)
    pub fn open(name: &str) -> StoreResult<Self> {
        Self::open_with_config(name, &StoreConfig::default())
    }

    /// Open the store `name` using `config` to locate its snapshot.
    ///
    /// An existing snapshot is loaded verbatim; otherwise an empty snapshot
    /// is written immediately.
    pub fn open_with_config(name: &str, config: &StoreConfig) -> StoreResult<Self> {
        validate_name(name)?;

        let snapshot = SnapshotFile::new(config.snapshot_path(name), config.pretty);
        let mut store = Self {
            name: name.to_string(),
            snapshot,
            tables: Tables::new(),
        };

        match store.snapshot.read()? {
            Some(tables) => {
                store.tables = tables;
                info!(
                    store = %store.name,
                    path = %store.snapshot.path().display(),
                    tables = store.tables.len(),
                    "store loaded"
                );
            }
            None => {
                store.persist()?;
                info!(
                    store = %store.name,
                    path = %store.snapshot.path().display(),
                    "store created"
                );
            }
        }

        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot_path(&self) -> &Path {
        self.snapshot.path()
    }

    /// Write the whole mapping to the snapshot, replacing it atomically
    pub fn persist(&self) -> StoreResult<()> {
        self.snapshot.write(&self.tables)
    }

    /// Discard in-memory state and re-read the snapshot.
    ///
    /// On failure the current in-memory state is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        let tables = self
            .snapshot
            .read()?
            .ok_or_else(|| {
                StoreError::io(
                    self.snapshot.path(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "snapshot file missing"),
                )
            })?;
        self.tables = tables;
        debug!(store = %self.name, tables = self.tables.len(), "store reloaded");
        Ok(())
    }

    /// Create `table` as an empty table.
    ///
    /// An existing table of the same name is replaced by an empty one.
    pub fn create_table(&mut self, table: &str) -> StoreResult<()> {
        if let Some(previous) = self.tables.insert(table.to_string(), Vec::new()) {
            warn!(
                store = %self.name,
                table,
                discarded_rows = previous.len(),
                "table re-created, existing rows discarded"
            );
        } else {
            info!(store = %self.name, table, "table created");
        }
        self.persist()
    }

    /// Append `row` to the end of `table`. No uniqueness check on `id`.
    pub fn insert_row(&mut self, table: &str, row: Row) -> StoreResult<()> {
        self.rows_mut(table)?.push(row);
        debug!(store = %self.name, table, "row inserted");
        self.persist()
    }

    /// Rows of `table` chosen and ordered by `selection`
    pub fn select_rows(&self, table: &str, selection: &Selection<'_>) -> StoreResult<Vec<Row>> {
        let selected = selection.apply(self.rows(table)?);
        debug!(
            store = %self.name,
            table,
            filtered = selection.is_filtered(),
            sorted = selection.is_sorted(),
            returned = selected.len(),
            "rows selected"
        );
        Ok(selected)
    }

    /// Apply `mutator` in place to every row matching `predicate`, in table
    /// order, then persist once. Returns the number of rows updated.
    ///
    /// The mutator may change any field, `id` included.
    pub fn update_rows<P, M>(
        &mut self,
        table: &str,
        predicate: P,
        mut mutator: M,
    ) -> StoreResult<usize>
    where
        P: Fn(&Row) -> bool,
        M: FnMut(&mut Row),
    {
        let mut updated = 0;
        for row in self.rows_mut(table)?.iter_mut() {
            if predicate(&*row) {
                mutator(row);
                updated += 1;
            }
        }

        debug!(store = %self.name, table, updated, "rows updated");
        self.persist()?;
        Ok(updated)
    }

    /// Read-only view of `table`.
    ///
    /// Use [`TableStore::replace_table`] for bulk edits; it persists.
    pub fn table(&self, table: &str) -> StoreResult<&[Row]> {
        self.rows(table)
    }

    /// Replace the full contents of an existing `table` and persist
    pub fn replace_table(&mut self, table: &str, rows: Vec<Row>) -> StoreResult<()> {
        let count = rows.len();
        let previous = std::mem::replace(self.rows_mut(table)?, rows);
        debug!(
            store = %self.name,
            table,
            previous_rows = previous.len(),
            rows = count,
            "table replaced"
        );
        self.persist()
    }

    /// Remove rows of `table` matching `predicate` and persist.
    ///
    /// With no predicate every row is kept: the call only re-persists and
    /// returns 0. Returns the number of rows removed.
    pub fn delete_rows(
        &mut self,
        table: &str,
        predicate: Option<&dyn Fn(&Row) -> bool>,
    ) -> StoreResult<usize> {
        let store = &self.name;
        let rows = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let before = rows.len();

        match predicate {
            Some(predicate) => rows.retain(|row| !predicate(row)),
            None => warn!(store = %store, table, "delete without predicate keeps every row"),
        }

        let removed = before - rows.len();
        debug!(store = %self.name, table, removed, "rows deleted");
        self.persist()?;
        Ok(removed)
    }

    /// Rows of `table` equal to `condition` on every field it names.
    ///
    /// Without a condition the whole table is returned.
    pub fn get_row(&self, table: &str, condition: Option<&Row>) -> StoreResult<Vec<Row>> {
        let rows = self.rows(table)?;
        let matched = match condition {
            None => rows.to_vec(),
            Some(condition) => rows
                .iter()
                .filter(|row| matches_condition(row, condition))
                .cloned()
                .collect(),
        };
        Ok(matched)
    }

    /// First row of `table` whose `id` equals `row_id`
    pub fn find_row(&self, table: &str, row_id: &Value) -> StoreResult<&Row> {
        self.rows(table)?
            .iter()
            .find(|row| has_id(row, row_id))
            .ok_or_else(|| StoreError::row_not_found(table, row_id))
    }

    /// Drop every null or empty-string field from the first row whose `id`
    /// equals `row_id`. Persists only when such a row exists.
    pub fn clean_row(&mut self, table: &str, row_id: &Value) -> StoreResult<()> {
        let row = self
            .rows_mut(table)?
            .iter_mut()
            .find(|row| has_id(row, row_id))
            .ok_or_else(|| StoreError::row_not_found(table, row_id))?;

        let before = row.len();
        row.retain(|_, value| !is_blank(value));
        let removed = before - row.len();

        debug!(store = %self.name, table, %row_id, removed, "row cleaned");
        self.persist()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// `(table, row count)` pairs in table-name order
    pub fn table_sizes(&self) -> Vec<(String, usize)> {
        self.tables
            .iter()
            .map(|(name, rows)| (name.clone(), rows.len()))
            .collect()
    }

    fn rows(&self, table: &str) -> StoreResult<&[Row]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn rows_mut(&mut self, table: &str) -> StoreResult<&mut Vec<Row>> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }
}

/// Store names become file names, so they must be a single path component
fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
