//! Row selection: an optional filter followed by an optional stable sort.

use std::cmp::Ordering;
use std::fmt;

use super::row::{compare_values, matches_condition, Row};

type RowFilter<'a> = Box<dyn Fn(&Row) -> bool + 'a>;
type RowOrder<'a> = Box<dyn Fn(&Row, &Row) -> Ordering + 'a>;

/// Describes which rows `select_rows` returns and in what order.
///
/// Filtering always runs before sorting. Both steps preserve relative
/// order: the filter keeps surviving rows in table order and the sort is
/// stable, so rows with equal keys stay in their pre-sort order.
///
/// ```
/// use docstore::store::Selection;
///
/// let adults = Selection::all()
///     .filter(|row| row.get("age").and_then(|v| v.as_u64()).unwrap_or(0) >= 18)
///     .sort_by_field("name");
/// # let _ = adults;
/// ```
#[derive(Default)]
pub struct Selection<'a> {
    filter: Option<RowFilter<'a>>,
    order: Option<RowOrder<'a>>,
}

impl<'a> Selection<'a> {
    /// Every row, table order
    pub fn all() -> Self {
        Self::default()
    }

    /// Rows matching a field -> value condition (conjunctive equality)
    pub fn matching(condition: &'a Row) -> Self {
        Self::all().filter(move |row| matches_condition(row, condition))
    }

    /// Keep only rows for which `predicate` holds.
    ///
    /// Replaces any previously set filter.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + 'a,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Sort ascending by a derived key
    pub fn sort_by_key<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&Row) -> K + 'a,
    {
        self.order = Some(Box::new(move |a, b| key(a).cmp(&key(b))));
        self
    }

    /// Sort ascending by a field's JSON value; rows missing the field first
    pub fn sort_by_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.order = Some(Box::new(move |a, b| {
            compare_values(a.get(&field), b.get(&field))
        }));
        self
    }

    /// Sort with an arbitrary comparator
    pub fn sort_by<C>(mut self, compare: C) -> Self
    where
        C: Fn(&Row, &Row) -> Ordering + 'a,
    {
        self.order = Some(Box::new(compare));
        self
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    pub fn is_sorted(&self) -> bool {
        self.order.is_some()
    }

    /// Returns true if `row` passes the filter
    pub fn accepts(&self, row: &Row) -> bool {
        self.filter.as_ref().map_or(true, |f| f(row))
    }

    /// Applies the selection to a row sequence, returning owned copies
    pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
        let mut selected: Vec<Row> = rows
            .iter()
            .filter(|row| self.accepts(row))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            // slice::sort_by is stable
            selected.sort_by(|a, b| order(a, b));
        }

        selected
    }
}

impl fmt::Debug for Selection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("filtered", &self.is_filtered())
            .field("sorted", &self.is_sorted())
            .finish()
    }
}
