//! Text bar chart of table sizes

use std::fmt::Write;

use crate::store::TableStore;

const BAR: char = '█';

/// Horizontal bar chart, one bar per table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChart {
    title: String,
    bars: Vec<(String, usize)>,
    width: usize,
}

impl BarChart {
    /// `width` is the bar length of the largest value; zero is treated as one
    pub fn new(title: impl Into<String>, bars: Vec<(String, usize)>, width: usize) -> Self {
        Self {
            title: title.into(),
            bars,
            width: width.max(1),
        }
    }

    /// Row counts of every table in `store`
    pub fn from_store(store: &TableStore, width: usize) -> Self {
        Self::new(
            format!("{} Table Sizes", store.name()),
            store.table_sizes(),
            width,
        )
    }

    pub fn bars(&self) -> &[(String, usize)] {
        &self.bars
    }

    /// Bar length for `value`, scaled so the maximum fills `width`.
    ///
    /// Non-zero values always get at least one cell.
    fn scale(&self, value: usize, max: usize) -> usize {
        if value == 0 || max == 0 {
            return 0;
        }
        ((value * self.width) / max).max(1)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);

        if self.bars.is_empty() {
            out.push_str("(no tables)\n");
            return out;
        }

        let label_width = self
            .bars
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Table Name".len());
        let max = self.bars.iter().map(|(_, n)| *n).max().unwrap_or(0);

        let _ = writeln!(out, "{:<label_width$} | Number of Rows", "Table Name");
        for (name, value) in &self.bars {
            let bar: String = std::iter::repeat(BAR).take(self.scale(*value, max)).collect();
            let sep = if bar.is_empty() { "" } else { " " };
            let _ = writeln!(out, "{:<label_width$} | {}{}{}", name, bar, sep, value);
        }

        out
    }
}
