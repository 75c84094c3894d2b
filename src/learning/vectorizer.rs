// File: src/learning/vectorizer.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A sparse row: (column, value) pairs in ascending column order.
pub type SparseRow = Vec<(usize, f64)>;

/// Maps feature names to columns. Names are sorted, so the same training
/// set always yields the same layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    columns: BTreeMap<String, usize>,
}

impl Vocabulary {
    pub fn fit<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let sorted: BTreeSet<&str> = names.into_iter().collect();
        let columns = sorted
            .into_iter()
            .enumerate()
            .map(|(column, name)| (name.to_string(), column))
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Names unseen at fit time are dropped, as are zero values.
    pub fn transform<'a>(&self, entries: impl IntoIterator<Item = (&'a str, f64)>) -> SparseRow {
        let mut row: SparseRow = entries
            .into_iter()
            .filter(|&(_, value)| value != 0.0)
            .filter_map(|(name, value)| self.column(name).map(|c| (c, value)))
            .collect();
        row.sort_by_key(|&(c, _)| c);
        row
    }
}
