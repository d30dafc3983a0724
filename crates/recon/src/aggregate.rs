use std::collections::{HashMap, HashSet};

use crate::model::{Source, SourceRecord};

/// Per-source lookup built from raw records.
///
/// `first` holds the representative weight for each key: the first weight
/// seen in input order. `raw` keeps every weight for duplicate detection.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    pub source: Source,
    pub record_count: usize,
    order: Vec<String>,
    first: HashMap<String, f64>,
    raw: HashMap<String, Vec<f64>>,
}

impl SourceIndex {
    pub fn build(source: Source, records: &[SourceRecord]) -> Self {
        let mut order = Vec::new();
        let mut first = HashMap::new();
        let mut raw: HashMap<String, Vec<f64>> = HashMap::new();

        for record in records {
            if !first.contains_key(&record.key) {
                first.insert(record.key.clone(), record.weight);
                order.push(record.key.clone());
            }
            raw.entry(record.key.clone()).or_default().push(record.weight);
        }

        Self {
            source,
            record_count: records.len(),
            order,
            first,
            raw,
        }
    }

    /// First-seen weight for `key`, or `None` when the source lacks it.
    pub fn weight(&self, key: &str) -> Option<f64> {
        self.first.get(key).copied()
    }

    /// Every weight recorded for `key`, in input order.
    pub fn raw_weights(&self, key: &str) -> &[f64] {
        self.raw.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn distinct_keys(&self) -> usize {
        self.order.len()
    }
}

/// Union of keys across indexes, in first-seen order, each key once.
pub fn union_keys(indexes: &[&SourceIndex]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::new();

    for index in indexes {
        for key in index.keys() {
            if seen.insert(key.as_str()) {
                keys.push(key.clone());
            }
        }
    }

    keys
}
