//! Diagnostics hook invoked at fixed checkpoints of a comparison run.
//!
//! Observers only read; nothing they do can change the result.

use serde::Serialize;

use crate::aggregate::SourceIndex;
use crate::matcher::has_conflicting_weights;
use crate::model::{ComparisonRow, ComparisonStats, Source};

/// Per-source counts reported before the key union is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: Source,
    pub records: usize,
    pub distinct_keys: usize,
    pub conflicting_keys: usize,
}

impl SourceSummary {
    pub fn from_index(index: &SourceIndex) -> Self {
        let conflicting_keys = index
            .keys()
            .iter()
            .filter(|k| has_conflicting_weights(index.raw_weights(k)))
            .count();
        Self {
            source: index.source,
            records: index.record_count,
            distinct_keys: index.distinct_keys(),
            conflicting_keys,
        }
    }
}

pub trait ReconObserver {
    /// Called once all three source lookups are built.
    fn sources_indexed(&self, _sources: &[SourceSummary]) {}

    /// Called after every union key has a row.
    fn rows_built(&self, _rows: &[ComparisonRow]) {}

    /// Called after the aggregate counters are computed.
    fn stats_computed(&self, _stats: &ComparisonStats) {}
}

/// Observer that ignores every checkpoint.
pub struct NoopObserver;

impl ReconObserver for NoopObserver {}

/// Observer that emits `tracing` events.
pub struct TracingObserver;

impl ReconObserver for TracingObserver {
    fn sources_indexed(&self, sources: &[SourceSummary]) {
        for s in sources {
            tracing::debug!(
                source = %s.source,
                records = s.records,
                distinct_keys = s.distinct_keys,
                conflicting_keys = s.conflicting_keys,
                "source indexed"
            );
        }
    }

    fn rows_built(&self, rows: &[ComparisonRow]) {
        let with_issues = rows.iter().filter(|r| !r.is_clean()).count();
        tracing::debug!(rows = rows.len(), with_issues, "comparison rows built");
    }

    fn stats_computed(&self, stats: &ComparisonStats) {
        tracing::info!(
            total = stats.total_unique_awbs,
            in_all_three = stats.in_all_three,
            perfect_matches = stats.perfect_matches,
            weight_mismatches = stats.weight_mismatches,
            single_source = stats.single_source_total(),
            "comparison complete"
        );
    }
}
