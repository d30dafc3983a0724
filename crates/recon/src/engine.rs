use crate::aggregate::{union_keys, SourceIndex};
use crate::classify::{build_row, SourceIndexes};
use crate::matcher::WEIGHT_MATCH_THRESHOLD;
use crate::model::{ComparisonResult, ReconInput, Source, SourceRecord};
use crate::observer::{NoopObserver, ReconObserver, SourceSummary};
use crate::summary::compute_stats;

/// Knobs for a comparison run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    /// Absolute tolerance for weight equality (strict `<`).
    pub tolerance: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: WEIGHT_MATCH_THRESHOLD,
        }
    }
}

/// Compare three record lists with the default tolerance.
pub fn compare(
    jaster: &[SourceRecord],
    cis: &[SourceRecord],
    unifikasi: &[SourceRecord],
) -> ComparisonResult {
    let indexes = SourceIndexes {
        jaster: SourceIndex::build(Source::Jaster, jaster),
        cis: SourceIndex::build(Source::Cis, cis),
        unifikasi: SourceIndex::build(Source::Unifikasi, unifikasi),
    };
    run_indexed(&indexes, &CompareOptions::default(), &NoopObserver)
}

/// Compare pre-loaded input. Pure apart from `generated_at`.
pub fn compare_input(
    input: &ReconInput,
    options: &CompareOptions,
    observer: &dyn ReconObserver,
) -> ComparisonResult {
    let indexes = SourceIndexes {
        jaster: SourceIndex::build(Source::Jaster, &input.jaster),
        cis: SourceIndex::build(Source::Cis, &input.cis),
        unifikasi: SourceIndex::build(Source::Unifikasi, &input.unifikasi),
    };
    run_indexed(&indexes, options, observer)
}

fn run_indexed(
    indexes: &SourceIndexes,
    options: &CompareOptions,
    observer: &dyn ReconObserver,
) -> ComparisonResult {
    let summaries: Vec<SourceSummary> = indexes
        .in_order()
        .iter()
        .map(|idx| SourceSummary::from_index(idx))
        .collect();
    observer.sources_indexed(&summaries);

    let keys = union_keys(&indexes.in_order());
    let rows: Vec<_> = keys
        .iter()
        .map(|key| build_row(key, indexes, options.tolerance))
        .collect();
    observer.rows_built(&rows);

    let stats = compute_stats(&rows);
    observer.stats_computed(&stats);

    ComparisonResult {
        rows,
        stats,
        generated_at: chrono::Utc::now(),
    }
}
