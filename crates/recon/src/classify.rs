use crate::aggregate::SourceIndex;
use crate::matcher::{has_conflicting_weights, weights_match};
use crate::model::{ComparisonRow, Discrepancy, DuplicateInfo, Source, WeightBySource};

/// The three per-source indexes, addressable by [`Source`].
pub struct SourceIndexes {
    pub jaster: SourceIndex,
    pub cis: SourceIndex,
    pub unifikasi: SourceIndex,
}

impl SourceIndexes {
    pub fn get(&self, source: Source) -> &SourceIndex {
        match source {
            Source::Jaster => &self.jaster,
            Source::Cis => &self.cis,
            Source::Unifikasi => &self.unifikasi,
        }
    }

    pub fn in_order(&self) -> [&SourceIndex; 3] {
        [&self.jaster, &self.cis, &self.unifikasi]
    }
}

/// Build the comparison row for a single key.
pub fn build_row(key: &str, indexes: &SourceIndexes, tolerance: f64) -> ComparisonRow {
    let mut weights = WeightBySource::default();
    for source in Source::ALL {
        weights.set(source, indexes.get(source).weight(key));
    }
    let presence = weights.presence();

    let present = weights.present();
    let matched = weights_match(&present, tolerance);

    let dup = |source: Source| has_conflicting_weights(indexes.get(source).raw_weights(key));
    let duplicate_info = DuplicateInfo::from_flags(
        dup(Source::Jaster),
        dup(Source::Cis),
        dup(Source::Unifikasi),
    );

    let mut discrepancies = Vec::new();
    for source in Source::ALL {
        if !presence.contains(source) {
            discrepancies.push(Discrepancy::MissingIn(source));
        }
    }
    if !matched && present.len() > 1 {
        discrepancies.push(Discrepancy::WeightMismatch);
    }
    if let Some(info) = duplicate_info {
        for source in Source::ALL {
            if info.contains(source) {
                discrepancies.push(Discrepancy::DuplicateIn(source));
            }
        }
    }

    ComparisonRow {
        key: key.to_string(),
        weight_by_source: weights,
        presence,
        weights_match: matched,
        discrepancies,
        has_duplicates: duplicate_info.is_some(),
        duplicate_info,
    }
}
