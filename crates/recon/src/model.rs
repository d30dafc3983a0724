use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One of the three independently maintained record sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Jaster,
    Cis,
    Unifikasi,
}

impl Source {
    /// All sources in reporting order.
    pub const ALL: [Source; 3] = [Source::Jaster, Source::Cis, Source::Unifikasi];

    /// Upper-case display name used in discrepancy tags and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jaster => "JASTER",
            Self::Cis => "CIS",
            Self::Unifikasi => "UNIFIKASI",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single normalized `(key, weight)` row from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRecord {
    pub key: String,
    pub weight: f64,
}

impl SourceRecord {
    pub fn new(key: impl Into<String>, weight: f64) -> Self {
        Self {
            key: key.into(),
            weight,
        }
    }
}

/// Pre-loaded records for the three sources, in input order.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub jaster: Vec<SourceRecord>,
    pub cis: Vec<SourceRecord>,
    pub unifikasi: Vec<SourceRecord>,
}

// ---------------------------------------------------------------------------
// Per-key comparison
// ---------------------------------------------------------------------------

/// Representative (first-seen) weight per source; `None` when the key is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeightBySource {
    pub jaster: Option<f64>,
    pub cis: Option<f64>,
    pub unifikasi: Option<f64>,
}

impl WeightBySource {
    pub fn get(&self, source: Source) -> Option<f64> {
        match source {
            Source::Jaster => self.jaster,
            Source::Cis => self.cis,
            Source::Unifikasi => self.unifikasi,
        }
    }

    pub fn set(&mut self, source: Source, weight: Option<f64>) {
        match source {
            Source::Jaster => self.jaster = weight,
            Source::Cis => self.cis = weight,
            Source::Unifikasi => self.unifikasi = weight,
        }
    }

    /// Non-null weights in source order.
    pub fn present(&self) -> Vec<f64> {
        Source::ALL.iter().filter_map(|s| self.get(*s)).collect()
    }

    pub fn presence(&self) -> Presence {
        Presence {
            in_jaster: self.jaster.is_some(),
            in_cis: self.cis.is_some(),
            in_unifikasi: self.unifikasi.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Presence {
    pub in_jaster: bool,
    pub in_cis: bool,
    pub in_unifikasi: bool,
}

impl Presence {
    pub fn contains(&self, source: Source) -> bool {
        match source {
            Source::Jaster => self.in_jaster,
            Source::Cis => self.in_cis,
            Source::Unifikasi => self.in_unifikasi,
        }
    }

    /// Number of sources the key appears in.
    pub fn count(&self) -> usize {
        [self.in_jaster, self.in_cis, self.in_unifikasi]
            .iter()
            .filter(|p| **p)
            .count()
    }

    pub fn in_all(&self) -> bool {
        self.count() == 3
    }
}

/// Which sources held conflicting duplicate records for a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateInfo {
    pub jaster: bool,
    pub cis: bool,
    pub unifikasi: bool,
}

impl DuplicateInfo {
    /// `None` unless at least one source is flagged.
    pub fn from_flags(jaster: bool, cis: bool, unifikasi: bool) -> Option<Self> {
        if jaster || cis || unifikasi {
            Some(Self {
                jaster,
                cis,
                unifikasi,
            })
        } else {
            None
        }
    }

    pub fn contains(&self, source: Source) -> bool {
        match source {
            Source::Jaster => self.jaster,
            Source::Cis => self.cis,
            Source::Unifikasi => self.unifikasi,
        }
    }
}

/// Reason a row is not a clean three-way match.
///
/// Variant order is the reporting order: a row's discrepancy list is always
/// sorted by this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Discrepancy {
    MissingIn(Source),
    WeightMismatch,
    DuplicateIn(Source),
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIn(source) => write!(f, "Missing in {source}"),
            Self::WeightMismatch => write!(f, "Weight mismatch"),
            Self::DuplicateIn(source) => write!(f, "Duplicate in {source}"),
        }
    }
}

impl Serialize for Discrepancy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row per distinct key across all three sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub weight_by_source: WeightBySource,
    pub presence: Presence,
    pub weights_match: bool,
    pub discrepancies: Vec<Discrepancy>,
    pub has_duplicates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_info: Option<DuplicateInfo>,
}

impl ComparisonRow {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn is_perfect_match(&self) -> bool {
        self.presence.in_all() && self.weights_match
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonStats {
    pub total_unique_awbs: usize,
    pub in_all_three: usize,
    pub in_jaster_only: usize,
    pub in_cis_only: usize,
    pub in_unifikasi_only: usize,
    pub in_jaster_and_cis: usize,
    pub in_jaster_and_unifikasi: usize,
    pub in_cis_and_unifikasi: usize,
    pub weight_mismatches: usize,
    pub perfect_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub rows: Vec<ComparisonRow>,
    pub stats: ComparisonStats,
    pub generated_at: DateTime<Utc>,
}

impl ComparisonResult {
    /// Rows carrying at least one discrepancy.
    pub fn issues(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| !r.is_clean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrepancy_tags() {
        assert_eq!(Discrepancy::MissingIn(Source::Jaster).to_string(), "Missing in JASTER");
        assert_eq!(Discrepancy::MissingIn(Source::Unifikasi).to_string(), "Missing in UNIFIKASI");
        assert_eq!(Discrepancy::WeightMismatch.to_string(), "Weight mismatch");
        assert_eq!(Discrepancy::DuplicateIn(Source::Cis).to_string(), "Duplicate in CIS");
    }

    #[test]
    fn discrepancy_ordering_matches_report_order() {
        let mut tags = vec![
            Discrepancy::DuplicateIn(Source::Jaster),
            Discrepancy::WeightMismatch,
            Discrepancy::MissingIn(Source::Unifikasi),
            Discrepancy::DuplicateIn(Source::Unifikasi),
            Discrepancy::MissingIn(Source::Jaster),
        ];
        tags.sort();
        assert_eq!(
            tags,
            vec![
                Discrepancy::MissingIn(Source::Jaster),
                Discrepancy::MissingIn(Source::Unifikasi),
                Discrepancy::WeightMismatch,
                Discrepancy::DuplicateIn(Source::Jaster),
                Discrepancy::DuplicateIn(Source::Unifikasi),
            ]
        );
    }

    #[test]
    fn duplicate_info_absent_without_flags() {
        assert_eq!(DuplicateInfo::from_flags(false, false, false), None);
        let info = DuplicateInfo::from_flags(false, true, false).unwrap();
        assert!(info.contains(Source::Cis));
        assert!(!info.contains(Source::Jaster));
    }

    #[test]
    fn presence_counts_sources() {
        let weights = WeightBySource {
            jaster: Some(0.0),
            cis: None,
            unifikasi: Some(4.5),
        };
        let presence = weights.presence();
        assert_eq!(presence.count(), 2);
        assert!(presence.contains(Source::Jaster));
        assert!(!presence.contains(Source::Cis));
        assert_eq!(weights.present(), vec![0.0, 4.5]);
    }

    #[test]
    fn row_serializes_tags_as_strings() {
        let row = ComparisonRow {
            key: "AWB1".into(),
            weight_by_source: WeightBySource {
                jaster: None,
                cis: Some(5.0),
                unifikasi: None,
            },
            presence: Presence {
                in_jaster: false,
                in_cis: true,
                in_unifikasi: false,
            },
            weights_match: true,
            discrepancies: vec![
                Discrepancy::MissingIn(Source::Jaster),
                Discrepancy::MissingIn(Source::Unifikasi),
            ],
            has_duplicates: false,
            duplicate_info: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["discrepancies"][0], "Missing in JASTER");
        assert_eq!(json["weight_by_source"]["jaster"], serde_json::Value::Null);
        assert!(json.get("duplicate_info").is_none());
    }
}
