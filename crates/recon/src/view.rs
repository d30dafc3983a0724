//! Search, filter, sort and paginate comparison rows for display.

use std::cmp::Ordering;

use crate::model::{ComparisonRow, Source};

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowFilter {
    #[default]
    All,
    /// Weights disagree and the row carries at least one discrepancy.
    Mismatches,
    /// Absent from at least one source.
    Missing,
    /// Present everywhere with matching weights.
    Perfect,
    Duplicates,
}

impl RowFilter {
    pub fn accepts(&self, row: &ComparisonRow) -> bool {
        match self {
            Self::All => true,
            Self::Mismatches => !row.weights_match && !row.discrepancies.is_empty(),
            Self::Missing => !row.presence.in_all(),
            Self::Perfect => row.is_perfect_match(),
            Self::Duplicates => row.has_duplicates,
        }
    }
}

impl std::str::FromStr for RowFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "mismatches" => Ok(Self::Mismatches),
            "missing" => Ok(Self::Missing),
            "perfect" => Ok(Self::Perfect),
            "duplicates" => Ok(Self::Duplicates),
            other => Err(format!(
                "unknown filter '{other}' (expected all, mismatches, missing, perfect, duplicates)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Key,
    Weight(Source),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort column plus direction. Defaults to key ascending.
///
/// Parses from `key`, `jaster`, `cis` or `unifikasi`, optionally suffixed
/// with `:asc` or `:desc`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl std::str::FromStr for RowSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (field, direction) = match lower.split_once(':') {
            Some((f, d)) => (f.trim(), Some(d.trim())),
            None => (lower.as_str(), None),
        };

        let field = match field {
            "key" | "awb" => SortField::Key,
            "jaster" => SortField::Weight(Source::Jaster),
            "cis" => SortField::Weight(Source::Cis),
            "unifikasi" => SortField::Weight(Source::Unifikasi),
            other => {
                return Err(format!(
                    "unknown sort field '{other}' (expected key, jaster, cis, unifikasi)"
                ))
            }
        };
        let direction = match direction {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(format!("unknown sort direction '{other}' (expected asc, desc)"))
            }
        };

        Ok(Self { field, direction })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    pub search: Option<String>,
    pub filter: RowFilter,
    /// `None` keeps the rows in their incoming order.
    pub sort: Option<RowSort>,
    /// 1-based.
    pub page: usize,
    /// Zero means [`DEFAULT_PAGE_SIZE`].
    pub page_size: usize,
}

#[derive(Debug)]
pub struct RowPage<'a> {
    pub rows: Vec<&'a ComparisonRow>,
    pub total_matching: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl RowQuery {
    pub fn apply<'a>(&self, rows: &'a [ComparisonRow]) -> RowPage<'a> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<&ComparisonRow> = rows
            .iter()
            .filter(|r| match &needle {
                Some(n) => r.key.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .filter(|r| self.filter.accepts(r))
            .collect();

        if let Some(sort) = self.sort {
            matching.sort_by(|a, b| {
                let ord = compare_by(sort.field, a, b);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let page_size = if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        let page = self.page.max(1);
        let total_matching = matching.len();
        let total_pages = total_matching.div_ceil(page_size);

        let start = (page - 1).saturating_mul(page_size).min(total_matching);
        let end = start.saturating_add(page_size).min(total_matching);

        RowPage {
            rows: matching[start..end].to_vec(),
            total_matching,
            total_pages,
            page,
            page_size,
        }
    }
}

/// Absent weights sort as -1, below any real weight.
fn compare_by(field: SortField, a: &ComparisonRow, b: &ComparisonRow) -> Ordering {
    match field {
        SortField::Key => a.key.cmp(&b.key),
        SortField::Weight(source) => {
            let wa = a.weight_by_source.get(source).unwrap_or(-1.0);
            let wb = b.weight_by_source.get(source).unwrap_or(-1.0);
            wa.total_cmp(&wb)
        }
    }
}
