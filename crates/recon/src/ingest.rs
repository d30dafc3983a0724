//! Source ingestion: turn a delimited export into normalized records.
//!
//! Each source names its columns differently, so headers are resolved through
//! an ordered alias table rather than fixed names.

use crate::error::ReconError;
use crate::model::{Source, SourceRecord};

/// Accepted header names for the key and weight columns, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliases {
    pub key: Vec<String>,
    pub weight: Vec<String>,
}

impl ColumnAliases {
    pub fn defaults(source: Source) -> Self {
        let (key, weight): (&[&str], &[&str]) = match source {
            Source::Jaster => (&["AWB", "awb"], &["CHW", "Chw", "chw", "CHW ", "Chw ", "chw "]),
            Source::Cis => (
                &["No AWB", "No. AWB", "AWB", "no awb"],
                &["Chw. Weight", "Chw Weight", "CHW Weight", "Weight", "chw. weight"],
            ),
            Source::Unifikasi => (&["SMU", "smu"], &["Kg", "kg", "KG", "Weight", "weight"]),
        };
        Self {
            key: key.iter().map(|s| s.to_string()).collect(),
            weight: weight.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Index of the first alias present in `headers`.
///
/// For each alias in order an exact header match is tried first, then a
/// trimmed, case-insensitive one.
pub fn resolve_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    for alias in aliases {
        if let Some(i) = headers.iter().position(|h| h == alias) {
            return Some(i);
        }
        let wanted = alias.trim().to_lowercase();
        if let Some(i) = headers.iter().position(|h| h.trim().to_lowercase() == wanted) {
            return Some(i);
        }
    }
    None
}

/// Parse a weight cell from its leading numeric prefix (`"12.5 kg"` is 12.5,
/// `"1.5e3 kg"` is 1500).
///
/// Returns `None` when no number can be read or the value is not finite.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, kept only when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while matches!(bytes.get(exp_end), Some(b'0'..=b'9')) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read one source's records from CSV text.
///
/// A missing key column is an error. A missing weight column, or a weight
/// cell with no readable number, yields weight `0`. Rows with a blank key
/// are skipped and keys are trimmed.
pub fn load_csv_records(
    source: Source,
    csv_data: &str,
    aliases: &ColumnAliases,
) -> Result<Vec<SourceRecord>, ReconError> {
    let csv_err = |e: csv::Error| ReconError::Csv {
        source,
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let key_idx = resolve_column(&headers, &aliases.key).ok_or_else(|| ReconError::MissingColumn {
        source,
        candidates: aliases.key.clone(),
    })?;
    let weight_idx = resolve_column(&headers, &aliases.weight);
    if weight_idx.is_none() {
        tracing::warn!(%source, ?headers, "no weight column found; weights default to 0");
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;

        let key = record.get(key_idx).unwrap_or("").trim();
        if key.is_empty() {
            skipped += 1;
            continue;
        }

        let weight = match weight_idx.and_then(|i| record.get(i)) {
            Some(cell) => parse_weight(cell).unwrap_or_else(|| {
                if !cell.trim().is_empty() {
                    tracing::warn!(%source, key, cell, row = line + 2, "unreadable weight; using 0");
                }
                0.0
            }),
            None => 0.0,
        };

        records.push(SourceRecord::new(key, weight));
    }

    tracing::debug!(%source, records = records.len(), skipped, "source loaded");
    Ok(records)
}
