//! Tabular report export: summary, full detail, and issues-only tables.

use std::path::{Path, PathBuf};

use crate::error::ReconError;
use crate::model::{ComparisonResult, ComparisonRow, Source};

pub const SUMMARY_FILE: &str = "summary.csv";
pub const DETAILED_FILE: &str = "detailed.csv";
pub const ISSUES_FILE: &str = "issues.csv";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn weight_cell(weight: Option<f64>) -> String {
    weight.map(|w| w.to_string()).unwrap_or_default()
}

fn issues_cell(row: &ComparisonRow) -> String {
    if row.discrepancies.is_empty() {
        return "None".to_string();
    }
    row.discrepancies
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ReconError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReconError::Report(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReconError::Report(e.to_string()))
}

fn report_err(e: csv::Error) -> ReconError {
    ReconError::Report(e.to_string())
}

/// Two-column `metric,value` table of the aggregate counters.
pub fn summary_csv(result: &ComparisonResult) -> Result<String, ReconError> {
    let s = &result.stats;
    let mut w = writer();

    let rows: Vec<(&str, String)> = vec![
        ("Generated", result.generated_at.to_rfc3339()),
        ("Total Unique AWBs", s.total_unique_awbs.to_string()),
        ("Perfect Matches", s.perfect_matches.to_string()),
        ("Weight Mismatches", s.weight_mismatches.to_string()),
        ("In All Three Sources", s.in_all_three.to_string()),
        ("Match Rate (%)", format!("{:.1}", s.perfect_match_rate())),
        ("JASTER Only", s.in_jaster_only.to_string()),
        ("CIS Only", s.in_cis_only.to_string()),
        ("UNIFIKASI Only", s.in_unifikasi_only.to_string()),
        ("JASTER & CIS", s.in_jaster_and_cis.to_string()),
        ("JASTER & UNIFIKASI", s.in_jaster_and_unifikasi.to_string()),
        ("CIS & UNIFIKASI", s.in_cis_and_unifikasi.to_string()),
    ];

    w.write_record(["Metric", "Value"]).map_err(report_err)?;
    for (metric, value) in rows {
        w.write_record([metric, value.as_str()]).map_err(report_err)?;
    }
    finish(w)
}

/// One line per row with weights, presence, match and issues.
pub fn detailed_csv(rows: &[ComparisonRow]) -> Result<String, ReconError> {
    let mut w = writer();

    let mut header = vec!["AWB Number".to_string()];
    header.extend(Source::ALL.iter().map(|s| format!("{s} Weight")));
    header.extend(Source::ALL.iter().map(|s| format!("In {s}")));
    header.extend(["Weight Match", "Duplicates", "Issues"].map(String::from));
    w.write_record(&header).map_err(report_err)?;

    for row in rows {
        let mut record = vec![row.key.clone()];
        record.extend(Source::ALL.iter().map(|s| weight_cell(row.weight_by_source.get(*s))));
        record.extend(
            Source::ALL
                .iter()
                .map(|s| yes_no(row.presence.contains(*s)).to_string()),
        );
        record.push(yes_no(row.weights_match).to_string());
        record.push(yes_no(row.has_duplicates).to_string());
        record.push(issues_cell(row));
        w.write_record(&record).map_err(report_err)?;
    }
    finish(w)
}

/// Rows with at least one discrepancy.
pub fn issues_csv(rows: &[ComparisonRow]) -> Result<String, ReconError> {
    let mut w = writer();

    let mut header = vec!["AWB Number".to_string()];
    header.extend(Source::ALL.iter().map(|s| format!("{s} Weight")));
    header.push("Issues".to_string());
    w.write_record(&header).map_err(report_err)?;

    for row in rows.iter().filter(|r| !r.is_clean()) {
        let mut record = vec![row.key.clone()];
        record.extend(Source::ALL.iter().map(|s| weight_cell(row.weight_by_source.get(*s))));
        record.push(issues_cell(row));
        w.write_record(&record).map_err(report_err)?;
    }
    finish(w)
}

/// Write the three report tables into `dir`, creating it if needed.
pub fn write_report_dir(dir: &Path, result: &ComparisonResult) -> Result<Vec<PathBuf>, ReconError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ReconError::Io(format!("cannot create {}: {e}", dir.display())))?;

    let tables = [
        (SUMMARY_FILE, summary_csv(result)?),
        (DETAILED_FILE, detailed_csv(&result.rows)?),
        (ISSUES_FILE, issues_csv(&result.rows)?),
    ];

    let mut written = Vec::with_capacity(tables.len());
    for (name, contents) in tables {
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", path.display())))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compare;
    use crate::model::SourceRecord;

    fn result() -> ComparisonResult {
        let r = |k: &str, w: f64| SourceRecord::new(k, w);
        compare(
            &[r("A", 12.0), r("B", 3.5)],
            &[r("A", 12.0), r("B", 4.0)],
            &[r("A", 12.0)],
        )
    }

    #[test]
    fn detailed_table() {
        let csv = detailed_csv(&result().rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "AWB Number,JASTER Weight,CIS Weight,UNIFIKASI Weight,In JASTER,In CIS,In UNIFIKASI,Weight Match,Duplicates,Issues"
        );
        assert_eq!(lines[1], "A,12,12,12,Yes,Yes,Yes,Yes,No,None");
        assert_eq!(
            lines[2],
            "B,3.5,4,,Yes,Yes,No,No,No,\"Missing in UNIFIKASI, Weight mismatch\""
        );
    }

    #[test]
    fn issues_table_skips_clean_rows() {
        let csv = issues_csv(&result().rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("B,3.5,4,,"));
    }

    #[test]
    fn summary_table() {
        let csv = summary_csv(&result()).unwrap();
        assert!(csv.contains("Total Unique AWBs,2\n"));
        assert!(csv.contains("Perfect Matches,1\n"));
        assert!(csv.contains("Match Rate (%),50.0\n"));
        assert!(csv.contains("JASTER & CIS,1\n"));
    }

    #[test]
    fn empty_summary_has_zero_rate() {
        let csv = summary_csv(&compare(&[], &[], &[])).unwrap();
        assert!(csv.contains("Match Rate (%),0.0\n"));
    }

    #[test]
    fn writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report");
        let written = write_report_dir(&out, &result()).unwrap();
        assert_eq!(written.len(), 3);
        for name in [SUMMARY_FILE, DETAILED_FILE, ISSUES_FILE] {
            assert!(out.join(name).is_file(), "{name} missing");
        }
    }
}
