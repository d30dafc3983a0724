//! `awbcheck run` / `awbcheck validate`: config-driven three-source reconciliation.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use awbcheck_recon::config::ReconConfig;
use awbcheck_recon::engine::compare_input;
use awbcheck_recon::ingest::load_csv_records;
use awbcheck_recon::report::write_report_dir;
use awbcheck_recon::view::{RowFilter, RowQuery, RowSort, DEFAULT_PAGE_SIZE};
use awbcheck_recon::{ComparisonResult, ComparisonRow, ReconError, ReconInput, Source, TracingObserver};

use crate::exit_codes::{EXIT_RECON_ISSUES, EXIT_RECON_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  awbcheck run daily.recon.toml
  awbcheck run daily.recon.toml --json
  awbcheck run daily.recon.toml --output result.json --report-dir report/
  awbcheck run daily.recon.toml --filter mismatches --limit 20
  awbcheck run daily.recon.toml --filter missing --sort cis:desc")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of the row listing
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides output.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write summary/detailed/issues CSVs here (overrides output.report_dir)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// List rows of one kind: all, mismatches, missing, perfect, duplicates (not with --json)
        #[arg(long)]
        filter: Option<RowFilter>,

        /// List rows whose AWB contains this text, case-insensitive (not with --json)
        #[arg(long)]
        search: Option<String>,

        /// Order of listed rows: key, jaster, cis or unifikasi, with optional :asc/:desc
        #[arg(long, default_value = "key")]
        sort: RowSort,

        /// Maximum rows to list
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  awbcheck validate daily.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run {
            config,
            json,
            output,
            report_dir,
            filter,
            search,
            sort,
            limit,
        } => cmd_recon_run(config, json, output, report_dir, filter, search, sort, limit),
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::io(format!("cannot read config {}: {e}", config_path.display()))
    })?;
    Ok(ReconConfig::from_toml(&config_str)?)
}

fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, CliError> {
    let load = |source: Source| -> Result<_, CliError> {
        let sc = config.sources.get(source);
        let path = sc.path_from(base_dir);
        let csv_data = std::fs::read_to_string(&path)
            .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
        let records = load_csv_records(source, &csv_data, &sc.aliases(source)).map_err(|e| {
            let hint = match &e {
                ReconError::MissingColumn { .. } => {
                    Some(format!("set sources.{} key_columns in the config", source_key(source)))
                }
                _ => None,
            };
            let err = CliError::from(e);
            match hint {
                Some(h) => err.with_hint(h),
                None => err,
            }
        })?;
        tracing::debug!(%source, path = %path.display(), records = records.len(), "loaded source");
        Ok(records)
    };

    Ok(ReconInput {
        jaster: load(Source::Jaster)?,
        cis: load(Source::Cis)?,
        unifikasi: load(Source::Unifikasi)?,
    })
}

fn source_key(source: Source) -> &'static str {
    match source {
        Source::Jaster => "jaster",
        Source::Cis => "cis",
        Source::Unifikasi => "unifikasi",
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_recon_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    report_dir: Option<PathBuf>,
    filter: Option<RowFilter>,
    search: Option<String>,
    sort: RowSort,
    limit: usize,
) -> Result<(), CliError> {
    if limit == 0 {
        return Err(CliError::args("--limit must be at least 1"));
    }
    let listing = filter.is_some() || search.is_some();
    if json_output && listing {
        return Err(CliError::args("--filter/--search cannot be combined with --json")
            .with_hint("use --output FILE for JSON alongside a row listing"));
    }

    let config = load_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_input(&config, base_dir)?;
    let result = compare_input(&input, &config.compare_options(), &TracingObserver);

    // Output
    let output_file = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result).map_err(|e| {
            CliError::new(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}"))
        })?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    let report_dir =
        report_dir.or_else(|| config.output.report_dir.as_ref().map(|p| base_dir.join(p)));
    if let Some(ref dir) = report_dir {
        let written = write_report_dir(dir, &result)?;
        eprintln!("wrote {} report files to {}", written.len(), dir.display());
    }

    if listing {
        print_rows(&result, filter.unwrap_or_default(), search, sort, limit);
    }

    // Human summary to stderr
    print_summary(&config.name, &result);

    let issues = result.issues().count();
    if issues > 0 {
        return Err(CliError::new(
            EXIT_RECON_ISSUES,
            format!("{issues} AWB(s) with discrepancies"),
        ));
    }

    Ok(())
}

fn print_summary(name: &str, result: &ComparisonResult) {
    let s = &result.stats;
    eprintln!(
        "{name}: {} AWBs, {} perfect ({:.1}%), {} weight mismatches ({:.1}%), {} in all three, {} in two sources, {} in one source ({:.1}%)",
        s.total_unique_awbs,
        s.perfect_matches,
        s.perfect_match_rate(),
        s.weight_mismatches,
        s.weight_mismatch_rate(),
        s.in_all_three,
        s.two_source_total(),
        s.single_source_total(),
        s.single_source_rate(),
    );

    let duplicates = result.rows.iter().filter(|r| r.has_duplicates).count();
    if duplicates > 0 {
        eprintln!("duplicates: {duplicates} AWB(s) with conflicting repeated weights");
    }
}

fn weight_text(weight: Option<f64>) -> String {
    weight.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string())
}

fn row_line(row: &ComparisonRow) -> String {
    let issues = row
        .discrepancies
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let weights: Vec<String> = Source::ALL
        .iter()
        .map(|s| weight_text(row.weight_by_source.get(*s)))
        .collect();
    format!(
        "{:<20} {:>10} {:>10} {:>10}  {}",
        row.key,
        weights[0],
        weights[1],
        weights[2],
        if issues.is_empty() { "ok" } else { issues.as_str() }
    )
}

fn print_rows(
    result: &ComparisonResult,
    filter: RowFilter,
    search: Option<String>,
    sort: RowSort,
    limit: usize,
) {
    let page = RowQuery {
        search,
        filter,
        sort: Some(sort),
        page: 1,
        page_size: limit,
    }
    .apply(&result.rows);

    println!(
        "{:<20} {:>10} {:>10} {:>10}  ISSUES",
        "AWB", "JASTER", "CIS", "UNIFIKASI"
    );
    for row in &page.rows {
        println!("{}", row_line(row));
    }
    eprintln!("showing {} of {} matching rows", page.rows.len(), page.total_matching);
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    eprintln!(
        "{}: valid (tolerance {}, sources {}, {}, {})",
        config.name,
        config.tolerance.weight,
        config.sources.jaster.file,
        config.sources.cis.file,
        config.sources.unifikasi.file,
    );
    Ok(())
}
