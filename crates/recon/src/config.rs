use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::CompareOptions;
use crate::error::ReconError;
use crate::ingest::ColumnAliases;
use crate::matcher::WEIGHT_MATCH_THRESHOLD;
use crate::model::Source;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub jaster: SourceConfig,
    pub cis: SourceConfig,
    pub unifikasi: SourceConfig,
}

impl SourcesConfig {
    pub fn get(&self, source: Source) -> &SourceConfig {
        match source {
            Source::Jaster => &self.jaster,
            Source::Cis => &self.cis,
            Source::Unifikasi => &self.unifikasi,
        }
    }
}

/// Where one source's records live and which headers name its columns.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    /// Overrides the default key header aliases.
    #[serde(default)]
    pub key_columns: Option<Vec<String>>,
    /// Overrides the default weight header aliases.
    #[serde(default)]
    pub weight_columns: Option<Vec<String>>,
}

impl SourceConfig {
    /// Configured aliases, falling back to the defaults for `source`.
    pub fn aliases(&self, source: Source) -> ColumnAliases {
        let defaults = ColumnAliases::defaults(source);
        ColumnAliases {
            key: self.key_columns.clone().unwrap_or(defaults.key),
            weight: self.weight_columns.clone().unwrap_or(defaults.weight),
        }
    }

    /// Resolve `file` relative to the config file's directory.
    pub fn path_from(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.file)
    }
}

// ---------------------------------------------------------------------------
// Tolerance + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    #[serde(default = "default_weight_tolerance")]
    pub weight: f64,
}

fn default_weight_tolerance() -> f64 {
    WEIGHT_MATCH_THRESHOLD
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            weight: WEIGHT_MATCH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub report_dir: Option<String>,
}

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let tol = self.tolerance.weight;
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.weight must be a positive number, got {tol}"
            )));
        }

        for source in Source::ALL {
            let sc = self.sources.get(source);
            if sc.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source {source}: file must not be empty"
                )));
            }
            check_aliases(source, "key_columns", sc.key_columns.as_deref())?;
            check_aliases(source, "weight_columns", sc.weight_columns.as_deref())?;
        }

        Ok(())
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            tolerance: self.tolerance.weight,
        }
    }
}

fn check_aliases(source: Source, field: &str, aliases: Option<&[String]>) -> Result<(), ReconError> {
    let Some(aliases) = aliases else {
        return Ok(());
    };
    if aliases.is_empty() {
        return Err(ReconError::ConfigValidation(format!(
            "source {source}: {field} must list at least one header"
        )));
    }
    if aliases.iter().any(|a| a.trim().is_empty()) {
        return Err(ReconError::ConfigValidation(format!(
            "source {source}: {field} contains a blank header"
        )));
    }
    Ok(())
}
