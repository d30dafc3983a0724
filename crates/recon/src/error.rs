use std::fmt;

use crate::model::Source;

/// Failures from the code around the engine. The comparison itself is
/// infallible.
#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty file path, bad tolerance, etc.).
    ConfigValidation(String),
    /// None of the accepted header aliases were found.
    MissingColumn { source: Source, candidates: Vec<String> },
    /// Malformed delimited input.
    Csv { source: Source, message: String },
    /// Report rendering error.
    Report(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, candidates } => {
                write!(
                    f,
                    "source {source}: missing key column (expected one of: {})",
                    candidates.join(", ")
                )
            }
            Self::Csv { source, message } => write!(f, "source {source}: {message}"),
            Self::Report(msg) => write!(f, "report error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
