//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success, every AWB clean                             |
//! | 1    | Reconciliation ran and found discrepancies           |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | Config could not be parsed or failed validation      |
//! | 4    | Runtime failure (unreadable input, bad CSV, writes)  |

/// Success - command completed and nothing needs attention.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one AWB is missing from a source, mismatched, or duplicated.
/// Like `diff(1)`, exit 1 means "sources differ."
pub const EXIT_RECON_ISSUES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config parse or validation error.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// IO, CSV or report failure while running.
pub const EXIT_RECON_RUNTIME: u8 = 4;

use awbcheck_recon::ReconError;

/// Map a library error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::MissingColumn { .. }
        | ReconError::Csv { .. }
        | ReconError::Report(_)
        | ReconError::Io(_) => EXIT_RECON_RUNTIME,
    }
}
