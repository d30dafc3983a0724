//! `awbcheck-recon`: three-source AWB weight reconciliation.
//!
//! The engine ([`compare`]) is a pure function over pre-loaded records.
//! Ingestion, row queries and report export sit beside it and consume or
//! produce its types; none of them feed state back into a comparison.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod matcher;
pub mod model;
pub mod observer;
pub mod report;
pub mod summary;
pub mod view;

pub use config::ReconConfig;
pub use engine::{compare, compare_input, CompareOptions};
pub use error::ReconError;
pub use model::{
    ComparisonResult, ComparisonRow, ComparisonStats, Discrepancy, DuplicateInfo, ReconInput,
    Source, SourceRecord,
};
pub use observer::{NoopObserver, ReconObserver, TracingObserver};
