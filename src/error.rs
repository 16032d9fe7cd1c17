//! Error types for device-stats.
//!
//! [`Error`] covers the conditions that abort a job. [`RecordError`] describes
//! a single malformed input record; those are reported and skipped, never
//! propagated out of the loader.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::config::YearMonth;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open input {}: {source}", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read header of {}", .path.display())]
    MissingHeader { path: PathBuf },

    #[error("cannot open output {}: {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no valid records from {since} onwards")]
    NoRecords { since: YearMonth },
}

/// Why an input record was dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("sensor {index} missing")]
    MissingSensor { index: usize },

    #[error("sensor {index} has invalid value {value:?}")]
    InvalidSensor { index: usize, value: String },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, Error>;
