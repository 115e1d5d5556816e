//! Error types shared across the engine and the collectors.
//!
//! The taxonomy follows how far a failure is allowed to reach:
//! - [`SourceError`] aborts the current poll of one collector.
//! - [`ParseError`], [`RowError`], [`ConvertError`] and [`AssembleError`] cost one
//!   line, row or entity. They are logged and the rest of the poll continues.
//! - [`ConfigError`] and [`HostError`] happen at startup, before any poll.

use thiserror::Error;

/// The raw stat source could not be opened or read.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The command could not be started at all.
    #[error("cannot run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but reported failure.
    #[error("{command} exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The command produced output that is not UTF-8.
    #[error("{command} produced non-UTF-8 output")]
    Encoding { command: String },

    /// A file-backed source could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A line of `kstat -p` output that could not be understood.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("kstat line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, msg: impl Into<String>) -> Self {
        Self {
            line,
            message: msg.into(),
        }
    }
}

/// A data row of tabular output that does not fit the header.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("row {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A raw encoding could not be turned into a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("'{text}' does not end with '{suffix}'")]
    MissingSuffix { text: String, suffix: char },

    #[error("'{text}' is not a number")]
    InvalidNumber { text: String },

    #[error("'{text}' has an unknown size suffix")]
    UnknownSuffix { text: String },

    #[error("cannot convert a non-numeric value '{text}'")]
    NotNumeric { text: String },
}

/// One entity could not be assembled into a metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssembleError {
    /// A stat explicitly selected as a field carries a string value.
    #[error("field '{field}' of {entity} holds text '{value}', expected a number")]
    TypeMismatch {
        entity: String,
        field: String,
        value: String,
    },

    #[error("field '{field}' of {entity}: {source}")]
    Conversion {
        entity: String,
        field: String,
        #[source]
        source: ConvertError,
    },
}

/// Error returned by a collector's `gather`.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output that must have a fixed shape did not (e.g. `swap -s`).
    #[error("unexpected output from {command}: {message}")]
    Output { command: String, message: String },
}

/// Configuration file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Host facts that must be known before the first poll.
#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("page size '{0}' is not a positive integer")]
    PageSize(String),

    #[error("zone name is empty")]
    ZoneName,
}
