use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Failed to parse {field}: {source}")]
    Parse {
        field: &'static str,
        #[source]
        source: ParseError,
    },

    #[error("Step '{step}' did not complete: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by a UI driver backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    #[error("Timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    #[error("Could not connect to driver: {0}")]
    Connect(String),

    #[error("Driver command failed: {0}")]
    Command(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no digits in {0:?}")]
    NoDigits(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),
}

pub type Result<T> = std::result::Result<T, Error>;
