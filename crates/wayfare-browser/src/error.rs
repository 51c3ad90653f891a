use thiserror::Error;
use wayfare_core::DriverError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("Could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<fantoccini::error::CmdError> for Error {
    fn from(err: fantoccini::error::CmdError) -> Self {
        match err {
            fantoccini::error::CmdError::WaitTimeout => Error::Timeout(err.to_string()),
            other => Error::WebDriver(other.to_string()),
        }
    }
}

impl From<Error> for DriverError {
    fn from(err: Error) -> Self {
        match err {
            Error::Connect { .. } => DriverError::Connect(err.to_string()),
            other => DriverError::Command(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
