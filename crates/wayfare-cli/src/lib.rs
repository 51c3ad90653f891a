use clap::ValueEnum;
use wayfare_core::config::DriverBackend;

pub mod commands;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
        }
    }
}

/// Browser automation protocol selectable on the command line
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Backend {
    /// W3C WebDriver endpoint such as a Selenium hub
    Webdriver,
    /// Chrome DevTools Protocol endpoint
    Cdp,
}

impl From<Backend> for DriverBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Webdriver => DriverBackend::WebDriver,
            Backend::Cdp => DriverBackend::Cdp,
        }
    }
}
