use crate::retry::RetryPolicy;
use crate::steps::StepPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "https://blazedemo.com";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://selenium:4444/wd/hub";

/// Complete runtime configuration
///
/// Every field has a default, so an empty (or absent) config file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub driver: DriverSettings,
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "wayfare".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseSettings {
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    /// Same as [`Self::database_url`] but with the password masked
    pub fn redacted_url(&self) -> String {
        match &self.url {
            Some(url) => match url::Url::parse(url) {
                Ok(mut parsed) if parsed.password().is_some() => {
                    let _ = parsed.set_password(Some("****"));
                    parsed.to_string()
                }
                _ => url.clone(),
            },
            None => format!(
                "postgresql://{}:****@{}:{}/{}",
                self.user, self.host, self.port, self.name
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverBackend {
    /// W3C WebDriver, e.g. a Selenium hub
    #[default]
    WebDriver,
    /// Chrome DevTools Protocol
    Cdp,
}

impl DriverBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverBackend::WebDriver => "webdriver",
            DriverBackend::Cdp => "cdp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub backend: DriverBackend,
    pub url: String,
    pub headless: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            backend: DriverBackend::WebDriver,
            url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub site_url: String,
    #[serde(with = "humantime_serde")]
    pub lookup_timeout: Duration,
    pub retry: RetryPolicy,
    pub step_policy: StepPolicy,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            lookup_timeout: crate::page::DEFAULT_LOOKUP_TIMEOUT,
            retry: RetryPolicy::default(),
            step_policy: StepPolicy::Continue,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading settings from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Override fields from environment-style variables.
    ///
    /// Recognised keys: `DATABASE_URL`, `POSTGRES_HOST`, `POSTGRES_PORT`,
    /// `POSTGRES_DB`, `POSTGRES_USER`, `POSTGRES_PASSWORD`,
    /// `WAYFARE_DRIVER_URL` and `WAYFARE_HEADLESS`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = &mut self.database;
        if let Some(url) = lookup("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(host) = lookup("POSTGRES_HOST") {
            db.host = host;
        }
        if let Some(port) = lookup("POSTGRES_PORT") {
            db.port = port
                .parse()
                .map_err(|_| Error::Config(format!("POSTGRES_PORT is not a port: {}", port)))?;
        }
        if let Some(name) = lookup("POSTGRES_DB") {
            db.name = name;
        }
        if let Some(user) = lookup("POSTGRES_USER") {
            db.user = user;
        }
        if let Some(password) = lookup("POSTGRES_PASSWORD") {
            db.password = password;
        }

        if let Some(url) = lookup("WAYFARE_DRIVER_URL") {
            self.driver.url = url;
        }
        if let Some(headless) = lookup("WAYFARE_HEADLESS") {
            self.driver.headless = match headless.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(Error::Config(format!(
                        "WAYFARE_HEADLESS must be true or false, got {}",
                        other
                    )));
                }
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.driver.url, DEFAULT_WEBDRIVER_URL);
        assert!(settings.driver.headless);
        assert_eq!(settings.workflow.site_url, DEFAULT_SITE_URL);
        assert_eq!(settings.workflow.lookup_timeout, Duration::from_secs(10));
        assert_eq!(settings.workflow.retry.times(), 3);
        assert_eq!(settings.workflow.step_policy, StepPolicy::Continue);
    }

    #[test]
    fn test_database_url_from_parts() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[
                ("POSTGRES_HOST", "db"),
                ("POSTGRES_PORT", "5433"),
                ("POSTGRES_DB", "flights"),
                ("POSTGRES_USER", "app"),
                ("POSTGRES_PASSWORD", "secret"),
            ]))
            .unwrap();

        assert_eq!(
            settings.database.database_url(),
            "postgresql://app:secret@db:5433/flights"
        );
        assert_eq!(
            settings.database.redacted_url(),
            "postgresql://app:****@db:5433/flights"
        );
    }

    #[test]
    fn test_database_url_override() {
        let mut settings = Settings::default();
        settings
            .apply_env(env(&[
                ("DATABASE_URL", "postgresql://u:pw@remote:5432/x"),
                ("POSTGRES_HOST", "ignored"),
            ]))
            .unwrap();

        assert_eq!(
            settings.database.database_url(),
            "postgresql://u:pw@remote:5432/x"
        );
        assert!(!settings.database.redacted_url().contains("pw"));
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let mut settings = Settings::default();
        let result = settings.apply_env(env(&[("POSTGRES_PORT", "abc")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_headless_flag() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[("WAYFARE_HEADLESS", "false")])).unwrap();
        assert!(!settings.driver.headless);

        let result = settings.apply_env(env(&[("WAYFARE_HEADLESS", "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = Settings::from_toml(
            r#"
            [driver]
            backend = "cdp"
            url = "http://localhost:9222"

            [workflow]
            lookup_timeout = "3s"
            step_policy = "abort"

            [workflow.retry]
            times = 5
            delay = "1s"
            "#,
        )
        .unwrap();

        assert_eq!(settings.driver.backend, DriverBackend::Cdp);
        assert_eq!(settings.driver.url, "http://localhost:9222");
        assert!(settings.driver.headless);
        assert_eq!(settings.workflow.lookup_timeout, Duration::from_secs(3));
        assert_eq!(settings.workflow.step_policy, StepPolicy::Abort);
        assert_eq!(settings.workflow.retry.times(), 5);
        assert_eq!(settings.workflow.site_url, DEFAULT_SITE_URL);
        assert_eq!(settings.database, DatabaseSettings::default());
    }

    #[test]
    fn test_from_toml_rejects_zero_retries() {
        let result = Settings::from_toml("[workflow.retry]\ntimes = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(file, "[database]\nhost = \"pg\"\nname = \"demo\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.database.host, "pg");
        assert_eq!(settings.database.name, "demo");
        assert_eq!(settings.database.port, 5432);
    }
}
