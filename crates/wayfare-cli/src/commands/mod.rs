use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use wayfare_core::config::DriverBackend;
use wayfare_core::workflow::Passenger;
use wayfare_core::{RetryPolicy, Settings, StepOutcome, StepReport, Store, init_db};
use wayfare_store::{MemoryStore, PgStore};

/// Evaluate `$body` with `$factory` bound to the configured driver backend
macro_rules! with_factory {
    ($settings:expr, |$factory:ident| $body:expr) => {
        match $settings.driver.backend {
            wayfare_core::config::DriverBackend::WebDriver => {
                let $factory = wayfare_browser::WebDriverFactory::new(
                    $settings.driver.url.clone(),
                    $settings.driver.headless,
                );
                $body
            }
            wayfare_core::config::DriverBackend::Cdp => {
                let $factory = wayfare_browser::CdpFactory::new($settings.driver.url.clone());
                $body
            }
        }
    };
}

pub mod book;
pub mod config;
pub mod init_db;
pub mod run;
pub mod search;

/// Command-line flags that take precedence over file and environment settings
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<DriverBackend>,
    pub driver_url: Option<String>,
    pub headed: bool,
}

pub fn load_settings(config: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let mut settings = Settings::load(config).context("Failed to load settings")?;

    if let Some(backend) = overrides.backend {
        settings.driver.backend = backend;
    }
    if let Some(url) = &overrides.driver_url {
        settings.driver.url = url.clone();
    }
    if overrides.headed {
        settings.driver.headless = false;
    }

    tracing::debug!(
        "Using {} backend at {}",
        settings.driver.backend.as_str(),
        settings.driver.url
    );
    Ok(settings)
}

pub fn read_passenger(path: &Path) -> Result<Passenger> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read passenger file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid passenger file: {}", path.display()))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// The database, or memory for dry runs, with the schema in place
async fn open_store(settings: &Settings, dry_run: bool) -> Result<Box<dyn Store>> {
    let store: Box<dyn Store> = if dry_run {
        tracing::info!("Dry run: records are kept in memory");
        Box::new(MemoryStore::new())
    } else {
        tracing::info!(
            "Connecting to database at {}",
            settings.database.redacted_url()
        );
        Box::new(PgStore::new(&settings.database.database_url())?)
    };

    init_db(store.as_ref(), &RetryPolicy::database_startup()).await?;
    Ok(store)
}

fn print_steps(steps: &StepReport) {
    let skipped: Vec<_> = steps.skipped().collect();
    if skipped.is_empty() {
        return;
    }

    println!("\n{}", style("Skipped steps:").bold().yellow());
    for step in skipped {
        if let StepOutcome::Skipped(reason) = &step.outcome {
            println!("  {} {}", style(&step.name).yellow(), style(reason).dim());
        }
    }
}
