use crate::driver::{DriverResult, UiDriver};
use crate::error::DriverError;
use crate::{Error, Locator, Result};
use std::time::Duration;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fail-soft view of a driver session
///
/// Lookups never fail: a missing element is logged and comes back as `None`.
/// Actions are gated on the lookup and report whether they happened.
pub struct Page<'d, D: UiDriver> {
    driver: &'d D,
    timeout: Duration,
}

impl<'d, D: UiDriver> Page<'d, D> {
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn driver(&self) -> &'d D {
        self.driver
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for an element using the page's default timeout
    pub async fn safe_find(&self, locator: &Locator) -> Option<D::Handle> {
        self.safe_find_within(locator, self.timeout).await
    }

    pub async fn safe_find_within(&self, locator: &Locator, timeout: Duration) -> Option<D::Handle> {
        match self.driver.wait_for(locator, timeout).await {
            Ok(handle) => Some(handle),
            Err(DriverError::Timeout { .. }) => {
                tracing::error!("Element not found: {}", locator);
                None
            }
            Err(e) => {
                tracing::error!("Element not found: {} ({})", locator, e);
                None
            }
        }
    }

    /// Select an option by its visible text
    pub async fn select_option(&self, locator: &Locator, text: &str) -> DriverResult<bool> {
        let Some(element) = self.safe_find(locator).await else {
            return Ok(false);
        };
        self.driver.select_by_visible_text(&element, text).await?;
        Ok(true)
    }

    pub async fn click(&self, locator: &Locator) -> DriverResult<bool> {
        let Some(element) = self.safe_find(locator).await else {
            return Ok(false);
        };
        self.driver.click(&element).await?;
        Ok(true)
    }

    /// Clear an input and type `text` into it
    pub async fn fill_input(&self, locator: &Locator, text: &str) -> DriverResult<bool> {
        let Some(element) = self.safe_find(locator).await else {
            return Ok(false);
        };
        self.driver.clear_and_type(&element, text).await?;
        Ok(true)
    }

    /// Navigate to `url`; `false` when the site answered with a CAPTCHA
    pub async fn open_site(&self, url: &str) -> DriverResult<bool> {
        self.driver.navigate(url).await?;
        let source = self.driver.page_source().await?;
        if source.to_lowercase().contains("captcha") {
            tracing::error!("CAPTCHA detected, skipping...");
            return Ok(false);
        }
        Ok(true)
    }

    /// Read the text of a required element.
    ///
    /// A missing element fails with [`Error::MissingField`] naming `field`.
    pub async fn read_field(&self, field: &'static str, locator: &Locator) -> Result<String> {
        let element = self
            .safe_find(locator)
            .await
            .ok_or(Error::MissingField { field })?;
        let text = self.driver.read_text(&element).await?;
        Ok(text.trim().to_string())
    }
}
