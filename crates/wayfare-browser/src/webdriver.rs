use crate::Error;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use wayfare_core::driver::DriverResult;
use wayfare_core::{DriverError, DriverFactory, Locator, LocatorKind, UiDriver};

/// Opens sessions on a W3C WebDriver endpoint such as a Selenium hub
pub struct WebDriverFactory {
    url: String,
    headless: bool,
}

impl WebDriverFactory {
    pub fn new(url: impl Into<String>, headless: bool) -> Self {
        Self {
            url: url.into(),
            headless,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Chrome capabilities for the new session
    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless");
        }

        let mut caps = serde_json::Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

#[async_trait]
impl DriverFactory for WebDriverFactory {
    type Driver = WebDriverSession;

    async fn connect(&self) -> DriverResult<WebDriverSession> {
        tracing::info!("Connecting to WebDriver at {}", self.url);

        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.url)
            .await
            .map_err(|e| Error::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!("WebDriver session established");
        Ok(WebDriverSession { client })
    }
}

/// One remote WebDriver session
pub struct WebDriverSession {
    client: Client,
}

/// Owned form of a locator in fantoccini's vocabulary.
///
/// WebDriver has no "by name" or "by tag" strategy, so those go through CSS.
#[derive(Debug, PartialEq)]
enum Target {
    Id(String),
    Css(String),
}

impl Target {
    fn from_locator(locator: &Locator) -> Self {
        match locator.kind {
            LocatorKind::Id => Target::Id(locator.value.clone()),
            _ => Target::Css(locator.to_css()),
        }
    }

    fn as_locator(&self) -> fantoccini::Locator<'_> {
        match self {
            Target::Id(id) => fantoccini::Locator::Id(id),
            Target::Css(css) => fantoccini::Locator::Css(css),
        }
    }
}

#[async_trait]
impl UiDriver for WebDriverSession {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        tracing::debug!("Navigating to {}", url);
        self.client.goto(url).await.map_err(Error::from)?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> DriverResult<Element> {
        let target = Target::from_locator(locator);
        let result = self
            .client
            .wait()
            .at_most(timeout)
            .for_element(target.as_locator())
            .await;

        match result {
            Ok(element) => Ok(element),
            Err(fantoccini::error::CmdError::WaitTimeout) => Err(DriverError::Timeout {
                locator: locator.to_string(),
                timeout,
            }),
            Err(e) => Err(Error::from(e).into()),
        }
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Element>> {
        let target = Target::from_locator(locator);
        let elements = self
            .client
            .find_all(target.as_locator())
            .await
            .map_err(Error::from)?;
        Ok(elements)
    }

    async fn find_within(&self, parent: &Element, locator: &Locator) -> DriverResult<Vec<Element>> {
        let target = Target::from_locator(locator);
        let elements = parent
            .find_all(target.as_locator())
            .await
            .map_err(Error::from)?;
        Ok(elements)
    }

    async fn read_text(&self, handle: &Element) -> DriverResult<String> {
        Ok(handle.text().await.map_err(Error::from)?)
    }

    async fn click(&self, handle: &Element) -> DriverResult<()> {
        handle.click().await.map_err(Error::from)?;
        Ok(())
    }

    async fn select_by_visible_text(&self, handle: &Element, text: &str) -> DriverResult<()> {
        handle.select_by_label(text).await.map_err(Error::from)?;
        Ok(())
    }

    async fn clear_and_type(&self, handle: &Element, text: &str) -> DriverResult<()> {
        handle.clear().await.map_err(Error::from)?;
        handle.send_keys(text).await.map_err(Error::from)?;
        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        Ok(self.client.source().await.map_err(Error::from)?)
    }

    async fn quit(self) -> DriverResult<()> {
        self.client.close().await.map_err(Error::from)?;
        tracing::debug!("WebDriver session closed");
        Ok(())
    }
}
