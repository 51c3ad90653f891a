use crate::Error;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use wayfare_core::driver::DriverResult;
use wayfare_core::{DriverError, DriverFactory, Locator, UiDriver};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Attaches to a Chrome instance started with `--remote-debugging-port`
pub struct CdpFactory {
    endpoint: String,
}

impl CdpFactory {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn connect_browser(&self) -> crate::Result<(Browser, chromiumoxide::Handler)> {
        let mut attempt = 1;
        loop {
            tracing::debug!("Attempting CDP connection to {}...", self.endpoint);
            match Browser::connect(&self.endpoint).await {
                Ok(result) => {
                    tracing::info!("CDP connection established");
                    return Ok(result);
                }
                Err(e) if attempt >= CONNECT_ATTEMPTS => {
                    return Err(Error::Connect {
                        url: self.endpoint.clone(),
                        reason: format!("{} (after {} attempts)", e, attempt),
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        "CDP connection attempt {} failed, retrying: {}",
                        attempt,
                        e
                    );
                    attempt += 1;
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                }
            }
        }
    }
}

#[async_trait]
impl DriverFactory for CdpFactory {
    type Driver = CdpSession;

    async fn connect(&self) -> DriverResult<CdpSession> {
        tracing::info!("Connecting to Chrome DevTools at {}", self.endpoint);

        let (browser, mut handler) = self.connect_browser().await?;

        // Commands only resolve while the handler is being polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(Error::from(e).into());
            }
        };

        Ok(CdpSession {
            browser,
            page,
            handler_task,
        })
    }
}

/// One page in a DevTools-controlled browser
pub struct CdpSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

/// Picks the `<option>` whose visible text matches and fires `change`
fn select_script(label: &str) -> String {
    format!(
        r#"function() {{
    const label = {label};
    const option = Array.from(this.options || []).find(o => o.text.trim() === label);
    if (!option) {{
        return false;
    }}
    this.value = option.value;
    this.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}}"#,
        label = json!(label)
    )
}

const CLEAR_SCRIPT: &str = "function() { this.value = ''; }";

#[async_trait]
impl UiDriver for CdpSession {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await.map_err(Error::from)?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> DriverResult<Element> {
        let selector = locator.to_css();
        let deadline = Instant::now() + timeout;

        loop {
            match self.page.find_element(selector.as_str()).await {
                Ok(element) => return Ok(element),
                Err(e) => {
                    if Instant::now() >= deadline {
                        tracing::debug!("Last lookup error for {}: {}", locator, e);
                        return Err(DriverError::Timeout {
                            locator: locator.to_string(),
                            timeout,
                        });
                    }
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Element>> {
        let elements = self
            .page
            .find_elements(locator.to_css())
            .await
            .map_err(Error::from)?;
        Ok(elements)
    }

    async fn find_within(&self, parent: &Element, locator: &Locator) -> DriverResult<Vec<Element>> {
        let elements = parent
            .find_elements(locator.to_css())
            .await
            .map_err(Error::from)?;
        Ok(elements)
    }

    async fn read_text(&self, handle: &Element) -> DriverResult<String> {
        let text = handle.inner_text().await.map_err(Error::from)?;
        Ok(text.unwrap_or_default())
    }

    async fn click(&self, handle: &Element) -> DriverResult<()> {
        handle.click().await.map_err(Error::from)?;
        // Form submits start a navigation that chromiumoxide does not wait for
        self.page.wait_for_navigation().await.map_err(Error::from)?;
        Ok(())
    }

    async fn select_by_visible_text(&self, handle: &Element, text: &str) -> DriverResult<()> {
        let returns = handle
            .call_js_fn(select_script(text), false)
            .await
            .map_err(Error::from)?;

        match returns.result.value {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            _ => Err(Error::Browser(format!("No option with text '{}'", text)).into()),
        }
    }

    async fn clear_and_type(&self, handle: &Element, text: &str) -> DriverResult<()> {
        handle
            .call_js_fn(CLEAR_SCRIPT, false)
            .await
            .map_err(Error::from)?;
        handle.focus().await.map_err(Error::from)?;
        handle.type_str(text).await.map_err(Error::from)?;
        Ok(())
    }

    async fn page_source(&self) -> DriverResult<String> {
        Ok(self.page.content().await.map_err(Error::from)?)
    }

    async fn quit(self) -> DriverResult<()> {
        let CdpSession {
            browser,
            page,
            handler_task,
        } = self;

        // Chrome belongs to whoever started it; only this session's page is closed
        let closed = page.close().await;
        handler_task.abort();
        drop(browser);
        closed.map_err(Error::from)?;

        tracing::debug!("CDP session closed");
        Ok(())
    }
}
