use crate::Locator;
use crate::error::DriverError;
use async_trait::async_trait;
use std::time::Duration;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Capabilities of a remote browser session
///
/// Implementations live in `wayfare-browser`. Workflows only ever talk to a
/// driver through this trait, usually wrapped in a [`crate::Page`].
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Opaque reference to an element on the current page
    type Handle: Send + Sync;

    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Block until the element appears, up to `timeout`.
    ///
    /// Must return [`DriverError::Timeout`] when the element never shows up.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> DriverResult<Self::Handle>;

    /// All elements currently matching `locator`, without waiting
    async fn find_all(&self, locator: &Locator) -> DriverResult<Vec<Self::Handle>>;

    /// All descendants of `parent` matching `locator`
    async fn find_within(
        &self,
        parent: &Self::Handle,
        locator: &Locator,
    ) -> DriverResult<Vec<Self::Handle>>;

    async fn read_text(&self, handle: &Self::Handle) -> DriverResult<String>;

    async fn click(&self, handle: &Self::Handle) -> DriverResult<()>;

    async fn select_by_visible_text(&self, handle: &Self::Handle, text: &str) -> DriverResult<()>;

    async fn clear_and_type(&self, handle: &Self::Handle, text: &str) -> DriverResult<()>;

    async fn page_source(&self) -> DriverResult<String>;

    /// End the remote session
    async fn quit(self) -> DriverResult<()>
    where
        Self: Sized;
}

/// Opens new driver sessions
#[async_trait]
pub trait DriverFactory: Send + Sync {
    type Driver: UiDriver;

    async fn connect(&self) -> DriverResult<Self::Driver>;
}
