use crate::driver::{DriverFactory, UiDriver};
use crate::Result;

/// Run `body` against a fresh driver session and always release it.
///
/// The session is quit on success and on failure alike. A failed quit is
/// logged and never replaces the body's own result.
pub async fn with_driver<F, T, B>(factory: &F, body: B) -> Result<T>
where
    F: DriverFactory + ?Sized,
    B: AsyncFnOnce(&F::Driver) -> Result<T>,
{
    let driver = factory.connect().await?;
    tracing::debug!("Driver session started");

    let result = body(&driver).await;

    match driver.quit().await {
        Ok(()) => tracing::debug!("Driver session closed"),
        Err(e) => tracing::warn!("Failed to close driver session: {}", e),
    }

    result
}
