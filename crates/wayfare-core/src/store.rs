use crate::error::StoreError;
use crate::record::Record;
use crate::retry::{RetryPolicy, retry};
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence collaborator: stage records, then commit them as one batch
#[async_trait]
pub trait Store: Send + Sync {
    /// Create the `flights` and `bookings` tables if they do not exist
    async fn init_schema(&self) -> StoreResult<()>;

    /// Stage a record for the next commit
    async fn add(&self, record: Record) -> StoreResult<()>;

    /// Write every staged record; returns how many were written
    async fn commit(&self) -> StoreResult<usize>;
}

/// Initialise the schema, waiting for the database to come up.
pub async fn init_db<S: Store + ?Sized>(store: &S, policy: &RetryPolicy) -> crate::Result<()> {
    retry(policy, || async move {
        store.init_schema().await.inspect_err(|_| {
            tracing::info!("Database not ready, retrying...");
        })
    })
    .await
    .map_err(|exhausted| crate::Error::RetriesExhausted {
        attempts: exhausted.attempts,
        source: Box::new(exhausted.last_error.into()),
    })?;

    tracing::info!("Database initialized");
    Ok(())
}
