use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;
use wayfare_core::store::StoreResult;
use wayfare_core::{Booking, Flight, Record, Store, StoreError};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_FLIGHTS: &str = r#"
    CREATE TABLE IF NOT EXISTS flights (
        id SERIAL PRIMARY KEY,
        flight_number VARCHAR(255) NOT NULL,
        airline VARCHAR(255) NOT NULL,
        price DOUBLE PRECISION NOT NULL
    )
"#;

const CREATE_BOOKINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id SERIAL PRIMARY KEY,
        booking_id VARCHAR(255) NOT NULL,
        status VARCHAR(255) NOT NULL,
        price DOUBLE PRECISION NOT NULL
    )
"#;

/// PostgreSQL-backed store.
///
/// The pool connects lazily, so a store can be built before the database
/// accepts connections; `init_schema` is the first call that touches it.
pub struct PgStore {
    pool: PgPool,
    pending: Mutex<Vec<Record>>,
}

impl PgStore {
    /// Must be called from within a tokio runtime.
    pub fn new(database_url: &str) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Connection(format!("Invalid connection string: {}", e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn take_pending(&self) -> StoreResult<Vec<Record>> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| StoreError::Query("pending records lock poisoned".to_string()))?;
        Ok(std::mem::take(&mut *pending))
    }
}

async fn insert(tx: &mut Transaction<'_, Postgres>, record: &Record) -> StoreResult<()> {
    match record {
        Record::Flight(Flight {
            flight_number,
            airline,
            price,
        }) => {
            sqlx::query("INSERT INTO flights (flight_number, airline, price) VALUES ($1, $2, $3)")
                .bind(flight_number)
                .bind(airline)
                .bind(price)
                .execute(&mut **tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        Record::Booking(Booking {
            booking_id,
            status,
            price,
        }) => {
            sqlx::query("INSERT INTO bookings (booking_id, status, price) VALUES ($1, $2, $3)")
                .bind(booking_id)
                .bind(status)
                .bind(price)
                .execute(&mut **tx)
                .await
                .map_err(map_sqlx_error)?;
        }
    }
    Ok(())
}

/// Failures to reach the server are connection errors; everything else is a query error
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Connection(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn init_schema(&self) -> StoreResult<()> {
        tracing::debug!("Creating flights and bookings tables");

        sqlx::query(CREATE_FLIGHTS)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::query(CREATE_BOOKINGS)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn add(&self, record: Record) -> StoreResult<()> {
        self.pending
            .lock()
            .map_err(|_| StoreError::Query("pending records lock poisoned".to_string()))?
            .push(record);
        Ok(())
    }

    async fn commit(&self) -> StoreResult<usize> {
        // Staged records are dropped on failure, like a rolled back session
        let records = self.take_pending()?;
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        for record in &records {
            insert(&mut tx, record).await?;
        }
        tx.commit().await.map_err(map_sqlx_error)?;

        tracing::debug!("Committed {} records", records.len());
        Ok(records.len())
    }
}
