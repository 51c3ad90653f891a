use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use wayfare_core::store::StoreResult;
use wayfare_core::{Booking, Flight, Record, Store, StoreError};

/// In-process store, used for dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    schema_ready: AtomicBool,
    pending: Mutex<Vec<Record>>,
    committed: Mutex<Vec<Record>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Query("store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::SeqCst)
    }

    /// Every committed record, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.committed
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn flights(&self) -> Vec<Flight> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::Flight(flight) => Some(flight),
                Record::Booking(_) => None,
            })
            .collect()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::Booking(booking) => Some(booking),
                Record::Flight(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn init_schema(&self) -> StoreResult<()> {
        self.schema_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn add(&self, record: Record) -> StoreResult<()> {
        self.pending.lock().map_err(poisoned)?.push(record);
        Ok(())
    }

    async fn commit(&self) -> StoreResult<usize> {
        let mut staged = std::mem::take(&mut *self.pending.lock().map_err(poisoned)?);
        let count = staged.len();
        self.committed.lock().map_err(poisoned)?.append(&mut staged);

        tracing::debug!("Committed {} records in memory", count);
        Ok(count)
    }
}
