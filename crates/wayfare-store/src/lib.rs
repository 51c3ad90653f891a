//! Persistence backends for the `wayfare_core::Store` trait

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
