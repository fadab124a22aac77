pub mod loader;
pub mod memory_store;
pub mod postgres_store;
pub mod store;
pub mod table;

pub use loader::{IncrementalLoader, LoadOutcome};
pub use memory_store::MemoryStore;
pub use postgres_store::PgWarehouse;
pub use store::PersistentStore;
pub use table::{Column, SqlType, SqlValue, WarehouseTable};
