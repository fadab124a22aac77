use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::writers::table::WarehouseTable;

/// Storage surface the incremental loader runs against.
///
/// Implementations must canonicalize key values to text so the loader
/// can compare them against [`crate::writers::table::SqlValue::key_text`]
/// renderings of candidate rows.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Whether `table` already exists in the store.
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// All values currently held in `column` of `table`, rendered as
    /// text. Null cells are omitted.
    async fn read_key_column(&self, table: &str, column: &str) -> Result<HashSet<String>>;

    /// Append the table's rows, creating the table from the carried
    /// schema when it does not exist yet. Returns the number of rows
    /// written.
    async fn append_rows(&self, table: &WarehouseTable) -> Result<u64>;
}
