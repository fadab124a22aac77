use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{PipelineError, Result};
use crate::writers::store::PersistentStore;
use crate::writers::table::{Column, SqlValue, WarehouseTable};

/// In-memory warehouse used by preview runs and tests. Mirrors the
/// PostgreSQL store's observable behavior: tables are created on first
/// append, appends against a table with different columns are schema
/// mismatches, and key reads canonicalize values to text.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, MemoryTable>>,
}

#[derive(Debug, Clone)]
struct MemoryTable {
    columns: Vec<Column>,
    rows: Vec<Vec<SqlValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently held for `table`; zero when the table does not
    /// exist.
    pub async fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.lock().await;
        tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Names of all created tables, sorted.
    pub async fn table_names(&self) -> Vec<String> {
        let tables = self.tables.lock().await;
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.contains_key(table))
    }

    async fn read_key_column(&self, table: &str, column: &str) -> Result<HashSet<String>> {
        let tables = self.tables.lock().await;
        let stored = tables.get(table).ok_or_else(|| {
            PipelineError::StoreUnavailable(format!("relation {table} does not exist"))
        })?;

        let index = stored
            .columns
            .iter()
            .position(|c| c.name == column)
            .ok_or_else(|| PipelineError::SchemaMismatch {
                table: table.to_string(),
                detail: format!("column {column} does not exist"),
            })?;

        Ok(stored
            .rows
            .iter()
            .filter(|row| row[index] != SqlValue::Null)
            .map(|row| row[index].key_text())
            .collect())
    }

    async fn append_rows(&self, table: &WarehouseTable) -> Result<u64> {
        if table.is_empty() {
            return Ok(0);
        }

        let mut tables = self.tables.lock().await;
        let stored = tables.entry(table.name.clone()).or_insert_with(|| MemoryTable {
            columns: table.columns.clone(),
            rows: Vec::new(),
        });

        if stored.columns != table.columns {
            return Err(PipelineError::SchemaMismatch {
                table: table.name.clone(),
                detail: "candidate columns do not match the stored table".to_string(),
            });
        }

        stored.rows.extend(table.rows.iter().cloned());
        Ok(table.rows.len() as u64)
    }
}
