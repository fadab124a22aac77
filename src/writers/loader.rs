use std::collections::HashSet;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::WarehouseBatch;
use crate::utils::dedup_first_by;
use crate::writers::store::PersistentStore;
use crate::writers::table::WarehouseTable;

/// Append-only loader that keeps the warehouse free of duplicate keys.
///
/// Per table the protocol is: deduplicate candidate rows by key (first
/// occurrence wins), ask the store which keys it already holds, drop
/// those, append the remainder. The read and the append are separate
/// statements; a concurrent writer on the same table can still slip
/// duplicates in between them.
pub struct IncrementalLoader<'a> {
    store: &'a dyn PersistentStore,
}

/// What one table-level load did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub table: String,
    /// Candidate rows handed to the loader.
    pub candidates: usize,
    /// Rows dropped because an earlier candidate carried the same key.
    pub batch_duplicates: usize,
    /// Rows dropped because their key was already in the store.
    pub already_present: usize,
    /// Rows actually appended.
    pub written: u64,
    /// Whether this load brought the table into existence.
    pub created_table: bool,
}

impl LoadOutcome {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} candidates, {} duplicate in batch, {} already present, {} appended",
            self.table, self.candidates, self.batch_duplicates, self.already_present, self.written
        )
    }
}

impl<'a> IncrementalLoader<'a> {
    pub fn new(store: &'a dyn PersistentStore) -> Self {
        Self { store }
    }

    /// Load one candidate table.
    pub async fn load_table(&self, table: &WarehouseTable) -> Result<LoadOutcome> {
        let key_index = table.key_index().ok_or_else(|| PipelineError::SchemaMismatch {
            table: table.name.clone(),
            detail: format!("key column {} missing from candidate columns", table.key_column),
        })?;

        let candidates = table.len();
        let deduped = dedup_first_by(table.rows.clone(), |row| row[key_index].key_text());
        let batch_duplicates = candidates - deduped.len();

        let exists = self.store.table_exists(&table.name).await?;
        let existing = if exists {
            self.store.read_key_column(&table.name, table.key_column).await?
        } else {
            HashSet::new()
        };

        let deduped_len = deduped.len();
        let fresh: Vec<_> = deduped
            .into_iter()
            .filter(|row| !existing.contains(&row[key_index].key_text()))
            .collect();
        let already_present = deduped_len - fresh.len();

        let written = if fresh.is_empty() {
            0
        } else {
            let batch = WarehouseTable {
                name: table.name.clone(),
                key_column: table.key_column,
                columns: table.columns.clone(),
                rows: fresh,
            };
            self.store.append_rows(&batch).await?
        };

        let outcome = LoadOutcome {
            table: table.name.clone(),
            candidates,
            batch_duplicates,
            already_present,
            written,
            created_table: !exists && written > 0,
        };

        info!(
            stage = "load",
            table = %outcome.table,
            candidates = outcome.candidates,
            batch_duplicates = outcome.batch_duplicates,
            already_present = outcome.already_present,
            written = outcome.written,
            created_table = outcome.created_table,
            "table load complete"
        );

        Ok(outcome)
    }

    /// Load every table of a transformed batch, dimensions first. Any
    /// table-level failure aborts the run; tables already loaded stay
    /// loaded, and a rerun skips their rows by key.
    pub async fn load_batch(&self, batch: &WarehouseBatch) -> Result<Vec<LoadOutcome>> {
        let plan = WarehouseTable::plan(batch);
        let mut outcomes = Vec::with_capacity(plan.len());
        for table in &plan {
            outcomes.push(self.load_table(table).await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityRow;
    use crate::writers::memory_store::MemoryStore;
    use crate::writers::table::{Column, SqlType, SqlValue};

    fn city_table(indices: &[i64]) -> WarehouseTable {
        let rows = indices
            .iter()
            .map(|idx| CityRow {
                idx: *idx,
                city_name: Some(format!("city-{idx}")),
                city: None,
            })
            .collect::<Vec<_>>();
        WarehouseTable::city(&rows)
    }

    #[tokio::test]
    async fn test_first_load_creates_table_and_writes_all() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);

        let outcome = loader.load_table(&city_table(&[1, 2, 3])).await.unwrap();

        assert_eq!(outcome.candidates, 3);
        assert_eq!(outcome.batch_duplicates, 0);
        assert_eq!(outcome.already_present, 0);
        assert_eq!(outcome.written, 3);
        assert!(outcome.created_table);
        assert_eq!(store.row_count("city_table").await, 3);
    }

    #[tokio::test]
    async fn test_second_identical_load_writes_nothing() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);
        let table = city_table(&[1, 2, 3]);

        loader.load_table(&table).await.unwrap();
        let outcome = loader.load_table(&table).await.unwrap();

        assert_eq!(outcome.already_present, 3);
        assert_eq!(outcome.written, 0);
        assert!(!outcome.created_table);
        assert_eq!(store.row_count("city_table").await, 3);
    }

    #[tokio::test]
    async fn test_overlapping_load_appends_only_new_keys() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);

        loader.load_table(&city_table(&[1, 2])).await.unwrap();
        let outcome = loader.load_table(&city_table(&[2, 3])).await.unwrap();

        assert_eq!(outcome.already_present, 1);
        assert_eq!(outcome.written, 1);
        assert_eq!(store.row_count("city_table").await, 3);
    }

    #[tokio::test]
    async fn test_duplicate_keys_within_batch_keep_first() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);

        let outcome = loader.load_table(&city_table(&[5, 5, 5, 6])).await.unwrap();

        assert_eq!(outcome.candidates, 4);
        assert_eq!(outcome.batch_duplicates, 2);
        assert_eq!(outcome.written, 2);
        assert_eq!(store.row_count("city_table").await, 2);
    }

    #[tokio::test]
    async fn test_empty_candidates_do_not_create_table() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);

        let outcome = loader.load_table(&city_table(&[])).await.unwrap();

        assert_eq!(outcome.written, 0);
        assert!(!outcome.created_table);
        assert!(!store.table_exists("city_table").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_key_column_is_schema_mismatch() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);
        let table = WarehouseTable {
            name: "city_table".to_string(),
            key_column: "idx",
            columns: vec![Column::new("city_name", SqlType::Text)],
            rows: vec![vec![SqlValue::Text("Denver".to_string())]],
        };

        let err = loader.load_table(&table).await.unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[tokio::test]
    async fn test_load_batch_orders_dimensions_first() {
        let store = MemoryStore::new();
        let loader = IncrementalLoader::new(&store);
        let batch = WarehouseBatch {
            city: vec![CityRow { idx: 1, city_name: None, city: None }],
            ..WarehouseBatch::default()
        };

        let outcomes = loader.load_batch(&batch).await.unwrap();

        let tables: Vec<&str> = outcomes.iter().map(|o| o.table.as_str()).collect();
        assert_eq!(
            tables,
            vec![
                "city_table",
                "time_table",
                "airQtable",
                "forecast_daily_o3",
                "forecast_daily_pm10",
                "forecast_daily_pm25",
                "forecast_daily_uvi",
            ]
        );
        assert_eq!(outcomes[0].written, 1);
        assert_eq!(outcomes[1].written, 0);
    }
}
