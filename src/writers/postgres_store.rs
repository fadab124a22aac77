use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::{QueryBuilder, Row};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::utils::constants::INSERT_CHUNK_ROWS;
use crate::writers::store::PersistentStore;
use crate::writers::table::{SqlType, SqlValue, WarehouseTable};

/// PostgreSQL-backed warehouse store.
///
/// Tables are created on first append from the candidate batch's
/// schema, without key constraints; duplicate suppression is the
/// loader's read-then-filter protocol, not a database upsert.
pub struct PgWarehouse {
    pool: PgPool,
}

impl PgWarehouse {
    /// Connect to the warehouse at `dsn`.
    pub async fn connect(dsn: &str, timeout_secs: u64) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .connect(dsn)
            .await
            .map_err(|err| PipelineError::StoreUnavailable(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool, e.g. one shared with other components.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn create_table_sql(table: &WarehouseTable) -> String {
        let columns = table
            .columns
            .iter()
            .map(|column| format!("{} {}", quote_ident(column.name), column.ty.pg_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&table.name),
            columns
        )
    }

    fn insert_prefix(table: &WarehouseTable) -> String {
        let columns = table
            .columns
            .iter()
            .map(|column| quote_ident(column.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} ({}) ", quote_ident(&table.name), columns)
    }
}

/// Quote an identifier so mixed-case table names survive the round
/// trip to PostgreSQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map driver errors onto the pipeline taxonomy: undefined-column and
/// datatype errors are schema mismatches, anything else means the
/// store itself is unavailable.
fn classify(table: &str, err: sqlx::Error) -> PipelineError {
    if let Some(db) = err.as_database_error() {
        if let Some(code) = db.code() {
            if matches!(code.as_ref(), "42703" | "42804") {
                return PipelineError::SchemaMismatch {
                    table: table.to_string(),
                    detail: db.message().to_string(),
                };
            }
        }
    }
    PipelineError::StoreUnavailable(err.to_string())
}

#[async_trait]
impl PersistentStore for PgWarehouse {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1)",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| classify(table, err))?;
        Ok(exists)
    }

    async fn read_key_column(&self, table: &str, column: &str) -> Result<HashSet<String>> {
        let sql = format!(
            "SELECT {}::text FROM {}",
            quote_ident(column),
            quote_ident(table)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| classify(table, err))?;

        let mut keys = HashSet::with_capacity(rows.len());
        for row in rows {
            let value: Option<String> =
                row.try_get(0).map_err(|err| classify(table, err))?;
            if let Some(value) = value {
                keys.insert(value);
            }
        }
        Ok(keys)
    }

    async fn append_rows(&self, table: &WarehouseTable) -> Result<u64> {
        if table.is_empty() {
            return Ok(0);
        }

        sqlx::query(&Self::create_table_sql(table))
            .execute(&self.pool)
            .await
            .map_err(|err| classify(&table.name, err))?;

        let prefix = Self::insert_prefix(table);
        let mut written = 0u64;
        for chunk in table.rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&prefix);
            builder.push_values(chunk, |mut b, row| {
                for (value, column) in row.iter().zip(&table.columns) {
                    match (value, column.ty) {
                        (SqlValue::Text(v), _) => {
                            b.push_bind(v.clone());
                        }
                        (SqlValue::BigInt(v), _) => {
                            b.push_bind(*v);
                        }
                        (SqlValue::Double(v), _) => {
                            b.push_bind(*v);
                        }
                        (SqlValue::Timestamp(v), _) => {
                            b.push_bind(*v);
                        }
                        (SqlValue::Null, SqlType::Text) => {
                            b.push_bind(Option::<String>::None);
                        }
                        (SqlValue::Null, SqlType::BigInt) => {
                            b.push_bind(Option::<i64>::None);
                        }
                        (SqlValue::Null, SqlType::Double) => {
                            b.push_bind(Option::<f64>::None);
                        }
                        (SqlValue::Null, SqlType::Timestamp) => {
                            b.push_bind(Option::<chrono::NaiveDateTime>::None);
                        }
                    }
                }
            });

            let result = builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|err| classify(&table.name, err))?;
            written += result.rows_affected();
        }

        debug!(table = %table.name, rows = written, "appended rows");
        Ok(written)
    }
}
