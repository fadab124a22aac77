use chrono::NaiveDateTime;

use crate::models::{
    AirQualityRow, CityRow, ForecastRow, ForecastSeries, TimeRow, WarehouseBatch,
};
use crate::utils::constants::{
    AIR_QUALITY_TABLE, CITY_KEY, CITY_TABLE, READING_KEY, TIME_KEY, TIME_TABLE,
};

/// Column types the warehouse distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    BigInt,
    Double,
    Timestamp,
}

impl SqlType {
    /// PostgreSQL type name used when a table is first created.
    pub fn pg_name(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE PRECISION",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    Double(f64),
    Timestamp(NaiveDateTime),
    Null,
}

impl SqlValue {
    /// Canonical text rendering used when comparing against key values
    /// read back from the store. Matches how PostgreSQL renders the
    /// integer and text key columns under a `::text` cast.
    pub fn key_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::BigInt(value) => value.to_string(),
            Self::Double(value) => value.to_string(),
            Self::Timestamp(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Null => String::new(),
        }
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    SqlValue: From<T>,
{
    fn from(value: Option<T>) -> Self {
        value.map(SqlValue::from).unwrap_or(SqlValue::Null)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: SqlType,
}

impl Column {
    pub const fn new(name: &'static str, ty: SqlType) -> Self {
        Self { name, ty }
    }
}

/// A batch of candidate rows addressed to one warehouse table,
/// carrying the schema the store needs to create the table on first
/// contact.
#[derive(Debug, Clone)]
pub struct WarehouseTable {
    pub name: String,
    pub key_column: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl WarehouseTable {
    /// City dimension: one row per station identifier.
    pub fn city(rows: &[CityRow]) -> Self {
        Self {
            name: CITY_TABLE.to_string(),
            key_column: CITY_KEY,
            columns: vec![
                Column::new("idx", SqlType::BigInt),
                Column::new("city_name", SqlType::Text),
                Column::new("city", SqlType::Text),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        SqlValue::from(row.idx),
                        SqlValue::from(row.city_name.clone()),
                        SqlValue::from(row.city.clone()),
                    ]
                })
                .collect(),
        }
    }

    /// Time dimension keyed by the synthetic timestamp/tz/variant key.
    pub fn time(rows: &[TimeRow]) -> Self {
        Self {
            name: TIME_TABLE.to_string(),
            key_column: TIME_KEY,
            columns: vec![
                Column::new("time_primary_key", SqlType::Text),
                Column::new("time_s", SqlType::Timestamp),
                Column::new("time_tz", SqlType::Text),
                Column::new("time_v", SqlType::BigInt),
                Column::new("time_iso", SqlType::Text),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        SqlValue::from(row.time_primary_key.clone()),
                        SqlValue::from(row.time_s),
                        SqlValue::from(row.time_tz.clone()),
                        SqlValue::from(row.time_v),
                        SqlValue::from(row.time_iso.clone()),
                    ]
                })
                .collect(),
        }
    }

    /// Central fact table: one row per reading.
    pub fn air_quality(rows: &[AirQualityRow]) -> Self {
        Self {
            name: AIR_QUALITY_TABLE.to_string(),
            key_column: READING_KEY,
            columns: vec![
                Column::new("idx_index", SqlType::Text),
                Column::new("time_primary_key", SqlType::Text),
                Column::new("idx", SqlType::BigInt),
                Column::new("aqi", SqlType::Double),
                Column::new("dominentpol", SqlType::Text),
                Column::new("iaqi_h_v", SqlType::Double),
                Column::new("iaqi_o3_v", SqlType::Double),
                Column::new("iaqi_p_v", SqlType::Double),
                Column::new("iaqi_pm10_v", SqlType::Double),
                Column::new("iaqi_pm25_v", SqlType::Double),
                Column::new("iaqi_t_v", SqlType::Double),
                Column::new("iaqi_w_v", SqlType::Double),
                Column::new("iaqi_no2_v", SqlType::Double),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        SqlValue::from(row.idx_index.clone()),
                        SqlValue::from(row.time_primary_key.clone()),
                        SqlValue::from(row.idx),
                        SqlValue::from(row.aqi),
                        SqlValue::from(row.dominentpol.clone()),
                        SqlValue::from(row.iaqi_h_v),
                        SqlValue::from(row.iaqi_o3_v),
                        SqlValue::from(row.iaqi_p_v),
                        SqlValue::from(row.iaqi_pm10_v),
                        SqlValue::from(row.iaqi_pm25_v),
                        SqlValue::from(row.iaqi_t_v),
                        SqlValue::from(row.iaqi_w_v),
                        SqlValue::from(row.iaqi_no2_v),
                    ]
                })
                .collect(),
        }
    }

    /// One forecast series table, keyed back to the parent reading.
    pub fn forecast(series: ForecastSeries, rows: &[ForecastRow]) -> Self {
        Self {
            name: series.table().to_string(),
            key_column: READING_KEY,
            columns: vec![
                Column::new("avg", SqlType::Double),
                Column::new("day", SqlType::Text),
                Column::new("max", SqlType::Double),
                Column::new("min", SqlType::Double),
                Column::new("idx_index", SqlType::Text),
            ],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        SqlValue::from(row.avg),
                        SqlValue::from(row.day.clone()),
                        SqlValue::from(row.max),
                        SqlValue::from(row.min),
                        SqlValue::from(row.idx_index.clone()),
                    ]
                })
                .collect(),
        }
    }

    /// The seven per-table candidate sets of one transformed batch, in
    /// load order: both dimensions strictly before the fact table,
    /// forecast series last.
    pub fn plan(batch: &WarehouseBatch) -> Vec<WarehouseTable> {
        let mut tables = vec![
            Self::city(&batch.city),
            Self::time(&batch.time),
            Self::air_quality(&batch.air_quality),
        ];
        tables.extend(
            ForecastSeries::ALL
                .iter()
                .map(|series| Self::forecast(*series, batch.forecast(*series))),
        );
        tables
    }

    /// Position of the key column within the schema.
    pub fn key_index(&self) -> Option<usize> {
        self.columns.iter().position(|column| column.name == self.key_column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
