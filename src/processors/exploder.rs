use tracing::debug;

use crate::models::{ForecastRow, ForecastSeries, Reading};

/// Expands the nested per-pollutant daily forecasts of a batch into
/// flat child rows tagged with the parent reading's composite
/// identifier.
///
/// Each reading contributes at most one row per series: the child rows
/// all share the parent's key, so deduplicating a reading's exploded
/// entries by that key keeps only the first forecast day.
#[derive(Debug, Default)]
pub struct ForecastExploder;

impl ForecastExploder {
    pub fn new() -> Self {
        Self
    }

    /// Explode one series across a batch. Forecast payloads that fail
    /// to resolve contribute zero rows, never an error. Output follows
    /// input reading order; readings sharing a composite identifier
    /// each keep their row here and are reconciled at load time.
    pub fn explode(&self, readings: &[Reading], series: ForecastSeries) -> Vec<ForecastRow> {
        let rows: Vec<ForecastRow> = readings
            .iter()
            .filter_map(|reading| {
                let entries = reading
                    .forecasts
                    .series(series)
                    .map(|field| field.entries())
                    .unwrap_or_default();

                entries.into_iter().next().map(|entry| ForecastRow {
                    avg: entry.avg,
                    day: entry.day,
                    max: entry.max,
                    min: entry.min,
                    idx_index: reading.idx_index.clone(),
                })
            })
            .collect();

        debug!(series = series.as_str(), rows = rows.len(), "exploded forecast series");
        rows
    }
}
