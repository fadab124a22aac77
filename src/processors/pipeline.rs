use tracing::info;

use crate::error::Result;
use crate::models::{CityDocument, ForecastSeries, WarehouseBatch};
use crate::processors::{ForecastExploder, ReadingNormalizer, SchemaPartitioner};
use crate::utils::progress::ProgressReporter;

/// Runs the transform stages over one batch of accepted documents:
/// normalize, explode each forecast series, partition into the star
/// schema.
pub struct TransformPipeline {
    normalizer: ReadingNormalizer,
    exploder: ForecastExploder,
    partitioner: SchemaPartitioner,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self {
            normalizer: ReadingNormalizer::new(),
            exploder: ForecastExploder::new(),
            partitioner: SchemaPartitioner::new(),
        }
    }

    pub fn transform(
        &self,
        documents: &[CityDocument],
        progress: Option<&ProgressReporter>,
    ) -> Result<WarehouseBatch> {
        if let Some(p) = progress {
            p.set_message("Normalizing readings...");
        }
        let readings = self.normalizer.normalize(documents)?;
        info!(stage = "normalize", readings = readings.len(), "flattened feed documents");

        if let Some(p) = progress {
            p.set_message("Exploding forecasts...");
        }
        let forecast_o3 = self.exploder.explode(&readings, ForecastSeries::O3);
        let forecast_pm10 = self.exploder.explode(&readings, ForecastSeries::Pm10);
        let forecast_pm25 = self.exploder.explode(&readings, ForecastSeries::Pm25);
        let forecast_uvi = self.exploder.explode(&readings, ForecastSeries::Uvi);

        if let Some(p) = progress {
            p.set_message("Partitioning into warehouse tables...");
        }
        let partition = self.partitioner.partition(&readings);

        let batch = WarehouseBatch {
            city: partition.city,
            time: partition.time,
            air_quality: partition.air_quality,
            forecast_o3,
            forecast_pm10,
            forecast_pm25,
            forecast_uvi,
        };

        info!(
            stage = "transform",
            cities = batch.city.len(),
            times = batch.time.len(),
            facts = batch.air_quality.len(),
            forecast_rows = batch.total_rows() - batch.city.len() - batch.time.len() - batch.air_quality.len(),
            "batch ready for load"
        );

        if let Some(p) = progress {
            p.finish_with_message("Transform complete");
        }

        Ok(batch)
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDocument;
    use serde_json::json;

    fn accepted(city: &str, idx: i64, time_s: &str) -> CityDocument {
        CityDocument {
            city: city.to_string(),
            document: serde_json::from_value::<RawDocument>(json!({
                "idx": idx,
                "aqi": 50,
                "city": {"name": city, "url": format!("https://aqicn.org/city/{}", city.to_lowercase())},
                "time": {"s": time_s, "tz": "-06:00", "v": 1704114000_i64},
                "forecast": {"daily": {
                    "pm25": [{"avg": 70, "day": "2024-01-01", "max": 86, "min": 56},
                             {"avg": 64, "day": "2024-01-02", "max": 81, "min": 48}]
                }}
            }))
            .unwrap(),
        }
    }

    #[test]
    fn test_transform_produces_all_seven_tables() {
        let documents = vec![
            accepted("Chicago", 1, "2024-01-01 13:00:00"),
            accepted("Boston", 2, "2024-01-01 14:00:00"),
        ];

        let batch = TransformPipeline::new().transform(&documents, None).unwrap();

        assert_eq!(batch.city.len(), 2);
        assert_eq!(batch.time.len(), 2);
        assert_eq!(batch.air_quality.len(), 2);
        assert_eq!(batch.forecast_pm25.len(), 2);
        assert!(batch.forecast_o3.is_empty());
        assert!(batch.forecast_pm10.is_empty());
        assert!(batch.forecast_uvi.is_empty());
    }

    #[test]
    fn test_transform_empty_batch() {
        let batch = TransformPipeline::new().transform(&[], None).unwrap();
        assert_eq!(batch.total_rows(), 0);
    }

    #[test]
    fn test_transform_propagates_normalizer_failure() {
        let documents = vec![CityDocument {
            city: "Nowhere".to_string(),
            document: serde_json::from_value::<RawDocument>(json!({"aqi": 10})).unwrap(),
        }];

        assert!(TransformPipeline::new().transform(&documents, None).is_err());
    }
}
