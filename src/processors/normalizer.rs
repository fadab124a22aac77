use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::{CityDocument, ForecastFields, Reading, SubIndexValues};
use crate::utils::trailing_segment;

/// Observation-time layouts the feed is known to emit, tried in order.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flattens accepted feed documents into [`Reading`] values.
///
/// A document missing `idx`, the station URL or the observation-time
/// string fails the whole batch, as does an unparsable timestamp. The
/// composite identifier joins `idx` with the raw time string before any
/// parsing happens.
#[derive(Debug, Default)]
pub struct ReadingNormalizer;

impl ReadingNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, documents: &[CityDocument]) -> Result<Vec<Reading>> {
        documents.iter().map(|doc| self.normalize_one(doc)).collect()
    }

    fn normalize_one(&self, accepted: &CityDocument) -> Result<Reading> {
        let city = &accepted.city;
        let document = &accepted.document;

        let idx = document.idx.ok_or_else(|| missing(city, "idx"))?;
        let url = document.city.url.as_deref().ok_or_else(|| missing(city, "city.url"))?;
        let time_s = document.time.s.clone().ok_or_else(|| missing(city, "time.s"))?;

        let idx_index = Reading::composite_key(idx, &time_s);
        let observed_at = parse_observation_time(&time_s)?;

        debug!(city = %city, idx, key = %idx_index, "normalized reading");

        Ok(Reading {
            idx,
            idx_index,
            city_name: document.city.name.clone(),
            city: trailing_segment(url).map(str::to_string),
            time_s,
            observed_at,
            time_tz: document.time.tz.clone(),
            time_v: document.time.v,
            time_iso: document.time.iso.clone(),
            aqi: document.aqi,
            dominentpol: document.dominentpol.clone(),
            iaqi: SubIndexValues {
                h: document.iaqi.h.map(|i| i.v),
                o3: document.iaqi.o3.map(|i| i.v),
                p: document.iaqi.p.map(|i| i.v),
                pm10: document.iaqi.pm10.map(|i| i.v),
                pm25: document.iaqi.pm25.map(|i| i.v),
                t: document.iaqi.t.map(|i| i.v),
                w: document.iaqi.w.map(|i| i.v),
                no2: document.iaqi.no2.map(|i| i.v),
            },
            forecasts: ForecastFields {
                o3: document.forecast.daily.o3.clone(),
                pm10: document.forecast.daily.pm10.clone(),
                pm25: document.forecast.daily.pm25.clone(),
                uvi: document.forecast.daily.uvi.clone(),
            },
        })
    }
}

fn missing(city: &str, field: &'static str) -> PipelineError {
    PipelineError::MissingRequiredField { city: city.to_string(), field }
}

fn parse_observation_time(value: &str) -> Result<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|source| PipelineError::MalformedTimestamp { value: value.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDocument;
    use serde_json::json;

    fn document(city: &str, payload: serde_json::Value) -> CityDocument {
        CityDocument {
            city: city.to_string(),
            document: serde_json::from_value::<RawDocument>(payload).unwrap(),
        }
    }

    #[test]
    fn test_composite_identifier_uses_raw_time_string() {
        let docs = vec![document(
            "Chicago",
            json!({
                "idx": 1,
                "city": {"url": "https://aqicn.org/city/usa/chicago"},
                "time": {"s": "2024-01-01T00:00"}
            }),
        )];

        let readings = ReadingNormalizer::new().normalize(&docs).unwrap();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].idx_index, "1_2024-01-01T00:00");
        assert_eq!(readings[0].city.as_deref(), Some("chicago"));
        assert_eq!(readings[0].time_s, "2024-01-01T00:00");
    }

    #[test]
    fn test_full_document_round_trip() {
        let docs = vec![document(
            "Chicago",
            json!({
                "idx": 3399,
                "aqi": 42,
                "dominentpol": "pm25",
                "city": {"name": "Chicago", "url": "https://aqicn.org/city/usa/chicago"},
                "time": {"s": "2024-01-01 13:00:00", "tz": "-06:00", "v": 1704114000_i64,
                         "iso": "2024-01-01T13:00:00-06:00"},
                "iaqi": {"pm25": {"v": 42.0}, "t": {"v": 21.6}},
                "forecast": {"daily": {"pm25": [{"avg": 70, "day": "2024-01-01", "max": 86, "min": 56}]}}
            }),
        )];

        let readings = ReadingNormalizer::new().normalize(&docs).unwrap();
        let reading = &readings[0];

        assert_eq!(reading.idx, 3399);
        assert_eq!(reading.aqi, Some(42.0));
        assert_eq!(reading.dominentpol.as_deref(), Some("pm25"));
        assert_eq!(reading.iaqi.pm25, Some(42.0));
        assert_eq!(reading.iaqi.t, Some(21.6));
        assert_eq!(reading.iaqi.no2, None);
        assert_eq!(reading.time_tz.as_deref(), Some("-06:00"));
        assert_eq!(reading.time_v, Some(1704114000));
        assert!(reading.forecasts.pm25.is_some());
        assert!(reading.forecasts.uvi.is_none());
    }

    #[test]
    fn test_missing_idx_fails_batch() {
        let docs = vec![document(
            "Chicago",
            json!({"city": {"url": "x/chicago"}, "time": {"s": "2024-01-01 13:00:00"}}),
        )];

        let err = ReadingNormalizer::new().normalize(&docs).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingRequiredField { ref city, field: "idx" } if city == "Chicago"
        ));
    }

    #[test]
    fn test_missing_url_and_time_fail_batch() {
        let docs = vec![document("Boston", json!({"idx": 5, "time": {"s": "2024-01-01 13:00:00"}}))];
        let err = ReadingNormalizer::new().normalize(&docs).unwrap_err();
        assert!(matches!(err, PipelineError::MissingRequiredField { field: "city.url", .. }));

        let docs = vec![document("Boston", json!({"idx": 5, "city": {"url": "x/boston"}}))];
        let err = ReadingNormalizer::new().normalize(&docs).unwrap_err();
        assert!(matches!(err, PipelineError::MissingRequiredField { field: "time.s", .. }));
    }

    #[test]
    fn test_malformed_timestamp_fails_batch() {
        let docs = vec![document(
            "Boston",
            json!({"idx": 5, "city": {"url": "x/boston"}, "time": {"s": "yesterday at noon"}}),
        )];

        let err = ReadingNormalizer::new().normalize(&docs).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTimestamp { ref value, .. } if value == "yesterday at noon"));
    }

    #[test]
    fn test_accepted_time_layouts() {
        for (raw, expected) in [
            ("2024-01-01 13:00:00", "2024-01-01 13:00:00"),
            ("2024-01-01T13:00:00", "2024-01-01 13:00:00"),
            ("2024-01-01T13:00", "2024-01-01 13:00:00"),
            ("2024-01-01", "2024-01-01 00:00:00"),
        ] {
            let parsed = parse_observation_time(raw).unwrap();
            assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), expected, "layout {raw}");
        }
    }

    #[test]
    fn test_trailing_slash_url_leaves_slug_null() {
        let docs = vec![document(
            "Chicago",
            json!({"idx": 1, "city": {"url": "https://aqicn.org/city/chicago/"},
                   "time": {"s": "2024-01-01 13:00:00"}}),
        )];

        let readings = ReadingNormalizer::new().normalize(&docs).unwrap();
        assert_eq!(readings[0].city, None);
    }

    #[test]
    fn test_empty_batch_yields_empty_output() {
        let readings = ReadingNormalizer::new().normalize(&[]).unwrap();
        assert!(readings.is_empty());
    }
}
