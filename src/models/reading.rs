use chrono::NaiveDateTime;

use super::forecast::{ForecastField, ForecastSeries};

/// A normalized per-city observation, flattened from the feed document.
#[derive(Debug, Clone)]
pub struct Reading {
    pub idx: i64,
    /// Composite identifier: `idx` joined with the raw observation-time
    /// string, computed before timestamp parsing.
    pub idx_index: String,
    pub city_name: Option<String>,
    /// Slug taken from the station URL, not the requested city name.
    pub city: Option<String>,
    /// Raw observation-time string exactly as the feed sent it.
    pub time_s: String,
    pub observed_at: NaiveDateTime,
    pub time_tz: Option<String>,
    pub time_v: Option<i64>,
    pub time_iso: Option<String>,
    pub aqi: Option<f64>,
    pub dominentpol: Option<String>,
    pub iaqi: SubIndexValues,
    pub forecasts: ForecastFields,
}

impl Reading {
    pub fn composite_key(idx: i64, time_s: &str) -> String {
        format!("{}_{}", idx, time_s)
    }

    /// Primary key of the time dimension row this reading maps to:
    /// parsed timestamp, timezone and numeric variant joined with `_`.
    /// A missing timezone or variant leaves its segment blank.
    pub fn time_primary_key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.observed_at.format("%Y-%m-%d %H:%M:%S"),
            self.time_tz.as_deref().unwrap_or_default(),
            self.time_v.map(|v| v.to_string()).unwrap_or_default(),
        )
    }
}

/// The eight per-pollutant sub-index values surfaced on the fact row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubIndexValues {
    pub h: Option<f64>,
    pub o3: Option<f64>,
    pub p: Option<f64>,
    pub pm10: Option<f64>,
    pub pm25: Option<f64>,
    pub t: Option<f64>,
    pub w: Option<f64>,
    pub no2: Option<f64>,
}

/// Unexploded forecast payloads, kept on the reading until explosion.
#[derive(Debug, Clone, Default)]
pub struct ForecastFields {
    pub o3: Option<ForecastField>,
    pub pm10: Option<ForecastField>,
    pub pm25: Option<ForecastField>,
    pub uvi: Option<ForecastField>,
}

impl ForecastFields {
    pub fn series(&self, series: ForecastSeries) -> Option<&ForecastField> {
        match series {
            ForecastSeries::O3 => self.o3.as_ref(),
            ForecastSeries::Pm10 => self.pm10.as_ref(),
            ForecastSeries::Pm25 => self.pm25.as_ref(),
            ForecastSeries::Uvi => self.uvi.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_composite_key_uses_raw_time_string() {
        assert_eq!(Reading::composite_key(1, "2024-01-01T00:00"), "1_2024-01-01T00:00");
        assert_eq!(Reading::composite_key(3399, "2024-01-01 13:00:00"), "3399_2024-01-01 13:00:00");
    }

    #[test]
    fn test_time_primary_key_format() {
        let reading = Reading {
            idx: 3399,
            idx_index: "3399_2024-01-01 13:00:00".to_string(),
            city_name: None,
            city: None,
            time_s: "2024-01-01 13:00:00".to_string(),
            observed_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap(),
            time_tz: Some("-06:00".to_string()),
            time_v: Some(1704114000),
            time_iso: None,
            aqi: None,
            dominentpol: None,
            iaqi: SubIndexValues::default(),
            forecasts: ForecastFields::default(),
        };

        assert_eq!(reading.time_primary_key(), "2024-01-01 13:00:00_-06:00_1704114000");
    }
}
