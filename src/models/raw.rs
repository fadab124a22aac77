use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::forecast::{ForecastField, ForecastSeries};

/// Feed envelope. Error responses carry a message string in `data`
/// instead of a station document.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl FeedEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// One accepted station document paired with the city it was requested
/// for. The requested name is kept for error context only; the slug
/// stored in the warehouse comes from the document's own URL.
#[derive(Debug, Clone)]
pub struct CityDocument {
    pub city: String,
    pub document: RawDocument,
}

/// Station document as the feed sends it. Every field is optional here;
/// the normalizer decides which ones are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub idx: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub dominentpol: Option<String>,
    #[serde(default)]
    pub city: RawCity,
    #[serde(default)]
    pub time: RawTime,
    #[serde(default)]
    pub iaqi: RawSubIndices,
    #[serde(default)]
    pub forecast: RawForecast,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTime {
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub v: Option<i64>,
    #[serde(default)]
    pub iso: Option<String>,
}

/// Per-pollutant sub-index block. Only the eight codes surfaced on the
/// fact table are captured; the feed's remaining codes are ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawSubIndices {
    #[serde(default)]
    pub h: Option<IaqiValue>,
    #[serde(default)]
    pub o3: Option<IaqiValue>,
    #[serde(default)]
    pub p: Option<IaqiValue>,
    #[serde(default)]
    pub pm10: Option<IaqiValue>,
    #[serde(default)]
    pub pm25: Option<IaqiValue>,
    #[serde(default)]
    pub t: Option<IaqiValue>,
    #[serde(default)]
    pub w: Option<IaqiValue>,
    #[serde(default)]
    pub no2: Option<IaqiValue>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IaqiValue {
    pub v: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub daily: RawDailyForecast,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDailyForecast {
    #[serde(default)]
    pub o3: Option<ForecastField>,
    #[serde(default)]
    pub pm10: Option<ForecastField>,
    #[serde(default)]
    pub pm25: Option<ForecastField>,
    #[serde(default)]
    pub uvi: Option<ForecastField>,
}

impl RawDailyForecast {
    pub fn series(&self, series: ForecastSeries) -> Option<&ForecastField> {
        match series {
            ForecastSeries::O3 => self.o3.as_ref(),
            ForecastSeries::Pm10 => self.pm10.as_ref(),
            ForecastSeries::Pm25 => self.pm25.as_ref(),
            ForecastSeries::Uvi => self.uvi.as_ref(),
        }
    }
}

/// The feed reports `aqi` as a number most of the time but falls back
/// to placeholder text (`"-"`) when the index is unavailable.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
