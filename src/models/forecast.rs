use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Pollutant series carrying a daily forecast in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastSeries {
    O3,
    Pm10,
    Pm25,
    Uvi,
}

impl ForecastSeries {
    pub const ALL: [ForecastSeries; 4] = [Self::O3, Self::Pm10, Self::Pm25, Self::Uvi];

    /// Warehouse table receiving this series.
    pub fn table(&self) -> &'static str {
        match self {
            Self::O3 => "forecast_daily_o3",
            Self::Pm10 => "forecast_daily_pm10",
            Self::Pm25 => "forecast_daily_pm25",
            Self::Uvi => "forecast_daily_uvi",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::O3 => "o3",
            Self::Pm10 => "pm10",
            Self::Pm25 => "pm25",
            Self::Uvi => "uvi",
        }
    }
}

/// One day of a pollutant forecast. Partial entries keep their nulls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDayEntry {
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
}

/// A daily forecast payload as the feed sends it: either an already
/// structured sequence of day entries or text holding an encoded one.
/// Any other shape carries no usable entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ForecastField {
    Parsed(Vec<ForecastDayEntry>),
    Encoded(String),
    Other(Value),
}

impl ForecastField {
    /// Resolve the payload to day entries. Undecodable text and foreign
    /// shapes degrade to an empty sequence, never an error.
    pub fn entries(&self) -> Vec<ForecastDayEntry> {
        match self {
            Self::Parsed(entries) => entries.clone(),
            Self::Encoded(text) => match serde_json::from_str(text) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(error = %err, "undecodable forecast text, dropping entries");
                    Vec::new()
                }
            },
            Self::Other(value) => {
                debug!(shape = %value_shape(value), "unexpected forecast shape, dropping entries");
                Vec::new()
            }
        }
    }
}

fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
