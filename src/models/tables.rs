use chrono::NaiveDateTime;

use super::forecast::ForecastSeries;

/// City dimension row, one per station identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRow {
    pub idx: i64,
    pub city_name: Option<String>,
    pub city: Option<String>,
}

/// Time dimension row, one per distinct observation instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRow {
    pub time_primary_key: String,
    pub time_s: NaiveDateTime,
    pub time_tz: Option<String>,
    pub time_v: Option<i64>,
    pub time_iso: Option<String>,
}

/// Fact row, one per reading.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRow {
    pub idx_index: String,
    pub time_primary_key: String,
    pub idx: i64,
    pub aqi: Option<f64>,
    pub dominentpol: Option<String>,
    pub iaqi_h_v: Option<f64>,
    pub iaqi_o3_v: Option<f64>,
    pub iaqi_p_v: Option<f64>,
    pub iaqi_pm10_v: Option<f64>,
    pub iaqi_pm25_v: Option<f64>,
    pub iaqi_t_v: Option<f64>,
    pub iaqi_w_v: Option<f64>,
    pub iaqi_no2_v: Option<f64>,
}

/// Child row of one pollutant's daily forecast, tagged with the parent
/// reading's composite identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub avg: Option<f64>,
    pub day: Option<String>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub idx_index: String,
}

/// One transformed batch, partitioned into the seven warehouse tables.
#[derive(Debug, Clone, Default)]
pub struct WarehouseBatch {
    pub city: Vec<CityRow>,
    pub time: Vec<TimeRow>,
    pub air_quality: Vec<AirQualityRow>,
    pub forecast_o3: Vec<ForecastRow>,
    pub forecast_pm10: Vec<ForecastRow>,
    pub forecast_pm25: Vec<ForecastRow>,
    pub forecast_uvi: Vec<ForecastRow>,
}

impl WarehouseBatch {
    pub fn forecast(&self, series: ForecastSeries) -> &[ForecastRow] {
        match series {
            ForecastSeries::O3 => &self.forecast_o3,
            ForecastSeries::Pm10 => &self.forecast_pm10,
            ForecastSeries::Pm25 => &self.forecast_pm25,
            ForecastSeries::Uvi => &self.forecast_uvi,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.city.len()
            + self.time.len()
            + self.air_quality.len()
            + ForecastSeries::ALL.iter().map(|s| self.forecast(*s).len()).sum::<usize>()
    }
}
