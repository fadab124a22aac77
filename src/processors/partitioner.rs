use tracing::debug;

use crate::models::{AirQualityRow, CityRow, Reading, TimeRow};
use crate::utils::dedup_first_by;

/// Dimension and fact rows projected from one batch of readings.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub city: Vec<CityRow>,
    pub time: Vec<TimeRow>,
    pub air_quality: Vec<AirQualityRow>,
}

/// Projects readings into the star schema: City and Time dimensions
/// plus one fact row per reading. Transport-only fields never appear
/// in the projected rows.
#[derive(Debug, Default)]
pub struct SchemaPartitioner;

impl SchemaPartitioner {
    pub fn new() -> Self {
        Self
    }

    pub fn partition(&self, readings: &[Reading]) -> Partition {
        let city = dedup_first_by(
            readings
                .iter()
                .map(|r| CityRow {
                    idx: r.idx,
                    city_name: r.city_name.clone(),
                    city: r.city.clone(),
                })
                .collect(),
            |row| row.idx,
        );

        let time = dedup_first_by(
            readings
                .iter()
                .map(|r| TimeRow {
                    time_primary_key: r.time_primary_key(),
                    time_s: r.observed_at,
                    time_tz: r.time_tz.clone(),
                    time_v: r.time_v,
                    time_iso: r.time_iso.clone(),
                })
                .collect(),
            |row| row.time_primary_key.clone(),
        );

        let air_quality: Vec<AirQualityRow> = readings
            .iter()
            .map(|r| AirQualityRow {
                idx_index: r.idx_index.clone(),
                time_primary_key: r.time_primary_key(),
                idx: r.idx,
                aqi: r.aqi,
                dominentpol: r.dominentpol.clone(),
                iaqi_h_v: r.iaqi.h,
                iaqi_o3_v: r.iaqi.o3,
                iaqi_p_v: r.iaqi.p,
                iaqi_pm10_v: r.iaqi.pm10,
                iaqi_pm25_v: r.iaqi.pm25,
                iaqi_t_v: r.iaqi.t,
                iaqi_w_v: r.iaqi.w,
                iaqi_no2_v: r.iaqi.no2,
            })
            .collect();

        debug!(
            cities = city.len(),
            times = time.len(),
            readings = air_quality.len(),
            "partitioned batch"
        );

        Partition { city, time, air_quality }
    }
}
