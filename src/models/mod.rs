pub mod forecast;
pub mod raw;
pub mod reading;
pub mod tables;

pub use forecast::{ForecastDayEntry, ForecastField, ForecastSeries};
pub use raw::{CityDocument, FeedEnvelope, RawDocument};
pub use reading::{ForecastFields, Reading, SubIndexValues};
pub use tables::{AirQualityRow, CityRow, ForecastRow, TimeRow, WarehouseBatch};
