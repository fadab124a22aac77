/// Feed defaults
pub const DEFAULT_FEED_URL: &str = "https://api.waqi.info/feed";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const FEED_USER_AGENT: &str = concat!("aqi-warehouse/", env!("CARGO_PKG_VERSION"));

/// Store defaults
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
pub const INSERT_CHUNK_ROWS: usize = 500;

/// Warehouse table names
pub const CITY_TABLE: &str = "city_table";
pub const TIME_TABLE: &str = "time_table";
pub const AIR_QUALITY_TABLE: &str = "airQtable";

/// Key columns
pub const CITY_KEY: &str = "idx";
pub const TIME_KEY: &str = "time_primary_key";
pub const READING_KEY: &str = "idx_index";

/// Default city roster queried when the configuration does not name one
pub const DEFAULT_CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "San Francisco",
    "Charlotte",
    "Indianapolis",
    "Seattle",
    "Denver",
    "Washington, D.C.",
    "Boston",
    "El Paso",
    "Nashville",
    "Detroit",
    "Oklahoma City",
    "Portland",
    "Las Vegas",
    "Memphis",
    "Louisville",
    "Baltimore",
    "Milwaukee",
    "Albuquerque",
    "Tucson",
    "Fresno",
    "Sacramento",
    "Mesa",
    "Kansas City",
    "Atlanta",
    "Omaha",
    "Raleigh",
    "Miami",
    "Long Beach",
    "Virginia Beach",
    "Oakland",
    "Minneapolis",
    "Tulsa",
    "Arlington",
    "Tampa",
    "New Orleans",
    "Wichita",
    "Cleveland",
];
