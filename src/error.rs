use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Feed unavailable: {0}")]
    FetchUnavailable(#[from] reqwest::Error),

    #[error("City {city} not recognized by the feed")]
    UnknownCity { city: String },

    #[error("Malformed observation timestamp: {value}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Document for city {city} missing required field: {field}")]
    MissingRequiredField { city: String, field: &'static str },

    #[error("Schema mismatch on table {table}: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("Warehouse store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
