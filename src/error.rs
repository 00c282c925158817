use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{dataset}' dataset is missing required columns: {}", .missing.join(", "))]
    Schema {
        dataset: String,
        missing: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Excel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{unmatched} attendance rows reference unknown employees (e.g. {sample:?})")]
    JoinMiss { unmatched: u64, sample: Vec<i64> },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<rusqlite_migration::Error> for Error {
    fn from(e: rusqlite_migration::Error) -> Self {
        Error::Migration(e.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::Excel(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
