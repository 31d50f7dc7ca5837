use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Error: The file '{path}' was not found or could not be read. Please ensure it's in the same directory as the app.")]
    SourceUnavailable { path: String },

    #[error("The dataset is empty; load valid financial data before asking questions")]
    EmptyDataset,

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
