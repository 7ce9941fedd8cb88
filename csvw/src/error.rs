//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum CsvwError {
    #[error("Metadata request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to decode metadata: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to serialize CSVW document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metadata has no contacts.")]
    EmptyContacts,
    #[error("Metadata has no CSV download link.")]
    MissingCsvDownload,
    #[error("Not a valid V4 header: {0}")]
    MalformedHeader(String),
    #[error("No dimension named '{0}' in metadata.")]
    UnmatchedDimension(String),
    #[error("Extra property collides with document key: {0}")]
    KeyCollision(String),
}

pub type CsvwResult<T> = Result<T, CsvwError>;
