use csvw::error::CsvwError;

#[derive(thiserror::Error, Debug)]
pub enum CsvwCliError {
    #[error("Anyhow error: {0:#}")]
    Anyhow(#[from] anyhow::Error),
    #[error("serde JSON error: {0}")]
    SerdeJSONError(#[from] serde_json::Error),
    #[error("Invalid TOML in config file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("{0}")]
    CsvwError(#[from] CsvwError),
    #[error("std IO error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type CsvwCliResult<T> = Result<T, CsvwCliError>;
