use std::{str::FromStr, time::Duration};

use column::DimensionPolicy;
use config::Config;
use document::CsvwDocument;
use error::CsvwResult;
use header::V4Header;
use log::debug;
use metadata::Metadata;

// Modules
pub mod column;
pub mod config;
pub mod document;
pub mod error;
pub mod header;
pub mod metadata;

/// Turns dataset metadata into CSVW documents
pub struct CsvwGenerator {
    pub config: Config,
    pub header: V4Header,
}

impl CsvwGenerator {
    /// Setup the generator with default configuration
    pub fn new() -> CsvwResult<Self> {
        Self::new_with_config(Config::default())
    }

    /// Setup the generator with custom configuration. Fails if the
    /// configured header row is not a valid V4 header.
    pub fn new_with_config(config: Config) -> CsvwResult<Self> {
        debug!("config: {config:?}");
        let header = V4Header::from_str(&config.header_row)?;
        Ok(Self { config, header })
    }

    pub fn dimension_policy(&self) -> DimensionPolicy {
        if self.config.strict_dimensions {
            DimensionPolicy::Strict
        } else {
            DimensionPolicy::Fallback
        }
    }

    /// Fetches the metadata document at the configured URL
    pub async fn fetch_metadata(&self) -> CsvwResult<Metadata> {
        let timeout = self.config.request_timeout_secs.map(Duration::from_secs);
        metadata::fetch_metadata(&self.config.metadata_url, timeout).await
    }

    /// Builds the CSVW document for already loaded metadata
    pub fn generate(&self, metadata: &Metadata) -> CsvwResult<CsvwDocument> {
        CsvwDocument::from_metadata(
            metadata,
            &self.config.metadata_url,
            &self.header,
            self.dimension_policy(),
        )
    }

    /// Fetches the configured metadata and builds its CSVW document
    pub async fn fetch_and_generate(&self) -> CsvwResult<CsvwDocument> {
        let metadata = self.fetch_metadata().await?;
        self.generate(&metadata)
    }

    /// Serializes `document` including any configured extra properties.
    pub fn render(&self, document: &CsvwDocument, pretty: bool) -> CsvwResult<String> {
        let value = document.to_value_with_extras(&self.config.extra_properties)?;
        let rendered = if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        rendered.map_err(error::CsvwError::Serialize)
    }
}
