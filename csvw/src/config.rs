use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata document for ASHE table 7 (hours), time-series edition, version 1.
pub const DEFAULT_METADATA_URL: &str =
    "https://api.beta.ons.gov.uk/v1/datasets/ashe-table-7-hours/editions/time-series/versions/1/metadata";

/// V4 header of the CSV download that `DEFAULT_METADATA_URL` describes.
pub const DEFAULT_HEADER_ROW: &str = "V4_2,Data marking,Coefficient of variation,Time_codelist,Time,ashe-geography,Geography,Hours_codelist,Hours,Sex_codelist,Sex,WorkingPattern_codelist,WorkingPattern,Statistics_codelist,Statistics";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub metadata_url: String,
    pub header_row: String,
    /// Fail instead of emitting empty label columns when a header dimension
    /// has no entry in the metadata.
    pub strict_dimensions: bool,
    pub request_timeout_secs: Option<u64>,
    /// Additional top-level string properties added to the output document.
    pub extra_properties: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            metadata_url: DEFAULT_METADATA_URL.into(),
            header_row: DEFAULT_HEADER_ROW.into(),
            strict_dimensions: false,
            request_timeout_secs: None,
            extra_properties: BTreeMap::new(),
        }
    }
}
