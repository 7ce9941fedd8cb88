use std::{fs::File, io::BufReader, path::Path, str::FromStr, time::Duration};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{CsvwError, CsvwResult};

/// Dataset metadata as published by the dataset API for one version of an edition.
/// All fields are optional on the wire; anything missing decodes to its empty value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Metadata {
    pub alerts: Option<Vec<Alert>>,
    pub contacts: Vec<ContactDetails>,
    pub description: String,
    pub dimensions: Vec<CodeList>,
    pub downloads: Option<DownloadList>,
    pub keywords: Vec<String>,
    pub license: String,
    pub national_statistic: Option<bool>,
    pub next_release: String,
    pub publisher: Option<Publisher>,
    pub release_date: String,
    pub release_frequency: String,
    pub theme: String,
    pub title: String,
    pub unit_of_measure: String,
    pub uri: String,
    pub usage_notes: Option<Vec<UsageNote>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ContactDetails {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub telephone: String,
}

/// A dimension of the dataset together with the code list it is drawn from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CodeList {
    pub id: String,
    pub name: String,
    pub label: String,
    pub description: String,
    pub href: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Publisher {
    pub href: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DownloadList {
    pub csv: Option<DownloadObject>,
    pub csvw: Option<DownloadObject>,
    pub xls: Option<DownloadObject>,
    pub txt: Option<DownloadObject>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DownloadObject {
    pub href: String,
    pub size: String,
    pub public: String,
    pub private: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Alert {
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UsageNote {
    pub title: String,
    pub note: String,
}

impl Metadata {
    /// Href of the CSV download, if the metadata advertises one.
    pub fn csv_href(&self) -> Option<&str> {
        self.downloads
            .as_ref()
            .and_then(|downloads| downloads.csv.as_ref())
            .map(|csv| csv.href.as_str())
    }

    /// Looks up a dimension by its stored name.
    pub fn dimension(&self, name: &str) -> Option<&CodeList> {
        self.dimensions.iter().find(|dim| dim.name == name)
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.as_deref().unwrap_or_default()
    }

    pub fn usage_notes(&self) -> &[UsageNote] {
        self.usage_notes.as_deref().unwrap_or_default()
    }

    /// Load metadata from a JSON file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> CsvwResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(CsvwError::Decode)
    }
}

impl FromStr for Metadata {
    type Err = CsvwError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(value).map_err(CsvwError::Decode)
    }
}

/// Performs a single GET of `url` and decodes the body as `Metadata`.
///
/// Transport failures and non-success statuses are returned as
/// `CsvwError::Request`, a body that is not metadata JSON as `CsvwError::Decode`.
pub async fn fetch_metadata(url: &str, timeout: Option<Duration>) -> CsvwResult<Metadata> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    info!("Attempting to load metadata from {url}");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    debug!("Received {} bytes of metadata", body.len());

    serde_json::from_slice(&body).map_err(CsvwError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;

    const METADATA_PATH: &str = "/v1/datasets/ashe/editions/time-series/versions/1/metadata";

    fn test_metadata_json() -> &'static str {
        include_str!("../../test_metadata.json")
    }

    #[tokio::test]
    async fn test_fetching_metadata() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(METADATA_PATH);
                then.status(200)
                    .header("content-type", "application/json")
                    .body(test_metadata_json());
            })
            .await;

        let metadata = fetch_metadata(&server.url(METADATA_PATH), None).await;
        println!("{metadata:#?}");
        mock.assert_async().await;
        assert!(metadata.is_ok(), "Metadata should have loaded ok");
        let metadata = metadata.unwrap();
        assert_eq!(
            metadata.title,
            "Annual Survey of Hours and Earnings (ASHE) - Hours"
        );
        assert_eq!(metadata.dimensions.len(), 6);
        assert_eq!(metadata.contacts.len(), 2);
    }

    #[tokio::test]
    async fn server_error_should_be_a_request_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(METADATA_PATH);
                then.status(500);
            })
            .await;

        let metadata = fetch_metadata(&server.url(METADATA_PATH), None).await;
        assert!(matches!(metadata, Err(CsvwError::Request(_))));
    }

    #[tokio::test]
    async fn malformed_body_should_be_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(METADATA_PATH);
                then.status(200).body("<html>not metadata</html>");
            })
            .await;

        let metadata = fetch_metadata(&server.url(METADATA_PATH), None).await;
        assert!(matches!(metadata, Err(CsvwError::Decode(_))));
    }

    #[test]
    fn missing_fields_should_default() {
        let metadata: Metadata = r#"{"title": "Only a title"}"#.parse().unwrap();
        assert_eq!(metadata.title, "Only a title");
        assert!(metadata.contacts.is_empty());
        assert!(metadata.alerts().is_empty());
        assert!(metadata.usage_notes().is_empty());
        assert_eq!(metadata.csv_href(), None);
    }

    #[test]
    fn metadata_should_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(test_metadata_json().as_bytes()).unwrap();

        let metadata = Metadata::from_file(file.path()).unwrap();
        assert_eq!(
            metadata.csv_href(),
            Some("https://download.beta.ons.gov.uk/downloads/datasets/ashe-table-7-hours/editions/time-series/versions/1.csv")
        );
        assert_eq!(metadata.dimension("time").map(|d| d.label.as_str()), Some("Time"));
        assert_eq!(metadata.alerts().len(), 1);
        assert_eq!(metadata.usage_notes().len(), 2);
    }

    #[test]
    fn missing_file_should_be_an_io_error() {
        let metadata = Metadata::from_file("/definitely/not/here.json");
        assert!(matches!(metadata, Err(CsvwError::Io(_))));
    }
}
