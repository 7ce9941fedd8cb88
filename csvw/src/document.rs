use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::{populate_columns, Column, DimensionPolicy};
use crate::error::{CsvwError, CsvwResult};
use crate::header::V4Header;
use crate::metadata::{Alert, ContactDetails, Metadata, UsageNote};

pub const CSVW_CONTEXT: &str = "http://www.w3.org/ns/csvw";

/// Fragment appended to the CSV URL for notes taken from usage notes.
pub const USAGE_NOTE_FRAGMENT: &str = "#col=need-to-store";

/// CSVW metadata describing the CSV download of one dataset version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CsvwDocument {
    #[serde(rename = "@context")]
    pub context: String,
    pub url: String,
    #[serde(rename = "dct:title")]
    pub title: String,
    #[serde(rename = "dct:description")]
    pub description: String,
    #[serde(rename = "dct:issued")]
    pub issued: String,
    #[serde(rename = "dct:publisher")]
    pub creator: Creator,
    #[serde(rename = "dcat:contactPoint")]
    pub contact: ContactDetails,
    #[serde(rename = "tableSchema")]
    pub table_schema: TableSchema,
    #[serde(rename = "dcat:theme")]
    pub theme: String,
    #[serde(rename = "dct:license")]
    pub license: String,
    #[serde(rename = "dct:accrualPeriodicity")]
    pub frequency: String,
    pub notes: Vec<Note>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    #[serde(rename = "@type")]
    pub kind: String,
    /// Where more information about the publisher is available.
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
    #[serde(rename = "aboutUrl")]
    pub about: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub body: String,
    pub motivation: String,
}

impl From<&Alert> for Note {
    fn from(alert: &Alert) -> Self {
        Note {
            kind: alert.kind.clone(),
            body: alert.description.clone(),
            ..Default::default()
        }
    }
}

impl From<&UsageNote> for Note {
    fn from(usage: &UsageNote) -> Self {
        Note {
            kind: usage.title.clone(),
            body: usage.note.clone(),
            ..Default::default()
        }
    }
}

/// Alerts followed by usage notes, each in their original order.
pub fn build_notes(csv_url: &str, alerts: &[Alert], usage_notes: &[UsageNote]) -> Vec<Note> {
    let alerts = alerts.iter().map(|alert| Note {
        target: csv_url.to_string(),
        ..Note::from(alert)
    });
    let usage_notes = usage_notes.iter().map(|usage| Note {
        target: format!("{csv_url}{USAGE_NOTE_FRAGMENT}"),
        ..Note::from(usage)
    });
    alerts.chain(usage_notes).collect()
}

impl CsvwDocument {
    /// Projects `metadata` into a CSVW document.
    ///
    /// `about_url` is the address the metadata was read from and becomes the
    /// table schema's `aboutUrl`. The contact point is the first listed contact.
    pub fn from_metadata(
        metadata: &Metadata,
        about_url: &str,
        header: &V4Header,
        policy: DimensionPolicy,
    ) -> CsvwResult<Self> {
        let csv_url = metadata
            .csv_href()
            .ok_or(CsvwError::MissingCsvDownload)?
            .to_string();
        let contact = metadata
            .contacts
            .first()
            .cloned()
            .ok_or(CsvwError::EmptyContacts)?;
        let creator = metadata
            .publisher
            .as_ref()
            .map(|publisher| Creator {
                name: publisher.name.clone(),
                kind: publisher.kind.clone(),
                id: publisher.href.clone(),
            })
            .unwrap_or_default();

        let columns = populate_columns(
            header,
            &metadata.dimensions,
            &metadata.unit_of_measure,
            &csv_url,
            policy,
        )?;
        let notes = build_notes(&csv_url, metadata.alerts(), metadata.usage_notes());
        debug!(
            "Built CSVW document with {} columns and {} notes",
            columns.len(),
            notes.len()
        );

        Ok(CsvwDocument {
            context: CSVW_CONTEXT.into(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            issued: metadata.release_date.clone(),
            creator,
            contact,
            table_schema: TableSchema {
                columns,
                about: about_url.into(),
            },
            theme: metadata.theme.clone(),
            license: metadata.license.clone(),
            frequency: metadata.release_frequency.clone(),
            notes,
            url: csv_url,
        })
    }

    pub fn to_json(&self) -> CsvwResult<String> {
        serde_json::to_string(self).map_err(CsvwError::Serialize)
    }

    pub fn to_json_pretty(&self) -> CsvwResult<String> {
        serde_json::to_string_pretty(self).map_err(CsvwError::Serialize)
    }

    /// Serializes the document and appends `extras` as additional top-level
    /// string properties. A key the document already has is rejected.
    pub fn to_value_with_extras(&self, extras: &BTreeMap<String, String>) -> CsvwResult<Value> {
        let mut value = serde_json::to_value(self).map_err(CsvwError::Serialize)?;
        if let Value::Object(object) = &mut value {
            for (key, extra) in extras {
                if object.contains_key(key) {
                    return Err(CsvwError::KeyCollision(key.clone()));
                }
                object.insert(key.clone(), Value::String(extra.clone()));
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use itertools::Itertools;

    use super::*;
    use crate::config::DEFAULT_HEADER_ROW;

    const ABOUT_URL: &str = "http://localhost/metadata";

    fn test_metadata() -> Metadata {
        Metadata::from_str(include_str!("../../test_metadata.json")).unwrap()
    }

    fn test_document(metadata: &Metadata) -> CsvwResult<CsvwDocument> {
        let header = V4Header::from_str(DEFAULT_HEADER_ROW).unwrap();
        CsvwDocument::from_metadata(metadata, ABOUT_URL, &header, DimensionPolicy::Fallback)
    }

    #[test]
    fn top_level_fields_should_be_copied() {
        let metadata = test_metadata();
        let doc = test_document(&metadata).unwrap();
        assert_eq!(doc.context, CSVW_CONTEXT);
        assert_eq!(doc.url, metadata.csv_href().unwrap());
        assert_eq!(doc.title, metadata.title);
        assert_eq!(doc.description, metadata.description);
        assert_eq!(doc.issued, metadata.release_date);
        assert_eq!(doc.theme, metadata.theme);
        assert_eq!(doc.license, metadata.license);
        assert_eq!(doc.frequency, metadata.release_frequency);
        assert_eq!(doc.contact, metadata.contacts[0]);
        assert_eq!(doc.creator.name, "Office for National Statistics");
        assert_eq!(doc.creator.kind, "Government department");
        assert_eq!(doc.creator.id, "https://www.ons.gov.uk");
        assert_eq!(doc.table_schema.about, ABOUT_URL);
        assert_eq!(doc.table_schema.columns.len(), 15);
    }

    #[test]
    fn empty_contacts_should_error() {
        let mut metadata = test_metadata();
        metadata.contacts.clear();
        assert!(matches!(
            test_document(&metadata),
            Err(CsvwError::EmptyContacts)
        ));
    }

    #[test]
    fn missing_csv_download_should_error() {
        let mut metadata = test_metadata();
        metadata.downloads = None;
        assert!(matches!(
            test_document(&metadata),
            Err(CsvwError::MissingCsvDownload)
        ));
    }

    #[test]
    fn notes_should_list_alerts_before_usage_notes() {
        let alerts = vec![
            Alert {
                kind: "correction".into(),
                description: "first".into(),
                ..Default::default()
            },
            Alert {
                kind: "alert".into(),
                description: "second".into(),
                ..Default::default()
            },
        ];
        let usage = vec![UsageNote {
            title: "Data marking".into(),
            note: "third".into(),
        }];
        let notes = build_notes("http://localhost/v4.csv", &alerts, &usage);

        assert_eq!(notes.len(), 3);
        assert_eq!(
            notes.iter().map(|n| n.body.as_str()).collect_vec(),
            vec!["first", "second", "third"]
        );
        assert_eq!(notes[0].kind, "correction");
        assert_eq!(notes[0].target, "http://localhost/v4.csv");
        assert_eq!(notes[2].kind, "Data marking");
        assert_eq!(notes[2].target, "http://localhost/v4.csv#col=need-to-store");
        assert!(notes.iter().all(|n| n.motivation.is_empty()));
    }

    #[test]
    fn missing_alerts_and_usage_notes_should_give_no_notes() {
        let mut metadata = test_metadata();
        metadata.alerts = None;
        metadata.usage_notes = None;
        let doc = test_document(&metadata).unwrap();
        assert!(doc.notes.is_empty());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["notes"], serde_json::json!([]));
    }

    #[test]
    fn document_should_serialize_with_csvw_keys() {
        let doc = test_document(&test_metadata()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let keys = value.as_object().unwrap().keys().collect_vec();
        assert_eq!(
            keys,
            vec![
                "@context",
                "url",
                "dct:title",
                "dct:description",
                "dct:issued",
                "dct:publisher",
                "dcat:contactPoint",
                "tableSchema",
                "dcat:theme",
                "dct:license",
                "dct:accrualPeriodicity",
                "notes",
            ]
        );
        assert_eq!(value["dct:publisher"]["@type"], "Government department");
        assert_eq!(value["tableSchema"]["aboutUrl"], ABOUT_URL);
        assert_eq!(value["notes"][1]["motivation"], "");
    }

    #[test]
    fn document_should_round_trip_through_json() {
        let doc = test_document(&test_metadata()).unwrap();
        let json = doc.to_json().unwrap();
        assert_eq!(json, doc.to_json().unwrap(), "serialization should be stable");
        let parsed: CsvwDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
        let parsed: CsvwDocument = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn extras_should_be_appended() {
        let doc = test_document(&test_metadata()).unwrap();
        let extras = BTreeMap::from([("dct:identifier".to_string(), "ashe-7".to_string())]);
        let value = doc.to_value_with_extras(&extras).unwrap();
        assert_eq!(value["dct:identifier"], "ashe-7");
        assert_eq!(value["dct:title"], doc.title.as_str());
        let last_key = value.as_object().unwrap().keys().last().unwrap();
        assert_eq!(last_key, "dct:identifier");
    }

    #[test]
    fn colliding_extras_should_error() {
        let doc = test_document(&test_metadata()).unwrap();
        let extras = BTreeMap::from([("dct:title".to_string(), "Another title".to_string())]);
        let value = doc.to_value_with_extras(&extras);
        assert!(matches!(value, Err(CsvwError::KeyCollision(ref key)) if key == "dct:title"));
    }
}
