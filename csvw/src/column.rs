use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::{CsvwError, CsvwResult};
use crate::header::V4Header;
use crate::metadata::CodeList;

const OBSERVATION_DATATYPE: &str = "number";

/// What to do when a dimension named in the header is missing from the metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DimensionPolicy {
    /// Emit the dimension's columns with an empty label, description and code list URL.
    #[default]
    Fallback,
    /// Fail with `CsvwError::UnmatchedDimension`.
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ColumnRole {
    Observation,
    Marking,
    DimensionCode,
    DimensionLabel,
}

/// A column of the table schema. Each variant carries exactly the attributes
/// written for that kind of column; keys serialize in sorted order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Observation(ObservationColumn),
    DimensionCode(DimensionCodeColumn),
    DimensionLabel(DimensionLabelColumn),
    Marking(MarkingColumn),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationColumn {
    #[serde(rename = "@id")]
    pub id: String,
    pub datatype: String,
    /// Unit of measure of the observations.
    pub name: String,
    pub required: bool,
    pub titles: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkingColumn {
    #[serde(rename = "@id")]
    pub id: String,
    pub titles: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionCodeColumn {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub required: bool,
    #[serde(rename = "valueURL")]
    pub value_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionLabelColumn {
    #[serde(rename = "@id")]
    pub id: String,
    pub description: String,
    pub name: String,
    pub titles: String,
}

impl Column {
    pub fn role(&self) -> ColumnRole {
        match self {
            Column::Observation(_) => ColumnRole::Observation,
            Column::Marking(_) => ColumnRole::Marking,
            Column::DimensionCode(_) => ColumnRole::DimensionCode,
            Column::DimensionLabel(_) => ColumnRole::DimensionLabel,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Column::Observation(c) => &c.id,
            Column::Marking(c) => &c.id,
            Column::DimensionCode(c) => &c.id,
            Column::DimensionLabel(c) => &c.id,
        }
    }

    /// Position of the column in the CSV, recovered from its `@id` fragment.
    pub fn position(&self) -> Option<usize> {
        self.id()
            .rsplit_once("#col=")
            .and_then(|(_, position)| position.parse().ok())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Column::Observation(c) => Some(&c.name),
            Column::Marking(_) => None,
            Column::DimensionCode(c) => Some(&c.name),
            Column::DimensionLabel(c) => Some(&c.name),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Column::Observation(c) => Some(&c.titles),
            Column::Marking(c) => Some(&c.titles),
            Column::DimensionCode(_) => None,
            Column::DimensionLabel(c) => Some(&c.titles),
        }
    }
}

fn column_id(csv_url: &str, position: usize) -> String {
    format!("{csv_url}#col={position}")
}

/// Builds the table schema columns for `header`.
///
/// Dimensions are matched by comparing the lowercased label header against
/// each `CodeList::name`. Columns are numbered from zero in header order.
pub fn populate_columns(
    header: &V4Header,
    dimensions: &[CodeList],
    unit: &str,
    csv_url: &str,
    policy: DimensionPolicy,
) -> CsvwResult<Vec<Column>> {
    let mut columns = Vec::with_capacity(header.column_count());

    columns.push(Column::Observation(ObservationColumn {
        id: column_id(csv_url, 0),
        datatype: OBSERVATION_DATATYPE.into(),
        name: unit.into(),
        required: true,
        titles: header.observation.clone(),
    }));

    for marking in &header.markings {
        columns.push(Column::Marking(MarkingColumn {
            id: column_id(csv_url, columns.len()),
            titles: marking.clone(),
        }));
    }

    let unmatched = CodeList::default();
    for dim_header in &header.dimensions {
        let name = dim_header.dimension_name();
        let dim = match dimensions.iter().find(|d| d.name == name) {
            Some(dim) => dim,
            None if policy == DimensionPolicy::Strict => {
                return Err(CsvwError::UnmatchedDimension(name));
            }
            None => {
                warn!("No dimension named '{name}' in metadata, label columns will be empty");
                &unmatched
            }
        };

        columns.push(Column::DimensionCode(DimensionCodeColumn {
            id: column_id(csv_url, columns.len()),
            name: dim_header.code.clone(),
            required: true,
            value_url: format!("{}/codes/{{{}}}", dim.href, dim_header.code),
        }));
        columns.push(Column::DimensionLabel(DimensionLabelColumn {
            id: column_id(csv_url, columns.len()),
            description: dim.description.clone(),
            name,
            titles: dim.label.clone(),
        }));
    }

    debug!("Populated {} columns", columns.len());
    Ok(columns)
}
