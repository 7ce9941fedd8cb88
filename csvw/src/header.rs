//! Parsing of V4 CSV headers.
//!
//! A V4 header starts with `<name>_<n>`, the observation column, followed by
//! `n` data-marking columns and then one `(code, label)` pair of columns per
//! dimension, e.g. `V4_1,Data marking,Time_codelist,Time,...`.

use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::CsvwError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct V4Header {
    pub observation: String,
    pub markings: Vec<String>,
    pub dimensions: Vec<DimensionHeader>,
}

/// The pair of headers a single dimension contributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionHeader {
    pub code: String,
    pub label: String,
}

impl DimensionHeader {
    /// Name used to look the dimension up in the metadata.
    pub fn dimension_name(&self) -> String {
        self.label.to_lowercase()
    }
}

impl V4Header {
    /// Total number of columns the header describes.
    pub fn column_count(&self) -> usize {
        1 + self.markings.len() + 2 * self.dimensions.len()
    }
}

/// Number of marking columns encoded in the first token, e.g. `2` for `V4_2`.
fn marking_count(token: &str) -> Result<usize, CsvwError> {
    let parts: Vec<&str> = token.split('_').collect();
    if parts.len() != 2 {
        return Err(CsvwError::MalformedHeader(format!(
            "first column '{token}' is not of the form <name>_<count>"
        )));
    }
    parts[1].parse::<usize>().map_err(|_| {
        CsvwError::MalformedHeader(format!(
            "first column '{token}' does not end in a marking count"
        ))
    })
}

impl FromStr for V4Header {
    type Err = CsvwError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split(',').collect();
        let observation = tokens[0];
        let count = marking_count(observation)?;

        let rest = &tokens[1..];
        if rest.len() < count {
            return Err(CsvwError::MalformedHeader(format!(
                "expected {count} marking columns but found {}",
                rest.len()
            )));
        }
        let (markings, dimensions) = rest.split_at(count);
        if dimensions.len() % 2 != 0 {
            return Err(CsvwError::MalformedHeader(format!(
                "dimension column '{}' has no label column",
                dimensions[dimensions.len() - 1]
            )));
        }

        Ok(V4Header {
            observation: observation.to_string(),
            markings: markings.iter().map(|s| s.to_string()).collect(),
            dimensions: dimensions
                .iter()
                .tuples()
                .map(|(code, label)| DimensionHeader {
                    code: code.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        })
    }
}
