//! Request and response descriptors exchanged with the engine.
//!
//! Each descriptor has the JSON shape the engine's callers already speak,
//! e.g. `{"DSRC_CODE": "GO_TEST"}` in and `{"DSRC_ID":1001}` out.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AttributeId, DataSourceId};

/// Input to add or delete a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceSpec {
    #[serde(rename = "DSRC_CODE")]
    pub code: String,

    /// Requested ID; the engine picks one when absent.
    #[serde(rename = "DSRC_ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DataSourceId>,
}

impl DataSourceSpec {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(DataSourceId(id));
        self
    }
}

impl FromStr for DataSourceSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| CoreError::Decoding(e.to_string()))
    }
}

/// Output of adding a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedDataSource {
    #[serde(rename = "DSRC_ID")]
    pub id: DataSourceId,
}

impl AssignedDataSource {
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }
}

/// One entry of a data-source listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    #[serde(rename = "DSRC_ID")]
    pub id: DataSourceId,

    #[serde(rename = "DSRC_CODE")]
    pub code: String,
}

/// Data sources of a document in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataSourceList {
    #[serde(rename = "DATA_SOURCES")]
    pub data_sources: Vec<DataSourceRef>,
}

impl DataSourceList {
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.data_sources.iter().map(|d| d.code.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.data_sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty()
    }

    /// Render as `{"DATA_SOURCES":[{"DSRC_ID":..,"DSRC_CODE":..},...]}`.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }
}

/// Input to add an attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    #[serde(rename = "ATTR_CODE")]
    pub code: String,

    #[serde(rename = "ATTR_ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AttributeId>,

    #[serde(rename = "ATTR_CLASS", default = "other")]
    pub class: String,

    #[serde(rename = "FTYPE_CODE", default)]
    pub feature: Option<String>,

    #[serde(rename = "FELEM_CODE", default)]
    pub element: Option<String>,

    #[serde(rename = "FELEM_REQ", default = "no")]
    pub required: String,

    #[serde(rename = "DEFAULT_VALUE", default)]
    pub default_value: Option<String>,
}

impl AttributeSpec {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            id: None,
            class: other(),
            feature: None,
            element: None,
            required: no(),
            default_value: None,
        }
    }
}

impl FromStr for AttributeSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| CoreError::Decoding(e.to_string()))
    }
}

/// Output of adding an attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedAttribute {
    #[serde(rename = "ATTR_ID")]
    pub id: AttributeId,
}

fn other() -> String {
    "OTHER".to_string()
}

fn no() -> String {
    "No".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec_from_json() {
        let spec: DataSourceSpec = r#"{"DSRC_CODE": "GO_TEST"}"#.parse().unwrap();
        assert_eq!(spec, DataSourceSpec::new("GO_TEST"));
    }

    #[test]
    fn test_parse_spec_with_id() {
        let spec: DataSourceSpec = r#"{"DSRC_CODE":"X","DSRC_ID":2000}"#.parse().unwrap();
        assert_eq!(spec.id, Some(DataSourceId(2000)));
    }

    #[test]
    fn test_parse_spec_missing_code() {
        assert!(matches!(
            r#"{"DSRC_ID":3}"#.parse::<DataSourceSpec>(),
            Err(CoreError::Decoding(_))
        ));
    }

    #[test]
    fn test_assigned_json() {
        let assigned = AssignedDataSource {
            id: DataSourceId(1001),
        };
        assert_eq!(assigned.to_json().unwrap(), r#"{"DSRC_ID":1001}"#);
    }
}
