//! The configuration document: data sources and attribute types.
//!
//! Field names follow the engine's wire format. Anything a document carries
//! that is not modelled here lands in an `extra` map and is written back out
//! unchanged, so `load` followed by `save` never drops sections.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{AttributeId, DataSourceId};

/// A complete configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "G2_CONFIG")]
    pub body: ConfigBody,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `G2_CONFIG` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigBody {
    #[serde(rename = "CFG_ATTR", default)]
    pub attributes: Vec<AttributeType>,

    #[serde(rename = "CFG_DSRC", default)]
    pub data_sources: Vec<DataSource>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A data-source definition (`CFG_DSRC` entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "DSRC_ID")]
    pub id: DataSourceId,

    #[serde(rename = "DSRC_CODE")]
    pub code: String,

    #[serde(rename = "DSRC_DESC", default)]
    pub description: String,

    #[serde(rename = "DSRC_RELY", default = "default_reliability")]
    pub reliability: i64,

    #[serde(rename = "RETENTION_LEVEL", default = "default_retention")]
    pub retention_level: String,

    #[serde(rename = "CONVERSATIONAL", default = "no")]
    pub conversational: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataSource {
    /// A data source with default metadata; the description mirrors the code.
    pub fn new(id: DataSourceId, code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            id,
            description: code.clone(),
            code,
            reliability: default_reliability(),
            retention_level: default_retention(),
            conversational: no(),
            extra: Map::new(),
        }
    }
}

/// An attribute-type definition (`CFG_ATTR` entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeType {
    #[serde(rename = "ATTR_ID")]
    pub id: AttributeId,

    #[serde(rename = "ATTR_CODE")]
    pub code: String,

    #[serde(rename = "ATTR_CLASS", default = "default_attr_class")]
    pub class: String,

    #[serde(rename = "FTYPE_CODE", default)]
    pub feature: Option<String>,

    #[serde(rename = "FELEM_CODE", default)]
    pub element: Option<String>,

    #[serde(rename = "FELEM_REQ", default = "no")]
    pub required: String,

    #[serde(rename = "DEFAULT_VALUE", default)]
    pub default_value: Option<String>,

    #[serde(rename = "INTERNAL", default = "no")]
    pub internal: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttributeType {
    /// Internal attributes are owned by the engine and cannot be removed.
    pub fn is_internal(&self) -> bool {
        self.internal.eq_ignore_ascii_case("yes")
    }
}

impl ConfigDocument {
    /// An empty document with no data sources or attributes.
    pub fn empty() -> Self {
        Self {
            body: ConfigBody::default(),
            extra: Map::new(),
        }
    }

    /// Parse a document from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Decoding(e.to_string()))
    }

    /// Serialize the document to compact JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.body.data_sources
    }

    pub fn attributes(&self) -> &[AttributeType] {
        &self.body.attributes
    }

    /// Find a data source by (already normalized) code.
    pub fn data_source(&self, code: &str) -> Option<&DataSource> {
        self.body.data_sources.iter().find(|ds| ds.code == code)
    }

    /// Find an attribute type by (already normalized) code.
    pub fn attribute(&self, code: &str) -> Option<&AttributeType> {
        self.body.attributes.iter().find(|a| a.code == code)
    }

    /// Highest data-source ID in the document, if any.
    pub fn max_data_source_id(&self) -> Option<DataSourceId> {
        self.body.data_sources.iter().map(|ds| ds.id).max()
    }

    /// Highest attribute ID in the document, if any.
    pub fn max_attribute_id(&self) -> Option<AttributeId> {
        self.body.attributes.iter().map(|a| a.id).max()
    }
}

fn default_reliability() -> i64 {
    1
}

fn default_retention() -> String {
    "Remember".to_string()
}

fn default_attr_class() -> String {
    "OTHER".to_string()
}

fn no() -> String {
    "No".to_string()
}
