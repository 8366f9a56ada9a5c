//! The default document handed out by `create`.

use serde_json::{json, Map, Value};

use crate::document::{AttributeType, ConfigBody, ConfigDocument, DataSource};
use crate::types::{AttributeId, DataSourceId};

/// First ID the engine assigns to a caller-added data source.
pub const FIRST_USER_DSRC_ID: i64 = 1001;

/// Built-in attribute types: (id, code, class, feature, element, required, internal).
const TEMPLATE_ATTRIBUTES: &[(i64, &str, &str, Option<&str>, Option<&str>, &str, &str)] = &[
    (1001, "DATA_SOURCE", "OBSERVATION", None, None, "Yes", "Yes"),
    (1002, "ROUTE", "OBSERVATION", None, None, "No", "Yes"),
    (1003, "RECORD_ID", "OBSERVATION", None, None, "No", "Yes"),
    (1004, "ENTITY_KEY", "OBSERVATION", None, None, "No", "Yes"),
    (1005, "OBS_ENT_ID", "OBSERVATION", None, None, "No", "Yes"),
    (1006, "DSRC_ACTION", "OBSERVATION", None, None, "No", "Yes"),
    (1101, "NAME_TYPE", "NAME", Some("NAME"), Some("USAGE_TYPE"), "No", "No"),
    (1102, "NAME_FULL", "NAME", Some("NAME"), Some("FULL_NAME"), "Any", "No"),
    (1103, "NAME_ORG", "NAME", Some("NAME"), Some("ORG_NAME"), "Any", "No"),
    (1104, "NAME_LAST", "NAME", Some("NAME"), Some("SUR_NAME"), "Any", "No"),
    (1105, "NAME_FIRST", "NAME", Some("NAME"), Some("GIVEN_NAME"), "No", "No"),
    (1201, "ADDR_FULL", "ADDRESS", Some("ADDRESS"), Some("ADDR_FULL"), "Any", "No"),
    (1202, "ADDR_LINE1", "ADDRESS", Some("ADDRESS"), Some("ADDR1"), "Any", "No"),
    (1203, "ADDR_CITY", "ADDRESS", Some("ADDRESS"), Some("CITY"), "No", "No"),
    (1204, "ADDR_POSTAL_CODE", "ADDRESS", Some("ADDRESS"), Some("POSTAL_CODE"), "No", "No"),
    (1301, "PHONE_NUMBER", "PHONE", Some("PHONE"), Some("PHONE_NUM"), "Yes", "No"),
    (1401, "DATE_OF_BIRTH", "ATTRIBUTE", Some("DOB"), Some("DATE"), "Yes", "No"),
    (1501, "SSN_NUMBER", "IDENTIFIER", Some("SSN"), Some("ID_NUM"), "Yes", "No"),
    (1601, "EMAIL_ADDRESS", "IDENTIFIER", Some("EMAIL"), Some("ADDR"), "Yes", "No"),
];

/// Built-in data sources: (id, code, description).
const TEMPLATE_DATA_SOURCES: &[(i64, &str, &str)] = &[(1, "TEST", "Test"), (2, "SEARCH", "Search")];

/// Build the default configuration document.
///
/// Two data sources (`TEST` = 1, `SEARCH` = 2) and the built-in attribute
/// table, whose first entry is `DATA_SOURCE` with ID 1001.
pub fn default_document() -> ConfigDocument {
    let attributes = TEMPLATE_ATTRIBUTES
        .iter()
        .map(
            |&(id, code, class, feature, element, required, internal)| AttributeType {
                id: AttributeId(id),
                code: code.to_string(),
                class: class.to_string(),
                feature: feature.map(String::from),
                element: element.map(String::from),
                required: required.to_string(),
                default_value: None,
                internal: internal.to_string(),
                extra: Map::new(),
            },
        )
        .collect();

    let data_sources = TEMPLATE_DATA_SOURCES
        .iter()
        .map(|&(id, code, desc)| {
            let mut ds = DataSource::new(DataSourceId(id), code);
            ds.description = desc.to_string();
            ds
        })
        .collect();

    let mut body_extra = Map::new();
    body_extra.insert("CONFIG_BASE_VERSION".to_string(), base_version());

    ConfigDocument {
        body: ConfigBody {
            attributes,
            data_sources,
            extra: body_extra,
        },
        extra: Map::new(),
    }
}

fn base_version() -> Value {
    json!({
        "VERSION": "3.0.0",
        "BUILD_VERSION": "3.0.0.00000",
        "COMPATIBILITY_VERSION": { "CONFIG_VERSION": "10" }
    })
}
